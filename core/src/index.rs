use serde::{Deserialize, Serialize};
use std::fmt;

/// Defines a `#[repr(transparent)]` newtype over `u32` with a sentinel
/// value of `u32::MAX` ("none"), matching §3/§6's index conventions.
macro_rules! define_index {
    ($name:ident) => {
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[repr(transparent)]
        pub struct $name(pub u32);

        impl $name {
            pub const SENTINEL: $name = $name(u32::MAX);

            #[inline(always)]
            pub fn new(id: usize) -> Self {
                Self(id as u32)
            }

            #[inline(always)]
            pub fn index(&self) -> usize {
                self.0 as usize
            }

            #[inline(always)]
            pub fn is_sentinel(&self) -> bool {
                self.0 == u32::MAX
            }

            #[inline(always)]
            pub fn valid(&self) -> Option<$name> {
                if self.is_sentinel() { None } else { Some(*self) }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::SENTINEL
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_sentinel() {
                    write!(f, "{}(none)", stringify!($name))
                } else {
                    write!(f, "{}({})", stringify!($name), self.0)
                }
            }
        }
    };
}

define_index!(NodeIndex);
define_index!(BoundingBoxIndex);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_is_uint32_max() {
        assert_eq!(NodeIndex::SENTINEL.0, u32::MAX);
        assert!(NodeIndex::default().is_sentinel());
        assert!(NodeIndex::new(3).valid().is_some());
        assert!(NodeIndex::SENTINEL.valid().is_none());
    }
}
