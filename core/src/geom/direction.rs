use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// One of the four cardinal half-lines a node or anchor may extend along.
/// Bit values are normative (§6): `+X=1, -X=2, +Y=4, -Y=8`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    PosX = 0b0001,
    NegX = 0b0010,
    PosY = 0b0100,
    NegY = 0b1000,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::PosX,
        Direction::NegX,
        Direction::PosY,
        Direction::NegY,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::PosX => Direction::NegX,
            Direction::NegX => Direction::PosX,
            Direction::PosY => Direction::NegY,
            Direction::NegY => Direction::PosY,
        }
    }

}

/// A 4-bit mask over the four `Direction`s. Named singletons and unions
/// `X`, `Y`, `ALL`, `NONE` per §3.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct DirectionSet(pub u8);

impl DirectionSet {
    pub const NONE: DirectionSet = DirectionSet(0);
    pub const POS_X: DirectionSet = DirectionSet(Direction::PosX as u8);
    pub const NEG_X: DirectionSet = DirectionSet(Direction::NegX as u8);
    pub const POS_Y: DirectionSet = DirectionSet(Direction::PosY as u8);
    pub const NEG_Y: DirectionSet = DirectionSet(Direction::NegY as u8);
    pub const X: DirectionSet = DirectionSet(Self::POS_X.0 | Self::NEG_X.0);
    pub const Y: DirectionSet = DirectionSet(Self::POS_Y.0 | Self::NEG_Y.0);
    pub const ALL: DirectionSet = DirectionSet(Self::X.0 | Self::Y.0);

    pub fn single(d: Direction) -> Self {
        DirectionSet(d as u8)
    }

    pub fn contains(self, d: Direction) -> bool {
        self.0 & (d as u8) != 0
    }

    pub fn is_subset_of(self, other: DirectionSet) -> bool {
        self.0 & !other.0 == 0
    }

    pub fn union(self, other: DirectionSet) -> DirectionSet {
        DirectionSet(self.0 | other.0)
    }

    pub fn intersect(self, other: DirectionSet) -> DirectionSet {
        DirectionSet(self.0 & other.0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |&d| self.contains(d))
    }
}

impl BitOr for DirectionSet {
    type Output = DirectionSet;
    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl BitOrAssign for DirectionSet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl From<Direction> for DirectionSet {
    fn from(d: Direction) -> Self {
        DirectionSet::single(d)
    }
}

impl fmt::Display for DirectionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Direction::PosX, "+X"),
            (Direction::NegX, "-X"),
            (Direction::PosY, "+Y"),
            (Direction::NegY, "-Y"),
        ];
        let parts: Vec<&str> = names
            .iter()
            .filter(|(d, _)| self.contains(*d))
            .map(|(_, s)| *s)
            .collect();
        write!(f, "{}", parts.join("|"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unions_match_normative_bits() {
        assert_eq!(DirectionSet::X.0, 0b0011);
        assert_eq!(DirectionSet::Y.0, 0b1100);
        assert_eq!(DirectionSet::ALL.0, 0b1111);
        assert_eq!(DirectionSet::NONE.0, 0);
    }

    #[test]
    fn subset_check() {
        let d = DirectionSet::POS_X | DirectionSet::POS_Y;
        assert!(d.is_subset_of(DirectionSet::ALL));
        assert!(!DirectionSet::ALL.is_subset_of(d));
    }
}
