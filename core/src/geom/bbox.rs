use super::point::Point;
use serde::{Deserialize, Serialize};

/// An axis-aligned obstacle rectangle: `[cx-hw, cx+hw] x [cy-hh, cy+hh]`,
/// inclusive of the boundary. A point is *inside* iff strictly within the
/// open interior (§3) — boundary points are never blocked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub center: Point,
    pub half_width: u16,
    pub half_height: u16,
}

impl BoundingBox {
    pub fn new(center: Point, half_width: u16, half_height: u16) -> Self {
        Self {
            center,
            half_width,
            half_height,
        }
    }

    pub fn min_x(&self) -> i32 {
        self.center.x - self.half_width as i32
    }
    pub fn max_x(&self) -> i32 {
        self.center.x + self.half_width as i32
    }
    pub fn min_y(&self) -> i32 {
        self.center.y - self.half_height as i32
    }
    pub fn max_y(&self) -> i32 {
        self.center.y + self.half_height as i32
    }

    pub fn contains_strictly(&self, p: Point) -> bool {
        p.x > self.min_x() && p.x < self.max_x() && p.y > self.min_y() && p.y < self.max_y()
    }

    /// Does the *open* segment between `a` and `b` (assumed axis-aligned)
    /// cross this box's interior? Touching the boundary does not count.
    pub fn blocks_segment(&self, a: Point, b: Point) -> bool {
        if a.y == b.y {
            let y = a.y;
            if y <= self.min_y() || y >= self.max_y() {
                return false;
            }
            let (lo, hi) = (a.x.min(b.x), a.x.max(b.x));
            lo < self.max_x() && hi > self.min_x()
        } else if a.x == b.x {
            let x = a.x;
            if x <= self.min_x() || x >= self.max_x() {
                return false;
            }
            let (lo, hi) = (a.y.min(b.y), a.y.max(b.y));
            lo < self.max_y() && hi > self.min_y()
        } else {
            false
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.half_width == 0 || self.half_height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_is_not_blocked() {
        let b = BoundingBox::new(Point::new(5, 5), 3, 3);
        assert!(!b.contains_strictly(Point::new(2, 5)));
        assert!(b.contains_strictly(Point::new(5, 5)));
    }

    #[test]
    fn segment_block_detection() {
        let b = BoundingBox::new(Point::new(5, 5), 3, 3);
        // Horizontal segment passing through the box interior at y=5.
        assert!(b.blocks_segment(Point::new(0, 5), Point::new(10, 5)));
        // Segment only touching the boundary at y=2 is not blocked.
        assert!(!b.blocks_segment(Point::new(0, 2), Point::new(10, 2)));
        // Segment entirely outside the box's x-range.
        assert!(!b.blocks_segment(Point::new(20, 5), Point::new(30, 5)));
    }
}
