//! Net input types (§3): a net references a contiguous run of a
//! caller-supplied endpoint array, and each endpoint a contiguous run of a
//! waypoint array.

use routing_core::Point;

/// A contiguous run in the caller's endpoint array. At least two endpoints
/// required (validated in the dispatcher).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Net {
    pub endpoint_offset: u32,
    pub endpoint_count: u32,
}

impl Net {
    pub fn new(endpoint_offset: u32, endpoint_count: u32) -> Self {
        Self {
            endpoint_offset,
            endpoint_count,
        }
    }

    pub fn endpoints<'a>(&self, all: &'a [Endpoint]) -> &'a [Endpoint] {
        &all[self.endpoint_offset as usize..(self.endpoint_offset + self.endpoint_count) as usize]
    }
}

/// A terminal to be connected; must coincide with a graph node position.
/// References its own contiguous run of forced intermediate points in the
/// waypoint array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Endpoint {
    pub position: Point,
    pub waypoint_offset: u32,
    pub waypoint_count: u32,
}

impl Endpoint {
    pub fn new(position: Point) -> Self {
        Self {
            position,
            waypoint_offset: 0,
            waypoint_count: 0,
        }
    }

    pub fn with_waypoints(position: Point, waypoint_offset: u32, waypoint_count: u32) -> Self {
        Self {
            position,
            waypoint_offset,
            waypoint_count,
        }
    }

    pub fn waypoints<'a>(&self, all: &'a [Point]) -> &'a [Point] {
        &all[self.waypoint_offset as usize..(self.waypoint_offset + self.waypoint_count) as usize]
    }
}
