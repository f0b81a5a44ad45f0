use crate::geom::{Direction, DirectionSet, Point};
use crate::index::NodeIndex;
use serde::{Deserialize, Serialize};

/// The four axis neighbors of a node, one per cardinal direction. An
/// absent neighbor is the `NodeIndex` sentinel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborList {
    pub pos_x: NodeIndex,
    pub neg_x: NodeIndex,
    pub pos_y: NodeIndex,
    pub neg_y: NodeIndex,
}

impl NeighborList {
    pub fn get(&self, d: Direction) -> NodeIndex {
        match d {
            Direction::PosX => self.pos_x,
            Direction::NegX => self.neg_x,
            Direction::PosY => self.pos_y,
            Direction::NegY => self.neg_y,
        }
    }

    pub fn set(&mut self, d: Direction, idx: NodeIndex) {
        match d {
            Direction::PosX => self.pos_x = idx,
            Direction::NegX => self.neg_x = idx,
            Direction::PosY => self.pos_y = idx,
            Direction::NegY => self.neg_y = idx,
        }
    }
}

/// A vertex of the sparse routing graph.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Node {
    pub position: Point,
    pub neighbors: NeighborList,
    pub is_anchor: bool,
    /// Directions a search may traverse *out of* this node.
    pub legal_directions: DirectionSet,
}

impl Node {
    pub fn new(position: Point) -> Self {
        Self {
            position,
            neighbors: NeighborList::default(),
            is_anchor: false,
            legal_directions: DirectionSet::ALL,
        }
    }

    /// Whether an edge may be taken from this node in direction `d`: the
    /// direction must be legal and the neighbor must exist (§4.2).
    pub fn can_traverse(&self, d: Direction) -> bool {
        self.legal_directions.contains(d) && !self.neighbors.get(d).is_sentinel()
    }
}
