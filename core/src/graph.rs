use crate::geom::{BoundingBox, DirectionSet, Point};
use crate::index::{BoundingBoxIndex, NodeIndex};
use crate::node::Node;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An externally supplied anchor: a position that seeds the graph and may
/// later serve as a net endpoint (§3).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnchorSpec {
    pub position: Point,
    pub bounding_box: Option<BoundingBoxIndex>,
    pub connect_directions: DirectionSet,
}

impl AnchorSpec {
    pub fn new(position: Point, connect_directions: DirectionSet) -> Self {
        Self {
            position,
            bounding_box: None,
            connect_directions,
        }
    }

    pub fn with_box(mut self, b: BoundingBoxIndex) -> Self {
        self.bounding_box = Some(b);
        self
    }
}

/// The sparse orthogonal routing graph. Immutable once built (§3); shared
/// by reference across worker threads during routing.
#[derive(Debug, Serialize, Deserialize)]
pub struct Graph {
    pub(crate) nodes: Vec<Node>,
    pub(crate) position_index: HashMap<Point, NodeIndex>,
    pub(crate) obstacles: Vec<BoundingBox>,
}

impl Graph {
    pub fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            position_index: HashMap::new(),
            obstacles: Vec::new(),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, idx: NodeIndex) -> Option<&Node> {
        self.nodes.get(idx.index())
    }

    pub fn obstacles(&self) -> &[BoundingBox] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// O(1) spatial lookup (§6 `graph_find_node`).
    pub fn find_node(&self, pos: Point) -> Option<NodeIndex> {
        self.position_index.get(&pos).copied()
    }
}
