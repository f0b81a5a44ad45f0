//! Data model and graph construction for orthogonal net routing: anchors,
//! rectangular obstacles, the sparse routing graph, and its (de)serialization.
//! Pathfinding and net dispatch live in the sibling `routing-router` crate.

pub mod builder;
pub mod error;
pub mod geom;
pub mod graph;
pub mod index;
pub mod node;
pub mod serialize;
pub mod util;

pub use builder::build_graph;
pub use error::{RoutingError, RoutingResult, StatusCode};
pub use geom::{BoundingBox, Direction, DirectionSet, Point};
pub use graph::{AnchorSpec, Graph};
pub use index::{BoundingBoxIndex, NodeIndex};
pub use node::{NeighborList, Node};
