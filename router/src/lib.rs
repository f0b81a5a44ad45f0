//! Parallel multi-endpoint pathfinding and wire extraction on top of a
//! `routing_core::Graph`: A* search, per-net tree building, and the
//! worker-pool dispatcher that drives `connect_nets` (§4.2–§4.4).

pub mod dispatcher;
pub mod net;
pub mod net_router;
pub mod pathfinder;
pub mod wire;

pub use dispatcher::{connect_nets, get_thread_count, init_thread_pool};
pub use net::{Endpoint, Net};
pub use pathfinder::AStar;
pub use wire::{NetView, Vertex, WireView};
