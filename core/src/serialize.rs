//! Opaque binary graph persistence (§4.5): a built `Graph` can be saved and
//! reloaded without re-running the builder, e.g. to cache a graph across
//! process invocations on the same layout.

use crate::error::{RoutingError, RoutingResult};
use crate::graph::Graph;
use std::io::{Read, Write};
use std::path::Path;

pub fn to_bytes(graph: &Graph) -> RoutingResult<Vec<u8>> {
    bincode::serialize(graph).map_err(|e| RoutingError::InvalidArgument(e.to_string()))
}

pub fn from_bytes(bytes: &[u8]) -> RoutingResult<Graph> {
    bincode::deserialize(bytes).map_err(|e| RoutingError::InvalidArgument(e.to_string()))
}

pub fn save(graph: &Graph, path: impl AsRef<Path>) -> RoutingResult<()> {
    let bytes = to_bytes(graph)?;
    let mut f = std::fs::File::create(path)?;
    f.write_all(&bytes)?;
    log::debug!("wrote graph ({} nodes, {} bytes)", graph.len(), bytes.len());
    Ok(())
}

pub fn load(path: impl AsRef<Path>) -> RoutingResult<Graph> {
    let mut f = std::fs::File::open(path)?;
    let mut bytes = Vec::new();
    f.read_to_end(&mut bytes)?;
    from_bytes(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{DirectionSet, Point};
    use crate::graph::AnchorSpec;

    #[test]
    fn round_trip_preserves_structure() {
        let anchors = vec![
            AnchorSpec::new(Point::new(0, 0), DirectionSet::ALL),
            AnchorSpec::new(Point::new(10, 0), DirectionSet::ALL),
        ];
        let graph = crate::builder::build_graph(&anchors, &[], false);
        let bytes = to_bytes(&graph).unwrap();
        let restored = from_bytes(&bytes).unwrap();
        assert_eq!(graph.len(), restored.len());
        for (a, b) in graph.nodes().iter().zip(restored.nodes()) {
            assert_eq!(a.position, b.position);
            assert_eq!(a.is_anchor, b.is_anchor);
            assert_eq!(a.legal_directions, b.legal_directions);
        }
    }
}
