//! Work dispatcher (§4.4, §5): initializes the process-wide worker pool
//! and drives `connect_nets`, routing every net in parallel and then
//! writing results into the caller's output buffers in net-index order.

use crate::net::{Endpoint, Net};
use crate::net_router::{self, route_net};
use crate::pathfinder::AStar;
use crate::wire::{NetView, Vertex, WireView};
use rayon::prelude::*;
use routing_core::{Graph, Point, RoutingError, RoutingResult};
use std::sync::OnceLock;

static POOL: OnceLock<rayon::ThreadPool> = OnceLock::new();

/// Creates the process-wide worker pool (§5, §6 `init_thread_pool`).
/// `thread_count` of 0 leaves rayon's default (available hardware
/// parallelism) in place. Idempotency: a second call fails with
/// `InvalidOperation`.
pub fn init_thread_pool(thread_count: usize) -> RoutingResult<()> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if thread_count != 0 {
        builder = builder.num_threads(thread_count);
    }
    let pool = builder
        .build()
        .map_err(|e| RoutingError::InvalidOperation(e.to_string()))?;
    POOL.set(pool)
        .map_err(|_| RoutingError::InvalidOperation("thread pool already initialized".into()))?;
    log::info!("routing worker pool initialized with {} threads", get_thread_count()?);
    Ok(())
}

/// Returns the current worker count (§6 `get_thread_count`).
pub fn get_thread_count() -> RoutingResult<usize> {
    POOL.get().map(|p| p.current_num_threads()).ok_or(RoutingError::Uninitialized)
}

/// Per-net routing result paired with its input index, produced by the
/// parallel phase before any buffer writes happen.
struct NetResult {
    net_index: usize,
    outcome: RoutingResult<(Vec<Vertex>, Vec<WireView>)>,
}

/// Routes every net in `nets` in parallel and writes the result into the
/// caller's flat output buffers (§4.3–4.4).
///
/// Requires `nets.len() == net_views.len()`. On the first error (by net
/// index), returns that error; buffers for nets at or after the failing
/// index are left in whatever state the parallel phase produced, but no
/// partial net's data is split across a buffer boundary since each net's
/// write is all-or-nothing.
#[allow(clippy::too_many_arguments)]
pub fn connect_nets(
    graph: &Graph,
    nets: &[Net],
    endpoints: &[Endpoint],
    waypoints: &[Point],
    vertices: &mut [Vertex],
    wire_views: &mut [WireView],
    net_views: &mut [NetView],
    perform_centering: bool,
) -> RoutingResult<()> {
    let pool = POOL.get().ok_or(RoutingError::Uninitialized)?;

    if nets.len() != net_views.len() {
        return Err(RoutingError::InvalidArgument(format!(
            "nets.len() ({}) != net_views.len() ({})",
            nets.len(),
            net_views.len()
        )));
    }
    if nets.is_empty() {
        return Ok(());
    }

    let results: Vec<NetResult> = pool.install(|| {
        nets.par_iter()
            .enumerate()
            .map_with(AStar::new(), |astar, (net_index, net)| {
                let outcome = route_net(graph, net, net_index, endpoints, waypoints, astar, perform_centering)
                    .map(|r| (r.vertices, r.wires));
                NetResult { net_index, outcome }
            })
            .collect()
    });

    let mut by_index: Vec<Option<RoutingResult<(Vec<Vertex>, Vec<WireView>)>>> =
        (0..nets.len()).map(|_| None).collect();
    for r in results {
        by_index[r.net_index] = Some(r.outcome);
    }

    let mut vertex_cursor = 0usize;
    let mut wire_cursor = 0usize;

    for (net_index, outcome) in by_index.into_iter().enumerate() {
        let (net_vertices, net_wires) = match outcome.unwrap() {
            Ok(v) => v,
            Err(e) => {
                log::warn!("net {net_index} failed: {e}");
                return Err(e);
            }
        };

        if vertex_cursor + net_vertices.len() > vertices.len() {
            return Err(RoutingError::VertexBufferOverflow {
                net_index,
                needed: vertex_cursor + net_vertices.len(),
                available: vertices.len(),
            });
        }
        if wire_cursor + net_wires.len() > wire_views.len() {
            return Err(RoutingError::WireViewBufferOverflow {
                net_index,
                needed: wire_cursor + net_wires.len(),
                available: wire_views.len(),
            });
        }

        vertices[vertex_cursor..vertex_cursor + net_vertices.len()].copy_from_slice(&net_vertices);
        wire_views[wire_cursor..wire_cursor + net_wires.len()].copy_from_slice(&net_wires);

        net_views[net_index] = net_router::net_view_for(wire_cursor as u32, net_wires.len() as u32, vertex_cursor as u32);

        vertex_cursor += net_vertices.len();
        wire_cursor += net_wires.len();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use routing_core::geom::DirectionSet;
    use routing_core::graph::AnchorSpec;

    fn ensure_pool() {
        let _ = init_thread_pool(0);
    }

    #[test]
    fn connects_a_single_straight_net() {
        ensure_pool();
        let anchors = vec![
            AnchorSpec::new(Point::new(0, 0), DirectionSet::ALL),
            AnchorSpec::new(Point::new(10, 0), DirectionSet::ALL),
        ];
        let graph = routing_core::build_graph(&anchors, &[], false);
        let endpoints = vec![Endpoint::new(Point::new(0, 0)), Endpoint::new(Point::new(10, 0))];
        let nets = vec![Net::new(0, 2)];
        let mut vertices = vec![Vertex { x: 0.0, y: 0.0 }; 2];
        let mut wire_views = vec![WireView::new(0, false, false); 1];
        let mut net_views = vec![NetView { wire_offset: 0, wire_count: 0, vertex_offset: 0 }; 1];

        connect_nets(&graph, &nets, &endpoints, &[], &mut vertices, &mut wire_views, &mut net_views, false).unwrap();

        assert_eq!(net_views[0].wire_count, 1);
        assert_eq!(net_views[0].vertex_offset, 0);
    }

    #[test]
    fn vertex_buffer_overflow_is_reported() {
        ensure_pool();
        let anchors = vec![
            AnchorSpec::new(Point::new(0, 0), DirectionSet::ALL),
            AnchorSpec::new(Point::new(10, 0), DirectionSet::ALL),
        ];
        let graph = routing_core::build_graph(&anchors, &[], false);
        let endpoints = vec![Endpoint::new(Point::new(0, 0)), Endpoint::new(Point::new(10, 0))];
        let nets = vec![Net::new(0, 2)];
        let mut vertices = vec![Vertex { x: 0.0, y: 0.0 }; 1];
        let mut wire_views = vec![WireView::new(0, false, false); 1];
        let mut net_views = vec![NetView { wire_offset: 0, wire_count: 0, vertex_offset: 0 }; 1];

        let err = connect_nets(&graph, &nets, &endpoints, &[], &mut vertices, &mut wire_views, &mut net_views, false)
            .unwrap_err();
        assert!(matches!(err, RoutingError::VertexBufferOverflow { .. }));
    }

    #[test]
    fn empty_nets_list_is_a_no_op() {
        ensure_pool();
        let graph = routing_core::Graph::empty();
        let mut vertices: Vec<Vertex> = Vec::new();
        let mut wire_views: Vec<WireView> = Vec::new();
        let mut net_views: Vec<NetView> = Vec::new();
        connect_nets(&graph, &[], &[], &[], &mut vertices, &mut wire_views, &mut net_views, false).unwrap();
    }
}
