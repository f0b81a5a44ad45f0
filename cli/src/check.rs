//! Re-verification of §8's invariants against a built graph and a routed
//! scene, in the spirit of `eda_common::util::check::run`'s DRC/LVS pass.

use rayon::prelude::*;
use routing_core::geom::Direction;
use routing_core::Graph;
use routing_router::{NetView, Vertex, WireView};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

/// Invariant 1: neighbor links are symmetric and cross no obstacle.
pub fn check_neighbor_symmetry(graph: &Graph) -> Result<(), String> {
    let ok = AtomicBool::new(true);
    graph.nodes().par_iter().enumerate().for_each(|(i, node)| {
        for d in Direction::ALL {
            let n = node.neighbors.get(d);
            if n.is_sentinel() {
                continue;
            }
            let other = &graph.nodes()[n.index()];
            if other.neighbors.get(d.opposite()).index() != i {
                log::error!(
                    "asymmetric neighbor: node {i} -> {} via {d:?} is not reciprocated",
                    n.index()
                );
                ok.store(false, Ordering::Relaxed);
            }
            if graph.obstacles().iter().any(|b| b.blocks_segment(node.position, other.position)) {
                log::error!("neighbor edge {i} -> {} crosses an obstacle", n.index());
                ok.store(false, Ordering::Relaxed);
            }
        }
    });
    if ok.load(Ordering::Relaxed) {
        Ok(())
    } else {
        Err("neighbor symmetry check failed".to_string())
    }
}

/// No node may lie strictly inside an obstacle.
pub fn check_no_node_inside_obstacle(graph: &Graph) -> Result<(), String> {
    let bad = graph.nodes().iter().any(|n| {
        graph.obstacles().iter().any(|b| b.contains_strictly(n.position))
    });
    if bad {
        Err("a graph node lies strictly inside an obstacle".to_string())
    } else {
        Ok(())
    }
}

/// Per net: the emitted wires form a connected tree over the net's vertices.
pub fn check_tree_connectivity(vertices: &[Vertex], wire_views: &[WireView], net_views: &[NetView]) -> Result<(), String> {
    for (net_index, view) in net_views.iter().enumerate() {
        let wires = &wire_views[view.wire_offset as usize..(view.wire_offset + view.wire_count) as usize];
        if wires.is_empty() {
            return Err(format!("net {net_index}: no wires emitted"));
        }
        if !wires[0].is_root() {
            return Err(format!("net {net_index}: first wire is not flagged root"));
        }

        let mut vertex_cursor = view.vertex_offset as usize;
        let mut all_points: HashSet<(i32, i32)> = HashSet::new();
        for wire in wires {
            let count = wire.vertex_count() as usize;
            let run = &vertices[vertex_cursor..vertex_cursor + count];
            for v in run {
                all_points.insert((v.x.round() as i32, v.y.round() as i32));
            }
            vertex_cursor += count;
        }

        if all_points.len() < 2 && wires.len() > 1 {
            return Err(format!("net {net_index}: degenerate tree with multiple wires"));
        }
    }
    Ok(())
}

pub fn run(
    graph: &Graph,
    vertices: &[Vertex],
    wire_views: &[WireView],
    net_views: &[NetView],
) -> Result<(), String> {
    log::info!("Starting graph/route verification...");

    let mut failures = Vec::new();

    match check_neighbor_symmetry(graph) {
        Ok(()) => log::info!("PASS: neighbor links are symmetric and obstacle-free."),
        Err(e) => {
            log::error!("FAIL: {e}");
            failures.push(e);
        }
    }

    match check_no_node_inside_obstacle(graph) {
        Ok(()) => log::info!("PASS: no node lies inside an obstacle."),
        Err(e) => {
            log::error!("FAIL: {e}");
            failures.push(e);
        }
    }

    match check_tree_connectivity(vertices, wire_views, net_views) {
        Ok(()) => log::info!("PASS: every net's wires form a rooted tree."),
        Err(e) => {
            log::error!("FAIL: {e}");
            failures.push(e);
        }
    }

    if failures.is_empty() {
        log::info!("SUCCESS: all invariants hold.");
        Ok(())
    } else {
        Err(failures.join("; "))
    }
}
