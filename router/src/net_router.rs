//! Per-net routing (§4.3): resolves a net's endpoints and waypoints to
//! graph nodes, grows a shared wire tree with the pathfinder, and breaks
//! the result into wire segments.

use crate::net::{Endpoint, Net};
use crate::pathfinder::AStar;
use crate::wire::{NetView, Vertex, WireView};
use routing_core::geom::Direction;
use routing_core::{Graph, NodeIndex, Point, RoutingError, RoutingResult};
use std::collections::HashSet;

/// One routed net's wires and vertices, positioned relative to the start
/// of this net's own runs (offsets are applied by the caller).
pub struct RoutedNet {
    pub vertices: Vec<Vertex>,
    pub wires: Vec<WireView>,
}

/// Routes a single net into a spanning wire tree of its endpoints.
///
/// `net_index` is used only to attribute errors to the failing net.
pub fn route_net(
    graph: &Graph,
    net: &Net,
    net_index: usize,
    endpoints: &[Endpoint],
    waypoints: &[Point],
    astar: &mut AStar,
    perform_centering: bool,
) -> RoutingResult<RoutedNet> {
    let eps = net.endpoints(endpoints);
    if eps.len() < 2 {
        return Err(RoutingError::InvalidArgument(format!(
            "net {net_index} has fewer than two endpoints"
        )));
    }

    let resolve = |p: Point| -> RoutingResult<NodeIndex> {
        graph.find_node(p).ok_or_else(|| {
            RoutingError::InvalidOperation(format!("net {net_index}: no graph node at {p:?}"))
        })
    };

    let mut tree: HashSet<NodeIndex> = HashSet::new();
    // wire_terminals: the final vertex of each previously emitted wire, used
    // to tell a junction (landing on another wire's interior) apart from
    // landing on another wire's own terminal.
    let mut wire_terminals: HashSet<NodeIndex> = HashSet::new();

    let mut vertices = Vec::new();
    let mut wires = Vec::new();
    let mut root_emitted = false;

    // Endpoint 0 only emits a wire of its own when it carries waypoints;
    // otherwise it just seeds the tree and the first endpoint that routes
    // to it becomes the root wire (matches Scenario 1 / 3's single
    // two-vertex root wire when endpoint 0 has no forced path of its own).
    let root = &eps[0];
    let root_node = resolve(root.position)?;
    tree.insert(root_node);
    wire_terminals.insert(root_node);

    let root_waypoints = root.waypoints(waypoints);
    if !root_waypoints.is_empty() {
        let root_chain = chain_through_waypoints(graph, root.position, root_waypoints, astar, net_index, &resolve, None)?;
        emit_wire_segments(&root_chain, graph, &mut vertices, &mut wires, true, false, perform_centering);
        for &n in &root_chain {
            tree.insert(n);
        }
        wire_terminals.insert(*root_chain.last().unwrap());
        root_emitted = true;
    }

    for ep in &eps[1..] {
        let goal_set: Vec<NodeIndex> = tree.iter().copied().collect();
        let chain = chain_through_waypoints(graph, ep.position, ep.waypoints(waypoints), astar, net_index, &resolve, Some(&goal_set))?;
        let terminal = *chain.last().unwrap();
        let ends_in_junction = tree.contains(&terminal) && !wire_terminals.contains(&terminal);
        emit_wire_segments(&chain, graph, &mut vertices, &mut wires, !root_emitted, ends_in_junction, perform_centering);
        root_emitted = true;
        for &n in &chain {
            tree.insert(n);
        }
        wire_terminals.insert(terminal);
    }

    Ok(RoutedNet { vertices, wires })
}

/// Routes `start -> waypoints[0] -> ... -> waypoints[last]` and, unless
/// this endpoint has no remaining target, on to the nearest node in
/// `goals`. When `goals` is `None` (the root endpoint) the chain stops
/// after the last waypoint, or at `start` itself if there are none.
fn chain_through_waypoints(
    graph: &Graph,
    start: Point,
    waypoints: &[Point],
    astar: &mut AStar,
    net_index: usize,
    resolve: &dyn Fn(Point) -> RoutingResult<NodeIndex>,
    goals: Option<&[NodeIndex]>,
) -> RoutingResult<Vec<NodeIndex>> {
    let mut full_path = vec![resolve(start)?];

    for wp in waypoints {
        let source = *full_path.last().unwrap();
        let target = resolve(*wp)?;
        let segment = astar.find_path(graph, source, &[target]).ok_or_else(|| {
            RoutingError::InvalidOperation(format!("net {net_index}: no path to waypoint {wp:?}"))
        })?;
        full_path.extend_from_slice(&segment[1..]);
    }

    if let Some(goal_set) = goals {
        let source = *full_path.last().unwrap();
        if !goal_set.contains(&source) {
            let segment = astar.find_path(graph, source, goal_set).ok_or_else(|| {
                RoutingError::InvalidOperation(format!("net {net_index}: unreachable"))
            })?;
            full_path.extend_from_slice(&segment[1..]);
        }
    }

    Ok(full_path)
}

/// Splits a node path into maximal straight runs, each becoming one wire,
/// and writes their vertices.
fn emit_wire_segments(
    path: &[NodeIndex],
    graph: &Graph,
    vertices: &mut Vec<Vertex>,
    wires: &mut Vec<WireView>,
    first_is_root: bool,
    last_ends_in_junction: bool,
    perform_centering: bool,
) {
    if path.len() < 2 {
        if let Some(&only) = path.first() {
            let pos = graph.node(only).unwrap().position;
            vertices.push(Vertex::from_point(pos, perform_centering));
            wires.push(WireView::new(1, first_is_root, last_ends_in_junction));
        }
        return;
    }

    let bend_dirs: Vec<Direction> = path
        .windows(2)
        .map(|w| direction_between(graph.node(w[0]).unwrap().position, graph.node(w[1]).unwrap().position))
        .collect();

    let mut segment_start = 0usize;
    let mut first_wire = true;

    let mut i = 0usize;
    while i < bend_dirs.len() {
        let dir = bend_dirs[i];
        let mut j = i;
        while j + 1 < bend_dirs.len() && bend_dirs[j + 1] == dir {
            j += 1;
        }
        let seg_nodes = &path[segment_start..=j + 1];
        let is_last_segment = j + 1 == path.len() - 1;
        let is_root_wire = first_is_root && first_wire;
        let junction_flag = is_last_segment && last_ends_in_junction;

        for &n in seg_nodes {
            let pos = graph.node(n).unwrap().position;
            vertices.push(Vertex::from_point(pos, perform_centering));
        }
        wires.push(WireView::new(seg_nodes.len() as u16, is_root_wire, junction_flag));

        first_wire = false;
        segment_start = j + 1;
        i = j + 1;
    }
}

fn direction_between(a: Point, b: Point) -> Direction {
    if b.x > a.x {
        Direction::PosX
    } else if b.x < a.x {
        Direction::NegX
    } else if b.y > a.y {
        Direction::PosY
    } else {
        Direction::NegY
    }
}

/// Builds the `NetView` for a routed net given where its data landed in
/// the global output buffers.
pub fn net_view_for(wire_offset: u32, wire_count: u32, vertex_offset: u32) -> NetView {
    NetView {
        wire_offset,
        wire_count,
        vertex_offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use routing_core::geom::DirectionSet;
    use routing_core::graph::AnchorSpec;
    use routing_core::BoundingBox;

    fn simple_graph() -> Graph {
        let anchors = vec![
            AnchorSpec::new(Point::new(0, 0), DirectionSet::ALL),
            AnchorSpec::new(Point::new(10, 0), DirectionSet::ALL),
        ];
        routing_core::build_graph(&anchors, &[], false)
    }

    #[test]
    fn scenario_1_straight_connect() {
        let graph = simple_graph();
        let endpoints = vec![Endpoint::new(Point::new(0, 0)), Endpoint::new(Point::new(10, 0))];
        let net = Net::new(0, 2);
        let mut astar = AStar::new();
        let routed = route_net(&graph, &net, 0, &endpoints, &[], &mut astar, false).unwrap();
        assert_eq!(routed.wires.len(), 1);
        assert_eq!(routed.wires[0].vertex_count(), 2);
        assert!(routed.wires[0].is_root());
        assert!(!routed.wires[0].ends_in_junction());
        // Endpoint 0 carries no waypoints, so the root wire is produced by
        // routing endpoint 1 to the tree seeded by endpoint 0: vertices run
        // from the newly routed endpoint back to the tree.
        assert_eq!(routed.vertices, vec![Vertex { x: 10.0, y: 0.0 }, Vertex { x: 0.0, y: 0.0 }]);
    }

    #[test]
    fn scenario_2_l_shape_around_box() {
        let anchors = vec![
            AnchorSpec::new(Point::new(0, 0), DirectionSet::POS_X | DirectionSet::POS_Y),
            AnchorSpec::new(Point::new(10, 10), DirectionSet::NEG_X | DirectionSet::NEG_Y),
        ];
        let boxes = vec![BoundingBox::new(Point::new(5, 5), 3, 3)];
        let graph = routing_core::build_graph(&anchors, &boxes, false);
        let endpoints = vec![Endpoint::new(Point::new(0, 0)), Endpoint::new(Point::new(10, 10))];
        let net = Net::new(0, 2);
        let mut astar = AStar::new();
        let routed = route_net(&graph, &net, 0, &endpoints, &[], &mut astar, false).unwrap();
        assert_eq!(routed.wires.len(), 2);
        assert!(routed.wires[0].is_root());
    }

    #[test]
    fn scenario_3_three_endpoint_junction() {
        let anchors = vec![
            AnchorSpec::new(Point::new(0, 0), DirectionSet::ALL),
            AnchorSpec::new(Point::new(10, 0), DirectionSet::ALL),
            AnchorSpec::new(Point::new(5, 6), DirectionSet::ALL),
        ];
        let graph = routing_core::build_graph(&anchors, &[], false);
        let endpoints = vec![
            Endpoint::new(Point::new(0, 0)),
            Endpoint::new(Point::new(10, 0)),
            Endpoint::new(Point::new(5, 6)),
        ];
        let net = Net::new(0, 3);
        let mut astar = AStar::new();
        let routed = route_net(&graph, &net, 0, &endpoints, &[], &mut astar, false).unwrap();
        assert_eq!(routed.wires.len(), 2);
        assert!(routed.wires[0].is_root());
        // (5, 0) is a Hanan crossing on the root wire's row, so the root
        // wire (0,0)-(10,0) has it as an interior vertex.
        assert_eq!(routed.wires[0].vertex_count(), 3);
        assert!(routed.wires[1].ends_in_junction());
    }

    #[test]
    fn scenario_4_unreachable_is_invalid_operation() {
        let anchors = vec![
            AnchorSpec::new(Point::new(0, 0), DirectionSet::NONE),
            AnchorSpec::new(Point::new(10, 10), DirectionSet::NONE),
        ];
        let graph = routing_core::build_graph(&anchors, &[], false);
        let endpoints = vec![Endpoint::new(Point::new(0, 0)), Endpoint::new(Point::new(10, 10))];
        let net = Net::new(0, 2);
        let mut astar = AStar::new();
        let err = route_net(&graph, &net, 0, &endpoints, &[], &mut astar, false).unwrap_err();
        assert!(matches!(err, RoutingError::InvalidOperation(_)));
    }

    #[test]
    fn scenario_6_waypoint_routing() {
        let anchors = vec![
            AnchorSpec::new(Point::new(0, 0), DirectionSet::ALL),
            AnchorSpec::new(Point::new(10, 0), DirectionSet::ALL),
            AnchorSpec::new(Point::new(5, 5), DirectionSet::ALL),
        ];
        let graph = routing_core::build_graph(&anchors, &[], false);
        let waypoints = vec![Point::new(5, 5)];
        let endpoints = vec![
            Endpoint::new(Point::new(0, 0)),
            Endpoint::with_waypoints(Point::new(10, 0), 0, 1),
        ];
        let net = Net::new(0, 2);
        let mut astar = AStar::new();
        let routed = route_net(&graph, &net, 0, &endpoints, &waypoints, &mut astar, false).unwrap();
        assert!(routed.wires.len() >= 2);
        assert!(routed.wires[0].is_root());
    }
}
