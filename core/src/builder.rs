//! Graph construction (§4.1): derives a sparse node set from anchors and
//! obstacles such that every optimal Manhattan path through free space
//! lies on the graph, while the graph stays far smaller than the full
//! integer grid.
//!
//! Candidate nodes sit at the crossings of every anchor's and every
//! obstacle corner's x- and y-coordinate (a Hanan grid restricted to the
//! coordinates anchors and obstacles actually introduce): any optimal
//! Manhattan path between anchors bends only at such crossings, so they
//! are sufficient without enumerating the full integer plane.

use crate::geom::{BoundingBox, Direction, DirectionSet, Point};
use crate::graph::{AnchorSpec, Graph};
use crate::index::NodeIndex;
use crate::node::{NeighborList, Node};
use std::collections::{BTreeSet, HashMap};

#[derive(Clone, Copy)]
struct Candidate {
    is_anchor: bool,
    legal: DirectionSet,
}

/// Builds a `Graph` from anchors and obstacles. `minimal` additionally
/// folds collinear degree-2 nodes that are not turning points.
pub fn build_graph(anchors: &[AnchorSpec], boxes: &[BoundingBox], minimal: bool) -> Graph {
    let _timer = crate::util::ScopedTimer::new("graph_build");
    for b in boxes {
        if b.is_degenerate() {
            log::warn!("obstacle box at {:?} is degenerate (zero area)", b.center);
        }
    }

    let candidates = generate_candidates(anchors, boxes);

    let mut nodes: Vec<Node> = candidates
        .iter()
        .map(|(&pos, c)| {
            let mut n = Node::new(pos);
            n.is_anchor = c.is_anchor;
            n.legal_directions = c.legal;
            n
        })
        .collect();

    link_neighbors(&mut nodes, boxes);

    let nodes = if minimal { minimize(nodes) } else { nodes };

    let mut position_index = HashMap::with_capacity(nodes.len());
    for (i, n) in nodes.iter().enumerate() {
        position_index.insert(n.position, NodeIndex::new(i));
    }

    Graph {
        nodes,
        position_index,
        obstacles: boxes.to_vec(),
    }
}

/// The four directions in which stepping away from `p` would immediately
/// enter some box's strict interior; the complement of this set is what a
/// node at `p` may legally traverse out of (§4.1's corner rule,
/// generalized to every Hanan crossing, not just the four explicit
/// corners of each box).
fn blocked_directions(p: Point, boxes: &[BoundingBox]) -> DirectionSet {
    let mut blocked = DirectionSet::NONE;
    for b in boxes {
        let on_vertical_edge = b.min_y() < p.y && p.y < b.max_y();
        let on_horizontal_edge = b.min_x() < p.x && p.x < b.max_x();
        if p.x == b.min_x() && on_vertical_edge {
            blocked |= DirectionSet::POS_X;
        }
        if p.x == b.max_x() && on_vertical_edge {
            blocked |= DirectionSet::NEG_X;
        }
        if p.y == b.min_y() && on_horizontal_edge {
            blocked |= DirectionSet::POS_Y;
        }
        if p.y == b.max_y() && on_horizontal_edge {
            blocked |= DirectionSet::NEG_Y;
        }
    }
    blocked
}

fn legal_for_point(p: Point, boxes: &[BoundingBox]) -> DirectionSet {
    let blocked = blocked_directions(p, boxes);
    DirectionSet(DirectionSet::ALL.0 & !blocked.0)
}

fn inside_any_obstacle(p: Point, boxes: &[BoundingBox]) -> bool {
    boxes.iter().any(|b| b.contains_strictly(p))
}

fn generate_candidates(anchors: &[AnchorSpec], boxes: &[BoundingBox]) -> HashMap<Point, Candidate> {
    let mut xs = BTreeSet::new();
    let mut ys = BTreeSet::new();
    for a in anchors {
        xs.insert(a.position.x);
        ys.insert(a.position.y);
    }
    for b in boxes {
        xs.insert(b.min_x());
        xs.insert(b.max_x());
        ys.insert(b.min_y());
        ys.insert(b.max_y());
    }

    let mut map = HashMap::new();
    for &x in &xs {
        for &y in &ys {
            let p = Point::new(x, y);
            if inside_any_obstacle(p, boxes) {
                continue;
            }
            map.insert(
                p,
                Candidate {
                    is_anchor: false,
                    legal: legal_for_point(p, boxes),
                },
            );
        }
    }

    for a in anchors {
        let legal = a.connect_directions.intersect(legal_for_point(a.position, boxes));
        map.entry(a.position)
            .and_modify(|c| {
                if c.is_anchor {
                    c.legal = c.legal.intersect(legal);
                } else {
                    c.is_anchor = true;
                    c.legal = legal;
                }
            })
            .or_insert(Candidate { is_anchor: true, legal });
    }

    map
}

/// Links horizontal (`pos_x`/`neg_x`) and vertical (`pos_y`/`neg_y`)
/// neighbors by sweeping nodes sorted by `(y, x)` and `(x, y)`
/// respectively, skipping a link whenever the open segment between two
/// row/column-adjacent nodes crosses an obstacle interior (§4.1).
fn link_neighbors(nodes: &mut [Node], boxes: &[BoundingBox]) {
    let mut by_row: Vec<usize> = (0..nodes.len()).collect();
    by_row.sort_by_key(|&i| (nodes[i].position.y, nodes[i].position.x));
    for w in by_row.windows(2) {
        let (i, j) = (w[0], w[1]);
        if nodes[i].position.y != nodes[j].position.y {
            continue;
        }
        if boxes.iter().any(|b| b.blocks_segment(nodes[i].position, nodes[j].position)) {
            continue;
        }
        nodes[i].neighbors.set(Direction::PosX, NodeIndex::new(j));
        nodes[j].neighbors.set(Direction::NegX, NodeIndex::new(i));
    }

    let mut by_col: Vec<usize> = (0..nodes.len()).collect();
    by_col.sort_by_key(|&i| (nodes[i].position.x, nodes[i].position.y));
    for w in by_col.windows(2) {
        let (i, j) = (w[0], w[1]);
        if nodes[i].position.x != nodes[j].position.x {
            continue;
        }
        if boxes.iter().any(|b| b.blocks_segment(nodes[i].position, nodes[j].position)) {
            continue;
        }
        nodes[i].neighbors.set(Direction::PosY, NodeIndex::new(j));
        nodes[j].neighbors.set(Direction::NegY, NodeIndex::new(i));
    }
}

/// Removes degree-2 collinear non-anchor nodes with unrestricted legal
/// directions (i.e. not a corner/boundary turning point), relinking
/// their two surviving neighbors directly to each other. Iterates to a
/// fixpoint.
fn minimize(mut nodes: Vec<Node>) -> Vec<Node> {
    let mut alive = vec![true; nodes.len()];

    loop {
        let mut changed = false;
        for i in 0..nodes.len() {
            if !alive[i] || nodes[i].is_anchor || nodes[i].legal_directions != DirectionSet::ALL {
                continue;
            }
            let n = nodes[i].neighbors;
            let horiz = !n.pos_x.is_sentinel() && !n.neg_x.is_sentinel();
            let vert = !n.pos_y.is_sentinel() && !n.neg_y.is_sentinel();
            let horiz_only = horiz && n.pos_y.is_sentinel() && n.neg_y.is_sentinel();
            let vert_only = vert && n.pos_x.is_sentinel() && n.neg_x.is_sentinel();

            if horiz_only {
                let (a, b) = (n.neg_x.index(), n.pos_x.index());
                if a == i || b == i {
                    continue;
                }
                nodes[a].neighbors.set(Direction::PosX, NodeIndex::new(b));
                nodes[b].neighbors.set(Direction::NegX, NodeIndex::new(a));
                alive[i] = false;
                changed = true;
            } else if vert_only {
                let (a, b) = (n.neg_y.index(), n.pos_y.index());
                if a == i || b == i {
                    continue;
                }
                nodes[a].neighbors.set(Direction::PosY, NodeIndex::new(b));
                nodes[b].neighbors.set(Direction::NegY, NodeIndex::new(a));
                alive[i] = false;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    compact(nodes, alive)
}

fn compact(nodes: Vec<Node>, alive: Vec<bool>) -> Vec<Node> {
    let mut remap = vec![NodeIndex::SENTINEL; nodes.len()];
    let mut next = 0usize;
    for (i, &a) in alive.iter().enumerate() {
        if a {
            remap[i] = NodeIndex::new(next);
            next += 1;
        }
    }

    let mut out = Vec::with_capacity(next);
    for (i, n) in nodes.into_iter().enumerate() {
        if !alive[i] {
            continue;
        }
        let mut n = n;
        let remap_idx = |idx: NodeIndex| -> NodeIndex {
            if idx.is_sentinel() {
                NodeIndex::SENTINEL
            } else {
                remap[idx.index()]
            }
        };
        n.neighbors = NeighborList {
            pos_x: remap_idx(n.neighbors.pos_x),
            neg_x: remap_idx(n.neighbors.neg_x),
            pos_y: remap_idx(n.neighbors.pos_y),
            neg_y: remap_idx(n.neighbors.neg_y),
        };
        out.push(n);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::DirectionSet;

    #[test]
    fn straight_connect_no_obstacles() {
        let anchors = vec![
            AnchorSpec::new(Point::new(0, 0), DirectionSet::ALL),
            AnchorSpec::new(Point::new(10, 0), DirectionSet::ALL),
        ];
        let g = build_graph(&anchors, &[], false);
        assert_eq!(g.len(), 2);
        let a = g.find_node(Point::new(0, 0)).unwrap();
        let b = g.find_node(Point::new(10, 0)).unwrap();
        assert_eq!(g.node(a).unwrap().neighbors.pos_x, b);
        assert_eq!(g.node(b).unwrap().neighbors.neg_x, a);
    }

    #[test]
    fn l_shape_around_box_creates_corner_nodes() {
        let anchors = vec![
            AnchorSpec::new(Point::new(0, 0), DirectionSet::POS_X | DirectionSet::POS_Y),
            AnchorSpec::new(Point::new(10, 10), DirectionSet::NEG_X | DirectionSet::NEG_Y),
        ];
        let boxes = vec![BoundingBox::new(Point::new(5, 5), 3, 3)];
        let g = build_graph(&anchors, &boxes, false);
        // Anchors plus the four obstacle corners at minimum.
        assert!(g.len() >= 6);
        assert!(g.find_node(Point::new(0, 0)).is_some());
        assert!(g.find_node(Point::new(10, 10)).is_some());
    }

    #[test]
    fn three_anchors_share_a_hanan_crossing() {
        let anchors = vec![
            AnchorSpec::new(Point::new(0, 0), DirectionSet::ALL),
            AnchorSpec::new(Point::new(10, 0), DirectionSet::ALL),
            AnchorSpec::new(Point::new(5, 6), DirectionSet::ALL),
        ];
        let g = build_graph(&anchors, &[], false);
        // (5, 0) is the crossing of the first two anchors' row with the
        // third anchor's column, and must exist for a path to reach it.
        assert!(g.find_node(Point::new(5, 0)).is_some());
    }

    #[test]
    fn no_node_lies_strictly_inside_an_obstacle() {
        let anchors = vec![
            AnchorSpec::new(Point::new(0, 0), DirectionSet::ALL),
            AnchorSpec::new(Point::new(20, 20), DirectionSet::ALL),
        ];
        let boxes = vec![BoundingBox::new(Point::new(10, 10), 4, 4)];
        let g = build_graph(&anchors, &boxes, false);
        for n in g.nodes() {
            assert!(!boxes[0].contains_strictly(n.position));
        }
    }

    #[test]
    fn anchor_invariant_holds() {
        let dirs = DirectionSet::POS_X | DirectionSet::NEG_Y;
        let anchors = vec![
            AnchorSpec::new(Point::new(0, 0), dirs),
            AnchorSpec::new(Point::new(5, 5), DirectionSet::ALL),
        ];
        let g = build_graph(&anchors, &[], false);
        let idx = g.find_node(Point::new(0, 0)).unwrap();
        let node = g.node(idx).unwrap();
        assert!(node.is_anchor);
        assert!(node.legal_directions.is_subset_of(dirs));
    }

    #[test]
    fn minimal_preserves_endpoints_on_straight_line() {
        let anchors = vec![
            AnchorSpec::new(Point::new(0, 0), DirectionSet::ALL),
            AnchorSpec::new(Point::new(10, 0), DirectionSet::ALL),
        ];
        let g = build_graph(&anchors, &[], true);
        assert!(g.find_node(Point::new(0, 0)).is_some());
        assert!(g.find_node(Point::new(10, 0)).is_some());
    }

    #[test]
    fn fully_enclosed_anchor_has_no_legal_directions() {
        // Two boxes meeting at the origin block every outgoing ray (Scenario 4).
        let anchors = vec![
            AnchorSpec::new(Point::new(0, 0), DirectionSet::ALL),
            AnchorSpec::new(Point::new(10, 10), DirectionSet::ALL),
        ];
        let boxes = vec![
            BoundingBox::new(Point::new(-3, 0), 3, 3),
            BoundingBox::new(Point::new(0, -3), 3, 3),
            BoundingBox::new(Point::new(3, 0), 3, 3),
            BoundingBox::new(Point::new(0, 3), 3, 3),
        ];
        let g = build_graph(&anchors, &boxes, false);
        let idx = g.find_node(Point::new(0, 0)).unwrap();
        assert_eq!(g.node(idx).unwrap().legal_directions, DirectionSet::NONE);
    }
}
