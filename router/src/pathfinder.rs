//! A* search over a `routing_core::Graph` with a Manhattan-distance
//! heuristic and a bend-count tie-break (§4.2, §9).

use routing_core::{Graph, NodeIndex};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Copy, Clone, Eq, PartialEq)]
struct State {
    f_score: i64,
    bends: u32,
    node: u32,
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_score
            .cmp(&self.f_score)
            .then_with(|| other.bends.cmp(&self.bends))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Reusable A* scratch state. Thread-local in the dispatcher (§4.4, §9):
/// instead of zeroing its arrays before each search, every slot carries an
/// `epoch` stamp and is considered unvisited unless that stamp matches the
/// search's current epoch.
#[derive(Clone)]
pub struct AStar {
    came_from: Vec<u32>,
    entry_dir: Vec<u8>,
    g_score: Vec<i64>,
    bends_score: Vec<u32>,
    epoch: Vec<u32>,
    current_epoch: u32,
}

const NO_DIR: u8 = 0;

impl AStar {
    pub fn new() -> Self {
        Self {
            came_from: Vec::new(),
            entry_dir: Vec::new(),
            g_score: Vec::new(),
            bends_score: Vec::new(),
            epoch: Vec::new(),
            current_epoch: 0,
        }
    }

    fn ensure_capacity(&mut self, n: usize) {
        if n > self.epoch.len() {
            self.came_from.resize(n, u32::MAX);
            self.entry_dir.resize(n, NO_DIR);
            self.g_score.resize(n, i64::MAX);
            self.bends_score.resize(n, u32::MAX);
            self.epoch.resize(n, 0);
        }
    }

    fn next_epoch(&mut self) {
        self.current_epoch += 1;
        if self.current_epoch == 0 {
            self.epoch.fill(0);
            self.current_epoch = 1;
        }
    }

    fn visited(&self, i: usize) -> bool {
        self.epoch[i] == self.current_epoch
    }

    /// Finds a shortest path (by Manhattan length, ties broken toward
    /// fewer bends) from `source` to the nearest node in `goals`,
    /// inclusive of both ends. `goals` represents the already-routed tree;
    /// reaching any member terminates the search.
    pub fn find_path(&mut self, graph: &Graph, source: NodeIndex, goals: &[NodeIndex]) -> Option<Vec<NodeIndex>> {
        if goals.is_empty() {
            return None;
        }
        self.ensure_capacity(graph.len());
        self.next_epoch();

        let heuristic = |idx: usize| -> i64 {
            let pos = graph.node(NodeIndex::new(idx)).unwrap().position;
            goals
                .iter()
                .map(|g| pos.manhattan_distance(graph.node(*g).unwrap().position))
                .min()
                .unwrap_or(0)
        };

        let src = source.index();
        self.g_score[src] = 0;
        self.bends_score[src] = 0;
        self.entry_dir[src] = NO_DIR;
        self.came_from[src] = u32::MAX;
        self.epoch[src] = self.current_epoch;

        let mut heap = BinaryHeap::new();
        heap.push(State {
            f_score: heuristic(src),
            bends: 0,
            node: src as u32,
        });

        while let Some(State { f_score, node, .. }) = heap.pop() {
            let current = node as usize;
            if f_score > self.g_score[current] + heuristic(current) {
                continue;
            }
            if goals.iter().any(|g| g.index() == current) {
                return Some(self.reconstruct(NodeIndex::new(current)));
            }

            let current_node = graph.node(NodeIndex::new(current)).unwrap();
            for d in current_node.legal_directions.iter() {
                if !current_node.can_traverse(d) {
                    continue;
                }
                let neighbor = current_node.neighbors.get(d);
                let n = neighbor.index();
                let neighbor_node = graph.node(neighbor).unwrap();
                let step_cost = current_node.position.manhattan_distance(neighbor_node.position);
                let tentative_g = self.g_score[current] + step_cost;

                let prev_dir = self.entry_dir[current];
                let bend_increment = if prev_dir != NO_DIR && prev_dir != d as u8 { 1 } else { 0 };
                let tentative_bends = self.bends_score[current] + bend_increment;

                let better = !self.visited(n)
                    || tentative_g < self.g_score[n]
                    || (tentative_g == self.g_score[n] && tentative_bends < self.bends_score[n]);

                if better {
                    self.came_from[n] = current as u32;
                    self.entry_dir[n] = d as u8;
                    self.g_score[n] = tentative_g;
                    self.bends_score[n] = tentative_bends;
                    self.epoch[n] = self.current_epoch;
                    heap.push(State {
                        f_score: tentative_g + heuristic(n),
                        bends: tentative_bends,
                        node: n as u32,
                    });
                }
            }
        }
        None
    }

    fn reconstruct(&self, end: NodeIndex) -> Vec<NodeIndex> {
        let mut path = vec![end];
        let mut current = end.index();
        loop {
            let prev = self.came_from[current];
            if prev == u32::MAX {
                break;
            }
            path.push(NodeIndex::new(prev as usize));
            current = prev as usize;
        }
        path.reverse();
        path
    }
}

impl Default for AStar {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use routing_core::geom::DirectionSet;
    use routing_core::graph::AnchorSpec;
    use routing_core::{BoundingBox, Point};

    #[test]
    fn finds_straight_path() {
        let anchors = vec![
            AnchorSpec::new(Point::new(0, 0), DirectionSet::ALL),
            AnchorSpec::new(Point::new(10, 0), DirectionSet::ALL),
        ];
        let graph = routing_core::build_graph(&anchors, &[], false);
        let src = graph.find_node(Point::new(0, 0)).unwrap();
        let dst = graph.find_node(Point::new(10, 0)).unwrap();
        let mut astar = AStar::new();
        let path = astar.find_path(&graph, src, &[dst]).unwrap();
        assert_eq!(path.first(), Some(&src));
        assert_eq!(path.last(), Some(&dst));
    }

    #[test]
    fn routes_around_obstacle() {
        let anchors = vec![
            AnchorSpec::new(Point::new(0, 0), DirectionSet::POS_X | DirectionSet::POS_Y),
            AnchorSpec::new(Point::new(10, 10), DirectionSet::NEG_X | DirectionSet::NEG_Y),
        ];
        let boxes = vec![BoundingBox::new(Point::new(5, 5), 3, 3)];
        let graph = routing_core::build_graph(&anchors, &boxes, false);
        let src = graph.find_node(Point::new(0, 0)).unwrap();
        let dst = graph.find_node(Point::new(10, 10)).unwrap();
        let mut astar = AStar::new();
        let path = astar.find_path(&graph, src, &[dst]).unwrap();
        assert!(path.len() >= 2);
        for w in path.windows(2) {
            let a = graph.node(w[0]).unwrap().position;
            let b = graph.node(w[1]).unwrap().position;
            assert!(!boxes[0].blocks_segment(a, b));
        }
    }

    #[test]
    fn unreachable_goal_returns_none() {
        let anchors = vec![
            AnchorSpec::new(Point::new(0, 0), DirectionSet::NONE),
            AnchorSpec::new(Point::new(10, 0), DirectionSet::NONE),
        ];
        let graph = routing_core::build_graph(&anchors, &[], false);
        let src = graph.find_node(Point::new(0, 0)).unwrap();
        let dst = graph.find_node(Point::new(10, 0)).unwrap();
        let mut astar = AStar::new();
        assert!(astar.find_path(&graph, src, &[dst]).is_none());
    }
}
