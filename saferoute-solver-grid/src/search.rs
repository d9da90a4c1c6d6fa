//! Risk-weighted best-first search over a [`Grid`].
//!
//! This is a closed-set A* variant: once a node is expanded it is never
//! reopened, even if a cheaper path to it is found later. Relaxation
//! multiplies the accumulated cost by `1 + risk * risk_penalty` of the node
//! being entered, so risk compounds along the path.
//!
//! The open set is a binary heap ordered by total cost and then by the order
//! in which nodes were first discovered. Equal-cost candidates therefore
//! resolve to the earliest discovered node. Superseded heap entries are
//! skipped lazily when popped.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use saferoute_core::haversine_km;

use crate::grid::Grid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeState {
    Unseen,
    Open { discovered: usize },
    Closed,
}

#[derive(Debug, Clone, Copy)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct OpenEntry {
    total_cost: FloatOrd,
    discovered: usize,
    node: usize,
}

/// Outcome of a grid search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Arena indices from the start node to the goal node, inclusive.
    Reached(Vec<usize>),
    /// The open set emptied before the goal was expanded.
    Exhausted,
}

/// Search from `start` to `goal`, updating node costs in place.
///
/// `start == goal` yields a single-node path.
#[expect(
    clippy::float_arithmetic,
    reason = "path costs combine floating-point distances and risk penalties"
)]
pub(crate) fn search(grid: &mut Grid, start: usize, goal: usize, risk_penalty: f64) -> SearchOutcome {
    let Some(goal_location) = grid.node(goal).map(|node| node.location) else {
        return SearchOutcome::Exhausted;
    };

    let mut states = vec![NodeState::Unseen; grid.len()];
    let mut open: BinaryHeap<Reverse<OpenEntry>> = BinaryHeap::new();
    let mut discovered = 0_usize;

    let Some(start_node) = grid.node_mut(start) else {
        return SearchOutcome::Exhausted;
    };
    start_node.cost_from_start = 0.0;
    start_node.estimate_to_goal = haversine_km(start_node.location, goal_location);
    start_node.total_cost = start_node.estimate_to_goal;
    start_node.predecessor = None;
    open.push(Reverse(OpenEntry {
        total_cost: FloatOrd(start_node.total_cost),
        discovered,
        node: start,
    }));
    set_state(&mut states, start, NodeState::Open { discovered });
    discovered += 1;

    while let Some(Reverse(entry)) = open.pop() {
        let current = entry.node;
        if !matches!(state(&states, current), NodeState::Open { .. }) {
            continue;
        }
        let Some((current_location, current_cost, current_total)) = grid
            .node(current)
            .map(|node| (node.location, node.cost_from_start, node.total_cost))
        else {
            continue;
        };
        if FloatOrd(current_total) != entry.total_cost {
            continue;
        }
        if current == goal {
            return reconstruct(grid, goal);
        }
        set_state(&mut states, current, NodeState::Closed);

        let neighbours: Vec<usize> = grid.neighbours(current).collect();
        for neighbour in neighbours {
            let neighbour_state = state(&states, neighbour);
            if neighbour_state == NodeState::Closed {
                continue;
            }
            let Some(node) = grid.node_mut(neighbour) else {
                continue;
            };
            let step = haversine_km(current_location, node.location);
            let candidate = (current_cost + step) * (1.0 + node.risk_value * risk_penalty);

            let order = match neighbour_state {
                NodeState::Unseen => {
                    let order = discovered;
                    discovered += 1;
                    order
                }
                NodeState::Open { discovered: order } if candidate < node.cost_from_start => order,
                _ => continue,
            };

            node.predecessor = Some(current);
            node.cost_from_start = candidate;
            node.estimate_to_goal = haversine_km(node.location, goal_location);
            node.total_cost = candidate + node.estimate_to_goal;
            open.push(Reverse(OpenEntry {
                total_cost: FloatOrd(node.total_cost),
                discovered: order,
                node: neighbour,
            }));
            set_state(&mut states, neighbour, NodeState::Open { discovered: order });
        }
    }

    SearchOutcome::Exhausted
}

fn state(states: &[NodeState], index: usize) -> NodeState {
    states.get(index).copied().unwrap_or(NodeState::Closed)
}

fn set_state(states: &mut [NodeState], index: usize, value: NodeState) {
    if let Some(slot) = states.get_mut(index) {
        *slot = value;
    }
}

/// Follow predecessor links back from `goal`, bounded by the node count.
fn reconstruct(grid: &Grid, goal: usize) -> SearchOutcome {
    let mut path = vec![goal];
    let mut cursor = goal;
    while let Some(previous) = grid.node(cursor).and_then(|node| node.predecessor) {
        if path.len() >= grid.len() {
            log::warn!("predecessor chain exceeded grid size; abandoning reconstruction");
            return SearchOutcome::Exhausted;
        }
        path.push(previous);
        cursor = previous;
    }
    path.reverse();
    SearchOutcome::Reached(path)
}
