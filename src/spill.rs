//! Spill selection: decide which resources to evict so the rest of the graph
//! becomes colorable with the available palette. The heuristic mirrors the
//! simplify loop of the colorer (keep removing nodes of degree < k for
//! free), and whenever the graph has no such node, evicts the cheapest remaining
//! resource instead. It never fails; in the worst case everything but a
//! low-degree tail is spilled. It also does not verify the remainder: the
//! colorer still runs afterwards and may report failure on its own.

use indexmap::IndexSet;

use crate::graph::{InterferenceGraph, NodeId};

/// Policy for resources absent from the cost map. The two domain
/// instantiations historically disagreed, so the choice is explicit per
/// call: `Zero` makes unknown resources the first spill candidates (the
/// channel allocator's behavior), `Infinite` protects them from spilling
/// entirely (the register allocator's behavior).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissingCost {
    Zero,
    Infinite,
}

impl MissingCost {
    fn fallback(self) -> f64 {
        match self {
            MissingCost::Zero => 0.0,
            MissingCost::Infinite => f64::INFINITY,
        }
    }
}

/// A spill-cost estimate per resource. Missing entries resolve through the
/// configured [`MissingCost`] policy.
pub trait CostMap<N> {
    fn cost(&self, node: &N) -> Option<f64>;
}

impl<N: NodeId> CostMap<N> for indexmap::IndexMap<N, f64> {
    fn cost(&self, node: &N) -> Option<f64> {
        self.get(node).copied()
    }
}

impl<N: NodeId> CostMap<N> for std::collections::HashMap<N, f64> {
    fn cost(&self, node: &N) -> Option<f64> {
        self.get(node).copied()
    }
}

/// Partitions `nodes` into an implicit colorable remainder and the returned
/// spill set, given `num_colors` available slots.
///
/// Works on a private clone of `graph`; the caller's graph is unchanged.
/// Ties on minimum cost break toward the earliest node in `nodes` order.
pub fn choose_spills<N: NodeId>(
    graph: &InterferenceGraph<N>,
    nodes: &[N],
    num_colors: usize,
    costs: &impl CostMap<N>,
    missing: MissingCost,
) -> IndexSet<N> {
    let mut spills = IndexSet::new();
    let mut working = graph.clone();
    let mut remaining: IndexSet<N> = nodes.iter().cloned().collect();

    while !remaining.is_empty() {
        let easy = remaining
            .iter()
            .find(|&node| working.degree(node) < num_colors)
            .cloned();

        let chosen = match easy {
            Some(node) => node,
            None => {
                let victim = remaining
                    .iter()
                    .min_by(|&a, &b| {
                        let cost_a = costs.cost(a).unwrap_or_else(|| missing.fallback());
                        let cost_b = costs.cost(b).unwrap_or_else(|| missing.fallback());
                        cost_a.total_cmp(&cost_b)
                    })
                    .cloned()
                    .expect("remaining is non-empty");

                log::debug!("spilling {:?}", victim);
                spills.insert(victim.clone());
                victim
            }
        };

        working.remove_node(&chosen);
        remaining.shift_remove(&chosen);
    }

    spills
}
