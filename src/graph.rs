//! The interference graph: an undirected graph over resource identifiers in
//! which an edge means two resources are simultaneously live and therefore
//! cannot share a slot. Edges may optionally carry a weight (the spatial
//! interference builder attaches one; the liveness sweeps do not).
//!
//! Adjacency is kept in insertion-ordered sets so that `nodes()`,
//! `neighbors()` and `edges()` iterate deterministically. Everything
//! downstream (simplify scan order, spill tie-breaks) inherits its
//! reproducibility from this.

use std::fmt::Debug;
use std::hash::Hash;

use indexmap::{IndexMap, IndexSet};

/// An opaque resource identifier: a register name, a device id, anything
/// comparable and hashable. `Ord` is required so unordered edge pairs can be
/// normalized for weight storage and tie-breaks stay deterministic.
pub trait NodeId: Clone + Eq + Hash + Ord + Debug {}

impl<T: Clone + Eq + Hash + Ord + Debug> NodeId for T {}

/// Undirected interference graph with optional per-edge weights.
///
/// Invariants: adjacency is symmetric, there are never self-loops, and a
/// weight entry exists only for pairs that are also edges. `Clone` produces a
/// deep, independently-owned copy; every destructive exploration in the
/// engine (coloring, spill simulation, coalescing) works on such a clone so
/// the caller's graph survives untouched.
#[derive(Clone, Debug, Default)]
pub struct InterferenceGraph<N: NodeId> {
    adjacency: IndexMap<N, IndexSet<N>>,
    weights: IndexMap<(N, N), f64>,
}

fn pair_key<N: NodeId>(x: &N, y: &N) -> (N, N) {
    if x <= y {
        (x.clone(), y.clone())
    } else {
        (y.clone(), x.clone())
    }
}

impl<N: NodeId> InterferenceGraph<N> {
    pub fn new() -> Self {
        Self {
            adjacency: IndexMap::new(),
            weights: IndexMap::new(),
        }
    }

    /// Adds an unweighted interference edge. Self-edges are ignored.
    pub fn add_edge(&mut self, x: N, y: N) {
        if x == y {
            return;
        }

        self.adjacency.entry(x.clone()).or_default().insert(y.clone());
        self.adjacency.entry(y).or_default().insert(x);
    }

    /// Adds an edge carrying an interference weight. If the edge already
    /// exists its weight is replaced.
    pub fn add_edge_weighted(&mut self, x: N, y: N, weight: f64) {
        if x == y {
            return;
        }

        let key = pair_key(&x, &y);
        self.add_edge(x, y);
        self.weights.insert(key, weight);
    }

    pub fn contains_edge(&self, x: &N, y: &N) -> bool {
        self.adjacency.get(x).map_or(false, |set| set.contains(y))
    }

    /// The weight attached to an edge, or 0.0 if the pair carries none.
    pub fn edge_weight(&self, x: &N, y: &N) -> f64 {
        self.weights.get(&pair_key(x, y)).copied().unwrap_or(0.0)
    }

    /// Removes a node and every edge touching it. Removing a node that is
    /// not in the graph is a no-op.
    pub fn remove_node(&mut self, node: &N) {
        if let Some(neighbors) = self.adjacency.shift_remove(node) {
            for neighbor in neighbors.iter() {
                self.weights.shift_remove(&pair_key(node, neighbor));
            }
        }

        for (_, set) in self.adjacency.iter_mut() {
            set.shift_remove(node);
        }
    }

    /// Merges node `old` into node `new`: their neighbor sets are unioned,
    /// any resulting self-reference is dropped, and every other node's
    /// adjacency is rewritten to point at `new`. Edge weights follow the
    /// rename; pairs that collapse onto themselves are discarded. Renaming a
    /// node to itself leaves the graph unchanged.
    pub fn rename_node(&mut self, old: &N, new: &N) {
        let old_neighbors = self.adjacency.shift_remove(old).unwrap_or_default();
        let mut merged = self.adjacency.get(new).cloned().unwrap_or_default();

        for neighbor in old_neighbors {
            merged.insert(neighbor);
        }

        merged.shift_remove(new);
        self.adjacency.insert(new.clone(), merged);

        for (key, set) in self.adjacency.iter_mut() {
            if set.shift_remove(old) {
                set.insert(new.clone());
            }
            set.shift_remove(key);
        }

        let old_weights = std::mem::take(&mut self.weights);
        for ((a, b), weight) in old_weights {
            let a = if &a == old { new.clone() } else { a };
            let b = if &b == old { new.clone() } else { b };

            if a != b {
                self.weights.entry(pair_key(&a, &b)).or_insert(weight);
            }
        }
    }

    /// Neighbors of `node` in insertion order; empty if the node is unknown.
    pub fn neighbors(&self, node: &N) -> impl Iterator<Item = &N> + '_ {
        self.adjacency.get(node).into_iter().flatten()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &N> + '_ {
        self.adjacency.keys()
    }

    pub fn degree(&self, node: &N) -> usize {
        self.adjacency.get(node).map_or(0, |set| set.len())
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Every edge exactly once as `(a, b, weight)`, with unweighted edges
    /// reported as weight 1.0.
    pub fn edges(&self) -> Vec<(N, N, f64)> {
        let mut seen = IndexSet::new();
        let mut result = Vec::new();

        for (from, neighbors) in self.adjacency.iter() {
            for to in neighbors.iter() {
                let key = pair_key(from, to);
                if seen.insert(key.clone()) {
                    let weight = self.weights.get(&key).copied().unwrap_or(1.0);
                    result.push((from.clone(), to.clone(), weight));
                }
            }
        }

        result
    }
}
