//! Graph coloring by simplify/select, the classic Kempe heuristic: peel off
//! nodes of degree < k one at a time, then assign colors while unwinding in
//! reverse removal order. A node that was removable is guaranteed a free
//! color at select time, but the pass stays conservative: if at any point no
//! node of degree < k remains, the whole attempt reports failure rather than
//! optimistically coloring a high-degree node.
//!
//! The recursion of the textbook formulation is flattened into an explicit
//! select stack over a single working clone of the graph, so there is one
//! deep copy per call instead of one per level and no unbounded recursion.

use tinyvec::TinyVec;

use crate::graph::{InterferenceGraph, NodeId};

use indexmap::IndexMap;

/// How the colorer picks among equally-valid colors at select time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorChoice {
    /// Always take the first still-available color in palette order.
    /// Fully deterministic; what tests should use.
    FirstAvailable,
    /// Pick pseudo-randomly among the available colors. Reproducible for a
    /// given seed.
    Random { seed: u64 },
}

/// xorshift64*, a small deterministic generator for `ColorChoice::Random`.
/// Nothing in this crate needs statistical quality, only a reproducible
/// scatter over the available colors.
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        Self {
            state: seed | 1,
        }
    }

    fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }
}

/// Assigns every node in `nodes` a color from `palette` such that no two
/// interfering nodes share one, or returns `None` if the simplify/select
/// heuristic cannot guarantee an assignment with this palette.
///
/// `nodes` supplies the scan order for the simplify step: the first node in
/// sequence whose degree is below the palette size is removed at each round.
/// An empty `nodes` trivially succeeds with an empty coloring; a non-empty
/// `nodes` against an empty palette always fails. The input graph is never
/// mutated.
pub fn color_graph<N: NodeId, C: Clone + PartialEq>(
    graph: &InterferenceGraph<N>,
    nodes: &[N],
    palette: &[C],
    choice: ColorChoice,
) -> Option<IndexMap<N, C>> {
    let k = palette.len();

    let mut working = graph.clone();
    let mut remaining: Vec<N> = nodes.to_vec();
    let mut select_stack: Vec<(N, Vec<N>)> = Vec::with_capacity(nodes.len());

    while !remaining.is_empty() {
        let position = remaining
            .iter()
            .position(|node| working.degree(node) < k)?;

        let node = remaining.remove(position);
        let snapshot: Vec<N> = working.neighbors(&node).cloned().collect();

        log::trace!("simplify: {:?} (degree {})", node, snapshot.len());

        working.remove_node(&node);
        select_stack.push((node, snapshot));
    }

    let mut rng = match choice {
        ColorChoice::FirstAvailable => None,
        ColorChoice::Random { seed } => Some(XorShift64::new(seed)),
    };

    let mut coloring = IndexMap::new();

    while let Some((node, neighbors)) = select_stack.pop() {
        let mut available: TinyVec<[usize; 8]> = (0..k).collect();

        for neighbor in neighbors.iter() {
            if let Some(color) = coloring.get(neighbor) {
                available.retain(|&index| palette[index] != *color);
            }
        }

        if available.is_empty() {
            // The node looked removable when simplified, but its neighbors'
            // colors exhausted the palette.
            log::trace!("select: no color left for {:?}", node);
            return None;
        }

        let picked = match rng.as_mut() {
            Some(rng) => available[(rng.next() % available.len() as u64) as usize],
            None => available[0],
        };

        log::trace!("select: {:?} <- color #{}", node, picked);
        coloring.insert(node, palette[picked].clone());
    }

    Some(coloring)
}
