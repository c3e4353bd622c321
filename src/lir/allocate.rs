//! The end-to-end register pipeline: sweep the stream into an interference
//! graph, coalesce redundant copies, pick a spill set by estimated cost,
//! color what remains, and materialize the spills as reload/store code.
//!
//! Coloring the spill-reduced graph can still fail: spill selection only
//! removes provably-stuck nodes greedily and does not certify the remainder.
//! That outcome is an expected result, not an error: the pipeline returns
//! `None` and leaves the caller to retry with a different palette or surface
//! the failure. The program is only rewritten on success.

use indexmap::{IndexMap, IndexSet};

use crate::color::{color_graph, ColorChoice};
use crate::graph::NodeId;
use crate::spill::{choose_spills, MissingCost};

use super::coalescing::coalesce;
use super::costs::estimate_spill_costs;
use super::interference::build_interference_graph;
use super::program::Program;
use super::spill_code::insert_spill_code;

/// The outcome of register allocation: every register of the input program
/// ends up either in `assignments` or in `spilled`, never both.
#[derive(Clone, Debug, PartialEq)]
pub struct RegisterAllocation<N: NodeId, C> {
    pub assignments: IndexMap<N, C>,
    pub spilled: IndexSet<N>,
}

pub fn allocate_registers<N: NodeId, C: Clone + PartialEq>(
    program: &mut Program<N>,
    palette: &[C],
    choice: ColorChoice,
) -> Option<RegisterAllocation<N, C>> {
    let mut graph = build_interference_graph(program);

    let merged = coalesce(program, &mut graph);
    log::debug!("coalescing eliminated {} copies", merged);

    let costs = estimate_spill_costs(program);
    let registers: Vec<N> = program.registers().into_iter().collect();

    // Registers the cost sweep never saw (mentioned only by block-start
    // markers) are protected from spilling, hence the Infinite policy.
    let spilled = choose_spills(&graph, &registers, palette.len(), &costs, MissingCost::Infinite);

    let mut reduced = graph.clone();
    for reg in spilled.iter() {
        reduced.remove_node(reg);
    }

    let survivors: Vec<N> = registers
        .iter()
        .filter(|reg| !spilled.contains(*reg))
        .cloned()
        .collect();

    let assignments = color_graph(&reduced, &survivors, palette, choice)?;

    log::debug!(
        "allocated {} registers, spilled {}",
        assignments.len(),
        spilled.len()
    );

    insert_spill_code(program, &spilled);

    Some(RegisterAllocation {
        assignments,
        spilled,
    })
}
