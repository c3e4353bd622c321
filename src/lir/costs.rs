//! Spill-cost estimation for registers: every mention of a register charges
//! the execution frequency of the enclosing block, so hot registers become
//! expensive to spill. Frequencies come off `BlockStart` markers; the stream
//! prefix before the first marker counts at frequency 1.0.

use indexmap::{IndexMap, IndexSet};

use crate::graph::NodeId;

use super::program::Program;

pub fn estimate_spill_costs<N: NodeId>(program: &Program<N>) -> IndexMap<N, f64> {
    let mut costs = IndexMap::new();
    let mut current_frequency = 1.0;

    for inst in program.insts() {
        if inst.is_block_start() {
            current_frequency = inst.frequency;
            continue;
        }

        // Each register counts once per instruction, however many operands
        // mention it.
        let mut mentioned = IndexSet::new();

        for def in &inst.defs {
            mentioned.insert(def.reg.clone());
        }
        for use_ in &inst.uses {
            mentioned.insert(use_.reg.clone());
        }

        for reg in mentioned {
            *costs.entry(reg).or_insert(0.0) += current_frequency;
        }
    }

    costs
}
