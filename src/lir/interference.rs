//! Builds the interference graph from a single forward sweep over the
//! instruction stream.
//!
//! The per-instruction order is load-bearing: dying uses retire from the
//! live set *before* the instruction's definitions are considered, so a
//! register consumed for the last time by an instruction does not interfere
//! with the registers that instruction defines. That ordering is what makes
//! `b = copy a` (with `a` dying at the copy) coalescing-eligible later.

use crate::graph::{InterferenceGraph, NodeId};
use crate::live::LiveSet;

use super::program::Program;

pub fn build_interference_graph<N: NodeId>(program: &Program<N>) -> InterferenceGraph<N> {
    let mut graph = InterferenceGraph::new();
    let mut live = LiveSet::new();

    for inst in program.insts() {
        if inst.is_block_start() {
            // New block: liveness does not flow across the boundary. The
            // block-start's own defs declare what is live on entry.
            live.clear();

            for def in &inst.defs {
                if !def.dies {
                    live.add(def.reg.clone());
                }
            }

            continue;
        }

        for use_ in &inst.uses {
            if use_.dies {
                live.kill(&use_.reg);
            }
        }

        for def in &inst.defs {
            for reg in live.iter() {
                if *reg != def.reg {
                    log::trace!("interference: {:?} <-> {:?}", def.reg, reg);
                    graph.add_edge(def.reg.clone(), reg.clone());
                }
            }

            if !def.dies {
                live.add(def.reg.clone());
            }
        }
    }

    graph
}
