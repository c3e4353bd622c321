//! Copy coalescing: a `Move` whose source and destination do not interfere
//! is redundant: the destination can simply *be* the source. The pass
//! renames the destination to the source throughout the graph and the
//! stream, then rescans, until no redundant copy remains. The copy
//! instruction itself degenerates into a same-register assignment and is
//! left in place; removing it is dead-code elimination's job, not ours.

use std::collections::HashMap;

use crate::graph::{InterferenceGraph, NodeId};

use super::inst::{Inst, Opcode};
use super::program::Program;

fn redundant_copy<'a, N: NodeId>(
    inst: &'a Inst<N>,
    graph: &InterferenceGraph<N>,
) -> Option<(&'a N, &'a N)> {
    if inst.opcode != Opcode::Move || inst.defs.len() != 1 || inst.uses.len() != 1 {
        return None;
    }

    let dst = &inst.defs[0].reg;
    let src = &inst.uses[0].reg;

    if dst != src && !graph.contains_edge(dst, src) {
        Some((dst, src))
    } else {
        None
    }
}

/// Runs coalescing to a fixed point, mutating both the stream and the graph.
/// Returns the number of copies eliminated.
pub fn coalesce<N: NodeId>(program: &mut Program<N>, graph: &mut InterferenceGraph<N>) -> usize {
    let mut merged = 0;

    loop {
        let found = program
            .insts()
            .iter()
            .find_map(|inst| redundant_copy(inst, graph))
            .map(|(dst, src)| (dst.clone(), src.clone()));

        let Some((dst, src)) = found else {
            break;
        };

        log::debug!("coalescing {:?} into {:?}", dst, src);

        graph.rename_node(&dst, &src);

        let mut mapping = HashMap::new();
        mapping.insert(dst, src);
        program.rewrite(&mapping);

        merged += 1;
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lir::inst::{Def, Opcode, Use};
    use crate::lir::interference::build_interference_graph;

    #[test]
    fn test_noninterfering_copy_is_coalesced() {
        let mut program = Program::new(vec![
            Inst::block_start(vec![Def::new("a", false)]),
            Inst::copy("b", "a", true),
            Inst::new(Opcode::Op("add"), vec![Def::new("c", false)], vec![Use::new("b", false)]),
        ]);

        let mut graph = build_interference_graph(&program);
        let merged = coalesce(&mut program, &mut graph);

        assert_eq!(merged, 1);
        let registers = program.registers();
        assert!(!registers.contains(&"b"));
        assert!(registers.contains(&"a"));

        // The copy instruction survives as a degenerate same-register move.
        let copy = &program.insts()[1];
        assert_eq!(copy.opcode, Opcode::Move);
        assert_eq!(copy.defs[0].reg, "a");
        assert_eq!(copy.uses[0].reg, "a");
    }

    #[test]
    fn test_interfering_copy_is_kept() {
        // a survives the copy, so a and b interfere and must stay distinct.
        let mut program = Program::new(vec![
            Inst::block_start(vec![Def::new("a", false)]),
            Inst::copy("b", "a", false),
            Inst::new(
                Opcode::Op("add"),
                vec![Def::new("c", false)],
                vec![Use::new("a", true), Use::new("b", true)],
            ),
        ]);

        let mut graph = build_interference_graph(&program);
        let merged = coalesce(&mut program, &mut graph);

        assert_eq!(merged, 0);
        assert!(program.registers().contains(&"b"));
        assert!(graph.contains_edge(&"a", &"b"));
    }

    #[test]
    fn test_copy_chains_collapse_to_fixed_point() {
        // b = a; c = b: both copies are redundant, and the second only
        // becomes visible as such after the first renames b to a.
        let mut program = Program::new(vec![
            Inst::block_start(vec![Def::new("a", false)]),
            Inst::copy("b", "a", true),
            Inst::copy("c", "b", true),
            Inst::new(Opcode::Op("ret"), vec![], vec![Use::new("c", true)]),
        ]);

        let mut graph = build_interference_graph(&program);
        let merged = coalesce(&mut program, &mut graph);

        assert_eq!(merged, 2);
        let registers = program.registers();
        assert_eq!(registers.len(), 1);
        assert!(registers.contains(&"a"));
    }

    #[test]
    fn test_multi_operand_moves_are_not_candidates() {
        let mut program = Program::new(vec![
            Inst::block_start(vec![Def::new("a", false)]),
            Inst::new(
                Opcode::Move,
                vec![Def::new("b", false)],
                vec![Use::new("a", true), Use::new("x", true)],
            ),
        ]);

        let mut graph = build_interference_graph(&program);
        assert_eq!(coalesce(&mut program, &mut graph), 0);
    }
}
