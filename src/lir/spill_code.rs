//! Materializes spill decisions in the instruction stream. A spilled
//! register no longer owns a slot across instructions, so every use must be
//! preceded by a `Reload` and every definition followed by a `Spill` store;
//! inside the rewritten instruction the reloaded value dies at its use and
//! the defined value survives exactly long enough to be stored.
//!
//! Block-start markers lose their declarations of spilled registers: those
//! values live in memory at block entry, not in a register.

use indexmap::IndexSet;

use crate::graph::NodeId;

use super::inst::{Def, Inst, Opcode, Use};
use super::program::Program;

pub fn insert_spill_code<N: NodeId>(program: &mut Program<N>, spilled: &IndexSet<N>) {
    let mut rewritten = Vec::with_capacity(program.insts().len());

    for inst in program.insts() {
        if inst.is_block_start() {
            let defs = inst
                .defs
                .iter()
                .filter(|def| !spilled.contains(&def.reg))
                .cloned()
                .collect();

            rewritten.push(Inst {
                opcode: Opcode::BlockStart,
                defs,
                uses: inst.uses.clone(),
                frequency: inst.frequency,
            });
            continue;
        }

        let mut reloads = Vec::new();
        let mut stores = Vec::new();
        let mut defs = Vec::with_capacity(inst.defs.len());
        let mut uses = Vec::with_capacity(inst.uses.len());

        for use_ in &inst.uses {
            if spilled.contains(&use_.reg) {
                // The reloaded value is consumed once and not kept live.
                uses.push(Use::new(use_.reg.clone(), true));
                reloads.push(
                    Inst::new(
                        Opcode::Reload,
                        vec![Def::new(use_.reg.clone(), false)],
                        vec![],
                    )
                    .with_frequency(inst.frequency),
                );
            } else {
                uses.push(use_.clone());
            }
        }

        for def in &inst.defs {
            if spilled.contains(&def.reg) {
                // Keep the value live just long enough for the store.
                defs.push(Def::new(def.reg.clone(), false));
                stores.push(
                    Inst::new(
                        Opcode::Spill,
                        vec![],
                        vec![Use::new(def.reg.clone(), true)],
                    )
                    .with_frequency(inst.frequency),
                );
            } else {
                defs.push(def.clone());
            }
        }

        rewritten.extend(reloads);
        rewritten.push(Inst {
            opcode: inst.opcode.clone(),
            defs,
            uses,
            frequency: inst.frequency,
        });
        rewritten.extend(stores);
    }

    program.set_insts(rewritten);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lir::inst::Opcode;

    fn spill_set(regs: &[&'static str]) -> IndexSet<&'static str> {
        regs.iter().copied().collect()
    }

    #[test]
    fn test_reload_precedes_use_and_store_follows_def() {
        let mut program = Program::new(vec![
            Inst::block_start(vec![]),
            Inst::new(
                Opcode::Op("add"),
                vec![Def::new("y", false)],
                vec![Use::new("x", false)],
            ),
        ]);

        insert_spill_code(&mut program, &spill_set(&["x", "y"]));

        let insts = program.insts();
        assert_eq!(insts.len(), 4);

        assert_eq!(insts[1].opcode, Opcode::Reload);
        assert_eq!(insts[1].defs[0].reg, "x");
        assert!(!insts[1].defs[0].dies);

        let add = &insts[2];
        assert_eq!(add.opcode, Opcode::Op("add"));
        assert!(add.uses[0].dies, "reloaded use dies at the instruction");
        assert!(!add.defs[0].dies, "stored def stays live for the store");

        assert_eq!(insts[3].opcode, Opcode::Spill);
        assert_eq!(insts[3].uses[0].reg, "y");
        assert!(insts[3].uses[0].dies);
    }

    #[test]
    fn test_block_start_drops_spilled_defs() {
        let mut program = Program::new(vec![Inst::block_start(vec![
            Def::new("a", false),
            Def::new("b", false),
        ])]);

        insert_spill_code(&mut program, &spill_set(&["a"]));

        let block = &program.insts()[0];
        assert_eq!(block.defs.len(), 1);
        assert_eq!(block.defs[0].reg, "b");
    }

    #[test]
    fn test_unspilled_operands_pass_through() {
        let mut program = Program::new(vec![
            Inst::block_start(vec![]),
            Inst::new(
                Opcode::Op("add"),
                vec![Def::new("y", true)],
                vec![Use::new("x", true)],
            ),
        ]);

        insert_spill_code(&mut program, &spill_set(&["other"]));

        let insts = program.insts();
        assert_eq!(insts.len(), 2);
        assert!(insts[1].uses[0].dies);
        assert!(insts[1].defs[0].dies);
    }

    #[test]
    fn test_synthetic_insts_inherit_frequency() {
        let mut program = Program::new(vec![
            Inst::block_start(vec![]).with_frequency(8.0),
            Inst::new(Opcode::Op("add"), vec![Def::new("x", false)], vec![]).with_frequency(8.0),
        ]);

        insert_spill_code(&mut program, &spill_set(&["x"]));

        let store = &program.insts()[2];
        assert_eq!(store.opcode, Opcode::Spill);
        assert_eq!(store.frequency, 8.0);
    }
}
