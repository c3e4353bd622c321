//! Ownership of the instruction stream, plus the generic register-remapping
//! utility. Rewrites always build a fresh instruction vector; individual
//! `Inst` records are never mutated in place, so anything holding the old
//! stream keeps a consistent view.

use std::collections::HashMap;

use indexmap::IndexSet;

use crate::graph::NodeId;

use super::inst::{Def, Inst, Use};

#[derive(Clone, Debug, Default)]
pub struct Program<N: NodeId> {
    insts: Vec<Inst<N>>,
}

impl<N: NodeId> Program<N> {
    pub fn new(insts: Vec<Inst<N>>) -> Self {
        Self { insts }
    }

    pub fn insts(&self) -> &[Inst<N>] {
        &self.insts
    }

    /// Replaces the stream wholesale. The new stream need not have the same
    /// length as the old one.
    pub fn set_insts(&mut self, insts: Vec<Inst<N>>) {
        self.insts = insts;
    }

    /// Every register mentioned by any def or use, in first-appearance order.
    pub fn registers(&self) -> IndexSet<N> {
        let mut registers = IndexSet::new();

        for inst in &self.insts {
            for def in &inst.defs {
                registers.insert(def.reg.clone());
            }
            for use_ in &inst.uses {
                registers.insert(use_.reg.clone());
            }
        }

        registers
    }

    /// Rewrites the whole stream substituting register ids through `mapping`.
    /// Registers without a mapping entry pass through unchanged.
    pub fn rewrite(&mut self, mapping: &HashMap<N, N>) {
        let remap = |reg: &N| mapping.get(reg).unwrap_or(reg).clone();

        let insts = self
            .insts
            .iter()
            .map(|inst| Inst {
                opcode: inst.opcode.clone(),
                defs: inst
                    .defs
                    .iter()
                    .map(|def| Def::new(remap(&def.reg), def.dies))
                    .collect(),
                uses: inst
                    .uses
                    .iter()
                    .map(|use_| Use::new(remap(&use_.reg), use_.dies))
                    .collect(),
                frequency: inst.frequency,
            })
            .collect();

        self.insts = insts;
    }
}
