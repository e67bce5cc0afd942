use crate::pass::BlockPass;
use brilc_analysis::liveness::VarSet;
use brilc_ir::instr::{Literal, Operation, Type};
use std::collections::HashMap;
use tracing::trace;

pub type ValueNum = usize;

/// What a value is computed from. Two instructions with equal keys compute
/// the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKey {
    Const { ty: Option<Type>, value: Literal },
    Expr { op: String, args: Vec<ValueNum> },
}

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    num: ValueNum,
    canonical: String,
}

/// Value numbering state for a single block. A fresh state is made for every
/// block, nothing is carried between blocks.
#[derive(Debug, Clone, Default)]
pub struct LvnState {
    table: HashMap<ValueKey, Entry>,
    var_to_num: HashMap<String, ValueNum>,
    next_num: ValueNum,
}

impl LvnState {
    pub fn new() -> LvnState {
        LvnState::default()
    }

    fn fresh(&mut self) -> ValueNum {
        let num = self.next_num;
        self.next_num += 1;
        num
    }

    /// Value number currently held by `var`. A variable not assigned yet in
    /// this block holds some unknown incoming value, which gets its own
    /// number.
    pub fn num_of(&mut self, var: &str) -> ValueNum {
        if let Some(&num) = self.var_to_num.get(var) {
            return num;
        }
        let num = self.fresh();
        self.var_to_num.insert(var.to_string(), num);
        num
    }

    fn key_of(&mut self, op: &Operation) -> ValueKey {
        if op.op == "const" {
            if let Some(value) = op.value {
                return ValueKey::Const {
                    ty: op.ty.clone(),
                    value,
                };
            }
        }

        let mut args: Vec<ValueNum> = op.args.iter().map(|a| self.num_of(a)).collect();
        if op.is_commutative() {
            args.sort_unstable();
        }
        ValueKey::Expr {
            op: op.op.clone(),
            args,
        }
    }

    /// Binds `dest` to `num`. If `dest` was the canonical holder of some
    /// other value, that value is forgotten since nothing names it anymore.
    fn assign(&mut self, dest: &str, num: ValueNum) {
        self.table
            .retain(|_, entry| entry.canonical != dest || entry.num == num);
        self.var_to_num.insert(dest.to_string(), num);
    }

    /// Numbers one instruction and returns it, rewritten to a copy of an
    /// earlier variable when that variable already holds the same value.
    pub fn number(&mut self, op: &Operation) -> Operation {
        let dest = match &op.dest {
            Some(dest) => dest.clone(),
            None => return op.clone(),
        };

        if !op.is_pure() {
            let num = self.fresh();
            self.assign(&dest, num);
            return op.clone();
        }

        // A copy holds whatever its source holds.
        if op.op == "id" && op.args.len() == 1 {
            let num = self.num_of(&op.args[0]);
            self.assign(&dest, num);
            return op.clone();
        }

        let key = self.key_of(op);
        match self.table.get(&key).cloned() {
            Some(entry) => {
                self.assign(&dest, entry.num);
                if entry.canonical == dest {
                    op.clone()
                } else {
                    trace!(instr = %op, canonical = %entry.canonical, "redundant value");
                    op.copy_of(&entry.canonical)
                }
            }
            None => {
                let num = self.fresh();
                self.assign(&dest, num);
                self.table.insert(
                    key,
                    Entry {
                        num,
                        canonical: dest,
                    },
                );
                op.clone()
            }
        }
    }
}

/// Local value numbering: replaces recomputation of a value already held by
/// a variable in the same block with a copy of that variable.
pub struct ValueNumbering;

impl BlockPass for ValueNumbering {
    fn name(&self) -> String {
        String::from("ValueNumbering")
    }

    fn run_pass(&self, instrs: &[Operation], _live_out: &VarSet) -> Vec<Operation> {
        let mut state = LvnState::new();
        instrs.iter().map(|op| state.number(op)).collect()
    }
}
