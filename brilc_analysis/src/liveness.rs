use crate::{
    block::{Block, BlockMap},
    cfg::Cfg,
    dataflow::{solve, Dataflow, DataflowResult, Direction},
};
use std::collections::BTreeSet;

pub type VarSet = BTreeSet<String>;

/// Variables assigned anywhere in the block.
pub fn vars_written(block: &Block) -> VarSet {
    block
        .instrs
        .iter()
        .filter_map(|op| op.dest.clone())
        .collect()
}

/// Variables the block reads before assigning them itself, i.e. the uses
/// exposed to whatever runs before the block.
pub fn vars_used(block: &Block) -> VarSet {
    let mut defined = VarSet::new();
    let mut used = VarSet::new();

    for op in &block.instrs {
        for arg in &op.args {
            if !defined.contains(arg) {
                used.insert(arg.clone());
            }
        }
        if let Some(dest) = &op.dest {
            defined.insert(dest.clone());
        }
    }

    used
}

/// Backward liveness: `in = used ∪ (out − written)`, `out = ∪ in[succ]`.
pub struct LiveVariables;

impl Dataflow for LiveVariables {
    type Fact = VarSet;
    const DIRECTION: Direction = Direction::Backward;

    fn name(&self) -> &str {
        "liveness"
    }

    fn init(&self) -> VarSet {
        VarSet::new()
    }

    fn merge(&self, into: &mut VarSet, other: &VarSet) {
        into.extend(other.iter().cloned());
    }

    fn transfer(&self, block: &Block, out: &VarSet) -> VarSet {
        let written = vars_written(block);
        let mut live = vars_used(block);
        live.extend(out.iter().filter(|v| !written.contains(*v)).cloned());
        live
    }
}

pub fn live_variables(blocks: &BlockMap, cfg: &Cfg) -> DataflowResult<VarSet> {
    solve(&LiveVariables, blocks, cfg)
}
