use crate::{
    block::{Block, BlockMap},
    cfg::Cfg,
    dataflow::{solve, Dataflow, DataflowResult, Direction},
    liveness::{vars_written, VarSet},
};
use brilc_ir::program::Function;

/// Forward analysis of the variables that may have been assigned on some
/// path reaching each block. Function arguments count as assigned at entry.
pub struct DefinedVariables {
    args: VarSet,
}

impl DefinedVariables {
    pub fn new(func: &Function) -> DefinedVariables {
        DefinedVariables {
            args: func.arg_names().map(String::from).collect(),
        }
    }
}

impl Dataflow for DefinedVariables {
    type Fact = VarSet;
    const DIRECTION: Direction = Direction::Forward;

    fn name(&self) -> &str {
        "defined"
    }

    fn init(&self) -> VarSet {
        VarSet::new()
    }

    fn boundary(&self) -> VarSet {
        self.args.clone()
    }

    fn merge(&self, into: &mut VarSet, other: &VarSet) {
        into.extend(other.iter().cloned());
    }

    fn transfer(&self, block: &Block, input: &VarSet) -> VarSet {
        let mut out = input.clone();
        out.extend(vars_written(block));
        out
    }
}

pub fn defined_variables(func: &Function, blocks: &BlockMap, cfg: &Cfg) -> DataflowResult<VarSet> {
    solve(&DefinedVariables::new(func), blocks, cfg)
}
