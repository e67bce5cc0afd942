use crate::{
    block::{BlockID, BlockMap},
    cfg::Cfg,
    dataflow::DataflowResult,
    defined::defined_variables,
    dom::{dominance_frontier, BlockSet, DomTree, Dominators},
    liveness::{live_variables, VarSet},
};
use brilc_err::cfg_err::CfgErr;
use brilc_ir::program::{Function, Program};
use tracing::debug;

pub struct Analyzer {
    program: Program,
}

impl Analyzer {
    pub fn new(program: Program) -> Analyzer {
        Analyzer { program }
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Analyzes every function of the program independently, in program
    /// order. Stops at the first function that fails.
    pub fn perform(&self) -> Result<Vec<FunctionAnalysis>, CfgErr> {
        self.program
            .functions
            .iter()
            .map(FunctionAnalysis::run)
            .collect()
    }
}

/// Everything the analysis passes know about a single function.
#[derive(Debug, Clone)]
pub struct FunctionAnalysis {
    pub name: String,
    pub blocks: BlockMap,
    pub cfg: Cfg,
    pub liveness: DataflowResult<VarSet>,
    pub defined: DataflowResult<VarSet>,
    pub dominators: Dominators,
    pub dom_tree: DomTree,
    pub frontier: Vec<BlockSet>,
}

impl FunctionAnalysis {
    pub fn run(func: &Function) -> Result<FunctionAnalysis, CfgErr> {
        let blocks = BlockMap::build(func)?;
        let cfg = Cfg::build(&blocks)?;
        let liveness = live_variables(&blocks, &cfg);
        let defined = defined_variables(func, &blocks, &cfg);
        let dominators = Dominators::compute(&cfg);
        let dom_tree = DomTree::build(&dominators);
        let frontier = dominance_frontier(&cfg, &dominators);

        debug!(
            func = %func.name,
            liveness_iters = liveness.iterations,
            dom_iters = dominators.iterations,
            "analyzed function"
        );

        Ok(FunctionAnalysis {
            name: func.name.clone(),
            blocks,
            cfg,
            liveness,
            defined,
            dominators,
            dom_tree,
            frontier,
        })
    }

    /// Answers "does block `a` dominate block `b`?" by walking the dominator
    /// tree. Unknown block names are an error.
    pub fn dominates(&self, a: &str, b: &str) -> Result<bool, CfgErr> {
        let a = self.blocks.require(a)?;
        let b = self.blocks.require(b)?;
        Ok(self.dom_tree.dominates(a, b))
    }

    pub fn strictly_dominates(&self, a: &str, b: &str) -> Result<bool, CfgErr> {
        let a = self.blocks.require(a)?;
        let b = self.blocks.require(b)?;
        Ok(self.dom_tree.strictly_dominates(a, b))
    }

    /// Block names of `ids`, sorted by name.
    pub fn names_of(&self, ids: &BlockSet) -> Vec<String> {
        let mut names: Vec<String> = ids.iter().map(|&id| self.cfg.name(id).to_string()).collect();
        names.sort();
        names
    }

    /// Dominator set of each block, in block order.
    pub fn dom_sets(&self) -> Vec<(String, Vec<String>)> {
        self.per_block(|id| self.names_of(self.dominators.dom_set(id)))
    }

    /// Immediately dominated children of each block, in block order.
    pub fn dom_children(&self) -> Vec<(String, Vec<String>)> {
        self.per_block(|id| {
            self.dom_tree
                .children(id)
                .iter()
                .map(|&c| self.cfg.name(c).to_string())
                .collect()
        })
    }

    /// Dominance frontier of each block, in block order.
    pub fn frontiers(&self) -> Vec<(String, Vec<String>)> {
        self.per_block(|id| self.names_of(&self.frontier[id]))
    }

    fn per_block<F>(&self, f: F) -> Vec<(String, Vec<String>)>
    where
        F: Fn(BlockID) -> Vec<String>,
    {
        (0..self.cfg.len())
            .map(|id| (self.cfg.name(id).to_string(), f(id)))
            .collect()
    }
}
