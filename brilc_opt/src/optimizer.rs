use crate::{config::OptConfig, dce::DeadCode, lvn::ValueNumbering, pass::BlockPass};
use brilc_analysis::{block::BlockMap, cfg::Cfg, liveness::live_variables};
use brilc_err::cfg_err::CfgErr;
use brilc_ir::program::{Function, Program};
use tracing::debug;

/// Returns the optimized program along with counts of what the passes did.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizeResult {
    /// Fully optimized program.
    pub program: Program,

    /// Total amount of instructions removed from any function.
    pub removed: usize,

    /// Total amount of instructions replaced by a copy of an earlier value.
    pub rewritten: usize,
}

/// Used to hold intermediate results of a single function.
struct FunctionPassResult {
    func: Function,
    removed: usize,
    rewritten: usize,
}

/// The Optimizer runs the enabled block passes over every block of every
/// function. Blocks are optimized one at a time, with liveness computed up
/// front so passes know what the rest of the function still reads.
pub struct Optimizer {
    config: OptConfig,
    dead_code: DeadCode,
    value_numbering: ValueNumbering,
}

impl Optimizer {
    pub fn new(config: OptConfig) -> Optimizer {
        Optimizer {
            config,
            dead_code: DeadCode,
            value_numbering: ValueNumbering,
        }
    }

    pub fn run_passes(&self, program: &Program) -> Result<OptimizeResult, CfgErr> {
        let mut functions = Vec::with_capacity(program.functions.len());
        let mut removed = 0;
        let mut rewritten = 0;

        for func in &program.functions {
            let res = self.optimize_function(func)?;
            removed += res.removed;
            rewritten += res.rewritten;
            functions.push(res.func);
        }

        Ok(OptimizeResult {
            program: Program { functions },
            removed,
            rewritten,
        })
    }

    fn optimize_function(&self, func: &Function) -> Result<FunctionPassResult, CfgErr> {
        let mut blocks = BlockMap::build(func)?;
        let cfg = Cfg::build(&blocks)?;
        let liveness = live_variables(&blocks, &cfg);

        let mut removed = 0;
        let mut rewritten = 0;

        for id in 0..blocks.len() {
            let live_out = liveness.out_of(id);
            let mut instrs = blocks.get(id).instrs.clone();

            if self.config.lvn {
                let next = self.value_numbering.run_pass(&instrs, live_out);
                rewritten += instrs.iter().zip(&next).filter(|(a, b)| a != b).count();
                instrs = next;
            }

            if self.config.dce {
                let next = self.dead_code.run_pass(&instrs, live_out);
                removed += instrs.len() - next.len();
                instrs = next;
            }

            blocks.get_mut(id).instrs = instrs;
        }

        debug!(func = %func.name, removed, rewritten, "optimized function");

        let mut out = func.clone();
        out.instrs = blocks.reassemble();

        Ok(FunctionPassResult {
            func: out,
            removed,
            rewritten,
        })
    }
}
