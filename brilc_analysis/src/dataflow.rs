use crate::{
    block::{Block, BlockID, BlockMap},
    cfg::Cfg,
};
use std::collections::VecDeque;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Implement this trait to describe a dataflow problem for `solve`.
///
/// `merge` and `transfer` must be monotone over a finite lattice, otherwise
/// `solve` is not guaranteed to terminate.
pub trait Dataflow {
    type Fact: Clone + PartialEq;

    const DIRECTION: Direction;

    fn name(&self) -> &str;

    /// Starting value for every block, and the identity of `merge`.
    fn init(&self) -> Self::Fact;

    /// Value flowing into the entry block (forward) or out of blocks with
    /// no successors (backward).
    fn boundary(&self) -> Self::Fact {
        self.init()
    }

    /// Joins `other` into `into`.
    fn merge(&self, into: &mut Self::Fact, other: &Self::Fact);

    /// Computes the fact on the far side of `block` from `input`: the out
    /// fact for a forward problem, the in fact for a backward one.
    fn transfer(&self, block: &Block, input: &Self::Fact) -> Self::Fact;
}

/// Facts at the entry and exit of every block, indexed by `BlockID`.
#[derive(Debug, Clone, PartialEq)]
pub struct DataflowResult<F> {
    pub ins: Vec<F>,
    pub outs: Vec<F>,

    /// Number of blocks taken off the worklist before it drained.
    pub iterations: usize,
}

impl<F> DataflowResult<F> {
    pub fn in_of(&self, id: BlockID) -> &F {
        &self.ins[id]
    }

    pub fn out_of(&self, id: BlockID) -> &F {
        &self.outs[id]
    }
}

/// Runs `analysis` to a fixpoint with a FIFO worklist. Every block starts on
/// the worklist in source order. When the fact a block passes on changes,
/// the blocks that read it are queued again unless they are already queued.
pub fn solve<D: Dataflow>(analysis: &D, blocks: &BlockMap, cfg: &Cfg) -> DataflowResult<D::Fact> {
    let count = blocks.len();
    let mut ins = vec![analysis.init(); count];
    let mut outs = vec![analysis.init(); count];

    let mut worklist: VecDeque<BlockID> = (0..count).collect();
    let mut queued = vec![true; count];
    let mut iterations = 0;

    while let Some(id) = worklist.pop_front() {
        queued[id] = false;
        iterations += 1;

        let block = blocks.get(id);
        let changed = match D::DIRECTION {
            Direction::Forward => {
                let mut input = analysis.init();
                if id == 0 {
                    analysis.merge(&mut input, &analysis.boundary());
                }
                for &pred in cfg.predecessors(id) {
                    analysis.merge(&mut input, &outs[pred]);
                }

                let output = analysis.transfer(block, &input);
                ins[id] = input;
                if output != outs[id] {
                    outs[id] = output;
                    true
                } else {
                    false
                }
            }
            Direction::Backward => {
                let mut input = analysis.init();
                if cfg.successors(id).is_empty() {
                    analysis.merge(&mut input, &analysis.boundary());
                }
                for &succ in cfg.successors(id) {
                    analysis.merge(&mut input, &ins[succ]);
                }

                let output = analysis.transfer(block, &input);
                outs[id] = input;
                if output != ins[id] {
                    ins[id] = output;
                    true
                } else {
                    false
                }
            }
        };

        trace!(analysis = analysis.name(), block = %block.name, changed, "visited block");

        if !changed {
            continue;
        }

        let dependents = match D::DIRECTION {
            Direction::Forward => cfg.successors(id),
            Direction::Backward => cfg.predecessors(id),
        };
        for &dep in dependents {
            if !queued[dep] {
                queued[dep] = true;
                worklist.push_back(dep);
            }
        }
    }

    debug!(
        analysis = analysis.name(),
        func = blocks.func_name(),
        iterations,
        "dataflow reached fixpoint"
    );

    DataflowResult {
        ins,
        outs,
        iterations,
    }
}
