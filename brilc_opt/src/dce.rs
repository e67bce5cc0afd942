use crate::pass::BlockPass;
use brilc_analysis::liveness::VarSet;
use brilc_ir::instr::Operation;
use tracing::trace;

/// Removes pure instructions whose destination is never read, neither later
/// in the block nor after it.
pub struct DeadCode;

impl DeadCode {
    /// A single elimination sweep. Collects every argument read in the
    /// block, then drops each pure instruction whose destination is not
    /// among them. Code that only becomes dead because of this sweep is left
    /// for the next one.
    pub fn sweep(&self, instrs: &[Operation], live_out: &VarSet) -> Vec<Operation> {
        let mut used: VarSet = live_out.clone();
        for op in instrs {
            used.extend(op.args.iter().cloned());
        }

        let mut kept = Vec::with_capacity(instrs.len());
        for op in instrs.iter().rev() {
            let dead = match &op.dest {
                Some(dest) => op.is_pure() && !used.contains(dest),
                None => false,
            };

            if dead {
                trace!(instr = %op, "removing dead instruction");
            } else {
                kept.push(op.clone());
            }
        }

        kept.reverse();
        kept
    }
}

impl BlockPass for DeadCode {
    fn name(&self) -> String {
        String::from("DeadCode")
    }

    /// Repeats `sweep` until one removes nothing.
    fn run_pass(&self, instrs: &[Operation], live_out: &VarSet) -> Vec<Operation> {
        let mut curr = instrs.to_vec();
        loop {
            let next = self.sweep(&curr, live_out);
            if next.len() == curr.len() {
                return next;
            }
            curr = next;
        }
    }
}
