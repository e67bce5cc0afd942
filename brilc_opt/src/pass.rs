use brilc_analysis::liveness::VarSet;
use brilc_ir::instr::Operation;

/// Implement this trait when writing per-block optimize passes.
///
/// `live_out` holds the variables read after the block ends. A pass must
/// leave those holding the same values they would have held before it ran.
pub trait BlockPass {
    fn name(&self) -> String;
    fn run_pass(&self, instrs: &[Operation], live_out: &VarSet) -> Vec<Operation>;
}
