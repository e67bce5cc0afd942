use brilc_analysis::{block::BlockMap, liveness::VarSet};
use brilc_ir::{
    decode,
    instr::{Instr, Operation, Type},
    program::Program,
};
use brilc_opt::{config::OptConfig, dce::DeadCode, optimizer::Optimizer};
use pretty_assertions::assert_eq;

fn optimize(name: &str, dce: bool, lvn: bool) -> (Program, usize, usize) {
    let program: Program = load_program!(name);
    let res = Optimizer::new(OptConfig { dce, lvn })
        .run_passes(&program)
        .unwrap();
    (res.program, res.removed, res.rewritten)
}

fn ops(program: &Program) -> Vec<Operation> {
    program.functions[0]
        .instrs
        .iter()
        .filter_map(|i| i.as_op().cloned())
        .collect()
}

#[test]
fn lvn_finds_commuted_add() {
    let (program, removed, rewritten) = optimize("lvn_redundant", false, true);
    let ops = ops(&program);

    assert_eq!(removed, 0);
    assert_eq!(rewritten, 1);
    assert_eq!(
        ops[3],
        Operation::value("id", "b", Type::prim("int"), &["a"])
    );
    // the multiply is untouched: nothing earlier computes a * b
    assert_eq!(ops[4].op, "mul");
    assert_eq!(ops[4].args, vec!["a", "b"]);
}

#[test]
fn lvn_keeps_everything_read() {
    let (program, removed, _) = optimize("lvn_redundant", true, true);
    assert_eq!(removed, 0);
    assert_eq!(ops(&program).len(), 6);
}

#[test]
fn dce_removes_transitively_dead_code() {
    let (program, removed, rewritten) = optimize("dce_chain", true, false);
    assert_eq!(removed, 3);
    assert_eq!(rewritten, 0);

    let dests: Vec<String> = ops(&program).iter().filter_map(|op| op.dest.clone()).collect();
    assert_eq!(dests, vec!["x", "y", "z"]);

    // labels survive
    assert!(program.functions[0].instrs.contains(&Instr::label("out")));
}

#[test]
fn dce_single_sweep() {
    let program: Program = load_program!("dce_chain");
    let blocks = BlockMap::build(&program.functions[0]).unwrap();
    let live_out: VarSet = vec![String::from("z")].into_iter().collect();

    let once = DeadCode.sweep(&blocks.get(0).instrs, &live_out);
    let dests: Vec<String> = once.iter().filter_map(|op| op.dest.clone()).collect();

    // only dead2 is unread before the sweep
    assert_eq!(dests, vec!["x", "y", "w", "z", "dead1"]);
}

#[test]
fn calls_survive_dce() {
    let (program, removed, _) = optimize("multi_func", true, true);
    assert_eq!(removed, 0);
    assert_eq!(program.functions[0].instrs.len(), 3);
    assert_eq!(program.functions[1].instrs.len(), 3);
}

#[test]
fn values_read_across_blocks_survive() {
    let (program, removed, _) = optimize("nested_loop", true, true);
    assert_eq!(removed, 0);
    let original: Program = load_program!("nested_loop");
    assert_eq!(program, original);
}

#[test]
fn optimized_program_decodes_again() {
    let (program, _, _) = optimize("dce_chain", true, true);
    let json = decode::to_string(&program).unwrap();
    assert_eq!(decode::from_str(&json).unwrap(), program);
}

#[test]
fn generated_name_clash_optimizes() {
    let (program, removed, _) = optimize("gen_name_clash", true, true);
    assert_eq!(removed, 1);

    // the unlabeled entry gets no label written back
    let instrs = &program.functions[0].instrs;
    assert_eq!(instrs.len(), 3);
    assert_eq!(instrs[1], Instr::label("gen_bk_0"));
}
