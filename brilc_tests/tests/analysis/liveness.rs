use brilc_analysis::{
    analyzer::{Analyzer, FunctionAnalysis},
    liveness::VarSet,
};
use brilc_ir::program::Program;
use pretty_assertions::assert_eq;

fn set(vars: &[&str]) -> VarSet {
    vars.iter().map(|v| v.to_string()).collect()
}

fn analyze(name: &str) -> FunctionAnalysis {
    let program: Program = load_program!(name);
    FunctionAnalysis::run(&program.functions[0]).unwrap()
}

#[test]
fn counting_loop_liveness() {
    let fa = analyze("counting_loop");
    let live = &fa.liveness;

    // n is an argument, read in the loop header before anything assigns it
    assert_eq!(live.in_of(0), &set(&["n"]));
    assert_eq!(live.out_of(0), &set(&["i", "n", "one"]));
    assert_eq!(live.in_of(1), &set(&["i", "n", "one"]));
    assert_eq!(live.in_of(2), &set(&["i", "n", "one"]));
    assert_eq!(live.in_of(3), &set(&["i"]));
    assert!(live.out_of(3).is_empty());
}

#[test]
fn counting_loop_defined() {
    let fa = analyze("counting_loop");
    let defined = &fa.defined;

    assert_eq!(defined.in_of(0), &set(&["n"]));
    assert_eq!(defined.out_of(0), &set(&["i", "n", "one"]));
    assert_eq!(defined.in_of(3), &set(&["cond", "i", "n", "one"]));
}

#[test]
fn nested_loop_liveness() {
    let fa = analyze("nested_loop");
    let live = &fa.liveness;
    let id = |name: &str| fa.blocks.id_of(name).unwrap();

    assert_eq!(live.in_of(id("inner_body")), &set(&["i", "j", "n", "one"]));
    assert_eq!(live.in_of(id("outer_body")), &set(&["i", "n", "one"]));
    assert_eq!(live.in_of(id("outer")), &set(&["i", "n", "one"]));
    assert!(live.in_of(id("done")).is_empty());

    // branch conditions die at the branch
    assert!(!live.out_of(id("inner")).contains("ic"));
    assert!(!live.out_of(id("outer")).contains("oc"));
}

#[test]
fn diamond_liveness() {
    let fa = analyze("diamond");
    let live = &fa.liveness;

    assert!(live.in_of(0).is_empty());
    assert_eq!(live.out_of(1), &set(&["x"]));
    assert_eq!(live.out_of(2), &set(&["x"]));
    assert_eq!(live.in_of(3), &set(&["x"]));
}

#[test]
fn per_function_results() {
    let program: Program = load_program!("multi_func");
    let analyses = Analyzer::new(program).perform().unwrap();

    let main = &analyses[0];
    assert_eq!(main.name, "main");
    assert!(main.liveness.in_of(0).is_empty());

    let double = &analyses[1];
    assert_eq!(double.name, "double");
    assert_eq!(double.liveness.in_of(0), &set(&["x"]));
    assert_eq!(double.defined.in_of(0), &set(&["x"]));
}
