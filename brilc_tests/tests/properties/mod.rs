use brilc_analysis::{
    block::{form_blocks, BlockMap},
    cfg::Cfg,
    dom::{dominance_frontier, DomTree, Dominators},
    liveness::{live_variables, vars_used, vars_written, VarSet},
};
use brilc_ir::{
    instr::{Instr, Literal, Operation, Type},
    program::Function,
};
use brilc_opt::{dce::DeadCode, lvn::ValueNumbering, pass::BlockPass};
use proptest::prelude::*;

const VARS: &[&str] = &["a", "b", "c", "d"];
const OPS: &[&str] = &["add", "mul", "sub", "eq"];

#[derive(Debug, Clone)]
enum Body {
    Const(usize, i64),
    Binary(usize, usize, usize, usize),
    Print(usize),
}

#[derive(Debug, Clone)]
enum Exit {
    Fall,
    Jmp(usize),
    Br(usize, usize, usize),
    Ret,
}

#[derive(Debug, Clone)]
struct RawBlock {
    labeled: bool,
    body: Vec<Body>,
    exit: Exit,
}

fn arb_body() -> impl Strategy<Value = Body> {
    prop_oneof![
        (0..VARS.len(), -3i64..3).prop_map(|(d, v)| Body::Const(d, v)),
        (0..OPS.len(), 0..VARS.len(), 0..VARS.len(), 0..VARS.len())
            .prop_map(|(o, d, a, b)| Body::Binary(o, d, a, b)),
        (0..VARS.len()).prop_map(Body::Print),
    ]
}

fn arb_exit(n: usize) -> impl Strategy<Value = Exit> {
    prop_oneof![
        Just(Exit::Fall),
        (0..n).prop_map(Exit::Jmp),
        (0..VARS.len(), 0..n, 0..n).prop_map(|(c, t, f)| Exit::Br(c, t, f)),
        Just(Exit::Ret),
    ]
}

fn arb_block(n: usize) -> impl Strategy<Value = RawBlock> {
    (any::<bool>(), prop::collection::vec(arb_body(), 0..4), arb_exit(n)).prop_map(
        |(labeled, body, exit)| RawBlock {
            labeled,
            body,
            exit,
        },
    )
}

/// Builds a function from generated blocks. Branch targets always get a
/// label so every jump resolves; other blocks keep their label only if the
/// generator asked for one.
fn assemble(raw: Vec<RawBlock>) -> Function {
    let mut targeted = vec![false; raw.len()];
    for block in &raw {
        match block.exit {
            Exit::Jmp(t) => targeted[t] = true,
            Exit::Br(_, t, f) => {
                targeted[t] = true;
                targeted[f] = true;
            }
            _ => {}
        }
    }

    let int = Type::prim("int");
    let mut instrs = Vec::new();
    for (i, block) in raw.iter().enumerate() {
        if block.labeled || targeted[i] {
            instrs.push(Instr::label(&format!("b{}", i)));
        }
        for body in &block.body {
            let op = match *body {
                Body::Const(d, v) => Operation::constant(VARS[d], int.clone(), Literal::Int(v)),
                Body::Binary(o, d, a, b) => {
                    Operation::value(OPS[o], VARS[d], int.clone(), &[VARS[a], VARS[b]])
                }
                Body::Print(a) => Operation::effect("print", &[VARS[a]], &[]),
            };
            instrs.push(Instr::Op(op));
        }
        let exit = match block.exit {
            Exit::Fall => None,
            Exit::Jmp(t) => {
                let t = format!("b{}", t);
                Some(Operation::effect("jmp", &[], &[t.as_str()]))
            }
            Exit::Br(c, t, f) => {
                let (t, f) = (format!("b{}", t), format!("b{}", f));
                Some(Operation::effect("br", &[VARS[c]], &[t.as_str(), f.as_str()]))
            }
            Exit::Ret => Some(Operation::effect("ret", &[], &[])),
        };
        if let Some(op) = exit {
            instrs.push(Instr::Op(op));
        }
    }

    Function::new("main", instrs)
}

fn arb_function() -> impl Strategy<Value = Function> {
    (1usize..8)
        .prop_flat_map(|n| prop::collection::vec(arb_block(n), n))
        .prop_map(assemble)
}

proptest! {
    #[test]
    fn blocks_reassemble_exactly(func in arb_function()) {
        let blocks = BlockMap::build(&func).unwrap();
        prop_assert_eq!(blocks.reassemble(), func.instrs.clone());

        let raw: Vec<Instr> = form_blocks(&func.instrs).into_iter().flatten().collect();
        prop_assert_eq!(raw, func.instrs);
    }

    #[test]
    fn at_most_last_op_terminates(func in arb_function()) {
        let blocks = BlockMap::build(&func).unwrap();
        for block in blocks.iter() {
            let n = block.instrs.len();
            for op in block.instrs.iter().take(n.saturating_sub(1)) {
                prop_assert!(!op.is_terminator());
            }
        }
    }

    #[test]
    fn successors_and_predecessors_agree(func in arb_function()) {
        let blocks = BlockMap::build(&func).unwrap();
        let cfg = Cfg::build(&blocks).unwrap();

        for b in 0..cfg.len() {
            for &s in cfg.successors(b) {
                prop_assert!(s < cfg.len());
                prop_assert!(cfg.predecessors(s).contains(&b));
            }
            for &p in cfg.predecessors(b) {
                prop_assert!(cfg.successors(p).contains(&b));
            }
        }
    }

    #[test]
    fn dominance_is_reflexive_and_rooted(func in arb_function()) {
        let blocks = BlockMap::build(&func).unwrap();
        let cfg = Cfg::build(&blocks).unwrap();
        let doms = Dominators::compute(&cfg);

        for b in 0..cfg.len() {
            prop_assert!(doms.dominates(b, b));
            if cfg.is_reachable(b) {
                prop_assert!(doms.dominates(0, b));
            }
        }
        // every pass but the last shrinks at least one set
        let n = cfg.len();
        prop_assert!(doms.iterations <= n * n + 1);
    }

    #[test]
    fn dominator_sets_only_shrink(func in arb_function()) {
        let blocks = BlockMap::build(&func).unwrap();
        let cfg = Cfg::build(&blocks).unwrap();

        let mut history = Vec::new();
        let doms = Dominators::compute_with(&cfg, |sets| history.push(sets.to_vec()));

        if !cfg.is_empty() {
            prop_assert_eq!(history.len(), doms.iterations + 1);
        }
        for pair in history.windows(2) {
            for b in 0..pair[0].len() {
                prop_assert!(pair[1][b].is_subset(&pair[0][b]));
            }
        }
    }

    #[test]
    fn liveness_is_a_fixpoint(func in arb_function()) {
        let blocks = BlockMap::build(&func).unwrap();
        let cfg = Cfg::build(&blocks).unwrap();
        let liveness = live_variables(&blocks, &cfg);

        for id in 0..blocks.len() {
            let block = blocks.get(id);
            let used = vars_used(block);
            let written = vars_written(block);
            let live_in = liveness.in_of(id);

            prop_assert!(used.is_subset(live_in));

            let mut expected: VarSet = used.clone();
            expected.extend(
                liveness
                    .out_of(id)
                    .iter()
                    .filter(|v| !written.contains(*v))
                    .cloned(),
            );
            prop_assert_eq!(live_in, &expected);

            let mut merged = VarSet::new();
            for &s in cfg.successors(id) {
                merged.extend(liveness.in_of(s).iter().cloned());
            }
            prop_assert_eq!(liveness.out_of(id), &merged);
        }
    }

    #[test]
    fn tree_agrees_with_sets(func in arb_function()) {
        let blocks = BlockMap::build(&func).unwrap();
        let cfg = Cfg::build(&blocks).unwrap();
        let doms = Dominators::compute(&cfg);
        let tree = DomTree::build(&doms);

        for a in 0..cfg.len() {
            for b in 0..cfg.len() {
                prop_assert_eq!(tree.dominates(a, b), doms.dominates(a, b));
            }
        }
    }

    #[test]
    fn frontier_matches_definition(func in arb_function()) {
        let blocks = BlockMap::build(&func).unwrap();
        let cfg = Cfg::build(&blocks).unwrap();
        let doms = Dominators::compute(&cfg);
        let frontier = dominance_frontier(&cfg, &doms);

        for x in 0..cfg.len() {
            for n in 0..cfg.len() {
                let doms_a_pred = cfg.predecessors(n).iter().any(|&p| doms.dominates(x, p));
                let expected = doms_a_pred && !doms.strictly_dominates(x, n);
                prop_assert_eq!(frontier[x].contains(&n), expected);
            }
        }
    }

    #[test]
    fn optimizing_twice_changes_nothing_more(func in arb_function()) {
        let blocks = BlockMap::build(&func).unwrap();
        let cfg = Cfg::build(&blocks).unwrap();
        let liveness = live_variables(&blocks, &cfg);

        for id in 0..blocks.len() {
            let live_out = liveness.out_of(id);
            let once = DeadCode.run_pass(&blocks.get(id).instrs, live_out);
            let twice = DeadCode.run_pass(&once, live_out);
            prop_assert_eq!(&once, &twice);

            // value numbering only rewrites, never drops
            let numbered = ValueNumbering.run_pass(&blocks.get(id).instrs, live_out);
            prop_assert_eq!(numbered.len(), blocks.get(id).instrs.len());
        }
    }
}
