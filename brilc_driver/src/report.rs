use brilc_analysis::{analyzer::FunctionAnalysis, liveness::VarSet};
use brilc_err::cfg_err::CfgErr;
use brilc_ir::printer::instrs_to_string;

const EMPTY: &str = "∅";

/// Comma separated list, or `∅` when there is nothing to list.
pub fn fmt_list(items: &[String]) -> String {
    if items.is_empty() {
        String::from(EMPTY)
    } else {
        items.join(", ")
    }
}

fn fmt_vars(vars: &VarSet) -> String {
    let items: Vec<String> = vars.iter().cloned().collect();
    fmt_list(&items)
}

fn header(fa: &FunctionAnalysis) -> String {
    format!("@{}\n", fa.name)
}

fn named_lists(fa: &FunctionAnalysis, sep: &str, rows: Vec<(String, Vec<String>)>) -> String {
    let mut out = header(fa);
    for (name, items) in rows {
        out.push_str(&format!("  {}{}{}\n", name, sep, fmt_list(&items)));
    }
    out
}

pub fn blocks(fa: &FunctionAnalysis) -> String {
    let mut out = header(fa);
    for block in fa.blocks.iter() {
        out.push_str(&format!("  {}:\n", block.name));
        for line in instrs_to_string(&block.to_instrs()).lines() {
            if !line.starts_with('.') {
                out.push_str(&format!("  {}\n", line));
            }
        }
    }
    out
}

pub fn cfg(fa: &FunctionAnalysis) -> String {
    named_lists(fa, " -> ", fa.cfg.successor_map())
}

pub fn liveness(fa: &FunctionAnalysis) -> String {
    in_out(fa, &fa.liveness.ins, &fa.liveness.outs)
}

pub fn defined(fa: &FunctionAnalysis) -> String {
    in_out(fa, &fa.defined.ins, &fa.defined.outs)
}

fn in_out(fa: &FunctionAnalysis, ins: &[VarSet], outs: &[VarSet]) -> String {
    let mut out = header(fa);
    for (id, name) in fa.cfg.names().iter().enumerate() {
        out.push_str(&format!("  {}:\n", name));
        out.push_str(&format!("    in:  {}\n", fmt_vars(&ins[id])));
        out.push_str(&format!("    out: {}\n", fmt_vars(&outs[id])));
    }
    out
}

pub fn doms(fa: &FunctionAnalysis) -> String {
    named_lists(fa, ": ", fa.dom_sets())
}

pub fn dom_tree(fa: &FunctionAnalysis) -> String {
    named_lists(fa, " -> ", fa.dom_children())
}

pub fn frontier(fa: &FunctionAnalysis) -> String {
    named_lists(fa, ": ", fa.frontiers())
}

pub fn counts(fa: &FunctionAnalysis) -> String {
    let mut out = header(fa);
    for (name, count) in fa.blocks.instr_counts() {
        out.push_str(&format!("  {}: {}\n", name, count));
    }
    out
}

/// Answers "does `a` dominate `b`?" for every function that has both blocks.
/// If none of them does, the lookup error of the first function is returned.
pub fn test_dom(funcs: &[&FunctionAnalysis], a: &str, b: &str) -> Result<String, CfgErr> {
    let has_both = |fa: &FunctionAnalysis| fa.blocks.id_of(a).is_some() && fa.blocks.id_of(b).is_some();

    let mut asked: Vec<&FunctionAnalysis> = funcs.iter().cloned().filter(|fa| has_both(*fa)).collect();
    if asked.is_empty() {
        asked = funcs.iter().cloned().take(1).collect();
    }

    let mut out = String::new();
    for fa in asked {
        let answer = fa.dominates(a, b)?;
        out.push_str(&format!("@{}: {} dominates {}: {}\n", fa.name, a, b, answer));
    }
    Ok(out)
}
