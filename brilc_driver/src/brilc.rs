mod report;
mod timings;

use brilc_analysis::analyzer::{Analyzer, FunctionAnalysis};
use brilc_err::{
    decode_err::{DecodeErr, DecodeErrTy},
    err::BrilErr,
};
use brilc_ir::{decode, program::Program};
use brilc_opt::{config::OptConfig, optimizer::Optimizer};
use clap::Parser;
use std::{fs::File, io, process, time::Instant};
use timings::Timings;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "brilc", version = "0.1.0")]
#[command(about = "Block, CFG, dataflow and dominance analysis for Bril programs")]
pub struct BrilcOpts {
    /// Bril JSON program to read. Reads stdin when absent.
    #[arg(long)]
    file: Option<String>,

    /// Only report on the function with this name
    #[arg(long)]
    func: Option<String>,

    /// Print the basic blocks of each function
    #[arg(long)]
    blocks: bool,

    /// Print the successors of each block
    #[arg(long)]
    cfg: bool,

    /// Print live variables on entry to and exit from each block
    #[arg(long)]
    live: bool,

    /// Print variables possibly defined on entry to and exit from each block
    #[arg(long)]
    defined: bool,

    /// Print the dominator set of each block
    #[arg(long)]
    doms: bool,

    /// Print the children of each block in the dominator tree
    #[arg(long)]
    dom_tree: bool,

    /// Print the dominance frontier of each block
    #[arg(long)]
    dom_frontier: bool,

    /// Answer whether block A dominates block B
    #[arg(long, num_args = 2, value_names = ["A", "B"])]
    test_dom: Option<Vec<String>>,

    /// Print the number of instructions in each block
    #[arg(long)]
    count: bool,

    /// Run dead-code elimination and print the resulting program as JSON
    #[arg(long)]
    dce: bool,

    /// Run local value numbering and print the resulting program as JSON
    #[arg(long)]
    lvn: bool,

    /// Print how long each phase took
    #[arg(long)]
    timings: bool,

    /// Log everything the passes do to stderr
    #[arg(long)]
    trace: bool,
}

impl BrilcOpts {
    fn wants_analysis(&self) -> bool {
        self.blocks
            || self.cfg
            || self.live
            || self.defined
            || self.doms
            || self.dom_tree
            || self.dom_frontier
            || self.test_dom.is_some()
            || self.count
    }
}

fn main() {
    let opts = BrilcOpts::parse();
    init_tracing(opts.trace);

    let total_start = Instant::now();
    let mut timings = Timings::default();

    let start = Instant::now();
    let program = match read_program(&opts) {
        Ok(program) => program,
        Err(e) => exit_with(&e),
    };
    timings.decode_time = start.elapsed();

    if opts.wants_analysis() {
        let start = Instant::now();
        analyze(&opts, program.clone());
        timings.analysis_time = start.elapsed();
    }

    if opts.dce || opts.lvn {
        let start = Instant::now();
        optimize(&opts, &program);
        timings.optimize_time = start.elapsed();
    }

    if !opts.wants_analysis() && !opts.dce && !opts.lvn {
        print!("{}", program);
    }

    timings.total_time = total_start.elapsed();
    if opts.timings {
        timings.emit();
    }
}

/// `BRILC_LOG` takes precedence. Otherwise only warnings are shown, or
/// everything when `--trace` is given.
fn init_tracing(trace: bool) {
    let default = if trace { "trace" } else { "warn" };
    let filter = EnvFilter::try_from_env("BRILC_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn exit_with(err: &dyn BrilErr) -> ! {
    err.emit();
    eprintln!("brilc: exiting due to errors");
    process::exit(1);
}

fn read_program(opts: &BrilcOpts) -> Result<Program, DecodeErr> {
    match &opts.file {
        Some(path) => {
            let infile = File::open(path).map_err(|e| {
                DecodeErr::new(DecodeErrTy::Io {
                    path: path.clone(),
                    reason: e.to_string(),
                })
            })?;
            decode::from_reader(io::BufReader::new(infile))
        }
        None => decode::from_reader(io::stdin().lock()),
    }
}

fn selected<'a>(opts: &BrilcOpts, analyses: &'a [FunctionAnalysis]) -> Vec<&'a FunctionAnalysis> {
    analyses
        .iter()
        .filter(|fa| match &opts.func {
            Some(name) => &fa.name == name,
            None => true,
        })
        .collect()
}

fn analyze(opts: &BrilcOpts, program: Program) {
    let analyses = match Analyzer::new(program).perform() {
        Ok(analyses) => analyses,
        Err(e) => exit_with(&e),
    };

    let chosen = selected(opts, &analyses);
    for &fa in &chosen {
        if opts.blocks {
            print!("{}", report::blocks(fa));
        }
        if opts.cfg {
            print!("{}", report::cfg(fa));
        }
        if opts.live {
            print!("{}", report::liveness(fa));
        }
        if opts.defined {
            print!("{}", report::defined(fa));
        }
        if opts.doms {
            print!("{}", report::doms(fa));
        }
        if opts.dom_tree {
            print!("{}", report::dom_tree(fa));
        }
        if opts.dom_frontier {
            print!("{}", report::frontier(fa));
        }
        if opts.count {
            print!("{}", report::counts(fa));
        }
    }

    if let Some(pair) = &opts.test_dom {
        match report::test_dom(&chosen, &pair[0], &pair[1]) {
            Ok(text) => print!("{}", text),
            Err(e) => exit_with(&e),
        }
    }
}

fn optimize(opts: &BrilcOpts, program: &Program) {
    let config = OptConfig {
        dce: opts.dce,
        lvn: opts.lvn,
    };

    let result = match Optimizer::new(config).run_passes(program) {
        Ok(result) => result,
        Err(e) => exit_with(&e),
    };
    info!(
        removed = result.removed,
        rewritten = result.rewritten,
        "optimization finished"
    );

    match decode::to_string(&result.program) {
        Ok(json) => println!("{}", json),
        Err(e) => exit_with(&e),
    }
}
