use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use iou_sort::harness::first_row_mismatch;
use iou_sort::prelude::*;
use std::path::PathBuf;
use tracing_subscriber::fmt::SubscriberBuilder;

mod case;
mod provenance;

use case::{count_histogram, index_table, write_table, CaseFile};
use provenance::{write_sidecar, Payload};

#[derive(Parser)]
#[command(name = "iou-sort-cli")]
#[command(about = "Harness runner for rotated-box vertex sorting")]
struct Cmd {
    /// Warn about truncated rows and num_valid/mask disagreements
    #[arg(long, global = true)]
    diagnostics: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Write a synthetic case file
    Gen {
        #[arg(long, default_value_t = 1024)]
        instances: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Smallest valid-vertex count per instance
        #[arg(long, default_value_t = 0)]
        min: usize,
        /// Largest valid-vertex count per instance (above 8 exercises truncation)
        #[arg(long, default_value_t = 8)]
        max: usize,
        /// Store reference rows as golden output
        #[arg(long)]
        golden: bool,
        #[arg(long)]
        out: PathBuf,
    },
    /// Sort a case file and write the index table (.csv or .parquet)
    Run {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Compare parallel vs reference, and against golden rows when present
    Check {
        #[arg(long)]
        input: PathBuf,
        /// Case file whose stored rows replace the input's own
        #[arg(long)]
        golden: Option<PathBuf>,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    let kernel = SortVerticesKernel::new(SortCfg {
        diagnostics: cmd.diagnostics,
        ..SortCfg::default()
    });
    match cmd.action {
        Action::Gen {
            instances,
            seed,
            min,
            max,
            golden,
            out,
        } => gen(&kernel, instances, seed, min, max, golden, out),
        Action::Run { input, out } => run(&kernel, input, out),
        Action::Check { input, golden } => check(&kernel, input, golden),
        Action::Report => report(),
    }
}

fn gen(
    kernel: &SortVerticesKernel,
    instances: usize,
    seed: u64,
    min: usize,
    max: usize,
    golden: bool,
    out: PathBuf,
) -> Result<()> {
    tracing::info!(instances, seed, min, max, golden, out = %out.display(), "gen");
    let cfg = CandidateCfg {
        vertex_count: VertexCount::Uniform { min, max },
        ..CandidateCfg::default()
    };
    let mut case = CaseFile::from_rows(draw_rows(cfg, seed, instances));
    if golden {
        let reference = kernel.reference_compute(&case.to_input())?;
        case.expected = reference.idx.as_i32().map(<[i32]>::to_vec);
    }
    case.write(&out)
}

fn run(kernel: &SortVerticesKernel, input: PathBuf, out: PathBuf) -> Result<()> {
    tracing::info!(input = %input.display(), out = %out.display(), "run");
    let case = CaseFile::read(&input)?;
    let inputs = case.to_input();
    let sorted = kernel.compute(&inputs)?;
    let idx = sorted.idx.as_i32().unwrap_or_default();
    let mut df = index_table(idx)?;
    tracing::info!(
        rows = df.height(),
        degenerate = sorted.diagnostics.degenerate.len(),
        over_capacity = sorted.diagnostics.over_capacity.len(),
        "sorted"
    );
    tracing::info!("count histogram\n{}", count_histogram(&df)?);
    write_table(&mut df, &out)?;

    let payload = Payload {
        kernel: kernel.name(),
        params: serde_json::json!({
            "input": input.display().to_string(),
            "instances": inputs.instances(),
            "theory_ops": kernel.theory_ops(&inputs),
            "eps": kernel.cfg.eps,
        }),
    };
    write_sidecar(&out, &payload)?;
    Ok(())
}

fn check(kernel: &SortVerticesKernel, input: PathBuf, golden: Option<PathBuf>) -> Result<()> {
    tracing::info!(input = %input.display(), "check");
    let case = CaseFile::read(&input)?;
    let expected = match &golden {
        Some(path) => match CaseFile::read(path)?.expected {
            Some(rows) => Some(rows),
            None => bail!("{} holds no golden rows", path.display()),
        },
        None => case.expected.clone(),
    };
    let inputs = case.to_input();
    let (report, got) = run_case(kernel, &inputs)?;
    if let Some(i) = report.first_mismatch {
        bail!("parallel and reference outputs differ at instance {i}");
    }
    if let Some(expected) = &expected {
        compare_golden(&got, expected)?;
        tracing::info!(instances = inputs.instances(), "golden_match");
    }
    let summary = serde_json::json!({
        "kernel": report.kernel,
        "instances": inputs.instances(),
        "theory_ops": report.theory_ops,
        "agrees": report.agrees(),
        "golden": expected.is_some(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn compare_golden(got: &SortVerticesOutput, expected: &[i32]) -> Result<()> {
    let idx = got.idx.as_i32().unwrap_or_default();
    if expected.len() != idx.len() {
        bail!(
            "golden rows cover {} values, expected {}",
            expected.len(),
            idx.len()
        );
    }
    if let Some(i) = first_row_mismatch(idx, expected) {
        bail!("output differs from golden rows at instance {i}");
    }
    Ok(())
}

fn report() -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": provenance::current_git_rev(),
        "lib_version": iou_sort::VERSION,
        "kernel": SortVerticesKernel::default().name(),
        "constants": {
            "num_candidates": NUM_CANDIDATES,
            "max_num_vert_idx": MAX_NUM_VERT_IDX,
            "intersection_offset": INTERSECTION_OFFSET,
            "epsilon": EPSILON,
        },
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
