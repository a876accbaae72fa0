//! # cbuild CLI Entry Point
//!
//! Parses arguments with clap, resolves a build plan and runs the compiler
//! once.
//!
//! ## Exit codes
//!
//! - `0` build succeeded
//! - `1` compiler could not be started, or ran and failed
//! - `2` invalid command-line usage
//! - `3` `CBuildfile` error
//! - `4` filesystem error

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use std::time::Instant;

use cbuild::buildfile::BuildfileError;
use cbuild::compiler;
use cbuild::config;
use cbuild::plan::{self, CliInputs, ResolveError};
use cbuild::ui;

const COMPILE_ERROR: i32 = 1;
const USAGE_ERROR: i32 = 2;
const BUILDFILE_ERROR: i32 = 3;
const IO_ERROR: i32 = 4;

#[derive(Parser)]
#[command(name = "cbuild")]
#[command(about = "A simple C build system", version = env!("CARGO_PKG_VERSION"))]
#[command(
    after_help = "Note: if -b/--build and -c/--cbuild are omitted, then cbuild will search for a CBuildfile in the current directory"
)]
struct Cli {
    /// Paths of the C files to build
    #[arg(short = 'b', long = "build", num_args = 1..)]
    build: Vec<String>,
    /// Can be used instead of -b/--build to specify the CBuildfile
    #[arg(short = 'c', long = "cbuild")]
    cbuild: Option<String>,
    /// Output path of the compiled executable
    #[arg(short = 'o', long = "out")]
    out: Option<String>,
    /// Show the compiler invocation before running it
    #[arg(short = 'v', long)]
    invocation: bool,
    /// Show the resolved plan without running the compiler
    #[arg(long)]
    dry_run: bool,
    /// Print the resolved plan as JSON without running the compiler
    #[arg(long, conflicts_with = "dry_run")]
    json: bool,
    /// Print a shell completion script and exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn main() {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            ui::error(format!("{:#}", e));
            std::process::exit(exit_code(&e));
        }
    }
}

fn run(cli: &Cli) -> Result<i32> {
    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "cbuild", &mut std::io::stdout());
        return Ok(0);
    }

    let root = std::env::current_dir().context("Failed to read current directory")?;
    let inputs = CliInputs {
        sources: cli.build.clone(),
        buildfile: cli.cbuild.clone(),
        output: cli.out.clone(),
    };

    let plan = plan::resolve(&inputs, &root, &config::default_compiler())?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(0);
    }
    if cli.dry_run {
        ui::print_plan(&plan);
        return Ok(0);
    }
    if cli.invocation {
        ui::print_invocation(&plan);
    }

    let start = Instant::now();
    let output = compiler::invoke(&plan, &root)?;

    let stderr = output.stderr.trim();
    if !stderr.is_empty() {
        eprintln!("{}", stderr);
    }
    if !output.stdout.is_empty() {
        println!("{}", output.stdout);
    }

    if !output.success() {
        ui::error(format!("{} failed ({})", plan.compiler, output.status));
        return Ok(COMPILE_ERROR);
    }

    if !stderr.is_empty() {
        ui::warn("compiler reported warnings");
    }
    ui::success(format!(
        "Built {} in {:.2?}",
        plan.output,
        start.elapsed()
    ));
    Ok(0)
}

fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ResolveError>() {
        Some(ResolveError::Usage(_)) => USAGE_ERROR,
        Some(ResolveError::Buildfile(BuildfileError::Io(_))) | Some(ResolveError::Io(_)) => {
            IO_ERROR
        }
        Some(ResolveError::Buildfile(_)) => BUILDFILE_ERROR,
        None => COMPILE_ERROR,
    }
}
