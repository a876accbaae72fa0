//! Running the compiler for a resolved [`BuildPlan`].

use anyhow::{Context, Result};
use std::path::Path;
use std::process::{Command, ExitStatus};

use crate::plan::BuildPlan;

/// Captured result of one compiler run.
#[derive(Debug)]
pub struct CompileOutput {
    pub stdout: String,
    pub stderr: String,
    pub status: ExitStatus,
}

impl CompileOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

/// Compiler arguments: every source, then every extra argument, then `-o`.
pub fn arguments(plan: &BuildPlan) -> Vec<String> {
    let mut args = Vec::with_capacity(plan.sources.len() + plan.extra_args.len() + 2);
    args.extend(plan.sources.iter().cloned());
    args.extend(plan.extra_args.iter().cloned());
    args.push("-o".to_string());
    args.push(plan.output.clone());
    args
}

/// Human-readable command line, quoting arguments that contain whitespace.
pub fn command_line(plan: &BuildPlan) -> String {
    std::iter::once(plan.compiler.clone())
        .chain(arguments(plan))
        .map(|arg| {
            if arg.is_empty() || arg.chars().any(char::is_whitespace) {
                format!("'{}'", arg.replace('\'', "'\\''"))
            } else {
                arg
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run the plan's compiler in `root` and capture its output.
///
/// A compiler that runs and fails is not an error here; check
/// [`CompileOutput::success`].
pub fn invoke(plan: &BuildPlan, root: &Path) -> Result<CompileOutput> {
    let output = Command::new(&plan.compiler)
        .args(arguments(plan))
        .current_dir(root)
        .output()
        .with_context(|| format!("Failed to execute compiler '{}'", plan.compiler))?;

    Ok(CompileOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        status: output.status,
    })
}
