//! Terminal output.
//!
//! Status lines use a one-character colored marker (`x` errors, `!`
//! warnings, `✓` success). [`print_plan`] renders a resolved plan as a
//! two-column box table sized to the terminal.

use colored::*;

use crate::compiler;
use crate::plan::{BuildPlan, SourceOrigin};

pub fn error(msg: impl std::fmt::Display) {
    eprintln!("{} {}", "x".red(), msg);
}

pub fn warn(msg: impl std::fmt::Display) {
    eprintln!("{} {}", "!".yellow(), msg);
}

pub fn success(msg: impl std::fmt::Display) {
    println!("{} {}", "✓".green(), msg);
}

/// Key/value table with box-drawing borders.
pub struct Table {
    rows: Vec<(String, String)>,
}

impl Table {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, key: &str, value: impl Into<String>) {
        self.rows.push((key.to_string(), sanitize(&value.into())));
    }

    /// Column widths, shrinking the value column to fit `max_width`.
    fn widths(&self, max_width: usize) -> (usize, usize) {
        let key_w = self
            .rows
            .iter()
            .map(|(k, _)| k.chars().count())
            .max()
            .unwrap_or(0);
        let val_w = self
            .rows
            .iter()
            .map(|(_, v)| v.chars().count())
            .max()
            .unwrap_or(0);

        // "  │ " + key + " │ " + value + " │"
        let overhead = 2 + 2 + 3 + 2;
        let available = max_width.saturating_sub(overhead + key_w).max(8);
        (key_w, val_w.min(available))
    }

    fn render(&self, max_width: usize) -> Vec<String> {
        let (key_w, val_w) = self.widths(max_width);
        let border = |left: &str, mid: &str, right: &str| {
            format!(
                "  {}{}{}{}{}",
                left,
                "─".repeat(key_w + 2),
                mid,
                "─".repeat(val_w + 2),
                right
            )
        };

        let mut lines = vec![border("┌", "┬", "┐")];
        for (i, (key, value)) in self.rows.iter().enumerate() {
            if i > 0 {
                lines.push(border("├", "┼", "┤"));
            }
            let value = console::truncate_str(value, val_w, "...");
            lines.push(format!(
                "  │ {:<key_w$} │ {:<val_w$} │",
                key,
                value,
                key_w = key_w,
                val_w = val_w
            ));
        }
        lines.push(border("└", "┴", "┘"));
        lines
    }

    pub fn print(&self) {
        if self.rows.is_empty() {
            return;
        }
        let (_, term_width) = console::Term::stdout().size();
        for line in self.render(term_width as usize) {
            println!("{}", line);
        }
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

fn sanitize(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            _ => c,
        })
        .collect()
}

fn plan_table(plan: &BuildPlan) -> Table {
    let mut table = Table::new();
    let origin = match &plan.origin {
        SourceOrigin::CommandLine => "command line".to_string(),
        SourceOrigin::Buildfile(path) => path.display().to_string(),
    };
    table.add_row("From", origin);
    table.add_row("Compiler", plan.compiler.as_str());
    table.add_row("Sources", plan.sources.join(" "));
    if !plan.extra_args.is_empty() {
        table.add_row("Arguments", plan.extra_args.join(" "));
    }
    table.add_row("Output", plan.output.as_str());
    table
}

/// Print the plan and the command it would run.
pub fn print_plan(plan: &BuildPlan) {
    plan_table(plan).print();
    println!("  {} {}", "$".dimmed(), compiler::command_line(plan).cyan());
}

/// Echo the command about to run.
pub fn print_invocation(plan: &BuildPlan) {
    println!("   {} {}", "▶".cyan(), compiler::command_line(plan));
}
