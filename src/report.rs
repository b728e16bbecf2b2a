//! Per-artifact validation results and output formatting.
//!
//! Three severities: errors drive the exit status, warnings are advisory and
//! printed only on request, traces carry raw diagnostic detail (parse or
//! YAML failures) and never affect pass/fail.

use colored::*;
use serde::Serialize;

const DELIMITER_WIDTH: usize = 76;

/// Accumulated results for a single validated artifact.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub object_name: String,
    pub object_path: String,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub traces: Vec<String>,
}

impl Report {
    pub fn new(object_name: impl Into<String>, object_path: impl Into<String>) -> Self {
        Self {
            object_name: object_name.into(),
            object_path: object_path.into(),
            ..Self::default()
        }
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn trace(&mut self, detail: impl Into<String>) {
        self.traces.push(detail.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Contribution to the process exit status: 1 if the artifact has any
    /// error, else 0. Warnings never contribute.
    pub fn exit_contribution(&self) -> i32 {
        i32::from(self.has_errors())
    }

    /// Print the report in the pretty text format.
    ///
    /// The header block is emitted only when there is something to show;
    /// traces are always printed when present.
    pub fn print(&self, show_warnings: bool) {
        let has_output = self.has_errors() || (show_warnings && !self.warnings.is_empty());

        if has_output {
            println!("{}", "=".repeat(DELIMITER_WIDTH));
            println!("{}", self.object_path);
            println!("{}", "=".repeat(DELIMITER_WIDTH));
        }

        for trace in &self.traces {
            println!("{}", "TRACE:".cyan());
            for line in trace.lines() {
                println!("    {}", line);
            }
        }
        for error in &self.errors {
            println!("{}: {}", "ERROR".red(), error);
        }
        if show_warnings {
            for warning in &self.warnings {
                println!("{}: {}", "WARNING".yellow(), warning);
            }
        }

        if has_output {
            println!();
        }
    }
}

/// Write all reports as a JSON array on stdout.
pub fn write_json(reports: &[Report]) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    serde_json::to_writer_pretty(stdout.lock(), reports)?;
    println!();
    Ok(())
}
