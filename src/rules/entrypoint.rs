//! Entry-point invocation placement.
//!
//! The main() call may sit at top level or inside a top-level
//! `if __name__ == '__main__'` guard. It must exist and must be the last
//! statement of the file.

use crate::parser::{Expr, Module, Stmt};
use crate::report::Report;

/// Locate the main() call, recording placement errors. Returns its line
/// number (0 when absent) for the bottom-import proximity check.
pub fn find_main_call(report: &mut Report, module: &Module, file_length: usize) -> usize {
    let mut candidates: Vec<&Stmt> = module.body.iter().collect();
    for stmt in &module.body {
        if let Stmt::If { test: Expr::Compare { left }, body, .. } = stmt {
            if left.as_name() == Some("__name__") {
                candidates.extend(body.iter());
            }
        }
    }

    let mut lineno = 0;
    for stmt in candidates {
        if let Stmt::Expr { value: Expr::Call { func }, lineno: call_line } = stmt {
            if func.as_name() == Some("main") {
                lineno = *call_line;
                if lineno < file_length.saturating_sub(1) {
                    report.error("Call to main() not the last line");
                }
            }
        }
    }

    if lineno == 0 {
        report.error("Did not find a call to main");
    }
    lineno
}
