//! Raw-text checks: interpreter line, direct exit calls, license header,
//! and tab indentation. These run even when the module failed to parse.

use crate::classify::ModuleKind;
use crate::config;
use crate::report::Report;

pub fn check_interpreter(report: &mut Report, text: &str, kind: ModuleKind) {
    match kind {
        ModuleKind::PowerShell => {
            if !text.starts_with(config::POWERSHELL_INTERPRETER) {
                report.error("Interpreter line is not \"#!powershell\"");
            }
        }
        ModuleKind::Python => {
            if !text.starts_with(config::PYTHON_INTERPRETER) {
                report.error("Interpreter line is not \"#!/usr/bin/python\"");
            }
        }
    }
}

/// Modules must exit through the framework, not the interpreter.
pub fn check_sys_exit(report: &mut Report, text: &str) {
    if text.contains("sys.exit(") {
        report.error("sys.exit() call found. Should be exit_json/fail_json");
    }
}

pub fn check_license_header(report: &mut Report, text: &str) {
    if !text.contains("GNU General Public License") && !text.contains("version 3") {
        report.error("GPLv3 license header not found");
    }
}

/// Indentation must be spaces; any literal tab is reported with its line
/// and the column index of the first tab on that line.
pub fn check_tabs(report: &mut Report, text: &str) {
    for (line_no, line) in text.lines().enumerate() {
        if let Some(index) = line.find('\t') {
            report.error(format!(
                "indentation contains tabs. line {} column {}",
                line_no + 1,
                index
            ));
        }
    }
}
