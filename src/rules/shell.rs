//! Powershell-kind checks: required framework markers and the companion
//! python documentation file.

use std::path::Path;

use crate::config;
use crate::report::Report;

/// Both the JSON opt-in marker and the Windows replacer token must appear
/// in the module text.
pub fn check_ps_markers(report: &mut Report, text: &str) {
    if !text.contains(config::WANT_JSON_MARKER) {
        report.error("WANT_JSON not found in module");
    }
    if !text.contains(config::REPLACER_WINDOWS) {
        report.error(format!("\"{}\" not found in module", config::REPLACER_WINDOWS));
    }
}

/// A powershell module carries its documentation in a sibling `.py` file.
pub fn check_companion_doc_file(report: &mut Report, path: &Path, basename: &str) {
    if config::PS_DOC_EXEMPT.contains(&basename) {
        return;
    }
    if !path.with_extension("py").is_file() {
        report.error("Missing python documentation file");
    }
}
