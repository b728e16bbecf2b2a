//! Artifact classification by path and blacklist membership.

use crate::config;
use std::path::Path;

/// Module kind decided once per artifact, before any content check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    Python,
    PowerShell,
}

/// Outcome of classifying a file path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Blacklisted: validation is skipped entirely, no report entries.
    Skip,
    Kind(ModuleKind),
    /// Extension not recognized. The validator records an error and then
    /// treats the artifact as python so the remaining checks still run.
    Unrecognized,
}

/// File name without its final extension.
pub fn stem(basename: &str) -> &str {
    match basename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => basename,
    }
}

pub fn classify(path: &Path) -> Classification {
    let basename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = stem(&basename);

    if config::is_blacklisted(&basename, stem) {
        return Classification::Skip;
    }

    match path.extension().and_then(|e| e.to_str()) {
        Some("py") => Classification::Kind(ModuleKind::Python),
        Some("ps1") => Classification::Kind(ModuleKind::PowerShell),
        _ => Classification::Unrecognized,
    }
}
