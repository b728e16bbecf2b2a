//! Process-wide validation conventions.
//!
//! Everything here is read-only configuration established before any
//! artifact is validated: blacklists, required markers, the module_utils
//! namespace, and the set of names exported by the shared base library.

use globset::{Glob, GlobSet, GlobSetBuilder};
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Expected interpreter line for python modules (prefix match).
pub const PYTHON_INTERPRETER: &str = "#!/usr/bin/python";

/// Expected interpreter line for powershell modules.
pub const POWERSHELL_INTERPRETER: &str = "#!powershell\n";

/// Namespace family every module must wildcard-import from.
pub const MODULE_UTILS_PREFIX: &str = "plugins.module_utils.";

/// Opt-in marker required in powershell modules.
pub const WANT_JSON_MARKER: &str = "WANT_JSON";

/// Replacer token the framework substitutes into powershell modules.
pub const REPLACER_WINDOWS: &str = "# POWERSHELL_COMMON";

/// Maximum line distance between a bottom import and the main() call.
pub const MAIN_PROXIMITY: usize = 10;

/// Release line new modules and options must be tagged with.
pub const DEFAULT_RELEASE: &str = "2.3";

/// Directory names skipped entirely during traversal.
pub static BLACKLIST_DIRS: &[&str] = &[".git", "test", ".github"];

/// Module names excluded from validation (wrappers and bootstrap shims
/// that intentionally break the conventions).
static BLACKLIST_MODULES: &[&str] = &["async_wrapper", "async_status", "accelerate", "fireball"];

/// Exact file names excluded from validation.
static BLACKLIST_FILES: &[&str] = &[
    ".git",
    ".gitignore",
    ".travis.yml",
    ".gitattributes",
    ".gitmodules",
    "COPYING",
    "__init__.py",
    "VERSION",
    "test-docs.sh",
];

/// Glob patterns excluded from validation.
static BLACKLIST_PATTERNS: &[&str] = &[".git*", "*.pyc", "*.pyo", ".*", "*.md", "*.txt"];

/// module_utils submodules that must be imported near the main() call.
pub static BOTTOM_IMPORTS: &[&str] = &[
    "plugins.module_utils.basic",
    "plugins.module_utils.urls",
    "plugins.module_utils.facts",
    "plugins.module_utils.splitter",
    "plugins.module_utils.known_hosts",
    "plugins.module_utils.rax",
];

/// Modules exempt from the bottom-import proximity rule.
pub static BOTTOM_IMPORT_EXEMPT: &[&str] = &["command.py"];

/// Powershell modules exempt from the companion documentation file rule.
pub static PS_DOC_EXEMPT: &[&str] = &["slurp.ps1", "setup.ps1"];

/// Names exported by plugins.module_utils.basic. Redeclaring any of these
/// at module top level shadows the wildcard import.
pub static RESERVED_NAMES: &[&str] = &[
    "BaseModule",
    "BOOLEANS",
    "BOOLEANS_FALSE",
    "BOOLEANS_TRUE",
    "exit_json",
    "fail_json",
    "get_exception",
    "get_platform",
    "get_distribution",
    "heuristic_log_sanitize",
    "is_executable",
    "json",
    "journal",
    "load_platform_subclass",
    "os",
    "re",
    "run_command",
    "shlex",
    "sys",
    "syslog",
    "types",
];

static BLACKLIST_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    BLACKLIST_FILES
        .iter()
        .chain(BLACKLIST_MODULES.iter())
        .copied()
        .collect()
});

static BLACKLIST_GLOBS: Lazy<GlobSet> = Lazy::new(|| {
    let mut builder = GlobSetBuilder::new();
    for pattern in BLACKLIST_PATTERNS {
        // Static patterns, validated by the tests below.
        if let Ok(glob) = Glob::new(pattern) {
            builder.add(glob);
        }
    }
    builder.build().unwrap_or_else(|_| GlobSet::empty())
});

static RESERVED_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| RESERVED_NAMES.iter().copied().collect());

/// Whether a file is excluded from validation by name, stem, or pattern.
pub fn is_blacklisted(basename: &str, stem: &str) -> bool {
    BLACKLIST_SET.contains(basename)
        || BLACKLIST_SET.contains(stem)
        || BLACKLIST_GLOBS.is_match(basename)
}

/// Whether a directory name prunes the traversal.
pub fn is_blacklisted_dir(name: &str) -> bool {
    BLACKLIST_DIRS.contains(&name)
}

/// Whether a top-level name shadows a base-library export.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_SET.contains(name)
}
