//! Command-line interface: argument parsing, directory traversal, and exit
//! status aggregation.
//!
//! Validation itself lives in `validator`; this layer only decides which
//! artifacts to visit and sums their exit contributions.

use clap::{Parser, ValueEnum};
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config;
use crate::registry::{
    AllowAllFragments, DirFragmentResolver, DirRegistry, EmptyRegistry, FragmentResolver, Registry,
};
use crate::report::{self, Report};
use crate::validator::{ModuleValidator, PackageValidator, ValidationContext};
use crate::version::ReleaseLine;

/// Exit code for usage or I/O errors, distinct from validation failures.
pub const EXIT_ERROR: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
}

/// Static validator for plugin collection modules.
///
/// Checks structure, documentation blocks, and version tags of every module
/// under the given path. The exit status is the number of artifacts with at
/// least one error.
#[derive(Parser)]
#[command(name = "modcheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a module or module directory
    pub modules: PathBuf,

    /// Show warnings
    #[arg(short = 'w', long)]
    pub warnings: bool,

    /// RegEx exclusion pattern
    #[arg(long, value_parser = parse_regex)]
    pub exclude: Option<Regex>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
    pub format: OutputFormat,

    /// Directory containing the previously released collection
    #[arg(long)]
    pub published: Option<PathBuf>,

    /// Directory containing documentation fragments
    #[arg(long)]
    pub fragments: Option<PathBuf>,

    /// Release line new modules and options must be tagged with
    #[arg(long, default_value = config::DEFAULT_RELEASE)]
    pub release: ReleaseLine,
}

fn parse_regex(value: &str) -> Result<Regex, String> {
    Regex::new(value).map_err(|e| e.to_string())
}

fn fragment_resolver(fragments: &Option<PathBuf>) -> Box<dyn FragmentResolver> {
    match fragments {
        Some(dir) => Box::new(DirFragmentResolver::new(dir)),
        None => Box::new(AllowAllFragments),
    }
}

fn excluded(exclude: &Option<Regex>, path: &Path) -> bool {
    match exclude {
        Some(pattern) => pattern.is_match(&path.to_string_lossy()),
        None => false,
    }
}

fn validate_file(path: &Path, ctx: &ValidationContext) -> Report {
    match ModuleValidator::new(path, ctx) {
        Ok(validator) => validator.validate(),
        Err(err) => {
            let basename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let mut report = Report::new(basename, path.to_string_lossy());
            report.error(format!("unable to read module: {}", err));
            report
        }
    }
}

/// Run validation over the configured path. Returns the exit status: the
/// sum over all artifacts of 1 if the artifact has errors, else 0.
pub fn run(cli: &Cli) -> anyhow::Result<i32> {
    let resolver = fragment_resolver(&cli.fragments);
    let registry: Box<dyn Registry> = match &cli.published {
        Some(dir) => Box::new(DirRegistry::new(dir, fragment_resolver(&cli.fragments))),
        None => Box::new(EmptyRegistry),
    };
    let ctx = ValidationContext {
        registry: registry.as_ref(),
        resolver: resolver.as_ref(),
        release: cli.release,
    };

    let root = &cli.modules;
    let mut reports = Vec::new();

    if root.is_file() {
        if excluded(&cli.exclude, root) {
            return Ok(0);
        }
        reports.push(validate_file(root, &ctx));
    } else {
        for entry in WalkDir::new(root).into_iter().filter_entry(|entry| {
            // Prune any blacklisted top-level subtree.
            !(entry.depth() == 1
                && entry.file_type().is_dir()
                && config::is_blacklisted_dir(&entry.file_name().to_string_lossy()))
        }) {
            let entry = entry?;
            if entry.depth() == 0 {
                continue;
            }
            let path = entry.path();
            if excluded(&cli.exclude, path) {
                continue;
            }

            if entry.file_type().is_dir() {
                reports.push(PackageValidator::new(path).validate());
            } else if entry.file_type().is_file() {
                reports.push(validate_file(path, &ctx));
            }
        }
    }

    match cli.format {
        OutputFormat::Json => report::write_json(&reports)?,
        OutputFormat::Pretty => {
            for report in &reports {
                report.print(cli.warnings);
            }
        }
    }

    Ok(reports.iter().map(Report::exit_contribution).sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    fn cli_for(path: &Path) -> Cli {
        Cli::parse_from(["modcheck", &path.to_string_lossy()])
    }

    #[test]
    fn test_single_clean_docs_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("mod.py");
        fs::write(
            &path,
            "\
# GNU General Public License v3
DOCUMENTATION = '''
module: mod
short_description: s
description: d
version_added: '2.3'
'''
EXAMPLES = '''
- mod:
'''
RETURN = '''
x:
    description: y
'''
",
        )
        .unwrap();

        let status = run(&cli_for(&path)).unwrap();
        assert_eq!(status, 0);
    }

    #[test]
    fn test_exclude_removes_file_entirely() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.py");
        fs::write(&path, "def broken(:\n").unwrap();

        let mut cli = cli_for(&path);
        cli.exclude = Some(Regex::new("broken").unwrap());
        assert_eq!(run(&cli).unwrap(), 0);

        let cli = cli_for(&path);
        assert_eq!(run(&cli).unwrap(), 1);
    }

    #[test]
    fn test_directory_walk_skips_blacklisted_subtree() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("test")).unwrap();
        // Would fail validation were it visited.
        fs::write(temp.path().join("test/mod.py"), "def broken(:\n").unwrap();

        let status = run(&cli_for(temp.path())).unwrap();
        assert_eq!(status, 0);
    }

    #[test]
    fn test_directory_walk_counts_failing_artifacts_once() {
        let temp = TempDir::new().unwrap();
        // Two files, each with several errors; a package dir missing its
        // initializer adds one more failing artifact.
        fs::write(temp.path().join("a.py"), "x = 1\n").unwrap();
        fs::write(temp.path().join("b.py"), "y = 2\n").unwrap();
        fs::create_dir(temp.path().join("cloud")).unwrap();

        let status = run(&cli_for(temp.path())).unwrap();
        assert_eq!(status, 3);
    }

    #[test]
    fn test_nested_test_dir_is_not_pruned() {
        // Only the top-level segment is blacklisted.
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("cloud/test")).unwrap();
        fs::write(temp.path().join("cloud/__init__.py"), "").unwrap();
        fs::write(temp.path().join("cloud/test/__init__.py"), "").unwrap();
        fs::write(temp.path().join("cloud/test/mod.py"), "x = 1\n").unwrap();

        let status = run(&cli_for(temp.path())).unwrap();
        // cloud/test/mod.py is visited and fails.
        assert_eq!(status, 1);
    }
}
