//! Per-artifact validation orchestration.
//!
//! A validator instance is built fresh for one artifact, runs every
//! applicable check into its own report, and is discarded. Failures are
//! scoped to the artifact; nothing here aborts the run.

use std::io;
use std::path::{Path, PathBuf};

use crate::classify::{self, Classification, ModuleKind};
use crate::docs;
use crate::parser::{self, Module};
use crate::registry::{FragmentResolver, Registry};
use crate::report::Report;
use crate::rules::{entrypoint, imports, shadowing, shell, text};
use crate::schema::{self, ParsedDoc};
use crate::version::{self, ReleaseLine};

/// Shared collaborators, established once before any validation begins.
pub struct ValidationContext<'a> {
    pub registry: &'a dyn Registry,
    pub resolver: &'a dyn FragmentResolver,
    pub release: ReleaseLine,
}

/// Validates a single module file.
pub struct ModuleValidator<'a> {
    path: PathBuf,
    basename: String,
    name: String,
    text: String,
    length: usize,
    ctx: &'a ValidationContext<'a>,
}

impl<'a> ModuleValidator<'a> {
    pub fn new<P: AsRef<Path>>(path: P, ctx: &'a ValidationContext<'a>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let basename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = classify::stem(&basename).to_string();
        let text = std::fs::read_to_string(&path)?;
        let length = text.lines().count();

        Ok(Self {
            path,
            basename,
            name,
            text,
            length,
            ctx,
        })
    }

    pub fn validate(&self) -> Report {
        let mut report = Report::new(&self.basename, self.path.to_string_lossy());

        let kind = match classify::classify(&self.path) {
            Classification::Skip => return report,
            Classification::Kind(kind) => kind,
            Classification::Unrecognized => {
                report.error(
                    "Official modules must have a .py extension for python modules \
                     or a .ps1 for powershell modules",
                );
                // Forced-classification override: keep checking as python so
                // further problems still surface.
                ModuleKind::Python
            }
        };

        let mut module: Option<Module> = None;
        if kind == ModuleKind::Python {
            match parser::parse(&self.text) {
                Ok(parsed) => module = Some(parsed),
                Err(failure) => {
                    report.error("Python SyntaxError while parsing module");
                    report.trace(failure.trace);
                }
            }
        }
        let just_docs = module.as_ref().map(Module::is_just_docs).unwrap_or(false);

        if kind == ModuleKind::Python {
            if let Some(module) = &module {
                self.validate_docs(&mut report, module);

                if !just_docs {
                    text::check_sys_exit(&mut report, &self.text);
                    imports::check_json_import(&mut report, module);
                    imports::check_requests_import(&mut report, module);
                    let main_lineno = entrypoint::find_main_call(&mut report, module, self.length);
                    imports::check_module_utils(&mut report, module, main_lineno, &self.basename);
                    imports::check_conditional_import_flags(&mut report, module);
                    text::check_tabs(&mut report, &self.text);
                    shadowing::check_redeclarations(&mut report, module);
                }
            }
        }

        if kind == ModuleKind::PowerShell {
            shell::check_ps_markers(&mut report, &self.text);
            shell::check_companion_doc_file(&mut report, &self.path, &self.basename);
        }

        // Text-level checks run regardless of parse outcome.
        text::check_license_header(&mut report, &self.text);
        if !just_docs {
            text::check_interpreter(&mut report, &self.text, kind);
        }

        report
    }

    fn validate_docs(&self, report: &mut Report, module: &Module) {
        let blocks = docs::extract(module);
        let is_new = !self.ctx.registry.has_plugin(&self.name);

        match &blocks.documentation {
            None => report.error("No DOCUMENTATION provided"),
            Some(block) => {
                match schema::parse_yaml_block(&block.text, block.lineno, "DOCUMENTATION", &self.name)
                {
                    Err(err) => {
                        report.error(err.message);
                        report.trace(err.trace);
                    }
                    Ok(value) => match ParsedDoc::from_value(value) {
                        None => report.error("DOCUMENTATION is not a mapping"),
                        Some(doc) => {
                            if let Some(fragment) = doc.extends_fragment() {
                                if !self.ctx.resolver.resolve(&fragment) {
                                    report.error(format!(
                                        "DOCUMENTATION fragment missing: {}",
                                        fragment
                                    ));
                                }
                            }

                            for violation in schema::validate_documentation(&doc) {
                                report.error(violation.to_error());
                            }
                            version::check_version_added(report, &doc, is_new, self.ctx.release);
                            version::check_new_options(
                                report,
                                &doc,
                                &self.name,
                                self.ctx.registry,
                                is_new,
                                self.ctx.release,
                            );
                        }
                    },
                }
            }
        }

        let has_examples = blocks
            .examples
            .as_ref()
            .map(|b| !b.text.is_empty())
            .unwrap_or(false);
        if !has_examples {
            report.error("No EXAMPLES provided");
        }

        match &blocks.returns {
            Some(block) if !block.text.is_empty() => {
                if let Err(err) =
                    schema::parse_yaml_block(&block.text, block.lineno, "RETURN", &self.name)
                {
                    report.error(err.message);
                    report.trace(err.trace);
                }
            }
            _ => {
                if is_new {
                    report.error("No RETURN documentation provided");
                } else {
                    report.warning("No RETURN provided");
                }
            }
        }
    }
}

/// Validates a package directory: it must carry an initializer file.
pub struct PackageValidator {
    path: PathBuf,
    basename: String,
}

impl PackageValidator {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let basename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, basename }
    }

    pub fn validate(&self) -> Report {
        let mut report = Report::new(&self.basename, self.path.to_string_lossy());
        if !self.path.join("__init__.py").exists() {
            report.error("Module subdirectories must contain an __init__.py");
        }
        report
    }
}
