//! Import conventions: forbidden libraries, the module_utils wildcard
//! requirement, bottom-import proximity, and the HAS_ flag convention for
//! optional imports.

use crate::config;
use crate::parser::{Module, Stmt};
use crate::report::Report;

/// `json` is already provided by the shared base library.
pub fn check_json_import(report: &mut Report, module: &Module) {
    for stmt in &module.body {
        if let Stmt::Import { names, .. } = stmt {
            for alias in names {
                if alias.name == "json" {
                    report.warning(
                        "JSON import found, already provided by plugins.module_utils.basic",
                    );
                }
            }
        }
    }
}

/// HTTP must go through the shared urls helpers, whether the import is
/// unconditional or wrapped in a try/except.
pub fn check_requests_import(report: &mut Report, module: &Module) {
    for stmt in &module.body {
        match stmt {
            Stmt::Import { names, .. } => flag_requests(report, names),
            Stmt::Try { body, handlers, .. } => {
                for inner in body.iter().chain(handlers.iter()) {
                    if let Stmt::Import { names, .. } = inner {
                        flag_requests(report, names);
                    }
                }
            }
            _ => {}
        }
    }
}

fn flag_requests(report: &mut Report, names: &[crate::parser::Alias]) {
    for alias in names {
        if alias.name == "requests" {
            report.error("requests import found, should use plugins.module_utils.urls instead");
        }
    }
}

/// Every module must wildcard-import from the module_utils family, and the
/// privileged bottom imports must sit within a fixed distance of main().
pub fn check_module_utils(report: &mut Report, module: &Module, main_lineno: usize, basename: &str) {
    let exempt = config::BOTTOM_IMPORT_EXEMPT.contains(&basename);
    let mut found_any = false;

    for stmt in &module.body {
        let (module_name, names, lineno) = match stmt {
            Stmt::ImportFrom { module, names, lineno } => (module, names, *lineno),
            _ => continue,
        };
        if !module_name.starts_with(config::MODULE_UTILS_PREFIX) {
            continue;
        }
        found_any = true;

        if config::BOTTOM_IMPORTS.contains(&module_name.as_str())
            && lineno + config::MAIN_PROXIMITY < main_lineno
            && !exempt
        {
            report.error(format!("{} import not near call to main()", module_name));
        }

        if names.is_empty() {
            report.error(format!("{}: not a \"from\" import", module_name));
            continue;
        }
        for alias in names {
            if alias.asname.is_some() || alias.name != "*" {
                report.error(format!("{}: did not import \"*\"", module_name));
            }
        }
    }

    if !found_any {
        report.error("Did not find a module_utils import");
    }
}

/// A try/except that imports something should record availability in a
/// HAS_-prefixed flag. Advisory only.
pub fn check_conditional_import_flags(report: &mut Report, module: &Module) {
    for stmt in &module.body {
        let (body, handlers) = match stmt {
            Stmt::Try { body, handlers, .. } => (body, handlers),
            _ => continue,
        };

        let mut found_import = false;
        let mut found_has = false;
        for inner in body.iter().chain(handlers.iter()) {
            match inner {
                Stmt::Import { .. } | Stmt::ImportFrom { .. } => found_import = true,
                Stmt::Assign { targets, .. } => {
                    if targets.iter().any(|t| t.to_lowercase().starts_with("has_")) {
                        found_has = true;
                    }
                }
                _ => {}
            }
        }

        if found_import && !found_has {
            report.warning("Found try/except block without HAS_ assignment");
        }
    }
}
