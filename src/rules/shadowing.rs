//! Reserved-identifier shadowing.
//!
//! Modules wildcard-import the shared base library, so any top-level name
//! that collides with one of its exports silently shadows it.

use std::collections::HashSet;

use crate::config;
use crate::parser::{ast, Module};
use crate::report::Report;

pub fn check_redeclarations(report: &mut Report, module: &Module) {
    let mut bound = HashSet::new();
    ast::find_globals(&module.body, &mut bound);

    let mut redeclared: Vec<&str> = bound
        .iter()
        .map(String::as_str)
        .filter(|name| config::is_reserved(name))
        .collect();
    redeclared.sort_unstable();

    if !redeclared.is_empty() {
        report.warning(format!(
            "Redeclared module_utils.basic variable or function: {}",
            redeclared.join(", ")
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    #[test]
    fn test_shadowing_warns() {
        let source = "def exit_json():\n    pass\n\njson = None\n";
        let module = parser::parse(source).unwrap();
        let mut r = Report::new("mod.py", "modules/mod.py");
        check_redeclarations(&mut r, &module);
        assert_eq!(
            r.warnings,
            vec!["Redeclared module_utils.basic variable or function: exit_json, json"]
        );
        assert!(r.errors.is_empty());
    }

    #[test]
    fn test_no_shadowing() {
        let module = parser::parse("def main():\n    pass\n").unwrap();
        let mut r = Report::new("mod.py", "modules/mod.py");
        check_redeclarations(&mut r, &module);
        assert!(r.warnings.is_empty());
    }
}
