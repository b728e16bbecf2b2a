//! Cross-version compatibility policy.
//!
//! New modules must carry a version tag matching the current release line;
//! modules that already exist in the published collection are diffed
//! against their previous documentation and every newly added option is
//! held to the same rule.

use std::fmt;
use std::str::FromStr;

use crate::registry::{Registry, RegistryError};
use crate::report::Report;
use crate::schema::ParsedDoc;

/// A release line such as `2.3`. Version tags in documentation may carry a
/// patch component (`2.3.0`); only the first two components are significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReleaseLine {
    pub major: u32,
    pub minor: u32,
}

impl ReleaseLine {
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl FromStr for ReleaseLine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() < 2 || parts.len() > 3 {
            return Err(format!("not a valid version number: {:?}", s));
        }
        let mut components = Vec::with_capacity(parts.len());
        for part in &parts {
            let n: u32 = part
                .parse()
                .map_err(|_| format!("not a valid version number: {:?}", s))?;
            components.push(n);
        }
        Ok(ReleaseLine::new(components[0], components[1]))
    }
}

impl fmt::Display for ReleaseLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

const DEFAULT_VERSION_ADDED: &str = "0.0";

/// New modules must be tagged with the current release line.
pub fn check_version_added(report: &mut Report, doc: &ParsedDoc, is_new: bool, release: ReleaseLine) {
    if !is_new {
        return;
    }

    let raw = doc
        .version_added()
        .unwrap_or_else(|| DEFAULT_VERSION_ADDED.to_string());
    match raw.parse::<ReleaseLine>() {
        Err(_) => {
            report.error(format!("version_added is not a valid version number: {:?}", raw));
        }
        Ok(version) => {
            if version != release {
                report.error(format!(
                    "version_added should be {}. Currently {}",
                    release, version
                ));
            }
        }
    }
}

/// Diff the options of an existing module against its previously published
/// documentation; every newly added option must be tagged with the current
/// release line.
///
/// Exception: when the previous document's own version tag already equals
/// the current release, new options inherit that baseline and are not
/// checked individually.
pub fn check_new_options(
    report: &mut Report,
    doc: &ParsedDoc,
    name: &str,
    registry: &dyn Registry,
    is_new: bool,
    release: ReleaseLine,
) {
    if is_new {
        return;
    }

    let previous = match registry.previous_doc(name) {
        Ok(doc) => doc,
        Err(RegistryError::FragmentMissing(fragment)) => {
            report.error(format!("Existing DOCUMENTATION fragment missing: {}", fragment));
            return;
        }
        Err(RegistryError::Other(detail)) => {
            report.trace(detail);
            report.error("Unknown existing DOCUMENTATION error, see TRACE");
            return;
        }
    };

    let baseline = previous
        .version_added()
        .and_then(|raw| raw.parse::<ReleaseLine>().ok())
        .unwrap_or(ReleaseLine::new(0, 0));

    for (option, value) in doc.options() {
        if previous.has_option(&option) {
            continue;
        }

        let raw = ParsedDoc::option_version_added(value)
            .unwrap_or_else(|| DEFAULT_VERSION_ADDED.to_string());
        match raw.parse::<ReleaseLine>() {
            Err(_) => {
                report.error(format!(
                    "version_added for new option ({}) is not a valid version number: {:?}",
                    option, raw
                ));
            }
            Ok(version) => {
                if baseline != release && version != release {
                    report.error(format!(
                        "version_added for new option ({}) should be {}. Currently {}",
                        option, release, version
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;

    struct FakeRegistry {
        published: Option<ParsedDoc>,
        error: Option<RegistryError>,
    }

    impl FakeRegistry {
        fn with_doc(yaml: &str) -> Self {
            let value: Value = serde_yaml::from_str(yaml).unwrap();
            Self {
                published: Some(ParsedDoc::from_value(value).unwrap()),
                error: None,
            }
        }

        fn failing(error: RegistryError) -> Self {
            Self {
                published: None,
                error: Some(error),
            }
        }
    }

    impl Registry for FakeRegistry {
        fn has_plugin(&self, _name: &str) -> bool {
            self.published.is_some() || self.error.is_some()
        }

        fn previous_doc(&self, _name: &str) -> Result<ParsedDoc, RegistryError> {
            match (&self.published, &self.error) {
                (Some(doc), _) => Ok(doc.clone()),
                (None, Some(err)) => Err(err.clone()),
                (None, None) => Err(RegistryError::Other("empty fake".to_string())),
            }
        }
    }

    fn doc(yaml: &str) -> ParsedDoc {
        let value: Value = serde_yaml::from_str(yaml).unwrap();
        ParsedDoc::from_value(value).unwrap()
    }

    fn report() -> Report {
        Report::new("ping.py", "modules/ping.py")
    }

    fn release() -> ReleaseLine {
        ReleaseLine::new(2, 3)
    }

    #[test]
    fn test_new_module_version_matches() {
        let mut r = report();
        check_version_added(&mut r, &doc("version_added: '2.3'\n"), true, release());
        assert!(r.errors.is_empty());
    }

    #[test]
    fn test_new_module_version_mismatch() {
        let mut r = report();
        check_version_added(&mut r, &doc("version_added: '2.2'\n"), true, release());
        assert_eq!(r.errors, vec!["version_added should be 2.3. Currently 2.2"]);
    }

    #[test]
    fn test_new_module_version_missing_defaults() {
        let mut r = report();
        check_version_added(&mut r, &doc("module: ping\n"), true, release());
        assert_eq!(r.errors, vec!["version_added should be 2.3. Currently 0.0"]);
    }

    #[test]
    fn test_new_module_version_malformed() {
        let mut r = report();
        check_version_added(&mut r, &doc("version_added: historical\n"), true, release());
        assert_eq!(
            r.errors,
            vec!["version_added is not a valid version number: \"historical\""]
        );
    }

    #[test]
    fn test_existing_module_skips_version_added_check() {
        let mut r = report();
        check_version_added(&mut r, &doc("version_added: '1.0'\n"), false, release());
        assert!(r.errors.is_empty());
    }

    const PREVIOUS: &str = "\
version_added: '2.0'
options:
    data:
        description: d
";

    #[test]
    fn test_new_option_without_tag() {
        let registry = FakeRegistry::with_doc(PREVIOUS);
        let current = doc(
            "\
options:
    data:
        description: d
    timeout:
        description: t
",
        );
        let mut r = report();
        check_new_options(&mut r, &current, "ping", &registry, false, release());
        assert_eq!(
            r.errors,
            vec!["version_added for new option (timeout) should be 2.3. Currently 0.0"]
        );
    }

    #[test]
    fn test_new_option_with_current_tag() {
        let registry = FakeRegistry::with_doc(PREVIOUS);
        let current = doc(
            "\
options:
    data:
        description: d
    timeout:
        description: t
        version_added: '2.3'
",
        );
        let mut r = report();
        check_new_options(&mut r, &current, "ping", &registry, false, release());
        assert!(r.errors.is_empty(), "unexpected: {:?}", r.errors);
    }

    #[test]
    fn test_new_option_malformed_tag() {
        let registry = FakeRegistry::with_doc(PREVIOUS);
        let current = doc(
            "\
options:
    timeout:
        description: t
        version_added: soon
",
        );
        let mut r = report();
        check_new_options(&mut r, &current, "ping", &registry, false, release());
        assert_eq!(
            r.errors,
            vec!["version_added for new option (timeout) is not a valid version number: \"soon\""]
        );
    }

    #[test]
    fn test_inherited_baseline_exception() {
        // Previous doc itself is tagged with the current release, so new
        // options are not checked individually.
        let registry = FakeRegistry::with_doc("version_added: '2.3'\noptions: {}\n");
        let current = doc(
            "\
options:
    timeout:
        description: t
",
        );
        let mut r = report();
        check_new_options(&mut r, &current, "ping", &registry, false, release());
        assert!(r.errors.is_empty(), "unexpected: {:?}", r.errors);
    }

    #[test]
    fn test_existing_option_not_rechecked() {
        let registry = FakeRegistry::with_doc(PREVIOUS);
        let current = doc(
            "\
options:
    data:
        description: d
",
        );
        let mut r = report();
        check_new_options(&mut r, &current, "ping", &registry, false, release());
        assert!(r.errors.is_empty());
    }

    #[test]
    fn test_fragment_missing_aborts_diff() {
        let registry = FakeRegistry::failing(RegistryError::FragmentMissing("rax".to_string()));
        let current = doc("options:\n    timeout:\n        description: t\n");
        let mut r = report();
        check_new_options(&mut r, &current, "ping", &registry, false, release());
        assert_eq!(r.errors, vec!["Existing DOCUMENTATION fragment missing: rax"]);
    }

    #[test]
    fn test_unknown_registry_error_traced() {
        let registry = FakeRegistry::failing(RegistryError::Other("disk on fire".to_string()));
        let current = doc("options: {}\n");
        let mut r = report();
        check_new_options(&mut r, &current, "ping", &registry, false, release());
        assert_eq!(r.errors, vec!["Unknown existing DOCUMENTATION error, see TRACE"]);
        assert_eq!(r.traces, vec!["disk on fire"]);
    }

    #[test]
    fn test_parse_two_components() {
        let v: ReleaseLine = "2.3".parse().unwrap();
        assert_eq!(v, ReleaseLine::new(2, 3));
    }

    #[test]
    fn test_parse_three_components() {
        let v: ReleaseLine = "2.3.1".parse().unwrap();
        assert_eq!(v, ReleaseLine::new(2, 3));
        assert_eq!(v.to_string(), "2.3");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("2".parse::<ReleaseLine>().is_err());
        assert!("2.3.1.4".parse::<ReleaseLine>().is_err());
        assert!("2.x".parse::<ReleaseLine>().is_err());
        assert!("historical".parse::<ReleaseLine>().is_err());
        assert!("".parse::<ReleaseLine>().is_err());
    }

    #[test]
    fn test_ordering() {
        let old: ReleaseLine = "2.2".parse().unwrap();
        let new: ReleaseLine = "2.3".parse().unwrap();
        assert!(old < new);
    }
}
