//! Lookup of previously published modules and documentation fragments.
//!
//! Both collaborators are traits so the version policy and documentation
//! checks can be exercised against deterministic fakes. The directory-backed
//! implementations point at a checkout of the released collection.

use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use crate::docs;
use crate::parser;
use crate::schema::ParsedDoc;

#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// The published document references a fragment that cannot be resolved.
    #[error("documentation fragment missing: {0}")]
    FragmentMissing(String),
    #[error("{0}")]
    Other(String),
}

/// The directory of already-published modules.
pub trait Registry {
    /// Whether a module is already published under this base name.
    fn has_plugin(&self, name: &str) -> bool;

    /// The previously published DOCUMENTATION for a module.
    fn previous_doc(&self, name: &str) -> Result<ParsedDoc, RegistryError>;
}

/// Resolves `extends_documentation_fragment` references.
pub trait FragmentResolver {
    fn resolve(&self, fragment: &str) -> bool;
}

/// Registry used when no released collection is configured: every artifact
/// is treated as newly introduced.
#[derive(Debug, Default, Clone)]
pub struct EmptyRegistry;

impl Registry for EmptyRegistry {
    fn has_plugin(&self, _name: &str) -> bool {
        false
    }

    fn previous_doc(&self, name: &str) -> Result<ParsedDoc, RegistryError> {
        Err(RegistryError::Other(format!(
            "no published collection configured, cannot look up {}",
            name
        )))
    }
}

/// Resolver used when no fragment directory is configured; it accepts every
/// reference rather than flagging all of them.
#[derive(Debug, Default, Clone)]
pub struct AllowAllFragments;

impl FragmentResolver for AllowAllFragments {
    fn resolve(&self, _fragment: &str) -> bool {
        true
    }
}

/// Fragments stored as `<name>.py` files in one directory.
#[derive(Debug, Clone)]
pub struct DirFragmentResolver {
    root: PathBuf,
}

impl DirFragmentResolver {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl FragmentResolver for DirFragmentResolver {
    fn resolve(&self, fragment: &str) -> bool {
        // Fragment references may carry a trailing variant (`rax.facts`);
        // only the file part matters here.
        let base = fragment.split('.').next().unwrap_or(fragment);
        self.root.join(format!("{}.py", base)).is_file()
    }
}

/// Registry backed by a directory tree of published module sources.
pub struct DirRegistry {
    root: PathBuf,
    resolver: Box<dyn FragmentResolver>,
}

impl DirRegistry {
    pub fn new<P: AsRef<Path>>(root: P, resolver: Box<dyn FragmentResolver>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            resolver,
        }
    }

    fn find_module(&self, name: &str) -> Option<PathBuf> {
        let wanted = format!("{}.py", name);
        WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .find(|entry| {
                entry.file_type().is_file()
                    && entry.file_name().to_string_lossy() == wanted.as_str()
            })
            .map(|entry| entry.into_path())
    }
}

impl Registry for DirRegistry {
    fn has_plugin(&self, name: &str) -> bool {
        self.find_module(name).is_some()
    }

    fn previous_doc(&self, name: &str) -> Result<ParsedDoc, RegistryError> {
        let path = self
            .find_module(name)
            .ok_or_else(|| RegistryError::Other(format!("{} not found in published collection", name)))?;

        let text = std::fs::read_to_string(&path)
            .map_err(|e| RegistryError::Other(format!("reading {}: {}", path.display(), e)))?;
        let module = parser::parse(&text)
            .map_err(|e| RegistryError::Other(format!("parsing {}: {}", path.display(), e.trace)))?;

        let blocks = docs::extract(&module);
        let block = blocks
            .documentation
            .ok_or_else(|| RegistryError::Other(format!("{} has no DOCUMENTATION", name)))?;

        let value: serde_yaml::Value = serde_yaml::from_str(&block.text)
            .map_err(|e| RegistryError::Other(format!("{} DOCUMENTATION: {}", name, e)))?;
        let doc = ParsedDoc::from_value(value)
            .ok_or_else(|| RegistryError::Other(format!("{} DOCUMENTATION is not a mapping", name)))?;

        if let Some(fragment) = doc.extends_fragment() {
            if !self.resolver.resolve(&fragment) {
                return Err(RegistryError::FragmentMissing(fragment));
            }
        }

        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const PUBLISHED: &str = "\
#!/usr/bin/python

DOCUMENTATION = '''
module: ping
short_description: s
description: d
version_added: '2.2'
options:
    data:
        description: d
'''
";

    #[test]
    fn test_dir_registry_lookup() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("system")).unwrap();
        fs::write(temp.path().join("system/ping.py"), PUBLISHED).unwrap();

        let registry = DirRegistry::new(temp.path(), Box::new(AllowAllFragments));
        assert!(registry.has_plugin("ping"));
        assert!(!registry.has_plugin("pong"));

        let doc = registry.previous_doc("ping").unwrap();
        assert_eq!(doc.version_added().as_deref(), Some("2.2"));
        assert!(doc.has_option("data"));
    }

    #[test]
    fn test_dir_registry_missing_fragment() {
        let temp = TempDir::new().unwrap();
        let source = PUBLISHED.replace(
            "version_added: '2.2'",
            "version_added: '2.2'\nextends_documentation_fragment: rax",
        );
        fs::write(temp.path().join("ping.py"), source).unwrap();

        let fragments = TempDir::new().unwrap();
        let registry = DirRegistry::new(
            temp.path(),
            Box::new(DirFragmentResolver::new(fragments.path())),
        );
        match registry.previous_doc("ping") {
            Err(RegistryError::FragmentMissing(name)) => assert_eq!(name, "rax"),
            other => panic!("expected FragmentMissing, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_dir_fragment_resolver() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("rax.py"), "class ModuleDocFragment(object):\n    DOCUMENTATION = ''\n").unwrap();

        let resolver = DirFragmentResolver::new(temp.path());
        assert!(resolver.resolve("rax"));
        assert!(resolver.resolve("rax.facts"));
        assert!(!resolver.resolve("openstack"));
    }

    #[test]
    fn test_empty_registry_treats_everything_as_new() {
        let registry = EmptyRegistry;
        assert!(!registry.has_plugin("ping"));
        assert!(registry.previous_doc("ping").is_err());
    }
}
