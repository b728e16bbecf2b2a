//! Modcheck - static validator for plugin collection modules.
//!
//! Modcheck checks module source files against the collection's structural
//! and documentation conventions before acceptance: interpreter lines,
//! license headers, import discipline, entry-point placement, the three
//! documentation blocks (DOCUMENTATION, EXAMPLES, RETURN), their schemas,
//! and version tags against the current release line.
//!
//! # Architecture
//!
//! - `classify`: artifact kind from path and blacklist membership
//! - `parser`: tree-sitter based parsing into a tagged statement model
//! - `docs`: doc-block extraction from top-level assignments
//! - `schema`: YAML deserialization and document/option schema validation
//! - `rules`: the fixed battery of text and AST checks
//! - `version`: cross-version compatibility policy
//! - `registry`: published-collection and fragment lookup collaborators
//! - `validator`: per-artifact orchestration
//! - `report`: per-artifact results and output formatting
//!
//! Nothing is executed or sandboxed; every artifact is validated
//! independently in a single pass and failures never abort the run.

pub mod classify;
pub mod cli;
pub mod config;
pub mod docs;
pub mod parser;
pub mod registry;
pub mod report;
pub mod rules;
pub mod schema;
pub mod validator;
pub mod version;

pub use classify::{Classification, ModuleKind};
pub use registry::{FragmentResolver, Registry, RegistryError};
pub use report::Report;
pub use schema::ParsedDoc;
pub use validator::{ModuleValidator, PackageValidator, ValidationContext};
pub use version::ReleaseLine;
