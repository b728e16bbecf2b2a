//! The fixed battery of rule checks.
//!
//! Each check appends to the report's errors or warnings independently;
//! none short-circuits the others. Text checks operate on the raw source
//! and keep working when parsing failed; structural checks consume the
//! tagged AST.

pub mod entrypoint;
pub mod imports;
pub mod shadowing;
pub mod shell;
pub mod text;
