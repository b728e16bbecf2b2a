//! Extraction of the three documentation blocks from a parsed module.
//!
//! Only top-level assignments count, and only literal string values; a
//! computed value is treated as if the block were absent.

use crate::parser::{Expr, Module, Stmt};

pub const DOCUMENTATION: &str = "DOCUMENTATION";
pub const EXAMPLES: &str = "EXAMPLES";
pub const RETURN: &str = "RETURN";

/// A doc block literal and the line its assignment starts on. The line is
/// used to offset YAML error locations back into the module source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocBlock {
    pub text: String,
    pub lineno: usize,
}

#[derive(Debug, Clone, Default)]
pub struct DocBlocks {
    pub documentation: Option<DocBlock>,
    pub examples: Option<DocBlock>,
    pub returns: Option<DocBlock>,
}

/// Scan the top-level statements for the three recognized doc assignments.
pub fn extract(module: &Module) -> DocBlocks {
    let mut blocks = DocBlocks::default();

    for stmt in &module.body {
        let (targets, value, lineno) = match stmt {
            Stmt::Assign { targets, value, lineno } => (targets, value, *lineno),
            _ => continue,
        };
        let literal = match value {
            Expr::Str(s) => s,
            _ => continue,
        };

        for target in targets {
            match target.as_str() {
                DOCUMENTATION => {
                    blocks.documentation = Some(DocBlock {
                        text: literal.clone(),
                        lineno,
                    });
                }
                EXAMPLES => {
                    blocks.examples = Some(DocBlock {
                        text: literal.clone(),
                        lineno,
                    });
                }
                RETURN => {
                    // RETURN blocks conventionally open with a line break.
                    let text = literal.strip_prefix('\n').unwrap_or(literal).to_string();
                    blocks.returns = Some(DocBlock { text, lineno });
                }
                _ => {}
            }
        }
    }

    blocks
}
