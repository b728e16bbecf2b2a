//! Tagged-variant statement model for validated modules.
//!
//! The rule checks only need a fixed, closed subset of python syntax:
//! top-level assignments, imports, try/except, `if __name__` guards, and
//! bare expression calls. Everything else lowers to `Stmt::Other` so the
//! visitors stay exhaustive without modelling the whole language.

/// A parsed module: the ordered top-level statement list.
#[derive(Debug, Clone)]
pub struct Module {
    pub body: Vec<Stmt>,
}

impl Module {
    /// A docs-only module defines nothing but top-level assignments.
    pub fn is_just_docs(&self) -> bool {
        !self.body.is_empty() && self.body.iter().all(|s| matches!(s, Stmt::Assign { .. }))
    }
}

/// An imported name, optionally aliased (`import x as y`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub name: String,
    pub asname: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Assign {
        targets: Vec<String>,
        value: Expr,
        lineno: usize,
    },
    Import {
        names: Vec<Alias>,
        lineno: usize,
    },
    ImportFrom {
        module: String,
        names: Vec<Alias>,
        lineno: usize,
    },
    Try {
        body: Vec<Stmt>,
        handlers: Vec<Stmt>,
        lineno: usize,
    },
    If {
        test: Expr,
        body: Vec<Stmt>,
        lineno: usize,
    },
    Expr {
        value: Expr,
        lineno: usize,
    },
    FunctionDef {
        name: String,
        lineno: usize,
    },
    ClassDef {
        name: String,
        lineno: usize,
    },
    Other {
        lineno: usize,
    },
}

impl Stmt {
    pub fn lineno(&self) -> usize {
        match self {
            Stmt::Assign { lineno, .. }
            | Stmt::Import { lineno, .. }
            | Stmt::ImportFrom { lineno, .. }
            | Stmt::Try { lineno, .. }
            | Stmt::If { lineno, .. }
            | Stmt::Expr { lineno, .. }
            | Stmt::FunctionDef { lineno, .. }
            | Stmt::ClassDef { lineno, .. }
            | Stmt::Other { lineno } => *lineno,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Expr {
    /// A string literal (including implicit concatenation).
    Str(String),
    Name(String),
    Call {
        func: Box<Expr>,
    },
    /// A comparison; only the left operand matters to the checks.
    Compare {
        left: Box<Expr>,
    },
    Other,
}

impl Expr {
    /// The literal string value, if this is one. Computed expressions are
    /// treated as absent by the doc-block extractor.
    pub fn as_str_literal(&self) -> Option<&str> {
        match self {
            Expr::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            Expr::Name(n) => Some(n),
            _ => None,
        }
    }
}

/// Collect every name bound at module scope, recursing into try/except and
/// if bodies the way the shadowing check expects.
pub fn find_globals(body: &[Stmt], out: &mut std::collections::HashSet<String>) {
    for stmt in body {
        match stmt {
            Stmt::Assign { targets, .. } => {
                out.extend(targets.iter().cloned());
            }
            Stmt::FunctionDef { name, .. } | Stmt::ClassDef { name, .. } => {
                out.insert(name.clone());
            }
            Stmt::Import { names, .. } => {
                for alias in names {
                    let bound = alias
                        .asname
                        .clone()
                        .unwrap_or_else(|| alias.name.split('.').next().unwrap_or("").to_string());
                    if !bound.is_empty() {
                        out.insert(bound);
                    }
                }
            }
            Stmt::ImportFrom { names, .. } => {
                for alias in names {
                    if alias.name == "*" {
                        continue;
                    }
                    let bound = alias.asname.clone().unwrap_or_else(|| alias.name.clone());
                    out.insert(bound);
                }
            }
            Stmt::Try { body, handlers, .. } => {
                find_globals(body, out);
                find_globals(handlers, out);
            }
            Stmt::If { body, .. } => {
                find_globals(body, out);
            }
            Stmt::Expr { .. } | Stmt::Other { .. } => {}
        }
    }
}
