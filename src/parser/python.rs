//! Lowering from the tree-sitter-python concrete syntax tree into the
//! tagged statement model.
//!
//! Only the shapes the rule checks consume are lowered precisely; anything
//! else becomes `Stmt::Other` / `Expr::Other` with its line number intact.

use tree_sitter::{Node, Parser as TsParser};

use super::ast::{Alias, Expr, Module, Stmt};
use super::ParseFailure;

pub fn parse_module(source: &str) -> Result<Module, ParseFailure> {
    let mut parser = TsParser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| ParseFailure::internal(format!("loading python grammar: {}", e)))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ParseFailure::internal("tree-sitter returned no tree"))?;

    let root = tree.root_node();
    if root.has_error() {
        return Err(ParseFailure::syntax(collect_error_trace(root)));
    }

    let mut body = Vec::new();
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        if child.kind() == "comment" {
            continue;
        }
        body.push(lower_stmt(child, source));
    }
    Ok(Module { body })
}

/// Walk the tree and describe every error or missing node, mirroring the
/// secondary compile-only pass the diagnostics expect.
fn collect_error_trace(root: Node) -> String {
    let mut lines = vec!["SyntaxError: invalid syntax".to_string()];
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            let pos = node.start_position();
            lines.push(format!("near line {}, column {}", pos.row + 1, pos.column + 1));
            continue;
        }
        if node.has_error() {
            for i in (0..node.child_count()).rev() {
                if let Some(child) = node.child(i) {
                    stack.push(child);
                }
            }
        }
    }
    lines.join("\n")
}

fn lineno(node: Node) -> usize {
    node.start_position().row + 1
}

fn node_text(node: Node, source: &str) -> String {
    source
        .get(node.start_byte()..node.end_byte())
        .unwrap_or("")
        .to_string()
}

fn lower_stmt(node: Node, source: &str) -> Stmt {
    match node.kind() {
        "expression_statement" => lower_expression_statement(node, source),
        "import_statement" => Stmt::Import {
            names: import_aliases(node, source),
            lineno: lineno(node),
        },
        "import_from_statement" => lower_import_from(node, source),
        "try_statement" => lower_try(node, source),
        "if_statement" => lower_if(node, source),
        "function_definition" => Stmt::FunctionDef {
            name: field_text(node, "name", source),
            lineno: lineno(node),
        },
        "class_definition" => Stmt::ClassDef {
            name: field_text(node, "name", source),
            lineno: lineno(node),
        },
        "decorated_definition" => match node.child_by_field_name("definition") {
            Some(def) => lower_stmt(def, source),
            None => Stmt::Other { lineno: lineno(node) },
        },
        _ => Stmt::Other { lineno: lineno(node) },
    }
}

fn field_text(node: Node, field: &str, source: &str) -> String {
    node.child_by_field_name(field)
        .map(|n| node_text(n, source))
        .unwrap_or_default()
}

fn lower_expression_statement(node: Node, source: &str) -> Stmt {
    let inner = match node.named_child(0) {
        Some(n) => n,
        None => return Stmt::Other { lineno: lineno(node) },
    };

    if inner.kind() == "assignment" {
        let targets = assignment_targets(inner, source);
        if !targets.is_empty() {
            let value = inner
                .child_by_field_name("right")
                .map(|n| lower_expr(n, source))
                .unwrap_or(Expr::Other);
            return Stmt::Assign {
                targets,
                value,
                lineno: lineno(node),
            };
        }
        return Stmt::Other { lineno: lineno(node) };
    }

    Stmt::Expr {
        value: lower_expr(inner, source),
        lineno: lineno(node),
    }
}

/// Plain identifier targets of an assignment. Attribute and subscript
/// targets are not module-level bindings and are ignored.
fn assignment_targets(assign: Node, source: &str) -> Vec<String> {
    let left = match assign.child_by_field_name("left") {
        Some(n) => n,
        None => return Vec::new(),
    };
    match left.kind() {
        "identifier" => vec![node_text(left, source)],
        "pattern_list" | "tuple_pattern" => {
            let mut cursor = left.walk();
            left.named_children(&mut cursor)
                .filter(|n| n.kind() == "identifier")
                .map(|n| node_text(n, source))
                .collect()
        }
        _ => Vec::new(),
    }
}

fn import_aliases(node: Node, source: &str) -> Vec<Alias> {
    let mut names = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "dotted_name" => names.push(Alias {
                name: node_text(child, source),
                asname: None,
            }),
            "aliased_import" => {
                let name = field_text(child, "name", source);
                let asname = child
                    .child_by_field_name("alias")
                    .map(|n| node_text(n, source));
                names.push(Alias { name, asname });
            }
            _ => {}
        }
    }
    names
}

fn lower_import_from(node: Node, source: &str) -> Stmt {
    let module = field_text(node, "module_name", source);

    let mut names = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "wildcard_import" {
            names.push(Alias {
                name: "*".to_string(),
                asname: None,
            });
        }
    }
    let mut name_cursor = node.walk();
    for child in node.children_by_field_name("name", &mut name_cursor) {
        match child.kind() {
            "dotted_name" | "identifier" => names.push(Alias {
                name: node_text(child, source),
                asname: None,
            }),
            "aliased_import" => {
                let name = field_text(child, "name", source);
                let asname = child
                    .child_by_field_name("alias")
                    .map(|n| node_text(n, source));
                names.push(Alias { name, asname });
            }
            _ => {}
        }
    }

    Stmt::ImportFrom {
        module,
        names,
        lineno: lineno(node),
    }
}

fn lower_block(block: Node, source: &str) -> Vec<Stmt> {
    let mut cursor = block.walk();
    block
        .named_children(&mut cursor)
        .filter(|n| n.kind() != "comment")
        .map(|n| lower_stmt(n, source))
        .collect()
}

fn lower_try(node: Node, source: &str) -> Stmt {
    let body = node
        .child_by_field_name("body")
        .map(|b| lower_block(b, source))
        .unwrap_or_default();

    let mut handlers = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "except_clause" || child.kind() == "except_group_clause" {
            let mut inner = child.walk();
            for grandchild in child.named_children(&mut inner) {
                if grandchild.kind() == "block" {
                    handlers.extend(lower_block(grandchild, source));
                }
            }
        }
    }

    Stmt::Try {
        body,
        handlers,
        lineno: lineno(node),
    }
}

fn lower_if(node: Node, source: &str) -> Stmt {
    let test = node
        .child_by_field_name("condition")
        .map(|n| lower_expr(n, source))
        .unwrap_or(Expr::Other);
    let body = node
        .child_by_field_name("consequence")
        .map(|b| lower_block(b, source))
        .unwrap_or_default();

    Stmt::If {
        test,
        body,
        lineno: lineno(node),
    }
}

fn lower_expr(node: Node, source: &str) -> Expr {
    match node.kind() {
        "string" => Expr::Str(string_content(node, source)),
        "concatenated_string" => {
            let mut cursor = node.walk();
            let joined: String = node
                .named_children(&mut cursor)
                .filter(|n| n.kind() == "string")
                .map(|n| string_content(n, source))
                .collect();
            Expr::Str(joined)
        }
        "identifier" => Expr::Name(node_text(node, source)),
        "call" => {
            let func = node
                .child_by_field_name("function")
                .map(|n| lower_expr(n, source))
                .unwrap_or(Expr::Other);
            Expr::Call { func: Box::new(func) }
        }
        "comparison_operator" => {
            let left = node
                .named_child(0)
                .map(|n| lower_expr(n, source))
                .unwrap_or(Expr::Other);
            Expr::Compare { left: Box::new(left) }
        }
        "parenthesized_expression" => node
            .named_child(0)
            .map(|n| lower_expr(n, source))
            .unwrap_or(Expr::Other),
        _ => Expr::Other,
    }
}

/// Text between the opening and closing quote of a string literal. Escape
/// sequences are kept verbatim; doc blocks are triple-quoted raw text and
/// the YAML layer handles the rest.
fn string_content(node: Node, source: &str) -> String {
    let mut start = node.start_byte();
    let mut end = node.end_byte();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "string_start" => start = child.end_byte(),
            "string_end" => end = child.start_byte(),
            _ => {}
        }
    }
    source.get(start..end).unwrap_or("").to_string()
}
