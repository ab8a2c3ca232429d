//! Tree-sitter backed provider for JavaScript and TypeScript.

use tree_sitter::{Language as Grammar, Node, Parser};

use super::{
    AstProvider, ExportDecl, ImportDecl, ImportSpecifier, Language, NodeKind, SyntaxNode,
};
use crate::error::ParseError;

/// Parses JS/TS with tree-sitter and lowers the result to a [`SyntaxNode`].
///
/// `tree_sitter::Parser` is not `Sync`, so a parser is created per call.
#[derive(Debug, Default)]
pub struct TreeSitterProvider;

impl TreeSitterProvider {
    pub fn new() -> Self {
        Self
    }

    fn grammar(language: &Language) -> Option<Grammar> {
        match language {
            Language::JavaScript | Language::Jsx => Some(tree_sitter_javascript::LANGUAGE.into()),
            Language::TypeScript => Some(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()),
            Language::Tsx => Some(tree_sitter_typescript::LANGUAGE_TSX.into()),
            Language::Other(_) => None,
        }
    }
}

impl AstProvider for TreeSitterProvider {
    fn parse(&self, text: &str, language: &Language) -> Result<SyntaxNode, ParseError> {
        let grammar = Self::grammar(language).ok_or_else(|| {
            ParseError::new(format!("unsupported language {:?}", language.as_str()), None)
        })?;

        let mut parser = Parser::new();
        parser
            .set_language(&grammar)
            .map_err(|e| ParseError::new(format!("loading grammar: {}", e), None))?;
        let tree = parser
            .parse(text, None)
            .ok_or_else(|| ParseError::new("parser produced no tree", None))?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(ParseError::new("syntax error", first_error_line(root)));
        }

        Ok(lower(root, text.as_bytes()))
    }
}

/// Line of the first ERROR or MISSING node, depth-first.
fn first_error_line(root: Node) -> Option<usize> {
    let mut pending = vec![root];
    while let Some(node) = pending.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node.start_position().row + 1);
        }
        let mut cursor = node.walk();
        let flagged: Vec<Node> = node
            .children(&mut cursor)
            .filter(|c| c.has_error() || c.is_missing())
            .collect();
        pending.extend(flagged.into_iter().rev());
    }
    root.has_error().then(|| root.start_position().row + 1)
}

/// A node being lowered: its remaining children and the ones already done.
struct Frame<'t> {
    node: Node<'t>,
    pending: std::vec::IntoIter<Node<'t>>,
    lowered: Vec<SyntaxNode>,
}

impl<'t> Frame<'t> {
    fn new(node: Node<'t>) -> Self {
        let mut cursor = node.walk();
        let children: Vec<Node<'t>> = node
            .named_children(&mut cursor)
            .filter(|c| c.kind() != "comment")
            .collect();
        Self {
            node,
            lowered: Vec::with_capacity(children.len()),
            pending: children.into_iter(),
        }
    }

    fn finish(self, source: &[u8]) -> SyntaxNode {
        SyntaxNode {
            kind: node_kind(self.node, source),
            start_line: self.node.start_position().row + 1,
            end_line: self.node.end_position().row + 1,
            children: self.lowered,
        }
    }
}

/// Lower a tree-sitter subtree. Uses an explicit stack; generated code
/// nests thousands of levels deep.
fn lower(root: Node, source: &[u8]) -> SyntaxNode {
    let mut ancestors: Vec<Frame> = Vec::new();
    let mut current = Frame::new(root);
    loop {
        if let Some(child) = current.pending.next() {
            ancestors.push(std::mem::replace(&mut current, Frame::new(child)));
            continue;
        }
        let node = current.finish(source);
        match ancestors.pop() {
            Some(parent) => {
                current = parent;
                current.lowered.push(node);
            }
            None => return node,
        }
    }
}

fn node_kind(node: Node, source: &[u8]) -> NodeKind {
    match node.kind() {
        "program" => NodeKind::Program,
        "if_statement" => NodeKind::If,
        "ternary_expression" => NodeKind::Conditional,
        "binary_expression" => match node.child_by_field_name("operator").map(|op| op.kind()) {
            Some("&&") | Some("||") | Some("??") => NodeKind::Logical,
            _ => NodeKind::Other("binary_expression".to_string()),
        },
        "switch_statement" => NodeKind::Switch,
        "switch_case" | "switch_default" => NodeKind::SwitchCase,
        "try_statement" => NodeKind::Try,
        "catch_clause" => NodeKind::Catch,
        "for_statement" => NodeKind::For,
        "for_in_statement" => {
            if has_token(node, "of") {
                NodeKind::ForOf
            } else {
                NodeKind::ForIn
            }
        }
        "while_statement" => NodeKind::While,
        "do_statement" => NodeKind::DoWhile,
        "function_declaration"
        | "function_expression"
        | "function"
        | "generator_function_declaration"
        | "generator_function"
        | "arrow_function"
        | "method_definition" => NodeKind::Function,
        "class_declaration" | "abstract_class_declaration" | "class" => NodeKind::Class,
        "call_expression" => NodeKind::Call,
        "import_statement" => NodeKind::Import(import_decl(node, source)),
        "export_statement" => export_kind(node, source),
        other => NodeKind::Other(other.to_string()),
    }
}

fn has_token(node: Node, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|c| c.kind() == token);
    found
}

fn node_text(node: Node, source: &[u8]) -> String {
    node.utf8_text(source).unwrap_or("").to_string()
}

fn unquote(raw: &str) -> String {
    raw.trim_matches(|c| c == '"' || c == '\'' || c == '`')
        .to_string()
}

fn import_decl(node: Node, source: &[u8]) -> ImportDecl {
    let mut module = node
        .child_by_field_name("source")
        .map(|s| unquote(&node_text(s, source)));

    let mut specifiers = Vec::new();
    let mut cursor = node.walk();
    for clause in node.named_children(&mut cursor) {
        match clause.kind() {
            "import_clause" => collect_import_clause(clause, source, &mut specifiers),
            // TypeScript `import fs = require('fs');`
            "import_require_clause" => {
                let mut inner = clause.walk();
                for part in clause.named_children(&mut inner) {
                    match part.kind() {
                        "identifier" => {
                            specifiers.push(ImportSpecifier::Default(node_text(part, source)))
                        }
                        "string" if module.is_none() => {
                            module = Some(unquote(&node_text(part, source)))
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    ImportDecl {
        source: module,
        specifiers,
    }
}

fn collect_import_clause(clause: Node, source: &[u8], out: &mut Vec<ImportSpecifier>) {
    let mut cursor = clause.walk();
    for part in clause.named_children(&mut cursor) {
        match part.kind() {
            "identifier" => out.push(ImportSpecifier::Default(node_text(part, source))),
            "namespace_import" => {
                let mut inner = part.walk();
                let name = part
                    .named_children(&mut inner)
                    .next()
                    .map(|n| node_text(n, source))
                    .unwrap_or_default();
                out.push(ImportSpecifier::Namespace(name));
            }
            "named_imports" => {
                let mut inner = part.walk();
                for spec in part.named_children(&mut inner) {
                    if spec.kind() != "import_specifier" {
                        continue;
                    }
                    let imported = spec
                        .child_by_field_name("name")
                        .map(|n| node_text(n, source))
                        .unwrap_or_default();
                    let local = spec
                        .child_by_field_name("alias")
                        .map(|n| node_text(n, source))
                        .unwrap_or_else(|| imported.clone());
                    out.push(ImportSpecifier::Named { imported, local });
                }
            }
            _ => {}
        }
    }
}

fn export_kind(node: Node, source: &[u8]) -> NodeKind {
    if has_token(node, "default") {
        return NodeKind::ExportDefault;
    }

    let module = node
        .child_by_field_name("source")
        .map(|s| unquote(&node_text(s, source)));

    let mut names = Vec::new();
    let mut cursor = node.walk();
    for clause in node.named_children(&mut cursor) {
        match clause.kind() {
            "export_clause" => {
                let mut inner = clause.walk();
                for spec in clause.named_children(&mut inner) {
                    if spec.kind() == "export_specifier" {
                        if let Some(name) = spec.child_by_field_name("name") {
                            names.push(node_text(name, source));
                        }
                    }
                }
            }
            // `export * as ns from './m'`
            "namespace_export" => {
                let mut inner = clause.walk();
                let alias = clause
                    .named_children(&mut inner)
                    .last()
                    .map(|n| unquote(&node_text(n, source)))
                    .unwrap_or_else(|| "*".to_string());
                names.push(alias);
            }
            _ => {}
        }
    }
    // `export * from './m'`
    if names.is_empty() && module.is_some() && has_token(node, "*") {
        names.push("*".to_string());
    }

    NodeKind::ExportNamed(ExportDecl {
        source: module,
        names,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_js(source: &str) -> SyntaxNode {
        TreeSitterProvider::new()
            .parse(source, &Language::JavaScript)
            .unwrap()
    }

    fn kinds(tree: &SyntaxNode) -> Vec<NodeKind> {
        tree.descendants().map(|n| n.kind.clone()).collect()
    }

    #[test]
    fn test_control_flow_kinds() {
        let tree = parse_js(
            r#"
function run(items, flag) {
    for (const item of items) {
        if (item && flag) {
            continue;
        }
    }
    for (const key in items) {}
    while (flag) { flag = false; }
    do { flag = !flag; } while (flag);
    switch (flag) {
        case 1: break;
        default: break;
    }
    try { run(); } catch (e) {}
    return flag ? 1 : 2;
}
"#,
        );
        let kinds = kinds(&tree);

        assert_eq!(kinds[0], NodeKind::Program);
        for expected in [
            NodeKind::Function,
            NodeKind::ForOf,
            NodeKind::ForIn,
            NodeKind::If,
            NodeKind::Logical,
            NodeKind::While,
            NodeKind::DoWhile,
            NodeKind::Switch,
            NodeKind::Try,
            NodeKind::Catch,
            NodeKind::Conditional,
            NodeKind::Call,
        ] {
            assert!(kinds.contains(&expected), "missing {:?}", expected);
        }
        let cases = kinds.iter().filter(|k| **k == NodeKind::SwitchCase).count();
        assert_eq!(cases, 2, "case and default both count");
    }

    #[test]
    fn test_arithmetic_is_not_logical() {
        let tree = parse_js("const x = a + b;\n");
        assert!(!kinds(&tree).contains(&NodeKind::Logical));
    }

    #[test]
    fn test_import_specifiers() {
        let tree = parse_js(
            r#"
import React from 'react';
import * as path from "path";
import { readFile as read, writeFile } from './fs-utils';
import './side-effect';
"#,
        );
        let imports: Vec<ImportDecl> = tree
            .descendants()
            .filter_map(|n| match &n.kind {
                NodeKind::Import(decl) => Some(decl.clone()),
                _ => None,
            })
            .collect();

        assert_eq!(imports.len(), 4);
        assert_eq!(imports[0].source.as_deref(), Some("react"));
        assert_eq!(
            imports[0].specifiers,
            vec![ImportSpecifier::Default("React".to_string())]
        );
        assert_eq!(
            imports[1].specifiers,
            vec![ImportSpecifier::Namespace("path".to_string())]
        );
        assert_eq!(
            imports[2].specifiers,
            vec![
                ImportSpecifier::Named {
                    imported: "readFile".to_string(),
                    local: "read".to_string()
                },
                ImportSpecifier::Named {
                    imported: "writeFile".to_string(),
                    local: "writeFile".to_string()
                },
            ]
        );
        assert_eq!(imports[3].source.as_deref(), Some("./side-effect"));
        assert!(imports[3].specifiers.is_empty());
    }

    #[test]
    fn test_export_kinds() {
        let tree = parse_js(
            r#"
export { alpha, beta } from './letters';
export default function main() {}
export const local = 1;
"#,
        );
        let exports: Vec<NodeKind> = tree
            .descendants()
            .filter(|n| matches!(n.kind, NodeKind::ExportNamed(_) | NodeKind::ExportDefault))
            .map(|n| n.kind.clone())
            .collect();

        assert_eq!(exports.len(), 3);
        assert_eq!(
            exports[0],
            NodeKind::ExportNamed(ExportDecl {
                source: Some("./letters".to_string()),
                names: vec!["alpha".to_string(), "beta".to_string()],
            })
        );
        assert_eq!(exports[1], NodeKind::ExportDefault);
        assert_eq!(
            exports[2],
            NodeKind::ExportNamed(ExportDecl {
                source: None,
                names: vec![],
            })
        );
    }

    #[test]
    fn test_export_all_forms() {
        let tree = parse_js("export * from './b';\nexport * as ns from './c';\n");
        let exports: Vec<NodeKind> = tree
            .descendants()
            .filter(|n| matches!(n.kind, NodeKind::ExportNamed(_)))
            .map(|n| n.kind.clone())
            .collect();

        assert_eq!(
            exports,
            vec![
                NodeKind::ExportNamed(ExportDecl {
                    source: Some("./b".to_string()),
                    names: vec!["*".to_string()],
                }),
                NodeKind::ExportNamed(ExportDecl {
                    source: Some("./c".to_string()),
                    names: vec!["ns".to_string()],
                }),
            ]
        );
    }

    #[test]
    fn test_typescript_import_require() {
        let tree = TreeSitterProvider::new()
            .parse(
                "import fs = require('fs');\nexport const x = fs;\n",
                &Language::TypeScript,
            )
            .unwrap();
        let imports: Vec<ImportDecl> = tree
            .descendants()
            .filter_map(|n| match &n.kind {
                NodeKind::Import(decl) => Some(decl.clone()),
                _ => None,
            })
            .collect();

        assert_eq!(
            imports,
            vec![ImportDecl {
                source: Some("fs".to_string()),
                specifiers: vec![ImportSpecifier::Default("fs".to_string())],
            }]
        );
    }

    fn long_concat(terms: usize) -> String {
        let mut text = String::from("const s = 'a'");
        for _ in 1..terms {
            text.push_str(" + 'a'");
        }
        text
    }

    #[test]
    fn test_deeply_nested_expression() {
        let text = format!("{};\n", long_concat(10_000));
        let tree = parse_js(&text);
        let binaries = tree
            .descendants()
            .filter(|n| n.kind == NodeKind::Other("binary_expression".to_string()))
            .count();
        assert_eq!(binaries, 9_999);
    }

    #[test]
    fn test_deeply_nested_syntax_error() {
        let text = format!("{} + ;\n", long_concat(10_000));
        let err = TreeSitterProvider::new()
            .parse(&text, &Language::JavaScript)
            .unwrap_err();
        assert_eq!(err.line, Some(1));
    }

    #[test]
    fn test_typescript_parses() {
        let tree = TreeSitterProvider::new()
            .parse(
                "interface Point { x: number }\nfunction norm(p: Point): number { return p.x > 0 ? p.x : -p.x; }\n",
                &Language::TypeScript,
            )
            .unwrap();
        assert!(kinds(&tree).contains(&NodeKind::Conditional));
    }

    #[test]
    fn test_syntax_error_reports_line() {
        let err = TreeSitterProvider::new()
            .parse("const ok = 1;\nfunction broken( {\n", &Language::JavaScript)
            .unwrap_err();
        assert_eq!(err.reason, "syntax error");
        assert!(err.line.is_some());
    }

    #[test]
    fn test_unsupported_language() {
        let err = TreeSitterProvider::new()
            .parse("x = 1", &Language::Other("py".to_string()))
            .unwrap_err();
        assert!(err.reason.contains("unsupported language"));
        assert_eq!(err.line, None);
    }
}
