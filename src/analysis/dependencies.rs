//! Per-file import/export extraction.

use crate::ast::{ImportSpecifier, NodeKind, SyntaxNode};
use crate::error::AnalysisError;

use super::types::{DependencyRecord, ExportKind, ExportRecord, ImportKind, ImportRecord};

/// Relative specifiers (`./x`, `../x`) are local files; anything else is a package.
pub fn is_external(source: &str) -> bool {
    !source.starts_with('.')
}

/// Collect imports and exports from a syntax tree.
///
/// The cross-file lists of the record are left empty; the batch fills them.
pub fn extract(path: &str, root: &SyntaxNode) -> Result<DependencyRecord, AnalysisError> {
    let mut record = DependencyRecord::default();

    for node in root.descendants() {
        match &node.kind {
            NodeKind::Import(decl) => {
                let source = decl.source.clone().ok_or_else(|| {
                    AnalysisError::traversal(
                        path,
                        format!("import at line {} has no source", node.start_line),
                    )
                })?;
                record.imports.push(import_record(source, &decl.specifiers));
            }
            NodeKind::ExportNamed(decl) => {
                // Local `export { a }` re-exports nothing from another file.
                if let Some(source) = &decl.source {
                    record.exports.push(ExportRecord {
                        name: decl.names.join(", "),
                        kind: ExportKind::Named,
                        dependencies: vec![source.clone()],
                    });
                }
            }
            NodeKind::ExportDefault => record.exports.push(ExportRecord {
                name: "default".to_string(),
                kind: ExportKind::Default,
                dependencies: Vec::new(),
            }),
            _ => {}
        }
    }

    Ok(record)
}

fn import_record(source: String, specifiers: &[ImportSpecifier]) -> ImportRecord {
    let names = specifiers
        .iter()
        .map(|spec| match spec {
            ImportSpecifier::Default(_) => "default".to_string(),
            ImportSpecifier::Namespace(_) => "namespace".to_string(),
            ImportSpecifier::Named { imported, .. } => imported.clone(),
        })
        .collect();

    let has = |pred: fn(&ImportSpecifier) -> bool| specifiers.iter().any(pred);
    let kind = if has(|s| matches!(s, ImportSpecifier::Namespace(_))) {
        ImportKind::Namespace
    } else if has(|s| matches!(s, ImportSpecifier::Default(_))) {
        ImportKind::Default
    } else {
        ImportKind::Named
    };

    ImportRecord {
        external: is_external(&source),
        source,
        names,
        kind,
        // Usage analysis is not performed; every import counts as used.
        is_used: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ExportDecl, ImportDecl};

    fn import(source: Option<&str>, specifiers: Vec<ImportSpecifier>, line: usize) -> SyntaxNode {
        SyntaxNode::new(
            NodeKind::Import(ImportDecl {
                source: source.map(str::to_string),
                specifiers,
            }),
            line,
            line,
        )
    }

    fn named(name: &str) -> ImportSpecifier {
        ImportSpecifier::Named {
            imported: name.to_string(),
            local: name.to_string(),
        }
    }

    fn program(children: Vec<SyntaxNode>) -> SyntaxNode {
        SyntaxNode::new(NodeKind::Program, 1, 10).with_children(children)
    }

    #[test]
    fn test_import_kinds_and_names() {
        let root = program(vec![
            import(
                Some("react"),
                vec![ImportSpecifier::Default("React".into()), named("useState")],
                1,
            ),
            import(Some("./util"), vec![ImportSpecifier::Namespace("u".into())], 2),
            import(
                Some("../api"),
                vec![ImportSpecifier::Named {
                    imported: "fetchUser".into(),
                    local: "getUser".into(),
                }],
                3,
            ),
            import(Some("./side-effect.css"), vec![], 4),
        ]);

        let record = extract("src/app.js", &root).unwrap();
        assert_eq!(record.imports.len(), 4);

        let react = &record.imports[0];
        assert_eq!(react.kind, ImportKind::Default);
        assert_eq!(react.names, vec!["default", "useState"]);
        assert!(react.external);

        assert_eq!(record.imports[1].kind, ImportKind::Namespace);
        assert_eq!(record.imports[1].names, vec!["namespace"]);
        assert!(!record.imports[1].external);

        assert_eq!(record.imports[2].kind, ImportKind::Named);
        assert_eq!(record.imports[2].names, vec!["fetchUser"]);

        assert_eq!(record.imports[3].kind, ImportKind::Named);
        assert!(record.imports[3].names.is_empty());
        assert!(record.imports.iter().all(|i| i.is_used));
    }

    #[test]
    fn test_exports() {
        let root = program(vec![
            SyntaxNode::new(
                NodeKind::ExportNamed(ExportDecl {
                    source: Some("./a".into()),
                    names: vec!["x".into(), "y".into()],
                }),
                1,
                1,
            ),
            SyntaxNode::new(
                NodeKind::ExportNamed(ExportDecl {
                    source: None,
                    names: vec!["local".into()],
                }),
                2,
                2,
            ),
            SyntaxNode::new(NodeKind::ExportDefault, 3, 3),
        ]);

        let record = extract("src/index.js", &root).unwrap();
        assert_eq!(
            record.exports,
            vec![
                ExportRecord {
                    name: "x, y".into(),
                    kind: ExportKind::Named,
                    dependencies: vec!["./a".into()],
                },
                ExportRecord {
                    name: "default".into(),
                    kind: ExportKind::Default,
                    dependencies: vec![],
                },
            ]
        );
    }

    #[test]
    fn test_import_without_source_is_traversal_error() {
        let root = program(vec![import(None, vec![named("x")], 7)]);
        let err = extract("src/broken.js", &root).unwrap_err();
        match err {
            AnalysisError::InternalTraversal { path, reason } => {
                assert_eq!(path, "src/broken.js");
                assert!(reason.contains("line 7"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_is_external() {
        assert!(is_external("lodash"));
        assert!(is_external("@scope/pkg"));
        assert!(!is_external("./local"));
        assert!(!is_external("../up"));
    }
}
