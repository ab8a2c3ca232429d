//! Integration tests for single-file analysis.
//!
//! These tests parse the testdata fixtures with the tree-sitter provider
//! and check the full per-file result.

#![cfg(feature = "tree-sitter")]

use std::path::PathBuf;

use codelens::analysis::RecommendationKind;
use codelens::{FileAnalyzer, IssueKind, Severity, SourceUnit};

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn load(name: &str) -> SourceUnit {
    let text = std::fs::read_to_string(testdata_path().join(name)).expect("fixture should exist");
    SourceUnit::from_path(name, text)
}

#[test]
fn test_vulnerable_file_issues() {
    let result = FileAnalyzer::default()
        .analyze(&load("vulnerable.js"))
        .expect("analysis should succeed");
    assert!(!result.is_degraded(), "{:?}", result.parse_error);

    let found: Vec<(&str, usize)> = result
        .issues
        .iter()
        .map(|i| (i.rule_id.as_str(), i.line))
        .collect();
    assert_eq!(
        found,
        vec![
            ("sql-injection-concat", 7),
            ("xss-inner-html", 12),
            ("hardcoded-secret", 4),
            ("eval-call", 16),
            ("interval-without-cleanup", 19),
        ]
    );

    assert_eq!(result.lines[6].security_risk, Severity::Critical);
    assert_eq!(result.lines[18].performance_risk, Severity::Medium);
    assert_eq!(result.lines[0].security_risk, Severity::None);

    let kinds: Vec<_> = result.recommendations.iter().map(|r| r.kind).collect();
    assert_eq!(kinds, vec![RecommendationKind::Secure]);
    assert!(result.recommendations[0].description.starts_with("2 "));
}

#[test]
fn test_vulnerable_file_dependencies() {
    let result = FileAnalyzer::default()
        .analyze(&load("vulnerable.js"))
        .unwrap();
    let imports = &result.dependencies.imports;

    assert_eq!(imports.len(), 2);
    assert_eq!(imports[0].source, "express");
    assert!(imports[0].external);
    assert_eq!(imports[1].source, "./db");
    assert!(!imports[1].external);
    assert_eq!(imports[1].names, vec!["db"]);
    // filled in only by a batch run
    assert!(result.dependencies.missing_dependencies.is_empty());
}

#[test]
fn test_clean_file_documentation() {
    let result = FileAnalyzer::default().analyze(&load("clean.ts")).unwrap();
    assert!(!result.is_degraded(), "{:?}", result.parse_error);
    assert!(result.issues.is_empty(), "{:#?}", result.issues);

    let docs = &result.documentation;
    assert_eq!(docs.purpose, "Currency helpers for the checkout page.");
    assert_eq!(docs.parameters.len(), 2);
    assert_eq!(docs.parameters[0].name, "amount");
    assert_eq!(docs.parameters[0].type_name, "number");
    assert!(!docs.parameters[0].optional);
    assert!(docs.parameters[1].optional);
    assert_eq!(docs.returns.as_deref(), Some("{string} formatted price"));
    assert_eq!(docs.examples, vec!["formatPrice(1999, 'EUR');"]);
    assert_eq!(docs.functionality, "1 function, 0 classes, 0 imports, 2 exports");

    assert_eq!(result.dependencies.exports.len(), 1);
    assert_eq!(result.dependencies.exports[0].name, "default");
}

#[test]
fn test_broken_file_is_degraded() {
    let result = FileAnalyzer::default().analyze(&load("broken.js")).unwrap();

    assert!(result.is_degraded());
    assert!(result.parse_error.as_ref().unwrap().line.is_some());
    assert_eq!(result.lines.len(), 4);
    assert_eq!(result.metrics.cyclomatic_complexity, 1);
    assert_eq!(result.metrics.cognitive_complexity, 0);
    assert_eq!(result.metrics.lines_of_code, 4);
    assert_eq!(result.metrics.logical_lines_of_code, 3);
    assert!(result.issues.is_empty());
    assert!(result.dependencies.exports.is_empty());
}

#[test]
fn test_duplicate_block_reported_once() {
    let result = FileAnalyzer::default()
        .analyze(&load("duplicate.js"))
        .unwrap();

    let duplicates: Vec<_> = result
        .issues
        .iter()
        .filter(|i| i.rule_id == "duplicate-code")
        .collect();
    assert_eq!(duplicates.len(), 1, "{:#?}", duplicates);
    assert_eq!(duplicates[0].line, 1);
    assert_eq!(duplicates[0].kind, IssueKind::Maintainability);
    assert!(duplicates[0].description.contains("2 times"));
}

#[test]
fn test_control_flow_metrics() {
    let text = "function walk(a, b) {
  if (a) {
    for (const x of b) {
      while (x.next) { x.step(); }
    }
  }
}
";
    let result = FileAnalyzer::default()
        .analyze(&SourceUnit::from_path("walk.js", text))
        .unwrap();
    // if + for-of + while
    assert_eq!(result.metrics.cyclomatic_complexity, 4);
    // if (1) + while nested once (2); for-of does not nest
    assert_eq!(result.metrics.cognitive_complexity, 3);
    assert_eq!(result.metrics.lines_of_code, 8);
    assert_eq!(result.metrics.logical_lines_of_code, 7);
}

#[test]
fn test_switch_and_logical_metrics() {
    let text = "switch (k) {\n  case 1: run(a || b); break;\n  default: stop();\n}\n";
    let result = FileAnalyzer::default()
        .analyze(&SourceUnit::from_path("switch.js", text))
        .unwrap();
    // case + default + ||
    assert_eq!(result.metrics.cyclomatic_complexity, 4);
    assert_eq!(result.metrics.cognitive_complexity, 1);
}

#[test]
fn test_deeper_nesting_raises_metrics() {
    let flat = "if (a) { x(); }\nif (b) { y(); }\n";
    let nested = "if (a) {\n  if (b) { y(); }\n}\n";
    let analyzer = FileAnalyzer::default();

    let flat = analyzer.analyze(&SourceUnit::from_path("flat.js", flat)).unwrap();
    let nested = analyzer
        .analyze(&SourceUnit::from_path("nested.js", nested))
        .unwrap();
    assert_eq!(flat.metrics.cyclomatic_complexity, nested.metrics.cyclomatic_complexity);
    assert!(nested.metrics.cognitive_complexity > flat.metrics.cognitive_complexity);
}

#[test]
fn test_analysis_is_pure() {
    let analyzer = FileAnalyzer::default();
    let unit = load("vulnerable.js");
    assert_eq!(analyzer.analyze(&unit).unwrap(), analyzer.analyze(&unit).unwrap());
}

#[test]
fn test_typescript_import_require_and_export_all() {
    let unit = SourceUnit::from_path(
        "src/a.ts",
        "import fs = require('fs');\nexport * from './b';\nexport const x = fs;\n",
    );
    let result = FileAnalyzer::default()
        .analyze(&unit)
        .expect("valid TypeScript should analyze");
    assert!(!result.is_degraded(), "{:?}", result.parse_error);

    let imports = &result.dependencies.imports;
    assert_eq!(imports.len(), 1);
    assert_eq!(imports[0].source, "fs");
    assert_eq!(imports[0].names, vec!["default"]);
    assert!(imports[0].external);

    let exports = &result.dependencies.exports;
    assert_eq!(exports.len(), 1);
    assert_eq!(exports[0].name, "*");
    assert_eq!(exports[0].dependencies, vec!["./b"]);
}
