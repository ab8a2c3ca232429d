//! Issue detection.
//!
//! Pattern rules come from a [`RuleCatalog`]; structural detectors use the
//! syntax tree (oversized functions) or raw lines (duplicate blocks).

pub mod catalog;
mod duplicates;
mod functions;
mod patterns;
mod types;

pub use catalog::{default_specs, Rule, RuleCatalog, RuleSpec};
pub use duplicates::{detect_duplicate_blocks, DUPLICATE_RULE};
pub use functions::{detect_oversized_functions, OVERSIZED_FUNCTION_RULE};
pub use patterns::{detect_pattern_issues, LineIndex};
pub use types::{Issue, IssueKind, Severity, SeveritySummary};

use crate::ast::SyntaxNode;
use crate::config::Thresholds;

/// Run every detector over one file.
///
/// Order: catalog rules, then oversized functions in tree order, then
/// duplicate blocks by first line. Without a tree only the text-based
/// detectors run.
pub fn detect_issues(
    text: &str,
    root: Option<&SyntaxNode>,
    catalog: &RuleCatalog,
    thresholds: &Thresholds,
) -> Vec<Issue> {
    let mut issues = detect_pattern_issues(text, catalog);
    if let Some(root) = root {
        issues.extend(detect_oversized_functions(
            root,
            thresholds.max_function_lines,
        ));
    }
    issues.extend(detect_duplicate_blocks(
        text,
        thresholds.duplicate_window,
        thresholds.duplicate_min_chars,
    ));
    issues
}
