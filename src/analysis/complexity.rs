//! Whole-unit complexity metrics computed from the syntax tree.
//!
//! Cyclomatic complexity is calculated as:
//! - Start at 1
//! - Add 1 for each: if, ternary, logical operator, case, catch, and every loop form
//!
//! Cognitive complexity charges `1 + nesting` for each nesting construct
//! (if, for, while, do-while, switch, try, catch) and increments nesting
//! while inside it.

use crate::ast::{NodeKind, SyntaxNode, Visit};

use super::lines::{is_logical_line, physical_lines};
use super::types::ComplexityMetrics;

/// Whether a node is a cyclomatic decision point.
fn is_decision_point(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::If
            | NodeKind::Conditional
            | NodeKind::Logical
            | NodeKind::SwitchCase
            | NodeKind::Catch
            | NodeKind::For
            | NodeKind::ForIn
            | NodeKind::ForOf
            | NodeKind::While
            | NodeKind::DoWhile
    )
}

/// Whether a node increases nesting for cognitive complexity.
fn is_nesting_construct(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::If
            | NodeKind::For
            | NodeKind::While
            | NodeKind::DoWhile
            | NodeKind::Switch
            | NodeKind::Try
            | NodeKind::Catch
    )
}

pub fn cyclomatic_complexity(root: &SyntaxNode) -> u32 {
    let decisions = root
        .descendants()
        .filter(|node| is_decision_point(&node.kind))
        .count();
    1 + decisions as u32
}

pub fn cognitive_complexity(root: &SyntaxNode) -> u32 {
    let mut total = 0;
    let mut nesting = 0;

    for visit in root.traverse() {
        match visit {
            Visit::Enter(node) if is_nesting_construct(&node.kind) => {
                total += 1 + nesting;
                nesting += 1;
            }
            Visit::Exit(node) if is_nesting_construct(&node.kind) => {
                nesting -= 1;
            }
            _ => {}
        }
    }

    total
}

/// Maintainability index (0-100) from complexity density and raw size.
pub fn maintainability_index(cyclomatic: u32, lines_of_code: usize, logical_lines: usize) -> u32 {
    let average = f64::from(cyclomatic) / logical_lines.max(1) as f64;
    let complexity_factor = (100.0 - average * 20.0).max(0.0);
    let length_factor = (100.0 - lines_of_code as f64 / 100.0).max(0.0);
    ((complexity_factor + length_factor) / 2.0).round() as u32
}

/// Physical and logical line counts of a text.
pub fn line_counts(text: &str) -> (usize, usize) {
    let lines = physical_lines(text);
    let logical = lines.iter().filter(|l| is_logical_line(l)).count();
    (lines.len(), logical)
}

/// Metrics for a file the provider could not parse: base complexity only.
pub fn seed_metrics(text: &str) -> ComplexityMetrics {
    let (lines_of_code, logical_lines_of_code) = line_counts(text);
    ComplexityMetrics {
        cyclomatic_complexity: 1,
        cognitive_complexity: 0,
        lines_of_code,
        logical_lines_of_code,
        maintainability_index: maintainability_index(1, lines_of_code, logical_lines_of_code),
    }
}

/// Compute all metrics for a parsed file.
pub fn analyze(text: &str, root: &SyntaxNode) -> ComplexityMetrics {
    let (lines_of_code, logical_lines_of_code) = line_counts(text);
    let cyclomatic = cyclomatic_complexity(root);
    ComplexityMetrics {
        cyclomatic_complexity: cyclomatic,
        cognitive_complexity: cognitive_complexity(root),
        lines_of_code,
        logical_lines_of_code,
        maintainability_index: maintainability_index(
            cyclomatic,
            lines_of_code,
            logical_lines_of_code,
        ),
    }
}
