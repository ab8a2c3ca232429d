//! Detection of oversized function bodies.

use crate::ast::{NodeKind, SyntaxNode};

use super::{Issue, IssueKind, Severity};

pub const OVERSIZED_FUNCTION_RULE: &str = "oversized-function";

/// Flag every function node spanning more than `max_lines` lines.
///
/// Nested functions are checked independently, so a long inner function
/// inside a long outer one yields two issues.
pub fn detect_oversized_functions(root: &SyntaxNode, max_lines: usize) -> Vec<Issue> {
    root.descendants()
        .filter(|node| node.kind == NodeKind::Function)
        .filter(|node| node.line_span() > max_lines)
        .map(|node| Issue {
            kind: IssueKind::Maintainability,
            severity: Severity::Medium,
            rule_id: OVERSIZED_FUNCTION_RULE.to_string(),
            category: "function-size".to_string(),
            description: format!(
                "function spans {} lines (max {})",
                node.line_span(),
                max_lines
            ),
            line: node.start_line,
            remediation: "Extract cohesive steps into smaller functions".to_string(),
            references: vec![],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn function(start: usize, end: usize) -> SyntaxNode {
        SyntaxNode::new(NodeKind::Function, start, end)
    }

    #[test]
    fn test_span_threshold_is_exclusive() {
        let root = SyntaxNode::new(NodeKind::Program, 1, 200)
            .with_children(vec![function(1, 50), function(60, 110)]);

        let issues = detect_oversized_functions(&root, 50);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 60);
        assert!(issues[0].description.contains("51 lines"));
    }

    #[test]
    fn test_nested_functions_in_tree_order() {
        let inner = function(20, 90);
        let outer = function(10, 100).with_children(vec![inner]);
        let root = SyntaxNode::new(NodeKind::Program, 1, 100).with_children(vec![outer]);

        let lines: Vec<_> = detect_oversized_functions(&root, 50)
            .into_iter()
            .map(|i| i.line)
            .collect();
        assert_eq!(lines, vec![10, 20]);
    }

    #[test]
    fn test_classes_are_not_functions() {
        let root = SyntaxNode::new(NodeKind::Program, 1, 500)
            .with_children(vec![SyntaxNode::new(NodeKind::Class, 1, 500)]);
        assert!(detect_oversized_functions(&root, 50).is_empty());
    }
}
