//! Detection of duplicated blocks of lines.
//!
//! Every window of `window` consecutive physical lines is joined with `\n`
//! and trimmed. Windows that are long enough and comment-free are grouped by
//! their exact text; a group seen at two or more start lines is a duplicate.

use std::collections::HashMap;

use crate::analysis::lines::physical_lines;

use super::{Issue, IssueKind, Severity};

pub const DUPLICATE_RULE: &str = "duplicate-code";

const COMMENT_MARKERS: &[&str] = &["//", "/*", "*/"];

fn qualifies(block: &str, min_chars: usize) -> bool {
    block.chars().count() > min_chars && !COMMENT_MARKERS.iter().any(|m| block.contains(m))
}

/// Find duplicated windows, one issue per duplicated region.
///
/// A longer duplicated region produces one matching window per line of
/// overlap. Groups whose first start lies within `window` lines of the
/// previous group's first start belong to the same region and are folded
/// into it, so the region is reported once at its first line.
pub fn detect_duplicate_blocks(text: &str, window: usize, min_chars: usize) -> Vec<Issue> {
    let lines = physical_lines(text);
    if window == 0 || lines.len() < window {
        return Vec::new();
    }

    let mut starts: HashMap<String, Vec<usize>> = HashMap::new();
    for start in 0..=lines.len() - window {
        let block = lines[start..start + window].join("\n");
        let block = block.trim();
        if qualifies(block, min_chars) {
            starts.entry(block.to_string()).or_default().push(start + 1);
        }
    }

    let mut groups: Vec<Vec<usize>> = starts
        .into_values()
        .filter(|lines| lines.len() >= 2)
        .collect();
    groups.sort_by_key(|lines| lines[0]);

    let mut issues = Vec::new();
    let mut previous: Option<usize> = None;
    for group in groups {
        let first = group[0];
        let continues_region = previous.map_or(false, |p| first - p < window);
        previous = Some(first);
        if continues_region {
            continue;
        }
        issues.push(Issue {
            kind: IssueKind::Maintainability,
            severity: Severity::Medium,
            rule_id: DUPLICATE_RULE.to_string(),
            category: "duplication".to_string(),
            description: format!(
                "duplicate block of {} lines found {} times (lines {})",
                window,
                group.len(),
                join_lines(&group)
            ),
            line: first,
            remediation: "Extract the repeated block into a shared function".to_string(),
            references: vec![],
        });
    }

    issues
}

fn join_lines(lines: &[usize]) -> String {
    lines
        .iter()
        .map(|l| l.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
