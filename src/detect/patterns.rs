//! Detection of catalog pattern matches in file text.

use super::catalog::{Rule, RuleCatalog};
use super::Issue;

/// Maps byte offsets to 1-indexed line numbers.
pub struct LineIndex {
    newlines: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let newlines = text
            .bytes()
            .enumerate()
            .filter(|&(_, b)| b == b'\n')
            .map(|(i, _)| i)
            .collect();
        Self { newlines }
    }

    /// One plus the number of newlines strictly before `offset`.
    pub fn line_of(&self, offset: usize) -> usize {
        self.newlines.partition_point(|&nl| nl < offset) + 1
    }
}

/// Run every catalog rule over the whole text.
///
/// Issues come out in catalog order, and within one rule in text order.
pub fn detect_pattern_issues(text: &str, catalog: &RuleCatalog) -> Vec<Issue> {
    let index = LineIndex::new(text);
    let mut issues = Vec::new();

    for rule in catalog.rules() {
        if !rule.applies_to(text) {
            continue;
        }
        issues.extend(
            rule.regex()
                .find_iter(text)
                .map(|m| issue_for(rule, index.line_of(m.start()))),
        );
    }

    issues
}

fn issue_for(rule: &Rule, line: usize) -> Issue {
    let spec = rule.spec();
    Issue {
        kind: spec.kind,
        severity: spec.severity,
        rule_id: spec.id.clone(),
        category: spec.category.clone(),
        description: spec.message.clone(),
        line,
        remediation: spec.remediation.clone(),
        references: spec.references.clone(),
    }
}
