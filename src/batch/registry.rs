//! Results of one batch run, keyed by file path.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisResult;
use crate::detect::{Issue, IssueKind, SeveritySummary};

/// Arena of analysis results. Iteration is ordered by path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    results: BTreeMap<String, AnalysisResult>,
}

/// Severity counts per issue kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSummaries {
    pub security: SeveritySummary,
    pub performance: SeveritySummary,
    pub maintainability: SeveritySummary,
}

impl IssueSummaries {
    pub fn record(&mut self, issue: &Issue) {
        let bucket = match issue.kind {
            IssueKind::Security => &mut self.security,
            IssueKind::Performance => &mut self.performance,
            IssueKind::Maintainability => &mut self.maintainability,
        };
        bucket.record(issue.severity);
    }

    pub fn total(&self) -> usize {
        self.security.total + self.performance.total + self.maintainability.total
    }

    pub fn critical(&self) -> usize {
        self.security.critical + self.performance.critical + self.maintainability.critical
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a result under its path, replacing any earlier one.
    pub fn insert(&mut self, result: AnalysisResult) -> Option<AnalysisResult> {
        self.results.insert(result.path.clone(), result)
    }

    pub fn get(&self, path: &str) -> Option<&AnalysisResult> {
        self.results.get(path)
    }

    pub fn get_mut(&mut self, path: &str) -> Option<&mut AnalysisResult> {
        self.results.get_mut(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.results.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.results.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnalysisResult> {
        self.results.values()
    }

    /// Severity counts over every issue of every file, in one pass.
    pub fn summaries(&self) -> IssueSummaries {
        let mut summaries = IssueSummaries::default();
        for issue in self.iter().flat_map(|r| r.issues.iter()) {
            summaries.record(issue);
        }
        summaries
    }
}

impl IntoIterator for Registry {
    type Item = AnalysisResult;
    type IntoIter = std::collections::btree_map::IntoValues<String, AnalysisResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{
        ComplexityMetrics, DependencyRecord, DocumentationSummary,
    };
    use crate::ast::Language;
    use crate::detect::Severity;

    fn result(path: &str, issues: Vec<Issue>) -> AnalysisResult {
        AnalysisResult {
            path: path.to_string(),
            language: Language::JavaScript,
            lines: vec![],
            metrics: ComplexityMetrics {
                cyclomatic_complexity: 1,
                cognitive_complexity: 0,
                lines_of_code: 1,
                logical_lines_of_code: 0,
                maintainability_index: 100,
            },
            dependencies: DependencyRecord::default(),
            issues,
            documentation: DocumentationSummary::default(),
            recommendations: vec![],
            parse_error: None,
        }
    }

    fn issue(kind: IssueKind, severity: Severity) -> Issue {
        Issue {
            kind,
            severity,
            rule_id: "r".into(),
            category: "c".into(),
            description: String::new(),
            line: 1,
            remediation: String::new(),
            references: vec![],
        }
    }

    #[test]
    fn test_last_write_wins() {
        let mut registry = Registry::new();
        assert!(registry.insert(result("a.js", vec![])).is_none());
        let replaced = registry.insert(result(
            "a.js",
            vec![issue(IssueKind::Security, Severity::Low)],
        ));
        assert!(replaced.is_some());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("a.js").unwrap().issues.len(), 1);
    }

    #[test]
    fn test_paths_are_ordered() {
        let mut registry = Registry::new();
        for path in ["c.js", "a.js", "b.js"] {
            registry.insert(result(path, vec![]));
        }
        assert_eq!(registry.paths().collect::<Vec<_>>(), vec!["a.js", "b.js", "c.js"]);
    }

    #[test]
    fn test_summaries() {
        let mut registry = Registry::new();
        registry.insert(result(
            "a.js",
            vec![
                issue(IssueKind::Security, Severity::Critical),
                issue(IssueKind::Security, Severity::High),
                issue(IssueKind::Performance, Severity::Medium),
            ],
        ));
        registry.insert(result(
            "b.js",
            vec![
                issue(IssueKind::Security, Severity::Critical),
                issue(IssueKind::Maintainability, Severity::Low),
                issue(IssueKind::Maintainability, Severity::None),
            ],
        ));

        let s = registry.summaries();
        assert_eq!(s.security.total, 3);
        assert_eq!(s.security.critical, 2);
        assert_eq!(s.security.high, 1);
        assert_eq!(s.performance.medium, 1);
        assert_eq!(s.maintainability.total, 2);
        assert_eq!(s.maintainability.low, 1);
        assert_eq!(s.total(), 6);
        assert_eq!(s.critical(), 2);
    }
}
