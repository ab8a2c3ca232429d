//! File-level recommendations synthesized from metrics, issues and lines.

use crate::config::Thresholds;
use crate::detect::{Issue, IssueKind, Severity};

use super::types::{ComplexityMetrics, Effort, LineRecord, Recommendation, RecommendationKind};

/// Cyclomatic complexity above which a refactor becomes high priority.
const URGENT_REFACTOR_COMPLEXITY: u32 = 20;

/// Mean per-line complexity, zero for no lines.
pub fn mean_line_complexity(lines: &[LineRecord]) -> f64 {
    if lines.is_empty() {
        return 0.0;
    }
    let total: u64 = lines.iter().map(|l| u64::from(l.complexity)).sum();
    total as f64 / lines.len() as f64
}

/// Recommendations in fixed order: refactor, secure, optimize.
pub fn synthesize(
    metrics: &ComplexityMetrics,
    issues: &[Issue],
    lines: &[LineRecord],
    thresholds: &Thresholds,
) -> Vec<Recommendation> {
    let mut out = Vec::new();

    let cc = metrics.cyclomatic_complexity;
    if cc > thresholds.refactor_complexity {
        let urgent = cc > URGENT_REFACTOR_COMPLEXITY;
        out.push(Recommendation {
            kind: RecommendationKind::Refactor,
            priority: if urgent { Severity::High } else { Severity::Medium },
            description: format!(
                "Cyclomatic complexity is {} (threshold {})",
                cc, thresholds.refactor_complexity
            ),
            implementation: "Split branching logic into smaller functions and replace \
                             conditional chains with lookup tables or early returns"
                .to_string(),
            effort: if urgent { Effort::High } else { Effort::Medium },
            benefits: vec![
                "Easier to test each path".to_string(),
                "Lower defect risk when changing behavior".to_string(),
            ],
            risks: vec!["Behavior changes if extracted paths are not covered by tests".to_string()],
        });
    }

    let critical_security = issues
        .iter()
        .filter(|i| i.kind == IssueKind::Security && i.severity == Severity::Critical)
        .count();
    if critical_security > 0 {
        out.push(Recommendation {
            kind: RecommendationKind::Secure,
            priority: Severity::Critical,
            description: format!("{} critical security issue(s) found", critical_security),
            implementation: "Fix each critical finding following its remediation advice \
                             before shipping"
                .to_string(),
            effort: Effort::Medium,
            benefits: vec!["Closes exploitable vulnerabilities".to_string()],
            risks: vec!["Input handling changes may reject data previously accepted".to_string()],
        });
    }

    let mean = mean_line_complexity(lines);
    if mean > thresholds.optimize_line_complexity {
        out.push(Recommendation {
            kind: RecommendationKind::Optimize,
            priority: Severity::Medium,
            description: format!("Average line complexity is {:.1}", mean),
            implementation: "Break dense expressions into named intermediate values".to_string(),
            effort: Effort::Low,
            benefits: vec!["Faster review and debugging".to_string()],
            risks: vec![],
        });
    }

    out
}
