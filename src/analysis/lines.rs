//! Per-line classification and scoring.
//!
//! Classification is deliberately textual: keyword tests are substring
//! checks, so a keyword inside a string literal or identifier still counts
//! (`let retry = 3;` is error-handling). Scores here are independent of the
//! AST metrics and only feed per-line recommendations.

use lazy_static::lazy_static;
use regex::Regex;

use super::types::{LineCategory, LineRecord};
use crate::detect::{Issue, IssueKind, Severity};

lazy_static! {
    static ref TERNARY: Regex = Regex::new(r"\?[^:?]*:").unwrap();
    static ref LOOP_KEYWORD: Regex = Regex::new(r"\b(?:for|while|do)\b").unwrap();
    static ref BRANCH_KEYWORD: Regex = Regex::new(r"\b(?:if|else|switch|case)\b").unwrap();
    static ref CALL: Regex = Regex::new(r"[A-Za-z_$][\w$]*\(").unwrap();
    static ref NUMERIC_LITERAL: Regex = Regex::new(r"\b\d{2,}\b").unwrap();
    static ref DECLARATION: Regex = Regex::new(r"\b(?:const|let|var)\s").unwrap();
    static ref SHORT_DECLARED_NAME: Regex =
        Regex::new(r"\b(?:const|let|var)\s+[A-Za-z_$][A-Za-z0-9_$]?(?:[^A-Za-z0-9_$]|$)").unwrap();
}

const CONTROL_FLOW_MARKERS: &[&str] = &[
    "if (", "if(", "else", "for (", "for(", "while", "switch", "case ",
];
const ERROR_HANDLING_MARKERS: &[&str] = &["try", "catch", "throw", "finally"];
const VARIABLE_MARKERS: &[&str] = &["const ", "let ", "var "];

/// Complexity above which a line gets a split-it-up recommendation.
const LINE_COMPLEXITY_HINT: u32 = 5;
/// Maintainability below which a line gets a readability recommendation.
const LINE_MAINTAINABILITY_HINT: u32 = 60;

/// Split text into physical lines.
///
/// Splits on `'\n'` and strips one trailing `'\r'`. Empty text is a single
/// empty line and a trailing newline yields a final empty line, so line N is
/// always preceded by exactly N-1 newlines.
pub fn physical_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// Whether a line counts toward logical lines of code.
pub fn is_logical_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && !trimmed.starts_with("//")
}

/// Classify one trimmed line. Categories are tested in priority order.
pub fn classify_line(trimmed: &str) -> LineCategory {
    let contains_any = |markers: &[&str]| markers.iter().any(|m| trimmed.contains(m));

    if trimmed.is_empty() {
        LineCategory::Empty
    } else if trimmed.starts_with("//") || trimmed.starts_with("/*") || trimmed.starts_with('*') {
        LineCategory::Comment
    } else if trimmed.starts_with("import ") || trimmed.contains("require(") {
        LineCategory::Import
    } else if trimmed.starts_with("export ") {
        LineCategory::Export
    } else if trimmed.contains("function") || trimmed.contains("=>") {
        LineCategory::Function
    } else if trimmed.contains("class ") {
        LineCategory::Class
    } else if contains_any(CONTROL_FLOW_MARKERS) {
        LineCategory::ControlFlow
    } else if contains_any(ERROR_HANDLING_MARKERS) {
        LineCategory::ErrorHandling
    } else if contains_any(VARIABLE_MARKERS) {
        LineCategory::Variable
    } else {
        LineCategory::Empty
    }
}

/// Textual complexity heuristic for a single line.
pub fn line_complexity(line: &str) -> u32 {
    let logical = line.matches("&&").count() + line.matches("||").count();
    let negations = line
        .char_indices()
        .filter(|&(i, c)| c == '!' && !line[i + 1..].starts_with('='))
        .count();
    let ternaries = TERNARY.find_iter(line).count();
    let loops = LOOP_KEYWORD.find_iter(line).count();
    let branches = BRANCH_KEYWORD.find_iter(line).count();
    let calls = CALL.find_iter(line).count();
    let open = line.matches('(').count();
    let close = line.matches(')').count();

    (logical + negations + ternaries + loops + branches + calls + open.abs_diff(close)) as u32
}

/// Readability score for a raw (untrimmed) line, 0 to 100.
pub fn line_maintainability(raw: &str, category: LineCategory) -> u32 {
    let mut score: i32 = 100;
    let length = raw.chars().count();

    if length > 120 {
        score -= 20;
    }
    if length > 200 {
        score -= 30;
    }
    if raw.contains("&&") || raw.contains("||") {
        score -= 10;
    }
    let indent = raw.chars().take_while(|c| c.is_whitespace()).count();
    if indent > 20 {
        score -= 20;
    }
    if NUMERIC_LITERAL.is_match(raw) && !DECLARATION.is_match(raw) {
        score -= 15;
    }
    if category == LineCategory::Variable && SHORT_DECLARED_NAME.is_match(raw) {
        score -= 10;
    }

    score.max(0) as u32
}

/// Short description attached to every line of a category.
pub fn category_doc(category: LineCategory) -> &'static str {
    match category {
        LineCategory::Empty => "",
        LineCategory::Comment => "Comment",
        LineCategory::Import => "Imports a dependency",
        LineCategory::Export => "Exports a symbol from this module",
        LineCategory::Function => "Function definition or expression",
        LineCategory::Class => "Class definition",
        LineCategory::ControlFlow => "Control flow branch or loop",
        LineCategory::ErrorHandling => "Error handling",
        LineCategory::Variable => "Variable declaration",
    }
}

/// Build one record per physical line, attaching issue risk levels.
pub fn build_line_records(text: &str, issues: &[Issue]) -> Vec<LineRecord> {
    let lines = physical_lines(text);
    let mut security = vec![Severity::None; lines.len()];
    let mut performance = vec![Severity::None; lines.len()];

    for issue in issues {
        let Some(index) = issue.line.checked_sub(1).filter(|i| *i < lines.len()) else {
            continue;
        };
        let slot = match issue.kind {
            IssueKind::Security => &mut security[index],
            IssueKind::Performance => &mut performance[index],
            IssueKind::Maintainability => continue,
        };
        *slot = (*slot).max(issue.severity);
    }

    lines
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            let category = classify_line(raw.trim());
            let complexity = line_complexity(raw);
            let maintainability = line_maintainability(raw, category);
            let recommendations = line_recommendations(
                complexity,
                maintainability,
                security[index],
                performance[index],
            );
            LineRecord {
                line_number: index + 1,
                content: raw.to_string(),
                category,
                complexity,
                security_risk: security[index],
                performance_risk: performance[index],
                maintainability,
                docs: category_doc(category).to_string(),
                recommendations,
            }
        })
        .collect()
}

fn line_recommendations(
    complexity: u32,
    maintainability: u32,
    security: Severity,
    performance: Severity,
) -> Vec<String> {
    let mut out = Vec::new();
    if complexity > LINE_COMPLEXITY_HINT {
        out.push("Split this expression into smaller, named steps".to_string());
    }
    if maintainability < LINE_MAINTAINABILITY_HINT {
        out.push("Shorten or reformat this line to improve readability".to_string());
    }
    if security >= Severity::High {
        out.push(format!("Review the {} security finding on this line", security));
    }
    if performance >= Severity::Medium {
        out.push(format!("Review the {} performance finding on this line", performance));
    }
    out
}
