//! Output formatting for batch results.
//!
//! Supports two output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption

use colored::*;
use serde::Serialize;

use crate::analysis::AnalysisResult;
use crate::batch::{BatchReport, IssueSummaries};
use crate::detect::{Issue, RuleCatalog, Severity, SeveritySummary};

// =============================================================================
// JSON Format
// =============================================================================

/// Top-level JSON document.
#[derive(Serialize)]
pub struct JsonReport<'a> {
    pub version: &'static str,
    pub path: &'a str,
    pub files_analyzed: usize,
    pub summaries: IssueSummaries,
    pub files: Vec<&'a AnalysisResult>,
    pub failures: Vec<JsonFailure>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<&'a str>,
}

#[derive(Serialize)]
pub struct JsonFailure {
    pub path: String,
    pub error: String,
}

pub fn build_json_report<'a>(path: &'a str, report: &'a BatchReport) -> JsonReport<'a> {
    JsonReport {
        version: env!("CARGO_PKG_VERSION"),
        path,
        files_analyzed: report.registry.len(),
        summaries: report.summaries(),
        files: report.registry.iter().collect(),
        failures: report
            .failures
            .iter()
            .map(|f| JsonFailure {
                path: f.path.clone(),
                error: f.error.to_string(),
            })
            .collect(),
        skipped: report.skipped.iter().map(String::as_str).collect(),
    }
}

/// Write results in JSON format.
pub fn write_json(path: &str, report: &BatchReport) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&build_json_report(path, report))?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

pub fn write_pretty(path: &str, report: &BatchReport) {
    println!();
    print!("  ");
    print!("{}", "codelens".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Analyzing: ".dimmed());
    println!("{}", path);
    print!("  {}", "Files:     ".dimmed());
    println!("{}", report.registry.len());
    println!();

    for result in report.registry.iter() {
        if has_findings(result) {
            write_file(result);
            println!();
        }
    }

    if !report.failures.is_empty() {
        println!("  {} ({}):", "Failed".red().bold(), report.failures.len());
        for failure in &report.failures {
            println!("    {}  {}", failure.path.blue(), failure.error);
        }
        println!();
    }
    if !report.skipped.is_empty() {
        println!(
            "  {}",
            format!("{} files skipped (cancelled)", report.skipped.len()).dimmed()
        );
        println!();
    }

    let summaries = report.summaries();
    write_summaries(&summaries);
    println!();
    write_final_status(&summaries);
    println!();
}

fn has_findings(result: &AnalysisResult) -> bool {
    let deps = &result.dependencies;
    !result.issues.is_empty()
        || !result.recommendations.is_empty()
        || !deps.circular_dependencies.is_empty()
        || !deps.missing_dependencies.is_empty()
        || result.parse_error.is_some()
}

fn write_file(result: &AnalysisResult) {
    let m = &result.metrics;
    println!("  {}", result.path.blue().bold());
    println!(
        "    {}",
        format!(
            "cyclomatic {}  cognitive {}  maintainability {}  loc {}/{}",
            m.cyclomatic_complexity,
            m.cognitive_complexity,
            m.maintainability_index,
            m.logical_lines_of_code,
            m.lines_of_code
        )
        .dimmed()
    );

    if let Some(err) = &result.parse_error {
        println!("    {} {}", "PARSE".yellow(), err);
    }

    for issue in &result.issues {
        write_issue(issue);
    }

    let deps = &result.dependencies;
    if !deps.circular_dependencies.is_empty() {
        println!(
            "    {} {}",
            "CYCLE".magenta(),
            deps.circular_dependencies.join(" -> ")
        );
    }
    for missing in &deps.missing_dependencies {
        println!("    {} {}", "MISSING".yellow(), missing);
    }

    for rec in &result.recommendations {
        print!("    ");
        write_severity_tag(rec.priority);
        println!(
            " {:<9}{}",
            format!("{:?}", rec.kind).to_lowercase().dimmed(),
            rec.description
        );
    }
}

fn write_issue(issue: &Issue) {
    print!("    ");
    write_severity_tag(issue.severity);
    print!("  {:<28}", issue.rule_id.dimmed());
    println!("{}", format!("line {}", issue.line).dimmed());
    println!("              {}", issue.description);
}

fn write_severity_tag(severity: Severity) {
    let tag = format!("{:<8}", severity.as_str().to_uppercase());
    match severity {
        Severity::Critical => print!("{}", tag.red().bold()),
        Severity::High => print!("{}", tag.red()),
        Severity::Medium => print!("{}", tag.yellow()),
        Severity::Low => print!("{}", tag.blue()),
        Severity::None => print!("{}", tag.dimmed()),
    }
}

fn write_summaries(summaries: &IssueSummaries) {
    println!(
        "  {:<16}{:>7}{:>10}{:>7}{:>9}{:>6}",
        "Summary".bold(),
        "total",
        "critical",
        "high",
        "medium",
        "low"
    );
    write_summary_row("security", &summaries.security);
    write_summary_row("performance", &summaries.performance);
    write_summary_row("maintainability", &summaries.maintainability);
}

fn write_summary_row(label: &str, s: &SeveritySummary) {
    println!(
        "  {:<16}{:>7}{:>10}{:>7}{:>9}{:>6}",
        label, s.total, s.critical, s.high, s.medium, s.low
    );
}

fn write_final_status(summaries: &IssueSummaries) {
    let critical = summaries.critical();
    if critical == 0 {
        println!("  {}", "✓ No critical issues".green());
    } else {
        println!(
            "  {}",
            format!("✗ {} critical issue(s)", critical).red().bold()
        );
    }
}

/// Print the active rule catalog.
pub fn write_rules(catalog: &RuleCatalog) {
    println!();
    println!("  {} ({}):", "Rules".bold(), catalog.len());
    println!();
    for rule in catalog.rules() {
        let spec = rule.spec();
        print!("    ");
        write_severity_tag(spec.severity);
        println!(
            "  {:<32}{}",
            spec.id.cyan(),
            format!("{} / {}", spec.kind, spec.category).dimmed()
        );
        println!("              {}", spec.message);
    }
    if !catalog.rejected().is_empty() {
        println!();
        println!("  {} ({}):", "Rejected".red().bold(), catalog.rejected().len());
        for err in catalog.rejected() {
            println!("    {}", err);
        }
    }
    println!();
}
