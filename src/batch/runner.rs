//! Two-phase batch orchestration.
//!
//! Phase 1 analyzes every unit in parallel. Phase 2 starts once all of
//! phase 1 is done: it builds the dependency graph, searches cycles from
//! every file in parallel over the read-only graph, then writes each file's
//! cross-file findings into its own record.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::graph::DependencyGraph;
use super::registry::{IssueSummaries, Registry};
use crate::analysis::{AnalysisResult, FileAnalyzer, SourceUnit};
use crate::config::Config;
use crate::error::AnalysisError;

/// Shared flag that stops a batch from starting further units.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A unit whose analysis failed.
#[derive(Debug)]
pub struct BatchFailure {
    pub path: String,
    pub error: AnalysisError,
}

/// Outcome of one batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub registry: Registry,
    pub failures: Vec<BatchFailure>,
    /// Units not started because the batch was cancelled.
    pub skipped: Vec<String>,
}

impl BatchReport {
    pub fn summaries(&self) -> IssueSummaries {
        self.registry.summaries()
    }
}

enum Outcome {
    Done(AnalysisResult),
    Failed(AnalysisError),
    Skipped,
}

/// Runs a [`FileAnalyzer`] over many units and links the results.
pub struct BatchRunner {
    analyzer: FileAnalyzer,
    cancel: CancellationToken,
}

impl BatchRunner {
    pub fn new(analyzer: FileAnalyzer) -> Self {
        Self {
            analyzer,
            cancel: CancellationToken::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(FileAnalyzer::from_config(config))
    }

    /// Use `token` to cancel this runner from elsewhere.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn run(&self, units: Vec<SourceUnit>) -> BatchReport {
        info!("analyzing {} files", units.len());
        let mut report = self.analyze_all(&units);
        if !report.skipped.is_empty() {
            warn!("batch cancelled; {} files skipped", report.skipped.len());
        }
        link(&mut report.registry);
        report
    }

    fn analyze_all(&self, units: &[SourceUnit]) -> BatchReport {
        let outcomes: Vec<Outcome> = units
            .par_iter()
            .map(|unit| {
                if self.cancel.is_cancelled() {
                    return Outcome::Skipped;
                }
                match self.analyzer.analyze(unit) {
                    Ok(result) => Outcome::Done(result),
                    Err(e) => Outcome::Failed(e),
                }
            })
            .collect();

        // Collect in input order so a repeated path keeps its last result.
        let mut report = BatchReport::default();
        for (unit, outcome) in units.iter().zip(outcomes) {
            match outcome {
                Outcome::Done(result) => {
                    report.registry.insert(result);
                }
                Outcome::Failed(error) => {
                    warn!("failed to analyze {}: {}", unit.path, error);
                    report.failures.push(BatchFailure {
                        path: unit.path.clone(),
                        error,
                    });
                }
                Outcome::Skipped => report.skipped.push(unit.path.clone()),
            }
        }
        report
    }
}

/// Fill the cross-file lists of every record.
fn link(registry: &mut Registry) {
    let graph = DependencyGraph::build(registry);

    let findings: Vec<(String, Vec<String>, Vec<String>, Vec<String>)> = {
        let paths: Vec<&str> = registry.paths().collect();
        paths
            .par_iter()
            .map(|&path| {
                let cycle = graph.find_cycle(path);
                let missing = graph.missing(path);
                let unused = registry
                    .get(path)
                    .map(unused_imports)
                    .unwrap_or_default();
                (path.to_string(), cycle, unused, missing)
            })
            .collect()
    };

    for (path, cycle, unused, missing) in findings {
        if !cycle.is_empty() {
            debug!("{}: import cycle {}", path, cycle.join(" -> "));
        }
        if let Some(result) = registry.get_mut(&path) {
            let deps = &mut result.dependencies;
            deps.circular_dependencies = cycle;
            deps.unused_dependencies = unused;
            deps.missing_dependencies = missing;
        }
    }
}

/// Imports marked unused. Extraction marks every import used, so this is
/// empty until usage analysis exists.
fn unused_imports(result: &AnalysisResult) -> Vec<String> {
    result
        .dependencies
        .imports
        .iter()
        .filter(|import| !import.is_used)
        .map(|import| import.source.clone())
        .collect()
}
