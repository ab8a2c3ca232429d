//! Single-file analysis pipeline.

use tracing::debug;

use crate::ast::{default_provider, AstProvider};
use crate::config::{Config, Thresholds};
use crate::detect::{detect_issues, RuleCatalog};
use crate::error::{AnalysisError, ParseError};

use super::lines::build_line_records;
use super::types::{AnalysisResult, DependencyRecord, DocumentationSummary, SourceUnit};
use super::{complexity, dependencies, docs, recommend};

/// Runs every per-file analysis over a [`SourceUnit`].
///
/// Holds no per-file state, so one analyzer serves any number of threads.
pub struct FileAnalyzer {
    provider: Box<dyn AstProvider>,
    catalog: RuleCatalog,
    thresholds: Thresholds,
}

impl FileAnalyzer {
    pub fn new(provider: Box<dyn AstProvider>, catalog: RuleCatalog, thresholds: Thresholds) -> Self {
        Self {
            provider,
            catalog,
            thresholds,
        }
    }

    /// Analyzer with the default provider and the catalog/thresholds of `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            default_provider(),
            config.build_catalog(),
            config.thresholds.clone(),
        )
    }

    /// Analyze one unit.
    ///
    /// A parse failure is not an error: the result is degraded and carries
    /// the `ParseError`. Only a malformed tree fails the file.
    pub fn analyze(&self, unit: &SourceUnit) -> Result<AnalysisResult, AnalysisError> {
        let root = match self.provider.parse(&unit.text, &unit.language) {
            Ok(root) => root,
            Err(err) => {
                debug!("{}: {}; producing degraded result", unit.path, err);
                return Ok(self.degraded(unit, err));
            }
        };

        let metrics = complexity::analyze(&unit.text, &root);
        let dependencies = dependencies::extract(&unit.path, &root)?;
        let issues = detect_issues(&unit.text, Some(&root), &self.catalog, &self.thresholds);
        let lines = build_line_records(&unit.text, &issues);
        let documentation = docs::extract(&unit.text, &root);
        let recommendations = recommend::synthesize(&metrics, &issues, &lines, &self.thresholds);

        debug!(
            "{}: cc={} cog={} issues={}",
            unit.path,
            metrics.cyclomatic_complexity,
            metrics.cognitive_complexity,
            issues.len()
        );

        Ok(AnalysisResult {
            path: unit.path.clone(),
            language: unit.language.clone(),
            lines,
            metrics,
            dependencies,
            issues,
            documentation,
            recommendations,
            parse_error: None,
        })
    }

    fn degraded(&self, unit: &SourceUnit, err: ParseError) -> AnalysisResult {
        let metrics = complexity::seed_metrics(&unit.text);
        let lines = build_line_records(&unit.text, &[]);
        let recommendations = recommend::synthesize(&metrics, &[], &lines, &self.thresholds);
        AnalysisResult {
            path: unit.path.clone(),
            language: unit.language.clone(),
            lines,
            metrics,
            dependencies: DependencyRecord::default(),
            issues: Vec::new(),
            documentation: DocumentationSummary::default(),
            recommendations,
            parse_error: Some(err),
        }
    }
}

impl Default for FileAnalyzer {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
