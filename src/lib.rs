//! codelens - static analysis for JavaScript and TypeScript sources.
//!
//! Given file text, codelens builds a syntax tree through an [`ast::AstProvider`],
//! computes size and complexity metrics, classifies every physical line,
//! detects security, performance and maintainability issues from a
//! data-driven rule catalog, extracts imports and exports, links files into
//! a dependency graph with cycle detection, and synthesizes recommendations.
//!
//! # Architecture
//!
//! - `ast`: generic syntax tree and the provider trait (tree-sitter backed)
//! - `analysis`: per-file pipeline producing an [`AnalysisResult`]
//! - `detect`: rule catalog and issue detectors
//! - `batch`: registry, dependency graph and two-phase orchestration
//! - `config`: YAML configuration
//! - `report`: output formatting (pretty, JSON)
//!
//! # Example
//!
//! ```no_run
//! use codelens::{BatchRunner, Config, SourceUnit};
//!
//! let runner = BatchRunner::from_config(&Config::default());
//! let report = runner.run(vec![SourceUnit::from_path("src/a.js", "import b from './b';")]);
//! println!("{} security issues", report.summaries().security.total);
//! ```

pub mod analysis;
pub mod ast;
pub mod batch;
pub mod cli;
pub mod config;
pub mod detect;
pub mod error;
pub mod report;

pub use analysis::{AnalysisResult, FileAnalyzer, SourceUnit};
pub use ast::{AstProvider, Language, SyntaxNode};
pub use batch::{BatchReport, BatchRunner, CancellationToken, IssueSummaries, Registry};
pub use config::{Config, Thresholds};
pub use detect::{Issue, IssueKind, RuleCatalog, Severity};
pub use error::{AnalysisError, ParseError};
