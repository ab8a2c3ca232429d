//! Per-file analysis.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────────────────┐
//! │ SourceUnit  │────▶│ AstProvider │────▶│ SyntaxNode           │
//! └─────────────┘     └─────────────┘     └──────────────────────┘
//!        │                                          │
//!        ▼                                          ▼
//! ┌─────────────┐                      ┌──────────────────────┐
//! │ lines       │                      │ complexity, deps,    │
//! │ (text only) │                      │ docs, detect         │
//! └─────────────┘                      └──────────────────────┘
//!        │                                          │
//!        └────────────────▶ AnalysisResult ◀────────┘
//! ```
//!
//! [`FileAnalyzer`] drives the pipeline. Everything here is a pure function
//! of one unit's text; cross-file work lives in `batch`.

mod analyzer;
pub mod complexity;
pub mod dependencies;
pub mod docs;
pub mod lines;
pub mod recommend;
mod types;

pub use analyzer::FileAnalyzer;
pub use types::{
    AnalysisResult, ComplexityMetrics, DependencyRecord, DocumentationSummary, Effort,
    ExportKind, ExportRecord, ImportKind, ImportRecord, LineCategory, LineRecord, ParamDoc,
    Recommendation, RecommendationKind, SourceUnit,
};
