//! Result structures produced by per-file analysis.

use serde::{Deserialize, Serialize};

use crate::ast::Language;
use crate::detect::{Issue, Severity};
use crate::error::ParseError;

/// One file's text and language. Immutable input to analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub path: String,
    pub text: String,
    pub language: Language,
}

impl SourceUnit {
    pub fn new(path: impl Into<String>, text: impl Into<String>, language: Language) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
            language,
        }
    }

    /// Build a unit whose language is inferred from the path extension.
    pub fn from_path(path: impl Into<String>, text: impl Into<String>) -> Self {
        let path = path.into();
        let language = Language::from_path(&path);
        Self::new(path, text, language)
    }
}

/// Category assigned to a physical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineCategory {
    Empty,
    Comment,
    Import,
    Export,
    Function,
    Class,
    ControlFlow,
    ErrorHandling,
    Variable,
}

impl LineCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineCategory::Empty => "empty",
            LineCategory::Comment => "comment",
            LineCategory::Import => "import",
            LineCategory::Export => "export",
            LineCategory::Function => "function",
            LineCategory::Class => "class",
            LineCategory::ControlFlow => "control-flow",
            LineCategory::ErrorHandling => "error-handling",
            LineCategory::Variable => "variable",
        }
    }
}

impl std::fmt::Display for LineCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-line analysis record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRecord {
    /// 1-indexed.
    pub line_number: usize,
    pub content: String,
    pub category: LineCategory,
    pub complexity: u32,
    pub security_risk: Severity,
    pub performance_risk: Severity,
    pub maintainability: u32,
    pub docs: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<String>,
}

/// Whole-file size and complexity metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityMetrics {
    pub cyclomatic_complexity: u32,
    pub cognitive_complexity: u32,
    pub lines_of_code: usize,
    pub logical_lines_of_code: usize,
    pub maintainability_index: u32,
}

/// Shape of an import declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    Default,
    Named,
    Namespace,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRecord {
    pub source: String,
    pub names: Vec<String>,
    pub kind: ImportKind,
    /// True when the specifier is a package rather than a relative path.
    pub external: bool,
    pub is_used: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Named,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub name: String,
    pub kind: ExportKind,
    pub dependencies: Vec<String>,
}

/// Imports and exports of one file, plus the cross-file findings that are
/// filled in once the whole batch has been analyzed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRecord {
    pub imports: Vec<ImportRecord>,
    pub exports: Vec<ExportRecord>,
    pub circular_dependencies: Vec<String>,
    pub unused_dependencies: Vec<String>,
    pub missing_dependencies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDoc {
    pub name: String,
    pub type_name: String,
    pub description: String,
    pub optional: bool,
}

/// Summary pulled from the file's doc comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentationSummary {
    pub purpose: String,
    pub functionality: String,
    pub parameters: Vec<ParamDoc>,
    pub returns: Option<String>,
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Refactor,
    Secure,
    Optimize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub priority: Severity,
    pub description: String,
    pub implementation: String,
    pub effort: Effort,
    pub benefits: Vec<String>,
    pub risks: Vec<String>,
}

/// Everything known about one source unit after analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub path: String,
    pub language: Language,
    pub lines: Vec<LineRecord>,
    pub metrics: ComplexityMetrics,
    pub dependencies: DependencyRecord,
    pub issues: Vec<Issue>,
    pub documentation: DocumentationSummary,
    pub recommendations: Vec<Recommendation>,
    /// Set when the provider could not parse the file and the result is degraded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<ParseError>,
}

impl AnalysisResult {
    pub fn is_degraded(&self) -> bool {
        self.parse_error.is_some()
    }
}
