//! Error taxonomy for the analysis engine.
//!
//! Only `InternalTraversal` marks a file as failed. Parse errors produce a
//! degraded result, catalog errors drop a single rule, and read errors are
//! raised by whoever supplies the source text.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The AST provider could not turn text into a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseError {
    pub reason: String,
    /// 1-indexed line of the first error, when known.
    pub line: Option<usize>,
}

impl ParseError {
    pub fn new(reason: impl Into<String>, line: Option<usize>) -> Self {
        Self {
            reason: reason.into(),
            line,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "parse error at line {}: {}", line, self.reason),
            None => write!(f, "parse error: {}", self.reason),
        }
    }
}

impl std::error::Error for ParseError {}

/// Errors that can occur while analyzing a batch of files.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("rule {rule_id:?} rejected: {reason}")]
    RuleCatalog { rule_id: String, reason: String },
    #[error("unexpected syntax tree shape in {path}: {reason}")]
    InternalTraversal { path: String, reason: String },
}

impl AnalysisError {
    pub fn traversal(path: impl Into<String>, reason: impl Into<String>) -> Self {
        AnalysisError::InternalTraversal {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
