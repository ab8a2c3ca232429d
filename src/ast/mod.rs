//! Generic syntax tree and the provider interface that produces it.
//!
//! Analysis never touches a concrete grammar. Providers lower whatever
//! they parse into [`SyntaxNode`]s, and every consumer dispatches on the
//! exhaustive [`NodeKind`] enum.

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

#[cfg(feature = "tree-sitter")]
pub mod treesitter;

#[cfg(feature = "tree-sitter")]
pub use treesitter::TreeSitterProvider;

/// Source language tag for a unit of input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    Jsx,
    TypeScript,
    Tsx,
    Other(String),
}

static EXTENSIONS: phf::Map<&'static str, Language> = phf::phf_map! {
    "js" => Language::JavaScript,
    "mjs" => Language::JavaScript,
    "cjs" => Language::JavaScript,
    "jsx" => Language::Jsx,
    "ts" => Language::TypeScript,
    "mts" => Language::TypeScript,
    "cts" => Language::TypeScript,
    "tsx" => Language::Tsx,
};

impl Language {
    /// Determine the language from a file extension (without dot).
    pub fn from_extension(ext: &str) -> Self {
        EXTENSIONS
            .get(ext)
            .cloned()
            .unwrap_or_else(|| Language::Other(ext.to_string()))
    }

    /// Determine the language from a file path.
    pub fn from_path(path: &str) -> Self {
        let ext = std::path::Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        Self::from_extension(ext)
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Language::Other(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Language::JavaScript => "javascript",
            Language::Jsx => "jsx",
            Language::TypeScript => "typescript",
            Language::Tsx => "tsx",
            Language::Other(ext) => ext,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One specifier of an import declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSpecifier {
    /// `import foo from 'module'`
    Default(String),
    /// `import { foo as bar } from 'module'`
    Named { imported: String, local: String },
    /// `import * as foo from 'module'`
    Namespace(String),
}

/// Payload of an import declaration node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    /// Module specifier with quotes removed. `None` means the provider
    /// produced an import without a source, which consumers reject.
    pub source: Option<String>,
    pub specifiers: Vec<ImportSpecifier>,
}

/// Payload of a named export declaration node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDecl {
    /// Set for re-exports: `export { a } from './a'`.
    pub source: Option<String>,
    /// Local names listed in the export clause.
    pub names: Vec<String>,
}

/// Node kinds the engine distinguishes. Anything else is `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Program,
    If,
    Conditional,
    Logical,
    Switch,
    SwitchCase,
    Try,
    Catch,
    For,
    ForIn,
    ForOf,
    While,
    DoWhile,
    Function,
    Class,
    Call,
    Import(ImportDecl),
    ExportNamed(ExportDecl),
    ExportDefault,
    Other(String),
}

/// A node of the generic syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    /// Start line (1-indexed).
    pub start_line: usize,
    /// End line (1-indexed, inclusive).
    pub end_line: usize,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn new(kind: NodeKind, start_line: usize, end_line: usize) -> Self {
        Self {
            kind,
            start_line,
            end_line,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<SyntaxNode>) -> Self {
        self.children = children;
        self
    }

    /// Number of lines the node spans.
    pub fn line_span(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }

    /// Depth-first enter/exit events, without recursion.
    pub fn traverse(&self) -> Traversal<'_> {
        Traversal {
            pending: vec![Visit::Enter(self)],
        }
    }

    /// All nodes in pre-order, starting with `self`.
    pub fn descendants(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.traverse().filter_map(|visit| match visit {
            Visit::Enter(node) => Some(node),
            Visit::Exit(_) => None,
        })
    }
}

// Deep trees (long operator chains in generated code) would overflow the
// stack with the default recursive drop.
impl Drop for SyntaxNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// A traversal event.
#[derive(Debug, Clone, Copy)]
pub enum Visit<'a> {
    Enter(&'a SyntaxNode),
    Exit(&'a SyntaxNode),
}

/// Iterator returned by [`SyntaxNode::traverse`].
pub struct Traversal<'a> {
    pending: Vec<Visit<'a>>,
}

impl<'a> Iterator for Traversal<'a> {
    type Item = Visit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let visit = self.pending.pop()?;
        if let Visit::Enter(node) = visit {
            self.pending.push(Visit::Exit(node));
            self.pending
                .extend(node.children.iter().rev().map(Visit::Enter));
        }
        Some(visit)
    }
}

/// Turns source text into a generic syntax tree.
///
/// Implementations must be usable from several worker threads at once.
pub trait AstProvider: Send + Sync {
    fn parse(&self, text: &str, language: &Language) -> Result<SyntaxNode, ParseError>;
}

/// Provider used when no parser backend is compiled in.
pub struct UnavailableProvider;

impl AstProvider for UnavailableProvider {
    fn parse(&self, _text: &str, language: &Language) -> Result<SyntaxNode, ParseError> {
        Err(ParseError::new(
            format!("no parser backend available for {}", language),
            None,
        ))
    }
}

/// The provider the engine uses unless the caller supplies one.
#[cfg(feature = "tree-sitter")]
pub fn default_provider() -> Box<dyn AstProvider> {
    Box::new(TreeSitterProvider::new())
}

#[cfg(not(feature = "tree-sitter"))]
pub fn default_provider() -> Box<dyn AstProvider> {
    Box::new(UnavailableProvider)
}
