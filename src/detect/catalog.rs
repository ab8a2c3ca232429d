//! Data-driven pattern rules.
//!
//! Rules are plain data (`RuleSpec`) compiled once into a `RuleCatalog`.
//! A rule that fails to load is dropped on its own; the rest of the
//! catalog is unaffected.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{IssueKind, Severity};
use crate::error::AnalysisError;

const DEFAULT_RULES: &str = include_str!("default_rules.yaml");

/// A pattern rule as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RuleSpec {
    pub id: String,
    pub pattern: String,
    pub kind: IssueKind,
    pub category: String,
    pub severity: Severity,
    pub message: String,
    #[serde(default)]
    pub remediation: String,
    #[serde(default)]
    pub references: Vec<String>,
    /// The rule is skipped for files where this pattern occurs.
    #[serde(default)]
    pub unless_present: Option<String>,
}

/// A compiled rule.
#[derive(Debug, Clone)]
pub struct Rule {
    spec: RuleSpec,
    regex: Regex,
    unless: Option<Regex>,
}

impl Rule {
    pub fn compile(spec: RuleSpec) -> Result<Self, AnalysisError> {
        let reject = |reason: String| AnalysisError::RuleCatalog {
            rule_id: spec.id.clone(),
            reason,
        };

        let regex = Regex::new(&spec.pattern)
            .map_err(|e| reject(format!("compiling pattern {:?}: {}", spec.pattern, e)))?;
        let unless = spec
            .unless_present
            .as_deref()
            .map(|p| {
                Regex::new(p).map_err(|e| reject(format!("compiling unless_present {:?}: {}", p, e)))
            })
            .transpose()?;

        Ok(Self {
            spec,
            regex,
            unless,
        })
    }

    pub fn spec(&self) -> &RuleSpec {
        &self.spec
    }

    pub fn id(&self) -> &str {
        &self.spec.id
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// False when the file contains the rule's `unless_present` pattern.
    pub fn applies_to(&self, text: &str) -> bool {
        self.unless.as_ref().map_or(true, |u| !u.is_match(text))
    }
}

/// An ordered set of compiled rules plus the rules that were rejected.
#[derive(Debug, Default)]
pub struct RuleCatalog {
    rules: Vec<Rule>,
    rejected: Vec<AnalysisError>,
}

static BUILTIN: Lazy<RuleCatalog> = Lazy::new(|| RuleCatalog::from_specs(default_specs()));

/// Specs of the built-in catalog.
pub fn default_specs() -> Vec<RuleSpec> {
    match serde_yaml::from_str::<Vec<serde_yaml::Value>>(DEFAULT_RULES) {
        Ok(entries) => {
            let (specs, rejected) = deserialize_entries(entries);
            for err in rejected {
                warn!("built-in {}", err);
            }
            specs
        }
        Err(e) => {
            warn!("built-in rule catalog is unreadable: {}", e);
            Vec::new()
        }
    }
}

/// Deserialize raw rule entries one at a time. An entry that does not fit
/// the `RuleSpec` schema becomes a `RuleCatalog` error named after its `id`
/// (or its 1-based position when it has none).
fn deserialize_entries(
    entries: Vec<serde_yaml::Value>,
) -> (Vec<RuleSpec>, Vec<AnalysisError>) {
    let mut specs = Vec::with_capacity(entries.len());
    let mut rejected = Vec::new();
    for (index, entry) in entries.into_iter().enumerate() {
        let rule_id = entry
            .get("id")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{}", index + 1));
        match serde_yaml::from_value::<RuleSpec>(entry) {
            Ok(spec) => specs.push(spec),
            Err(e) => rejected.push(AnalysisError::RuleCatalog {
                rule_id,
                reason: e.to_string(),
            }),
        }
    }
    (specs, rejected)
}

impl RuleCatalog {
    /// The built-in catalog, compiled once per process.
    pub fn builtin() -> &'static RuleCatalog {
        &BUILTIN
    }

    /// Compile rules in order, dropping (and logging) the ones that fail.
    pub fn from_specs<I>(specs: I) -> Self
    where
        I: IntoIterator<Item = RuleSpec>,
    {
        let mut catalog = RuleCatalog::default();
        for spec in specs {
            match Rule::compile(spec) {
                Ok(rule) => catalog.rules.push(rule),
                Err(e) => {
                    warn!("{}", e);
                    catalog.rejected.push(e);
                }
            }
        }
        catalog
    }

    /// Compile `specs` followed by the raw `entries`.
    ///
    /// Entries that do not deserialize are rejected like patterns that do
    /// not compile; schema rejections are listed first.
    pub fn from_values(specs: Vec<RuleSpec>, entries: Vec<serde_yaml::Value>) -> Self {
        let (parsed, mut rejected) = deserialize_entries(entries);
        for err in &rejected {
            warn!("{}", err);
        }
        let mut catalog = Self::from_specs(specs.into_iter().chain(parsed));
        rejected.append(&mut catalog.rejected);
        catalog.rejected = rejected;
        catalog
    }

    /// Load a catalog from a YAML list of rules.
    ///
    /// Only a document that is not a list at all is an error; entries that
    /// do not deserialize or compile are rejected individually.
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        let entries: Vec<serde_yaml::Value> = serde_yaml::from_str(yaml)
            .map_err(|e| anyhow::anyhow!("rule catalog must be a YAML list: {}", e))?;
        Ok(Self::from_values(Vec::new(), entries))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rejected(&self) -> &[AnalysisError] {
        &self.rejected
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id() == id)
    }
}
