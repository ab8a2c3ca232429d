//! Configuration file schema.
//!
//! A config file selects the rule catalog, excludes paths from directory
//! walks and tunes detector thresholds. Every field is optional.

use anyhow::Context;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::detect::{default_specs, RuleCatalog};

/// File names checked by [`Config::discover`], in order.
pub const CONFIG_FILE_NAMES: &[&str] = &["codelens.yaml", ".codelens.yaml"];

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Prepend the built-in rules to `rules` (default: true).
    #[serde(default = "default_true")]
    pub include_default_rules: bool,
    /// Glob patterns for paths to skip when walking a directory.
    #[serde(default)]
    pub excluded_paths: Vec<String>,
    /// Extra pattern rules, appended after the built-in ones. Kept as raw
    /// YAML so a malformed entry only rejects itself.
    #[serde(default)]
    pub rules: Vec<serde_yaml::Value>,
    #[serde(default)]
    pub thresholds: Thresholds,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            include_default_rules: true,
            excluded_paths: Vec::new(),
            rules: Vec::new(),
            thresholds: Thresholds::default(),
        }
    }
}

/// Detector and recommendation thresholds.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Thresholds {
    /// Functions spanning more lines than this are flagged.
    pub max_function_lines: usize,
    /// Lines per duplicate-detection window.
    pub duplicate_window: usize,
    /// A window must be longer than this many characters to count.
    pub duplicate_min_chars: usize,
    /// Cyclomatic complexity above which refactoring is recommended.
    pub refactor_complexity: u32,
    /// Mean per-line complexity above which optimization is recommended.
    pub optimize_line_complexity: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_function_lines: 50,
            duplicate_window: 5,
            duplicate_min_chars: 50,
            refactor_complexity: 10,
            optimize_line_complexity: 3.0,
        }
    }
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Find a config file in `dir`.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    }

    /// Load `explicit` if given, else a discovered file in `dir`, else defaults.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> anyhow::Result<Self> {
        match explicit.map(Path::to_path_buf).or_else(|| Self::discover(dir)) {
            Some(path) => Self::parse_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.exclusions()?;
        if self.thresholds.duplicate_window == 0 {
            anyhow::bail!("thresholds.duplicate_window must be positive");
        }
        if self.thresholds.max_function_lines == 0 {
            anyhow::bail!("thresholds.max_function_lines must be positive");
        }
        if !self.thresholds.optimize_line_complexity.is_finite() {
            anyhow::bail!("thresholds.optimize_line_complexity must be a finite number");
        }
        Ok(())
    }

    /// Compile `excluded_paths` into a matcher.
    ///
    /// Globs support `**` for recursive directory matching.
    pub fn exclusions(&self) -> anyhow::Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.excluded_paths {
            let glob = Glob::new(pattern)
                .with_context(|| format!("invalid excluded_paths glob {:?}", pattern))?;
            builder.add(glob);
        }
        Ok(builder.build()?)
    }

    /// Compile the active rule catalog.
    pub fn build_catalog(&self) -> RuleCatalog {
        let defaults = if self.include_default_rules {
            default_specs()
        } else {
            Vec::new()
        };
        RuleCatalog::from_values(defaults, self.rules.clone())
    }
}
