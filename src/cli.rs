//! Command-line interface for codelens.

use clap::{Parser, Subcommand, ValueEnum};
use globset::GlobSet;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

use crate::analysis::SourceUnit;
use crate::ast::Language;
use crate::batch::{BatchFailure, BatchRunner};
use crate::config::Config;
use crate::error::AnalysisError;
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Directories never descended into.
const SKIPPED_DIRS: &[&str] = &["node_modules", "vendor", "dist", "build", "coverage"];

/// Static analysis for JavaScript and TypeScript sources.
///
/// Reports complexity, security, performance and maintainability issues,
/// import cycles and missing local modules.
#[derive(Parser)]
#[command(name = "codelens")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a file or directory
    #[command(visible_alias = "check")]
    Analyze(AnalyzeArgs),
    /// List the active rule catalog
    Rules(RulesArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
}

/// Arguments for the analyze command.
#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Path to analyze (file or directory)
    pub path: PathBuf,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
    pub format: OutputFormat,
}

/// Arguments for the rules command.
#[derive(Parser)]
pub struct RulesArgs {
    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Collect analyzable files under `root`, sorted by path.
///
/// `excluded` is matched against paths relative to `root`.
pub fn collect_files(root: &Path, excluded: &GlobSet) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            !name.starts_with('.') && !SKIPPED_DIRS.contains(&name.as_ref())
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        if excluded.is_match(relative) {
            continue;
        }
        if Language::from_path(&path.to_string_lossy()).is_supported() {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

/// Registry key for a file: relative to `root`, `/`-separated.
pub fn unit_path(root: &Path, file: &Path) -> String {
    let relative = match file.strip_prefix(root) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel,
        _ => file,
    };
    relative.to_string_lossy().replace('\\', "/")
}

/// Read files into units. Unreadable files are logged and returned apart.
pub fn read_units(
    root: &Path,
    files: &[PathBuf],
    progress: &ProgressBar,
) -> (Vec<SourceUnit>, Vec<BatchFailure>) {
    let mut units = Vec::with_capacity(files.len());
    let mut errors = Vec::new();

    for file in files {
        let key = unit_path(root, file);
        progress.set_message(key.clone());
        match std::fs::read_to_string(file) {
            Ok(text) => units.push(SourceUnit::from_path(key, text)),
            Err(source) => {
                let error = AnalysisError::FileRead {
                    path: key.clone(),
                    source,
                };
                warn!("{}", error);
                errors.push(BatchFailure { path: key, error });
            }
        }
        progress.inc(1);
    }

    progress.finish_and_clear();
    (units, errors)
}

fn progress_bar(len: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template("  {bar:30} {pos}/{len} {wide_msg}") {
        bar.set_style(style);
    }
    bar
}

/// Run the analyze command.
pub fn run_analyze(args: &AnalyzeArgs) -> anyhow::Result<i32> {
    let abs_path = match args.path.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", args.path, e);
            return Ok(EXIT_ERROR);
        }
    };

    let root = if abs_path.is_dir() {
        abs_path.clone()
    } else {
        abs_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    };
    let config = Config::load(args.config.as_deref(), &root)?;
    let files = if abs_path.is_dir() {
        collect_files(&abs_path, &config.exclusions()?)?
    } else {
        vec![abs_path]
    };

    if files.is_empty() {
        eprintln!("Warning: no files to analyze");
        return Ok(EXIT_SUCCESS);
    }

    let progress = progress_bar(files.len(), args.format == OutputFormat::Pretty);
    let (units, read_failures) = read_units(&root, &files, &progress);

    let runner = BatchRunner::from_config(&config);
    let mut batch = runner.run(units);
    batch.failures.extend(read_failures);

    let path_str = args.path.to_string_lossy().to_string();
    match args.format {
        OutputFormat::Json => report::write_json(&path_str, &batch)?,
        OutputFormat::Pretty => report::write_pretty(&path_str, &batch),
    }

    if batch.summaries().critical() > 0 {
        Ok(EXIT_FAILED)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

/// Run the rules command.
pub fn run_rules(args: &RulesArgs) -> anyhow::Result<i32> {
    let cwd = std::env::current_dir()?;
    let config = Config::load(args.config.as_deref(), &cwd)?;
    report::write_rules(&config.build_catalog());
    Ok(EXIT_SUCCESS)
}
