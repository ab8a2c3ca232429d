//! Multi-file runs: registry, dependency graph and orchestration.

pub mod graph;
mod registry;
mod runner;

pub use graph::{DependencyGraph, Edge};
pub use registry::{IssueSummaries, Registry};
pub use runner::{BatchFailure, BatchReport, BatchRunner, CancellationToken};
