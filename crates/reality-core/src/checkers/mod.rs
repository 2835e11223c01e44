//! The standard source checkers.
//!
//! Each one probes a single truth source, read-only, per the contract in
//! `crate::checker`. Anything beyond these registers through the same
//! `CheckerRegistry` without touching aggregator logic.

pub mod database;
pub mod deployment;
pub mod filesystem;
pub mod integration;
pub mod task_tracker;
pub mod vcs;

pub use database::DatabaseChecker;
pub use deployment::DeploymentChecker;
pub use filesystem::FileSystemChecker;
pub use integration::IntegrationChecker;
pub use task_tracker::TaskTrackerChecker;
pub use vcs::VcsChecker;

use crate::checker::CheckerRegistry;
use crate::config::EnvConfig;
use std::path::Path;
use std::sync::Arc;

/// Build the registry of all six standard checkers for `root`.
pub fn standard_registry(root: &Path, config: &EnvConfig) -> CheckerRegistry {
    let mut registry = CheckerRegistry::new();
    registry.register(Arc::new(FileSystemChecker::new(root)));
    registry.register(Arc::new(VcsChecker::new(root)));
    registry.register(Arc::new(DatabaseChecker::from_config(config)));
    registry.register(Arc::new(DeploymentChecker::from_config(config)));
    registry.register(Arc::new(IntegrationChecker::new(root)));
    registry.register(Arc::new(TaskTrackerChecker::from_config(config)));
    registry
}
