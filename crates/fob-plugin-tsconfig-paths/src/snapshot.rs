//! Immutable view of the compiled alias table.
//!
//! A snapshot is built once per (re)load and shared behind an `Arc`.
//! Reloading swaps the whole snapshot, so a resolution in flight always sees
//! one consistent table.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::error::Result;
use crate::logging::LogLevel;
use crate::mapping::{CompiledRuleSet, compile_mappings};
use crate::tsconfig::load_project_paths;

/// Snapshot slot shared between the plugin and in-flight hook futures
pub type SharedSnapshot = Arc<RwLock<Arc<PathsSnapshot>>>;

/// Compiled rules together with the directory they are relative to
#[derive(Debug, Clone)]
pub struct PathsSnapshot {
    /// The tsconfig the rules were loaded from
    pub config_path: PathBuf,
    /// Absolute directory every target is joined onto
    pub base_url: PathBuf,
    pub rules: CompiledRuleSet,
}

impl PathsSnapshot {
    pub fn new(config_path: PathBuf, base_url: PathBuf, rules: CompiledRuleSet) -> Self {
        Self {
            config_path,
            base_url,
            rules,
        }
    }

    /// Load and compile the `paths` of `config_path`, following `extends`.
    pub fn load(config_path: &Path, log_level: LogLevel) -> Result<Self> {
        let project = load_project_paths(config_path)?;
        let rules = compile_mappings(&project.paths, log_level);

        if log_level.debugs() {
            debug!(
                "[fob-tsconfig-paths] Loaded {} rule(s) from {} (baseUrl {})",
                rules.len(),
                project.config_path.display(),
                project.base_url.display()
            );
        }

        Ok(Self::new(project.config_path, project.base_url, rules))
    }

    /// Whether the snapshot has no usable rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Wrap the snapshot in a fresh shared slot
    pub fn into_shared(self) -> SharedSnapshot {
        Arc::new(RwLock::new(Arc::new(self)))
    }
}
