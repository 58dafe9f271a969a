//! Command implementations for fob-paths.
//!
//! - [`mappings`] - print the compiled alias table
//! - [`resolve`] - resolve one import through it
//!
//! Both load the tsconfig exactly the way the bundler plugin does.

pub mod mappings;
pub mod resolve;

pub use mappings::execute as mappings_execute;
pub use resolve::execute as resolve_execute;

use crate::cli::Cli;
use crate::error::Result;
use fob_plugin_tsconfig_paths::{FobTsconfigPathsPlugin, LogLevel, TsconfigPathsOptions};

/// Plugin options for the global flags, layered over the environment
pub fn plugin_options(cli: &Cli) -> Result<TsconfigPathsOptions> {
    let mut options = TsconfigPathsOptions::from_env()?;
    if let Some(project) = &cli.project {
        options = options.with_tsconfig_path(project.clone());
    }

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else if cli.quiet {
        LogLevel::None
    } else {
        LogLevel::Warn
    };
    Ok(options.with_log_level(log_level))
}

pub(crate) fn load_plugin(cli: &Cli) -> Result<FobTsconfigPathsPlugin> {
    let plugin = FobTsconfigPathsPlugin::new(plugin_options(cli)?)?;
    tracing::debug!("Loaded {}", plugin.config_path().display());
    Ok(plugin)
}
