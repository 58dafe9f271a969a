//! Command-line front end for `fob-plugin-tsconfig-paths`.
//!
//! - [`cli`] - argument definitions
//! - [`commands`] - `mappings` and `resolve`
//! - [`error`] - CLI error type, rendered through miette
//! - [`logger`] - tracing subscriber setup

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
