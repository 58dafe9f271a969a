//! Command-line interface definition for fob-paths.
//!
//! - `fob-paths mappings` - show the compiled alias table
//! - `fob-paths resolve` - resolve one import through the alias table

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Inspect tsconfig `paths` aliases the way the fob bundler resolves them
#[derive(Parser, Debug)]
#[command(name = "fob-paths", version, about)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    ///
    /// Also reports every compiled rule and every rewrite.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors and results
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// tsconfig to load
    ///
    /// Defaults to `TS_NODE_PROJECT`, then the nearest tsconfig.json above
    /// the working directory.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub project: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the compiled alias rules and every rejected entry
    Mappings(MappingsArgs),

    /// Resolve an import specifier through the alias rules
    Resolve(ResolveArgs),
}

#[derive(Args, Debug)]
pub struct MappingsArgs {
    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// The import specifier, e.g. `@app/utils`
    #[arg(value_name = "SPECIFIER")]
    pub specifier: String,

    /// The importing file
    #[arg(long = "from", value_name = "IMPORTER")]
    pub importer: PathBuf,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}
