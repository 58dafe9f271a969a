//! fob-paths - inspect tsconfig `paths` aliases from the command line.
//!
//! Parses arguments, initialises logging and dispatches to a command.

use clap::Parser;
use fob_paths_cli::{cli, commands, logger};
use miette::Result;

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);

    let result = match &args.command {
        cli::Command::Mappings(mappings_args) => commands::mappings_execute(&args, mappings_args),
        cli::Command::Resolve(resolve_args) => commands::resolve_execute(&args, resolve_args),
    };

    result.map_err(miette::Report::new)
}
