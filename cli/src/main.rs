//! `dotstrap` binary entry point.
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use dotstrap_cli::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();

    match args.command {
        cli::Command::Install(opts) => {
            logging::init_subscriber(args.verbose, "install");
            let log = Arc::new(logging::Logger::new("install"));
            commands::install::run(&args.global, &opts, &log)
        }
        cli::Command::Check => {
            logging::init_subscriber(args.verbose, "check");
            let log = logging::Logger::new("check");
            commands::check::run(&args.global, &log)
        }
        cli::Command::Completions(opts) => {
            commands::completions::run(&opts);
            Ok(())
        }
        cli::Command::Version => {
            commands::version::run();
            Ok(())
        }
    }
}
