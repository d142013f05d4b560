//! Command-line argument definitions.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Default location of the system identification file.
pub const DEFAULT_OS_RELEASE: &str = "/etc/os-release";

/// Top-level CLI entry point for the environment bootstrapper.
#[derive(Parser, Debug)]
#[command(
    name = "dotstrap",
    about = "Install required tools and synchronise patched dot files",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Override the repository root directory
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Use this distro key instead of reading the os-release file
    #[arg(long, global = true)]
    pub distro: Option<String>,

    /// Path of the system identification file
    #[arg(long, global = true, default_value = DEFAULT_OS_RELEASE)]
    pub os_release: PathBuf,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install requirements, capture local edits and apply dot files
    Install(InstallOpts),
    /// Validate the configuration tables without changing anything
    Check,
    /// Generate shell completion scripts
    Completions(CompletionsOpts),
    /// Print version information
    Version,
}

/// Options for the `install` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct InstallOpts {
    /// Skip specific tasks
    #[arg(long, value_delimiter = ',')]
    pub skip: Vec<String>,

    /// Run only specific tasks
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,

    /// Answer yes to the "Create patch?" prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Options for the `completions` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct CompletionsOpts {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
