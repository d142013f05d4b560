//! Command: print a shell completion script.
use std::io::Write;

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::{Cli, CompletionsOpts};

const BIN_NAME: &str = "dotstrap";

/// Write the completion script for `shell` to `out`.
pub fn generate(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, BIN_NAME, out);
}

/// Print the completion script for the requested shell to stdout.
pub fn run(opts: &CompletionsOpts) {
    generate(opts.shell, &mut std::io::stdout());
}
