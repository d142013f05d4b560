//! Personal Linux environment bootstrapper.
//!
//! Detects the host distribution, installs the required command-line tools
//! and shell plugins, then mirrors version-controlled dot files into the
//! home directory.  Local edits to a tracked dot file can be captured as a
//! `<file>.patch` artifact which is replayed on every subsequent run.
//!
//! Layers, from the bottom up: [`config`] reads the two tables,
//! [`resources`] knows how to check and fix one thing, [`tasks`] walks the
//! tables in a fixed order, and [`commands`] wires it to the CLI.
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod operations;
pub mod platform;
pub mod prompt;
pub mod resources;
pub mod tasks;
