//! CLI module for loginflow - command-line interface and subcommands.
//!
//! Provides the entry point for one-shot logins and the interactive form.

pub mod commands;

pub use commands::Cli;
