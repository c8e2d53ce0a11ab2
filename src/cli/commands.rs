//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - login: run one confirm action and print its outcome
//! - repl: drive the login form and start screen interactively

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// loginflow - drive a login form from the terminal
#[derive(Parser, Debug)]
#[command(name = "loginflow")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Press confirm once with the given field values
    Login {
        /// Text of the email field
        #[arg(short, long, default_value = "")]
        email: String,

        /// Text of the password field
        #[arg(short, long, default_value = "")]
        password: String,
    },

    /// Interactive form (default)
    Repl,
}
