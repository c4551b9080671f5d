//! CLI argument parsing for doclex.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, Format};

/// doclex - tokenize JavaScript sources and find their documentation comments
#[derive(Parser, Debug)]
#[command(name = "doclex")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Files to tokenize (starts the REPL when none are given)
    pub files: Vec<PathBuf>,

    /// Tokenize the given source text
    #[arg(short, long, value_name = "CODE", conflicts_with = "files")]
    pub eval: Option<String>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<Format>,

    /// Only print doc comments with their line numbers
    #[arg(long)]
    pub docs: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Read configuration from this file as well
    #[arg(long, value_name = "PATH", env = "DOCLEX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub show_config: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(format) = self.format {
            config.format = format;
        }
        if self.docs {
            config.docs_only = true;
        }
        if self.no_color {
            config.color = false;
        }
    }
}
