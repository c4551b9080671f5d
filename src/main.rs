// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! doclex - tokenize JavaScript sources and find their documentation comments
//!
//! This is the main entry point for the doclex CLI/REPL.
//!
//! ## Features
//!
//! - Token dumps of files or inline code, as text or JSON
//! - Doc-comment listings with source lines
//! - Interactive REPL with token-based highlighting and lookahead testing
//! - Parallel tokenization of many files with rayon

mod cli;
mod config;
mod error;
mod render;
mod repl;

use std::process::ExitCode;

use clap::Parser;
use owo_colors::OwoColorize;
use rayon::prelude::*;
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;
use config::Config;
use error::{DoclexError, Result};
use render::Report;

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.no_color || std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
                eprintln!("Error: {e}");
            } else {
                eprintln!("{}: {}", "Error".red().bold(), e);
            }
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr, filtered by `DOCLEX_LOG`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("DOCLEX_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply(&mut config);
    debug!(?config, "Effective configuration");

    if cli.show_config {
        print!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    if let Some(code) = &cli.eval {
        let report = Report::new(None, code.clone(), config.docs_only);
        print!("{}", render::render(&[report], &config)?);
        return Ok(());
    }

    if cli.files.is_empty() {
        return repl::Repl::new(&config)?.run();
    }

    // One tokenizer per file; results keep argument order.
    let reports = cli
        .files
        .par_iter()
        .map(|path| -> Result<Report> {
            let source =
                std::fs::read_to_string(path).map_err(|e| DoclexError::read(path, e))?;
            Ok(Report::new(
                Some(path.display().to_string()),
                source,
                config.docs_only,
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        files = reports.len(),
        tokens = reports.iter().map(|r| r.tokens.len()).sum::<usize>(),
        "Tokenized input files"
    );

    print!("{}", render::render(&reports, &config)?);
    Ok(())
}
