//! Error types for the doclex binary.
//!
//! The lexer itself cannot fail; everything here comes from the
//! surroundings: files, configuration, output, and the line editor.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for doclex operations.
pub type Result<T> = std::result::Result<T, DoclexError>;

/// Main error type for doclex.
#[derive(Error, Debug)]
pub enum DoclexError {
    /// Reading a source or config file failed
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Other IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for the expected shape
    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The effective configuration could not be written out
    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),

    /// Token serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The line editor failed
    #[error("REPL error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    /// A lookahead pattern could not be parsed
    #[error("invalid pattern: {0}")]
    Pattern(#[from] doclex_lexer::UnknownKind),
}

impl DoclexError {
    /// Wraps an IO error with the path it concerns.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DoclexError::Read {
            path: path.into(),
            source,
        }
    }
}
