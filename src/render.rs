//! Rendering token streams as text or JSON.

use doclex_lexer::{Token, TokenKind};
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::config::{Config, Format};
use crate::error::Result;

/// The tokens of one input, ready to print.
#[derive(Debug, Serialize)]
pub struct Report {
    /// Where the source came from; `None` for `--eval` input
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// The tokens, possibly filtered to doc comments
    pub tokens: Vec<Token>,
    #[serde(skip)]
    source: String,
}

impl Report {
    /// Tokenizes `source`, keeping only doc comments when `docs_only` is set.
    pub fn new(path: Option<String>, source: String, docs_only: bool) -> Self {
        let tokens = doclex_lexer::tokenize(&source)
            .into_iter()
            .filter(|token| !docs_only || token.kind == TokenKind::DocComment)
            .collect();
        Self {
            path,
            tokens,
            source,
        }
    }

    /// The text the tokens were read from.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Maps byte offsets to 1-based line and column numbers.
pub struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    /// Indexes the line starts of `source`.
    pub fn new(source: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    /// Line and column (in characters) of `offset`.
    pub fn position(&self, offset: usize) -> (usize, usize) {
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let column = self.source[self.line_starts[line]..offset].chars().count();
        (line + 1, column + 1)
    }
}

/// Colors `text` the way tokens of `kind` are shown.
pub fn paint(kind: TokenKind, text: &str) -> String {
    match kind {
        TokenKind::Keyword => text.magenta().bold().to_string(),
        TokenKind::Ident => text.to_string(),
        TokenKind::String => text.green().to_string(),
        TokenKind::Number => text.yellow().to_string(),
        TokenKind::Regex => text.red().to_string(),
        TokenKind::Operator => text.cyan().to_string(),
        TokenKind::DocComment => text.blue().to_string(),
    }
}

/// Renders tokens one per line as `line:col kind value`.
pub fn render_text(report: &Report, color: bool) -> String {
    let index = LineIndex::new(report.source());
    let mut out = String::new();

    if let Some(path) = &report.path {
        let header = format!("==> {path}");
        if color {
            out.push_str(&header.white().bold().to_string());
        } else {
            out.push_str(&header);
        }
        out.push('\n');
    }

    for token in &report.tokens {
        let (line, column) = index.position(token.span.start);
        let location = format!("{line}:{column}");
        let kind = format!("{:<11}", token.kind.as_str());
        let value: String = token.value.escape_debug().collect();
        if color {
            out.push_str(&format!(
                "{:>8} {} {}\n",
                location.dimmed(),
                kind.dimmed(),
                paint(token.kind, &value)
            ));
        } else {
            out.push_str(&format!("{location:>8} {kind} {value}\n"));
        }
    }

    out
}

/// Renders reports in the configured format.
pub fn render(reports: &[Report], config: &Config) -> Result<String> {
    match config.format {
        Format::Text => Ok(reports
            .iter()
            .map(|report| render_text(report, config.color))
            .collect::<Vec<_>>()
            .join("\n")),
        Format::Json => {
            let json = match reports {
                [single] if single.path.is_none() => serde_json::to_string_pretty(single)?,
                _ => serde_json::to_string_pretty(reports)?,
            };
            Ok(json + "\n")
        }
    }
}
