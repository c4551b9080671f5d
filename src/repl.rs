// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Interactive REPL for trying the tokenizer on snippets and files.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use doclex_lexer::{Expect, TokenKind, Tokenizer, tokenize};
use owo_colors::{OwoColorize, Style};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Editor, Helper};
use tracing::debug;

use crate::config::{self, Config};
use crate::error::{DoclexError, Result};
use crate::render::{self, Report};

/// Reserved words offered for completion.
const RESERVED_WORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "default", "delete", "do", "else",
    "enum", "export", "extends", "false", "finally", "for", "function", "if", "import", "in",
    "instanceof", "let", "new", "null", "return", "super", "switch", "this", "throw", "true",
    "try", "typeof", "var", "void", "while", "with", "yield",
];

/// REPL commands that can be executed with a dot prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Exit,
    Clear,
    Version,
    Load,
    Look,
    Docs,
}

impl ReplCommand {
    /// Parse a REPL command from input string
    pub fn parse(input: &str) -> Option<(Self, Option<&str>)> {
        let rest = input.trim().strip_prefix('.')?;
        let mut parts = rest.splitn(2, char::is_whitespace);
        let cmd = parts.next()?.to_lowercase();
        let arg = parts.next().map(str::trim).filter(|arg| !arg.is_empty());

        match cmd.as_str() {
            "help" | "h" | "?" => Some((ReplCommand::Help, arg)),
            "exit" | "quit" | "q" => Some((ReplCommand::Exit, arg)),
            "clear" | "cls" => Some((ReplCommand::Clear, arg)),
            "version" | "v" => Some((ReplCommand::Version, arg)),
            "load" | "l" => Some((ReplCommand::Load, arg)),
            "look" => Some((ReplCommand::Look, arg)),
            "docs" | "d" => Some((ReplCommand::Docs, arg)),
            _ => None,
        }
    }

    /// Get all available commands for help/completion
    pub fn all_commands() -> &'static [(&'static str, &'static str)] {
        &[
            (".help", "Show this help message"),
            (".exit", "Exit the REPL"),
            (".clear", "Clear the screen"),
            (".version", "Show version information"),
            (".load <file>", "Tokenize a file"),
            (".look <pattern>", "Run a lookahead against the last source"),
            (".docs", "List doc comments of the last source"),
        ]
    }
}

/// Helper struct for rustyline that provides completion, hints, and validation
struct DoclexHelper {
    /// Words offered for completion
    words: Vec<String>,
    color: bool,
}

impl DoclexHelper {
    fn new(color: bool) -> Self {
        let commands = ReplCommand::all_commands()
            .iter()
            .map(|&(cmd, _)| cmd.split_whitespace().next().unwrap_or(cmd).to_string());
        let kinds = TokenKind::ALL.iter().map(|kind| format!(":{kind}"));
        let words = RESERVED_WORDS
            .iter()
            .map(|word| word.to_string())
            .chain(kinds)
            .chain(commands)
            .collect();

        Self { words, color }
    }

    /// Byte offset where the word ending at `pos` begins.
    fn word_start(line: &str, pos: usize) -> usize {
        line[..pos]
            .char_indices()
            .rev()
            .find(|&(_, c)| !c.is_alphanumeric() && c != '_' && c != '.' && c != ':')
            .map_or(0, |(i, c)| i + c.len_utf8())
    }
}

impl Completer for DoclexHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let word = &line[Self::word_start(line, pos)..pos];
        if word.is_empty() {
            return Ok((pos, vec![]));
        }

        let matches = self
            .words
            .iter()
            .filter(|candidate| candidate.starts_with(word))
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: candidate[word.len()..].to_string(),
            })
            .collect();

        Ok((pos, matches))
    }
}

impl Hinter for DoclexHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<Self::Hint> {
        if pos < line.len() {
            return None;
        }

        let word = &line[Self::word_start(line, pos)..];
        if word.len() < 2 {
            return None;
        }

        self.words
            .iter()
            .find(|candidate| candidate.starts_with(word) && candidate.len() > word.len())
            .map(|candidate| {
                let rest = &candidate[word.len()..];
                if self.color {
                    rest.dimmed().to_string()
                } else {
                    rest.to_string()
                }
            })
    }
}

impl Highlighter for DoclexHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if !self.color || line.trim_start().starts_with('.') {
            return Cow::Borrowed(line);
        }
        Cow::Owned(highlight_source(line))
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        self.color
    }
}

/// Colors `source` token by token; the gaps between tokens are whitespace
/// and comments and are dimmed.
fn highlight_source(source: &str) -> String {
    let mut result = String::with_capacity(source.len() * 2);
    let mut at = 0;

    for token in tokenize(source) {
        let gap = &source[at..token.span.start];
        if !gap.trim().is_empty() {
            result.push_str(&gap.dimmed().to_string());
        } else {
            result.push_str(gap);
        }
        let text = &source[token.span.start..token.span.end];
        result.push_str(&render::paint(token.kind, text));
        at = token.span.end;
    }

    let tail = &source[at..];
    if !tail.trim().is_empty() {
        result.push_str(&tail.dimmed().to_string());
    } else {
        result.push_str(tail);
    }
    result
}

impl Validator for DoclexHelper {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> rustyline::Result<ValidationResult> {
        let input = ctx.input();
        if !input.trim_start().starts_with('.') && needs_more_input(input) {
            return Ok(ValidationResult::Incomplete);
        }
        Ok(ValidationResult::Valid(None))
    }
}

impl Helper for DoclexHelper {}

/// Whether `input` stops inside a string, a block comment, or open brackets.
fn needs_more_input(input: &str) -> bool {
    let tokens = tokenize(input);
    let mut depth: i64 = 0;

    for token in &tokens {
        match (token.kind, token.value.as_str()) {
            (TokenKind::Operator, "(" | "[" | "{") => depth += 1,
            (TokenKind::Operator, ")" | "]" | "}") => depth -= 1,
            _ => {}
        }
    }

    if depth > 0 {
        return true;
    }

    let tail_start = match tokens.last() {
        Some(last) => {
            let unterminated = match last.kind {
                // An unterminated string has lost only its opening quote.
                TokenKind::String => last.span.len() != last.value.len() + 2,
                TokenKind::DocComment => !last.value.ends_with("*/"),
                _ => false,
            };
            if unterminated {
                return true;
            }
            last.span.end
        }
        None => 0,
    };

    ends_in_open_comment(&input[tail_start..])
}

/// `tail` holds only whitespace and comments.
fn ends_in_open_comment(mut tail: &str) -> bool {
    loop {
        tail = tail.trim_start();
        if let Some(rest) = tail.strip_prefix("//") {
            match rest.find('\n') {
                Some(end) => tail = &rest[end..],
                None => return false,
            }
        } else if let Some(rest) = tail.strip_prefix("/*") {
            match rest.find("*/") {
                Some(end) => tail = &rest[end + 2..],
                None => return true,
            }
        } else {
            return false;
        }
    }
}

/// Runs `.look` against `source`. Pattern elements are whitespace separated.
pub fn run_look(source: &str, pattern: &str) -> Result<bool> {
    let pattern = pattern
        .split_whitespace()
        .map(Expect::parse)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(Tokenizer::new(source).look(&pattern))
}

/// Doc comments of `source` as `(line, first line of text)`.
pub fn doc_summaries(source: &str) -> Vec<(usize, String)> {
    tokenize(source)
        .into_iter()
        .filter(|token| token.kind == TokenKind::DocComment)
        .map(|token| {
            let summary = token
                .value
                .trim_start_matches("/**")
                .trim_end_matches("*/")
                .lines()
                .map(|line| line.trim().trim_start_matches('*').trim())
                .find(|line| !line.is_empty())
                .unwrap_or("")
                .to_string();
            (token.line.unwrap_or(0), summary)
        })
        .collect()
}

/// Output settings and the most recently entered source.
struct ReplState {
    color: bool,
    docs_only: bool,
    /// The most recently tokenized source, for `.look` and `.docs`
    last_source: Option<String>,
}

impl ReplState {
    fn new(config: &Config) -> Self {
        Self {
            color: config.color,
            docs_only: config.docs_only,
            last_source: None,
        }
    }

    /// Styles `text` when color output is enabled.
    fn paint(&self, text: &str, style: Style) -> String {
        if self.color {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }

    /// Renders the tokens of `source` and remembers it for later commands.
    fn render(&mut self, path: Option<String>, source: String) -> String {
        let report = Report::new(path, source, self.docs_only);
        let text = render::render_text(&report, self.color);
        self.last_source = Some(report.source().to_string());
        text
    }
}

/// The interactive tokenizer REPL
pub struct Repl {
    editor: Editor<DoclexHelper, DefaultHistory>,
    history_path: PathBuf,
    state: ReplState,
}

impl Repl {
    /// Create a new REPL instance
    pub fn new(config: &Config) -> Result<Self> {
        let editor_config = rustyline::Config::builder()
            .history_ignore_dups(true)?
            .history_ignore_space(true)
            .max_history_size(config.history_size)?
            .auto_add_history(true)
            .build();

        let mut editor = Editor::with_config(editor_config)?;
        editor.set_helper(Some(DoclexHelper::new(config.color)));

        let history_path = config::history_path();
        if let Some(parent) = history_path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                debug!("Cannot create history directory {}: {}", parent.display(), e);
            }
        }
        if let Err(e) = editor.load_history(&history_path) {
            debug!("No history loaded from {}: {}", history_path.display(), e);
        }

        Ok(Self {
            editor,
            history_path,
            state: ReplState::new(config),
        })
    }

    /// Run the REPL main loop
    pub fn run(&mut self) -> Result<()> {
        self.print_banner();

        loop {
            let prompt = self.format_prompt();

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();

                    if trimmed.is_empty() {
                        continue;
                    }

                    if let Some((cmd, arg)) = ReplCommand::parse(trimmed) {
                        match self.execute_command(cmd, arg) {
                            CommandResult::Continue => continue,
                            CommandResult::Exit => break,
                        }
                    }

                    self.tokenize_and_print(None, line);
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", self.paint("^C", Style::new().dimmed()));
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("{}", self.paint("^D", Style::new().dimmed()));
                    break;
                }
                Err(err) => return Err(err.into()),
            }
        }

        if let Err(e) = self.editor.save_history(&self.history_path) {
            debug!("Cannot save history to {}: {}", self.history_path.display(), e);
        }

        Ok(())
    }

    fn paint(&self, text: &str, style: Style) -> String {
        self.state.paint(text, style)
    }

    fn print_banner(&self) {
        let dimmed = Style::new().dimmed();
        println!();
        println!(
            "  {} {} {}",
            self.paint("doclex", Style::new().bright_cyan().bold()),
            self.paint("v", dimmed),
            self.paint(env!("CARGO_PKG_VERSION"), Style::new().bright_yellow())
        );
        println!("  {}", self.paint("Type source to see its tokens", dimmed));
        println!(
            "  {} {} {}",
            self.paint("Type", dimmed),
            self.paint(".help", Style::new().cyan()),
            self.paint("for available commands", dimmed)
        );
        println!();
    }

    fn format_prompt(&self) -> String {
        format!("{} ", self.paint("doclex>", Style::new().bright_green().bold()))
    }

    fn execute_command(&mut self, cmd: ReplCommand, arg: Option<&str>) -> CommandResult {
        match cmd {
            ReplCommand::Help => self.print_help(),
            ReplCommand::Exit => return CommandResult::Exit,
            ReplCommand::Clear => print!("\x1B[2J\x1B[H"),
            ReplCommand::Version => {
                println!(
                    "{} {}",
                    self.paint("doclex", Style::new().bright_cyan().bold()),
                    self.paint(env!("CARGO_PKG_VERSION"), Style::new().yellow())
                );
            }
            ReplCommand::Load => match arg {
                Some(path) => self.load_file(Path::new(path)),
                None => self.print_usage(".load", "requires a file path"),
            },
            ReplCommand::Look => match (arg, self.state.last_source.as_deref()) {
                (None, _) => {
                    self.print_usage(".look", "requires a pattern, e.g. :ident = :number")
                }
                (Some(_), None) => self.print_usage(".look", "needs some source entered first"),
                (Some(pattern), Some(source)) => match run_look(source, pattern) {
                    Ok(found) => println!("{}", self.paint(&found.to_string(), Style::new().yellow())),
                    Err(e) => self.print_error(&e),
                },
            },
            ReplCommand::Docs => match self.state.last_source.as_deref() {
                None => self.print_usage(".docs", "needs some source entered first"),
                Some(source) => {
                    let docs = doc_summaries(source);
                    if docs.is_empty() {
                        println!("{}", self.paint("no doc comments", Style::new().dimmed()));
                    }
                    for (line, summary) in docs {
                        println!(
                            "{} {}",
                            self.paint(&format!("{:>6}", format!("{line}:")), Style::new().dimmed()),
                            self.paint(&summary, Style::new().blue())
                        );
                    }
                }
            },
        }
        CommandResult::Continue
    }

    fn print_help(&self) {
        let heading = Style::new().white().bold();
        let dimmed = Style::new().dimmed();
        println!();
        println!("{}", self.paint("REPL Commands:", heading));
        println!();

        for (cmd, desc) in ReplCommand::all_commands() {
            println!(
                "  {} {}",
                self.paint(&format!("{cmd:18}"), Style::new().cyan()),
                self.paint(desc, dimmed)
            );
        }

        println!();
        println!("{}", self.paint("Patterns:", heading));
        println!();
        println!(
            "  {} {}",
            self.paint(&format!("{:18}", ":kind"), Style::new().yellow()),
            self.paint(
                "matches a token kind (number, string, keyword, ident, regex, operator, doc_comment)",
                dimmed
            )
        );
        println!(
            "  {} {}",
            self.paint(&format!("{:18}", "text"), Style::new().yellow()),
            self.paint("matches a token value", dimmed)
        );
        println!();
    }

    fn load_file(&mut self, path: &Path) {
        match std::fs::read_to_string(path) {
            Ok(source) => self.tokenize_and_print(Some(path.display().to_string()), source),
            Err(e) => self.print_error(&DoclexError::read(path, e)),
        }
    }

    fn tokenize_and_print(&mut self, path: Option<String>, source: String) {
        print!("{}", self.state.render(path, source));
    }

    fn print_usage(&self, cmd: &str, message: &str) {
        eprintln!(
            "{}: {} {}",
            self.paint("Error", Style::new().red().bold()),
            self.paint(cmd, Style::new().cyan()),
            self.paint(message, Style::new().dimmed())
        );
    }

    fn print_error(&self, error: &DoclexError) {
        eprintln!("{}: {}", self.paint("Error", Style::new().red().bold()), error);
    }
}

/// Result of executing a REPL command
enum CommandResult {
    Continue,
    Exit,
}
