//! The tokenizer that produces tokens from source text.
//!
//! Every public operation goes through a single internal pull, which scans
//! tokens from the cursor and then either commits them (updating the token
//! history the slash disambiguator reads) or rolls the cursor back.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use super::{Cursor, Expect, Span, Token, TokenKind};

fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("built-in token pattern must compile")
}

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| pattern(r"\A\s+"));
static PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| pattern(r"\A[.(),;={}:]"));
static WORD: LazyLock<Regex> = LazyLock::new(|| pattern(r"\A[A-Za-z_][A-Za-z0-9_]*"));
static SINGLE_QUOTED: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?s)\A'((?:[^'\\]|\\.?)*)(?:'|\z)"));
static DOUBLE_QUOTED: LazyLock<Regex> =
    LazyLock::new(|| pattern(r#"(?s)\A"((?:[^"\\]|\\.?)*)(?:"|\z)"#));
static SLASH: LazyLock<Regex> = LazyLock::new(|| pattern(r"\A/"));
static DOC_COMMENT_OPEN: LazyLock<Regex> = LazyLock::new(|| pattern(r"\A/\*\*"));
static BLOCK_COMMENT_OPEN: LazyLock<Regex> = LazyLock::new(|| pattern(r"\A/\*"));
static BLOCK_COMMENT_CLOSE: LazyLock<Regex> = LazyLock::new(|| pattern(r"\*/"));
static LINE_COMMENT_OPEN: LazyLock<Regex> = LazyLock::new(|| pattern(r"\A//"));
static LINE_END: LazyLock<Regex> = LazyLock::new(|| pattern(r"\n"));
static REGEX_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?s)\A/(?:[^/\\]|\\.?)*(?:/[gim]*|\z)"));
static NUMBER: LazyLock<Regex> = LazyLock::new(|| pattern(r"\A[0-9]+(?:\.[0-9]*)?"));
static SIGIL_IDENT: LazyLock<Regex> = LazyLock::new(|| pattern(r"\A\$[A-Za-z0-9_]*"));
static ANY_CHAR: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?s)\A."));

/// Returns true if `word` is in the reserved-word set.
pub fn is_keyword(word: &str) -> bool {
    matches!(
        word,
        "break"
            | "case"
            | "catch"
            | "class"
            | "const"
            | "continue"
            | "default"
            | "delete"
            | "do"
            | "else"
            | "enum"
            | "export"
            | "extends"
            | "false"
            | "finally"
            | "for"
            | "function"
            | "if"
            | "import"
            | "in"
            | "instanceof"
            | "let"
            | "new"
            | "null"
            | "return"
            | "super"
            | "switch"
            | "this"
            | "throw"
            | "true"
            | "try"
            | "typeof"
            | "var"
            | "void"
            | "while"
            | "with"
            | "yield"
    )
}

/// Whether a slash following `prev` is the division operator.
///
/// After an operand (identifier, number, `this`, closing paren or bracket)
/// a slash divides; anywhere else it opens a regular expression literal.
fn slash_is_division(prev: Option<&Token>) -> bool {
    let Some(prev) = prev else {
        return false;
    };
    match prev.kind {
        TokenKind::Ident | TokenKind::Number => true,
        TokenKind::Keyword => prev.value == "this",
        TokenKind::Operator => prev.value == ")" || prev.value == "]",
        _ => false,
    }
}

fn token_from(cursor: &Cursor<'_>, kind: TokenKind, value: &str, start: usize) -> Token {
    Token::new(kind, value, Span::new(start, cursor.offset()))
}

/// Scans the next token, skipping whitespace and ordinary comments.
///
/// `prev` is the token the slash disambiguator treats as preceding this one.
/// Returns `None` only at the end of the input.
fn lex(cursor: &mut Cursor<'_>, prev: Option<&Token>) -> Option<Token> {
    while !cursor.is_at_end() {
        cursor.scan(&WHITESPACE);
        if cursor.is_at_end() {
            break;
        }

        let start = cursor.offset();

        if let Some(punct) = cursor.scan(&PUNCTUATION) {
            return Some(token_from(cursor, TokenKind::Operator, punct, start));
        }

        if let Some(word) = cursor.scan(&WORD) {
            let kind = if is_keyword(word) {
                TokenKind::Keyword
            } else {
                TokenKind::Ident
            };
            return Some(token_from(cursor, kind, word, start));
        }

        if let Some(caps) = cursor
            .scan_captures(&SINGLE_QUOTED)
            .or_else(|| cursor.scan_captures(&DOUBLE_QUOTED))
        {
            let body = caps.get(1).map_or("", |m| m.as_str());
            return Some(token_from(cursor, TokenKind::String, body, start));
        }

        if cursor.check(&SLASH) {
            match scan_slash(cursor, prev, start) {
                Some(token) => return Some(token),
                None => continue,
            }
        }

        if let Some(number) = cursor.scan(&NUMBER) {
            return Some(token_from(cursor, TokenKind::Number, number, start));
        }

        if let Some(ident) = cursor.scan(&SIGIL_IDENT) {
            return Some(token_from(cursor, TokenKind::Ident, ident, start));
        }

        if let Some(ch) = cursor.scan(&ANY_CHAR) {
            return Some(token_from(cursor, TokenKind::Operator, ch, start));
        }
    }
    None
}

/// Handles a `/` at the cursor. Returns `None` when a comment was discarded.
fn scan_slash(cursor: &mut Cursor<'_>, prev: Option<&Token>, start: usize) -> Option<Token> {
    if cursor.check(&DOC_COMMENT_OPEN) {
        let line = cursor.preceding_newlines() + 1;
        cursor.scan(&BLOCK_COMMENT_OPEN);
        cursor.scan_until(&BLOCK_COMMENT_CLOSE);
        let end = cursor.offset();
        return Some(Token::doc_comment(
            cursor.slice(start, end),
            line,
            Span::new(start, end),
        ));
    }

    if cursor.scan(&BLOCK_COMMENT_OPEN).is_some() {
        cursor.scan_until(&BLOCK_COMMENT_CLOSE);
        return None;
    }

    if cursor.scan(&LINE_COMMENT_OPEN).is_some() {
        cursor.scan_until(&LINE_END);
        return None;
    }

    if !slash_is_division(prev) {
        if let Some(literal) = cursor.scan(&REGEX_LITERAL) {
            return Some(token_from(cursor, TokenKind::Regex, literal, start));
        }
    }

    let slash = cursor.scan(&SLASH).unwrap_or("/");
    Some(token_from(cursor, TokenKind::Operator, slash, start))
}

/// Whether a pull keeps its effects or is undone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Checkpoint {
    /// Keep the cursor where the scan left it and record the tokens as consumed.
    Commit,
    /// Return the cursor to where it was; the history is untouched.
    Rollback,
}

/// A pull-based tokenizer over a single input text.
///
/// ```rust
/// use doclex_lexer::{Tokenizer, TokenKind};
///
/// let mut tokenizer = Tokenizer::new("x = 5");
/// assert!(tokenizer.look(&[TokenKind::Ident.into(), "=".into(), TokenKind::Number.into()]));
/// assert_eq!(tokenizer.advance_value().as_deref(), Some("x"));
/// ```
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    cursor: Cursor<'a>,
    /// The most recently consumed token; drives slash disambiguation.
    last: Option<Token>,
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer at the start of `text`.
    pub fn new(text: &'a str) -> Self {
        Self::from_cursor(Cursor::new(text))
    }

    /// Creates a tokenizer that starts wherever `cursor` is positioned.
    pub fn from_cursor(cursor: Cursor<'a>) -> Self {
        Self { cursor, last: None }
    }

    /// The underlying cursor.
    pub fn cursor(&self) -> &Cursor<'a> {
        &self.cursor
    }

    /// The most recently consumed token, if any.
    pub fn last_token(&self) -> Option<&Token> {
        self.last.as_ref()
    }

    /// Consumes and returns the next token, or `None` at the end of input.
    pub fn advance(&mut self) -> Option<Token> {
        let token = self.pull(Checkpoint::Commit, |_, _| false).pop();
        if let Some(token) = &token {
            trace!(kind = %token.kind, value = %token.value, offset = token.span.start, "advance");
        }
        token
    }

    /// Consumes the next token and returns only its value.
    pub fn advance_value(&mut self) -> Option<String> {
        self.advance().map(|token| token.value)
    }

    /// Returns the next token without consuming it.
    pub fn peek(&mut self) -> Option<Token> {
        self.pull(Checkpoint::Rollback, |_, _| false).pop()
    }

    /// Tests whether the upcoming tokens match `pattern`, element by element.
    ///
    /// Never consumes anything. Running out of input before the pattern is
    /// exhausted is a mismatch; an empty pattern always matches.
    pub fn look(&mut self, pattern: &[Expect<'_>]) -> bool {
        if pattern.is_empty() {
            return true;
        }

        let mut matched = 0;
        self.pull(Checkpoint::Rollback, |index, token| {
            if !pattern[index].matches(token) {
                return false;
            }
            matched += 1;
            matched < pattern.len()
        });

        let found = matched == pattern.len();
        trace!(?pattern, found, offset = self.cursor.offset(), "look");
        found
    }

    /// Returns true when no tokens remain. Never consumes anything.
    pub fn is_empty(&mut self) -> bool {
        self.pull(Checkpoint::Rollback, |_, _| false).is_empty()
    }

    /// Scans tokens until `wants_more` returns false or input runs out.
    ///
    /// While scanning, the disambiguator sees the previously scanned token of
    /// this same pull, falling back to the committed history. On rollback the
    /// cursor returns to its starting offset and the history is unchanged.
    fn pull<F>(&mut self, checkpoint: Checkpoint, mut wants_more: F) -> Vec<Token>
    where
        F: FnMut(usize, &Token) -> bool,
    {
        let mark = self.cursor.save();
        let mut pulled: Vec<Token> = Vec::new();

        loop {
            let prev = pulled.last().or(self.last.as_ref());
            let Some(token) = lex(&mut self.cursor, prev) else {
                break;
            };
            let more = wants_more(pulled.len(), &token);
            pulled.push(token);
            if !more {
                break;
            }
        }

        match checkpoint {
            Checkpoint::Commit => {
                if let Some(token) = pulled.last() {
                    self.last = Some(token.clone());
                }
            }
            Checkpoint::Rollback => self.cursor.restore(mark),
        }

        pulled
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance()
    }
}

/// Tokenizes all of `text`.
pub fn tokenize(text: &str) -> Vec<Token> {
    Tokenizer::new(text).collect()
}
