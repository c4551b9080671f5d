//! Token definitions for the documentation lexer.

use std::fmt;
use std::str::FromStr;

/// A span in the source text, as byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length of this span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if this span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// The seven kinds of token the lexer produces.
///
/// Whitespace and ordinary comments never become tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TokenKind {
    /// Numeric literal, kept as source text
    Number,
    /// String literal with its quotes stripped
    String,
    /// Reserved word
    Keyword,
    /// Identifier, including `$`-prefixed ones
    Ident,
    /// Regular expression literal with delimiters and flags
    Regex,
    /// Punctuation or any other single character
    Operator,
    /// `/** ... */` comment
    DocComment,
}

impl TokenKind {
    /// All kinds, in declaration order.
    pub const ALL: [TokenKind; 7] = [
        TokenKind::Number,
        TokenKind::String,
        TokenKind::Keyword,
        TokenKind::Ident,
        TokenKind::Regex,
        TokenKind::Operator,
        TokenKind::DocComment,
    ];

    /// The stable lowercase name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Keyword => "keyword",
            TokenKind::Ident => "ident",
            TokenKind::Regex => "regex",
            TokenKind::Operator => "operator",
            TokenKind::DocComment => "doc_comment",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown token kind name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown token kind `{}`", self.0)
    }
}

impl std::error::Error for UnknownKind {}

impl FromStr for TokenKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TokenKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// A token produced by the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The token text. Strings lose their quotes; everything else is verbatim.
    pub value: String,
    /// 1-based source line, set only on doc comments
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub line: Option<usize>,
    /// Full source extent, delimiters included
    pub span: Span,
}

impl Token {
    /// Creates a new token without a line number.
    pub fn new(kind: TokenKind, value: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            value: value.into(),
            line: None,
            span,
        }
    }

    /// Creates a doc-comment token starting on `line`.
    pub fn doc_comment(value: impl Into<String>, line: usize, span: Span) -> Self {
        Self {
            kind: TokenKind::DocComment,
            value: value.into(),
            line: Some(line),
            span,
        }
    }

    /// Returns true if this token has the given kind and value.
    pub fn is(&self, kind: TokenKind, value: &str) -> bool {
        self.kind == kind && self.value == value
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}@{} {}", self.kind, line, self.value),
            None => write!(f, "{} {}", self.kind, self.value),
        }
    }
}

/// One element of a lookahead pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expect<'p> {
    /// Matches any token of this kind
    Kind(TokenKind),
    /// Matches any token with exactly this value
    Value(&'p str),
}

impl Expect<'_> {
    /// Tests a token against this element.
    pub fn matches(&self, token: &Token) -> bool {
        match self {
            Expect::Kind(kind) => token.kind == *kind,
            Expect::Value(value) => token.value == *value,
        }
    }
}

impl From<TokenKind> for Expect<'_> {
    fn from(kind: TokenKind) -> Self {
        Expect::Kind(kind)
    }
}

impl<'p> From<&'p str> for Expect<'p> {
    fn from(value: &'p str) -> Self {
        Expect::Value(value)
    }
}

impl<'p> Expect<'p> {
    /// Parses the textual form: `:kind` is a kind tag, anything else a literal.
    ///
    /// A lone `:` is the literal colon operator.
    pub fn parse(text: &'p str) -> Result<Self, UnknownKind> {
        match text.strip_prefix(':') {
            Some(name) if !name.is_empty() => name.parse().map(Expect::Kind),
            _ => Ok(Expect::Value(text)),
        }
    }
}

impl fmt::Display for Expect<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expect::Kind(kind) => write!(f, ":{}", kind),
            Expect::Value(value) => f.write_str(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in TokenKind::ALL {
            assert_eq!(kind.as_str().parse::<TokenKind>(), Ok(kind));
        }
        assert!("identifier".parse::<TokenKind>().is_err());
    }

    #[test]
    fn test_expect_parse() {
        assert_eq!(Expect::parse(":ident"), Ok(Expect::Kind(TokenKind::Ident)));
        assert_eq!(Expect::parse("="), Ok(Expect::Value("=")));
        assert_eq!(Expect::parse(":"), Ok(Expect::Value(":")));
        assert_eq!(Expect::parse(":bogus"), Err(UnknownKind("bogus".into())));
    }

    #[test]
    fn test_expect_matches() {
        let token = Token::new(TokenKind::Ident, "x", Span::new(0, 1));
        assert!(Expect::Kind(TokenKind::Ident).matches(&token));
        assert!(Expect::Value("x").matches(&token));
        assert!(!Expect::Kind(TokenKind::Number).matches(&token));
        assert!(!Expect::Value("y").matches(&token));
    }

    #[test]
    fn test_display() {
        let doc = Token::doc_comment("/** hi */", 3, Span::new(2, 11));
        assert_eq!(doc.to_string(), "doc_comment@3 /** hi */");
        let op = Token::new(TokenKind::Operator, "=", Span::new(0, 1));
        assert_eq!(op.to_string(), "operator =");
    }
}
