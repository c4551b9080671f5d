// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # doclex-lexer
//!
//! Lexical analysis for JavaScript-family sources, tuned for documentation
//! extraction.
//!
//! The tokenizer turns source text into a stream of typed tokens. Ordinary
//! comments vanish like whitespace, while `/** ... */` comments survive as
//! [`TokenKind::DocComment`] tokens carrying the line they start on, so a
//! downstream parser can attach them to the code that follows.
//!
//! ## Structure
//!
//! - `cursor.rs` - `Cursor`, a position over the text with save/restore
//! - `token.rs` - `Token`, `TokenKind`, `Span`, and lookahead `Expect` elements
//! - `tokenizer.rs` - `Tokenizer`, the pull interface consumers drive
//!
//! ## Usage
//!
//! ```rust
//! use doclex_lexer::{Tokenizer, TokenKind};
//!
//! let mut tokenizer = Tokenizer::new("/** Adds. */\nvar sum = a / b;");
//!
//! while let Some(token) = tokenizer.advance() {
//!     if token.kind == TokenKind::DocComment {
//!         println!("doc on line {:?}: {}", token.line, token.value);
//!     }
//! }
//! ```
//!
//! The tokenizer is total: malformed input never produces an error.
//! Unterminated strings, comments, and regular expressions run to the end
//! of the text, and any unrecognized character becomes a one-character
//! operator token.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod cursor;
mod token;
mod tokenizer;

pub use cursor::{Cursor, Mark};
pub use token::{Expect, Span, Token, TokenKind, UnknownKind};
pub use tokenizer::{Tokenizer, is_keyword, tokenize};
