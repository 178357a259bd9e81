//! snipkit lexer - tokenization for snippet templates.
//!
//! This crate converts snippet text into tab stops, mirrors, transformations,
//! escapes and interpolated code tokens for a snippet expansion engine.
//!
//! # Example
//!
//! ```
//! use snipkit_lexer::{Position, TokenKind, tokenize_all};
//!
//! let tokens = tokenize_all("${1:hello} $1", "", Position::default()).unwrap();
//! assert_eq!(tokens[1].kind, TokenKind::Mirror { number: 1 });
//! assert!(tokens[2].is_end());
//! ```

pub mod lexer;
pub mod scan;
pub mod stream;
pub mod token;

pub use lexer::{Lexer, LexerError, Tokens, tokenize, tokenize_all};
pub use scan::{DEFAULT_ESCAPES, unescape};
pub use stream::{CharStream, EndOfInput};
pub use token::{Position, Token, TokenKind, Transformation};
