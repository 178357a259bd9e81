//! snipkit - snippet template tokenization for editor snippet engines.
//!
//! Snippet bodies are turned into a token stream describing tab stops,
//! mirrors, transformations, `${VISUAL}` placeholders, escapes and
//! interpolated shell, Python and VimL code. Building editable regions from
//! the tokens and running the code is left to the caller.
//!
//! # Example
//!
//! ```
//! use snipkit::{TokenKind, lex};
//!
//! let tokens = lex("for ${1:i} in $1").unwrap();
//! assert_eq!(tokens[0].number(), Some(1));
//! assert_eq!(tokens[1].kind, TokenKind::Mirror { number: 1 });
//! ```

pub use snipkit_lexer as lexer;

// Re-export commonly used types
pub use snipkit_lexer::{
    Lexer, LexerError, Position, Token, TokenKind, Tokens, Transformation, tokenize, tokenize_all,
    unescape,
};

/// Options for a tokenization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LexOptions {
    /// Leading whitespace of the snippet's lines, removed from continuation
    /// lines of Python code.
    pub indent: String,
    /// Position of the first character of the text.
    pub offset: Position,
}

impl LexOptions {
    /// Create options with the given indent and offset.
    pub fn new(indent: impl Into<String>, offset: Position) -> Self {
        Self {
            indent: indent.into(),
            offset,
        }
    }
}

/// Tokenize a snippet body with default options.
pub fn lex(text: &str) -> Result<Vec<Token>, LexerError> {
    lex_with(text, &LexOptions::default())
}

/// Tokenize a snippet body with custom options.
///
/// # Example
///
/// ```
/// use snipkit::{LexOptions, Position, TokenKind, lex_with};
///
/// let options = LexOptions::new("    ", Position::new(4, 8));
/// let tokens = lex_with("`!p x = 1\n    y = 2`", &options).unwrap();
/// assert_eq!(tokens[0].start, Position::new(4, 8));
/// assert_eq!(
///     tokens[0].kind,
///     TokenKind::PythonCode { code: "x = 1\ny = 2".into(), indent: "    ".into() }
/// );
/// ```
pub fn lex_with(text: &str, options: &LexOptions) -> Result<Vec<Token>, LexerError> {
    tokenize_all(text, &options.indent, options.offset)
}
