//! Token types for the snippet lexer.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Search/replace/options triple of a transformation.
///
/// All three parts are kept raw: escapes are not removed and the pattern is
/// not validated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Transformation {
    pub search: String,
    pub replace: String,
    pub options: String,
}

impl Transformation {
    /// Create a new Transformation.
    pub fn new(
        search: impl Into<String>,
        replace: impl Into<String>,
        options: impl Into<String>,
    ) -> Self {
        Self {
            search: search.into(),
            replace: replace.into(),
            options: options.into(),
        }
    }
}

/// Token kinds for snippet templates.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind"))]
pub enum TokenKind {
    /// `${1:default}`
    TabStop { number: usize, initial_text: String },
    /// `${VISUAL:default/search/replace/options}`
    Visual {
        alternative_text: String,
        transformation: Option<Transformation>,
    },
    /// `${1/search/replace/options}`
    Transformation {
        number: usize,
        transformation: Transformation,
    },
    /// `$1`
    Mirror { number: usize },
    /// `\$`, `\{` and friends.
    EscapeChar { ch: char },
    /// `` `echo hi` ``
    ShellCode { code: String },
    /// `` `!p snip.rv = "hi"` ``
    PythonCode { code: String, indent: String },
    /// `` `!v g:var` ``
    VimLCode { code: String },
    EndOfText,
}

impl TokenKind {
    /// Stable label for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::TabStop { .. } => "TabStop",
            TokenKind::Visual { .. } => "Visual",
            TokenKind::Transformation { .. } => "Transformation",
            TokenKind::Mirror { .. } => "Mirror",
            TokenKind::EscapeChar { .. } => "EscapeChar",
            TokenKind::ShellCode { .. } => "ShellCode",
            TokenKind::PythonCode { .. } => "PythonCode",
            TokenKind::VimLCode { .. } => "VimLCode",
            TokenKind::EndOfText => "EndOfText",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Position in snippet text.
///
/// Both coordinates are 0-indexed and relative to the offset the lexer was
/// started at. Ordering is by line, then column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    /// 0-indexed line number.
    pub line: usize,
    /// 0-indexed column number, counted in characters.
    pub column: usize,
}

impl Position {
    /// Create a new Position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Returns the 1-indexed line number.
    pub fn line_number(&self) -> usize {
        self.line + 1
    }

    /// Returns the 1-indexed column number.
    pub fn column_number(&self) -> usize {
        self.column + 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Token {
    /// The kind of token, with its payload.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub kind: TokenKind,
    /// Start position in source.
    pub start: Position,
    /// End position in source (exclusive).
    pub end: Position,
}

impl Token {
    /// Create a new Token.
    pub fn new(kind: TokenKind, start: Position, end: Position) -> Self {
        Self { kind, start, end }
    }

    /// Stable label for this token's kind.
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// The text a token starts out with when expanded.
    ///
    /// Tab stops answer their default text and escapes the escaped character;
    /// every other kind starts out empty.
    pub fn initial_text(&self) -> String {
        match &self.kind {
            TokenKind::TabStop { initial_text, .. } => initial_text.clone(),
            TokenKind::EscapeChar { ch } => ch.to_string(),
            _ => String::new(),
        }
    }

    /// The tab stop number this token refers to, if any.
    pub fn number(&self) -> Option<usize> {
        match self.kind {
            TokenKind::TabStop { number, .. }
            | TokenKind::Transformation { number, .. }
            | TokenKind::Mirror { number } => Some(number),
            _ => None,
        }
    }

    /// The search/replace/options triple, for transformations and
    /// transforming `${VISUAL}` placeholders.
    pub fn transformation(&self) -> Option<&Transformation> {
        match &self.kind {
            TokenKind::Transformation { transformation, .. } => Some(transformation),
            TokenKind::Visual { transformation, .. } => transformation.as_ref(),
            _ => None,
        }
    }

    /// Returns true for the terminal EndOfText token.
    pub fn is_end(&self) -> bool {
        matches!(self.kind, TokenKind::EndOfText)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}..{}", self.name(), self.start, self.end)?;
        match &self.kind {
            TokenKind::TabStop {
                number,
                initial_text,
            } => write!(f, ", {}, {:?}", number, initial_text)?,
            TokenKind::Visual {
                alternative_text,
                transformation,
            } => {
                write!(f, ", {:?}", alternative_text)?;
                if let Some(t) = transformation {
                    write!(f, ", {:?}, {:?}, {:?}", t.search, t.replace, t.options)?;
                }
            }
            TokenKind::Transformation {
                number,
                transformation: t,
            } => write!(
                f,
                ", {}, {:?}, {:?}, {:?}",
                number, t.search, t.replace, t.options
            )?,
            TokenKind::Mirror { number } => write!(f, ", {}", number)?,
            TokenKind::EscapeChar { ch } => write!(f, ", {:?}", ch)?,
            TokenKind::ShellCode { code }
            | TokenKind::PythonCode { code, .. }
            | TokenKind::VimLCode { code } => write!(f, ", {:?}", code)?,
            TokenKind::EndOfText => {}
        }
        write!(f, ")")
    }
}
