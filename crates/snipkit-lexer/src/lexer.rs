//! Lexer for snippet templates.
//!
//! Plain text between tokens is skipped; only the constructs a snippet engine
//! acts on are emitted.

use std::iter::FusedIterator;

use thiserror::Error;
use tracing::{debug, trace};

use crate::scan::{
    DEFAULT_ESCAPES, escape_starts_here, number_len_at, parse_number, parse_till_closing_brace,
    parse_till_unescaped_char, unescape,
};
use crate::stream::{CharStream, EndOfInput};
use crate::token::{Position, Token, TokenKind, Transformation};

/// Errors that can occur during lexing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexerError {
    #[error(
        "Invalid ${{VISUAL}} transformation at line {line}, column {column}. Forgot to escape a '/'?"
    )]
    MalformedTransformation { line: usize, column: usize },
}

/// Why a token parse stopped early.
#[derive(Debug)]
enum Interrupt {
    /// The input ran out; the pass ends normally.
    End,
    Failed(LexerError),
}

impl From<EndOfInput> for Interrupt {
    fn from(_: EndOfInput) -> Self {
        Interrupt::End
    }
}

impl From<LexerError> for Interrupt {
    fn from(err: LexerError) -> Self {
        Interrupt::Failed(err)
    }
}

/// A token recognizer: a lookahead check and the parser it guards.
struct Recognizer {
    name: &'static str,
    starts_here: fn(&CharStream) -> bool,
    parse: fn(&mut CharStream, &str, Position) -> Result<TokenKind, Interrupt>,
}

/// Recognizers in priority order. Shorter prefixes (`$`, `` ` ``) come after
/// the longer ones they would otherwise shadow.
const RECOGNIZERS: &[Recognizer] = &[
    Recognizer {
        name: "EscapeChar",
        starts_here: escape_char_starts_here,
        parse: parse_escape_char,
    },
    Recognizer {
        name: "Visual",
        starts_here: visual_starts_here,
        parse: parse_visual,
    },
    Recognizer {
        name: "Transformation",
        starts_here: transformation_starts_here,
        parse: parse_transformation,
    },
    Recognizer {
        name: "TabStop",
        starts_here: tab_stop_starts_here,
        parse: parse_tab_stop,
    },
    Recognizer {
        name: "Mirror",
        starts_here: mirror_starts_here,
        parse: parse_mirror,
    },
    Recognizer {
        name: "PythonCode",
        starts_here: python_code_starts_here,
        parse: parse_python_code,
    },
    Recognizer {
        name: "VimLCode",
        starts_here: viml_code_starts_here,
        parse: parse_viml_code,
    },
    Recognizer {
        name: "ShellCode",
        starts_here: shell_code_starts_here,
        parse: parse_shell_code,
    },
];

const VISUAL_PREFIX: &str = "${VISUAL";
const PYTHON_PREFIX: &str = "`!p";
const VIML_PREFIX: &str = "`!v";

/// Lexer tokenizes snippet text.
pub struct Lexer {
    stream: CharStream,
    indent: String,
}

impl Lexer {
    /// Create a lexer over `text`.
    ///
    /// `indent` is the leading whitespace of the snippet's lines, stripped from
    /// continuation lines of Python code. `offset` is the position of the first
    /// character of `text`.
    pub fn new(text: &str, indent: &str, offset: Position) -> Self {
        trace!(target: "snipkit::lexer", %offset, "Creating new lexer");
        Self {
            stream: CharStream::new(text, offset),
            indent: indent.to_string(),
        }
    }

    /// Get the current position.
    pub fn position(&self) -> Position {
        self.stream.position()
    }

    /// Get the next token.
    ///
    /// Once the input is exhausted every call answers an EndOfText token at the
    /// final position.
    pub fn next_token(&mut self) -> Result<Token, LexerError> {
        loop {
            match self.step() {
                Ok(Some(token)) => {
                    trace!(target: "snipkit::lexer", %token, "Emitted token");
                    return Ok(token);
                }
                Ok(None) => {}
                Err(Interrupt::End) => {
                    let pos = self.stream.position();
                    trace!(target: "snipkit::lexer", %pos, "Reached end of text");
                    return Ok(Token::new(TokenKind::EndOfText, pos, pos));
                }
                Err(Interrupt::Failed(err)) => {
                    debug!(target: "snipkit::lexer", error = %err, "Tokenization failed");
                    return Err(err);
                }
            }
        }
    }

    /// Parse one token at the current position, or discard one character of
    /// plain text.
    fn step(&mut self) -> Result<Option<Token>, Interrupt> {
        for recognizer in RECOGNIZERS {
            if (recognizer.starts_here)(&self.stream) {
                let start = self.stream.position();
                trace!(
                    target: "snipkit::lexer",
                    kind = recognizer.name,
                    %start,
                    "Matched token start"
                );
                let kind = (recognizer.parse)(&mut self.stream, &self.indent, start)?;
                return Ok(Some(Token::new(kind, start, self.stream.position())));
            }
        }
        self.stream.next_char()?;
        Ok(None)
    }
}

/// Lazy token sequence returned by [`tokenize`].
///
/// Yields exactly one EndOfText token, or one error, and then stops.
pub struct Tokens {
    lexer: Lexer,
    done: bool,
}

impl Iterator for Tokens {
    type Item = Result<Token, LexerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.lexer.next_token();
        self.done = !matches!(&result, Ok(token) if !token.is_end());
        Some(result)
    }
}

impl FusedIterator for Tokens {}

/// Tokenize `text` lazily.
pub fn tokenize(text: &str, indent: &str, offset: Position) -> Tokens {
    Tokens {
        lexer: Lexer::new(text, indent, offset),
        done: false,
    }
}

/// Tokenize `text` into a vector of tokens ending with EndOfText.
pub fn tokenize_all(text: &str, indent: &str, offset: Position) -> Result<Vec<Token>, LexerError> {
    tokenize(text, indent, offset).collect()
}

/// The character after `${<digits>`, if the stream starts that way.
fn after_braced_number(stream: &CharStream) -> Option<char> {
    if !stream.starts_with("${") {
        return None;
    }
    match number_len_at(stream, 2) {
        0 => None,
        len => stream.peek_at(2 + len),
    }
}

fn escape_char_starts_here(stream: &CharStream) -> bool {
    escape_starts_here(stream, DEFAULT_ESCAPES)
}

fn parse_escape_char(
    stream: &mut CharStream,
    _indent: &str,
    _start: Position,
) -> Result<TokenKind, Interrupt> {
    stream.next_char()?; // \
    let ch = stream.next_char()?;
    Ok(TokenKind::EscapeChar { ch })
}

fn visual_starts_here(stream: &CharStream) -> bool {
    stream.starts_with(VISUAL_PREFIX)
        && matches!(
            stream.peek_at(VISUAL_PREFIX.len()),
            Some(':' | '}' | '/')
        )
}

fn parse_visual(
    stream: &mut CharStream,
    _indent: &str,
    start: Position,
) -> Result<TokenKind, Interrupt> {
    stream.skip(VISUAL_PREFIX.len())?;
    if stream.peek_char() == Some(':') {
        stream.next_char()?;
    }
    let (alternative, stop) = parse_till_unescaped_char(stream, &['/', '}'])?;
    let transformation = if stop == '/' {
        let transformation = parse_transformation_body(stream).map_err(|EndOfInput| {
            LexerError::MalformedTransformation {
                line: start.line_number(),
                column: start.column_number(),
            }
        })?;
        Some(transformation)
    } else {
        None
    };
    Ok(TokenKind::Visual {
        alternative_text: unescape(&alternative),
        transformation,
    })
}

/// Read `search/replace/options}` following an already consumed `/`.
fn parse_transformation_body(stream: &mut CharStream) -> Result<Transformation, EndOfInput> {
    let (search, _) = parse_till_unescaped_char(stream, &['/'])?;
    let (replace, _) = parse_till_unescaped_char(stream, &['/'])?;
    let options = parse_till_closing_brace(stream)?;
    Ok(Transformation {
        search,
        replace,
        options,
    })
}

fn transformation_starts_here(stream: &CharStream) -> bool {
    after_braced_number(stream) == Some('/')
}

fn parse_transformation(
    stream: &mut CharStream,
    _indent: &str,
    _start: Position,
) -> Result<TokenKind, Interrupt> {
    stream.skip(2)?; // ${
    let number = parse_number(stream);
    stream.next_char()?; // /
    let transformation = parse_transformation_body(stream)?;
    Ok(TokenKind::Transformation {
        number,
        transformation,
    })
}

fn tab_stop_starts_here(stream: &CharStream) -> bool {
    matches!(after_braced_number(stream), Some(':' | '}'))
}

fn parse_tab_stop(
    stream: &mut CharStream,
    _indent: &str,
    _start: Position,
) -> Result<TokenKind, Interrupt> {
    stream.skip(2)?; // ${
    let number = parse_number(stream);
    if stream.peek_char() == Some(':') {
        stream.next_char()?;
    }
    let initial_text = parse_till_closing_brace(stream)?;
    Ok(TokenKind::TabStop {
        number,
        initial_text,
    })
}

fn mirror_starts_here(stream: &CharStream) -> bool {
    stream.peek_char() == Some('$') && number_len_at(stream, 1) > 0
}

fn parse_mirror(
    stream: &mut CharStream,
    _indent: &str,
    _start: Position,
) -> Result<TokenKind, Interrupt> {
    stream.next_char()?; // $
    let number = parse_number(stream);
    Ok(TokenKind::Mirror { number })
}

fn python_code_starts_here(stream: &CharStream) -> bool {
    stream.starts_with(PYTHON_PREFIX)
        && stream
            .peek_at(PYTHON_PREFIX.len())
            .is_some_and(char::is_whitespace)
}

fn parse_python_code(
    stream: &mut CharStream,
    indent: &str,
    _start: Position,
) -> Result<TokenKind, Interrupt> {
    stream.skip(PYTHON_PREFIX.len())?;
    if matches!(stream.peek_char(), Some(' ' | '\t')) {
        stream.next_char()?;
    }
    let (code, _) = parse_till_unescaped_char(stream, &['`'])?;
    Ok(TokenKind::PythonCode {
        code: strip_indent(&code, indent),
        indent: indent.to_string(),
    })
}

/// Remove `indent` from every line of `code` but the first.
///
/// A line that does not start with `indent` loses at most as many leading
/// whitespace characters as `indent` is long.
fn strip_indent(code: &str, indent: &str) -> String {
    if indent.is_empty() {
        return code.to_string();
    }
    let width = indent.chars().count();
    let mut lines = code.lines();
    let mut out = lines.next().unwrap_or_default().to_string();
    for line in lines {
        out.push('\n');
        out.push_str(dedent_line(line, indent, width));
    }
    out
}

fn dedent_line<'a>(line: &'a str, indent: &str, width: usize) -> &'a str {
    if let Some(rest) = line.strip_prefix(indent) {
        return rest;
    }
    let cut = line
        .char_indices()
        .take(width)
        .take_while(|(_, ch)| ch.is_whitespace())
        .last()
        .map_or(0, |(i, ch)| i + ch.len_utf8());
    &line[cut..]
}

fn viml_code_starts_here(stream: &CharStream) -> bool {
    stream.starts_with(VIML_PREFIX)
        && stream
            .peek_at(VIML_PREFIX.len())
            .is_some_and(char::is_whitespace)
}

fn parse_viml_code(
    stream: &mut CharStream,
    _indent: &str,
    _start: Position,
) -> Result<TokenKind, Interrupt> {
    stream.skip(VIML_PREFIX.len() + 1)?; // `!v and one whitespace
    let (code, _) = parse_till_unescaped_char(stream, &['`'])?;
    Ok(TokenKind::VimLCode { code })
}

fn shell_code_starts_here(stream: &CharStream) -> bool {
    stream.peek_char() == Some('`')
}

fn parse_shell_code(
    stream: &mut CharStream,
    _indent: &str,
    _start: Position,
) -> Result<TokenKind, Interrupt> {
    stream.next_char()?; // `
    let (code, _) = parse_till_unescaped_char(stream, &['`'])?;
    Ok(TokenKind::ShellCode { code })
}
