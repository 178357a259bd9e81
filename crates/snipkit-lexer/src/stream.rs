//! Position-tracking character stream.

use crate::token::Position;

/// Raised by [`CharStream::next_char`] once every character has been consumed.
///
/// This is the normal way a tokenization pass ends and is deliberately not a
/// [`LexerError`](crate::LexerError).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndOfInput;

/// Character stream over snippet text.
pub struct CharStream {
    chars: Vec<char>,
    index: usize,
    line: usize,
    column: usize,
}

impl CharStream {
    /// Create a stream over `text` whose first character sits at `offset`.
    pub fn new(text: &str, offset: Position) -> Self {
        Self {
            chars: text.chars().collect(),
            index: 0,
            line: offset.line,
            column: offset.column,
        }
    }

    /// Consume the next character.
    pub fn next_char(&mut self) -> Result<char, EndOfInput> {
        let ch = *self.chars.get(self.index).ok_or(EndOfInput)?;
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        self.index += 1;
        Ok(ch)
    }

    /// Consume `n` characters, discarding them.
    pub fn skip(&mut self, n: usize) -> Result<(), EndOfInput> {
        for _ in 0..n {
            self.next_char()?;
        }
        Ok(())
    }

    /// Up to `n` upcoming characters. Shorter (possibly empty) near the end.
    pub fn peek(&self, n: usize) -> &[char] {
        let end = self.index.saturating_add(n).min(self.chars.len());
        &self.chars[self.index..end]
    }

    /// Peek at the next character without consuming it.
    pub fn peek_char(&self) -> Option<char> {
        self.peek_at(0)
    }

    /// Peek `n` characters ahead without consuming.
    pub fn peek_at(&self, n: usize) -> Option<char> {
        self.chars.get(self.index + n).copied()
    }

    /// Returns true if the upcoming characters spell out `prefix`.
    pub fn starts_with(&self, prefix: &str) -> bool {
        prefix
            .chars()
            .enumerate()
            .all(|(i, ch)| self.peek_at(i) == Some(ch))
    }

    /// Returns true once every character has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.index >= self.chars.len()
    }

    /// Current position.
    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_advances_position() {
        let mut stream = CharStream::new("ab\nc", Position::default());
        assert_eq!(stream.next_char(), Ok('a'));
        assert_eq!(stream.position(), Position::new(0, 1));
        assert_eq!(stream.next_char(), Ok('b'));
        assert_eq!(stream.next_char(), Ok('\n'));
        assert_eq!(stream.position(), Position::new(1, 0));
        assert_eq!(stream.next_char(), Ok('c'));
        assert_eq!(stream.position(), Position::new(1, 1));
        assert_eq!(stream.next_char(), Err(EndOfInput));
        assert_eq!(stream.next_char(), Err(EndOfInput));
        assert_eq!(stream.position(), Position::new(1, 1));
    }

    #[test]
    fn test_offset() {
        let mut stream = CharStream::new("x\ny", Position::new(3, 7));
        assert_eq!(stream.position(), Position::new(3, 7));
        stream.skip(1).unwrap();
        assert_eq!(stream.position(), Position::new(3, 8));
        stream.skip(1).unwrap();
        assert_eq!(stream.position(), Position::new(4, 0));
    }

    #[test]
    fn test_peek_never_fails() {
        let mut stream = CharStream::new("abc", Position::default());
        assert_eq!(stream.peek(2), &['a', 'b']);
        assert_eq!(stream.peek(10), &['a', 'b', 'c']);
        stream.skip(3).unwrap();
        assert!(stream.peek(4).is_empty());
        assert_eq!(stream.peek_char(), None);
        assert!(stream.is_exhausted());
    }

    #[test]
    fn test_peek_does_not_consume() {
        let stream = CharStream::new("${VISUAL}", Position::default());
        assert!(stream.starts_with("${VISUAL"));
        assert!(!stream.starts_with("${VISUAL}x"));
        assert_eq!(stream.peek_at(8), Some('}'));
        assert_eq!(stream.position(), Position::default());
    }

    #[test]
    fn test_skip_past_end() {
        let mut stream = CharStream::new("ab", Position::default());
        assert_eq!(stream.skip(3), Err(EndOfInput));
        assert!(stream.is_exhausted());
    }

    #[test]
    fn test_multibyte_columns() {
        let mut stream = CharStream::new("é$1", Position::default());
        stream.skip(1).unwrap();
        assert_eq!(stream.position(), Position::new(0, 1));
        assert_eq!(stream.peek_char(), Some('$'));
    }
}
