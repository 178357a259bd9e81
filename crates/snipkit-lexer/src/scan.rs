//! Scanners shared by several token kinds.

use crate::stream::{CharStream, EndOfInput};

/// Characters a backslash escapes at the top level of a snippet.
pub const DEFAULT_ESCAPES: &[char] = &['{', '}', '\\', '$', '`'];

/// Escapes that matter while scanning brace-delimited text.
pub(crate) const BRACE_ESCAPES: &[char] = &['{', '}'];

/// Returns true if the stream is at a backslash escaping one of `escapable`.
pub fn escape_starts_here(stream: &CharStream, escapable: &[char]) -> bool {
    match stream.peek(2) {
        ['\\', ch] => escapable.contains(ch),
        _ => false,
    }
}

/// Length of the number starting `from` characters ahead.
///
/// Zero when no digit follows or when the run is too long to fit a `usize`;
/// such a run is left to be skipped as plain text.
pub fn number_len_at(stream: &CharStream, from: usize) -> usize {
    let mut len = 0;
    let mut value: Option<usize> = Some(0);
    while let Some(digit) = stream.peek_at(from + len).and_then(|ch| ch.to_digit(10)) {
        value = value
            .and_then(|v| v.checked_mul(10))
            .and_then(|v| v.checked_add(digit as usize));
        len += 1;
    }
    if value.is_some() { len } else { 0 }
}

/// Read a run of decimal digits.
///
/// The caller has already checked with [`number_len_at`] that a number fits.
pub fn parse_number(stream: &mut CharStream) -> usize {
    let mut value = 0usize;
    while let Some(digit) = stream.peek_char().and_then(|ch| ch.to_digit(10)) {
        stream.next_char().ok(); // Already peeked
        value = value.saturating_mul(10).saturating_add(digit as usize);
    }
    value
}

/// Read up to the `}` that closes an already consumed `{`.
///
/// Nested unescaped braces are balanced and kept in the result, escaped braces
/// are kept in their two-character form. The closing brace is consumed but not
/// returned.
pub fn parse_till_closing_brace(stream: &mut CharStream) -> Result<String, EndOfInput> {
    let mut text = String::new();
    let mut depth = 1usize;
    loop {
        if escape_starts_here(stream, BRACE_ESCAPES) {
            text.push(stream.next_char()?);
            text.push(stream.next_char()?);
            continue;
        }
        let ch = stream.next_char()?;
        match ch {
            '{' => depth += 1,
            '}' => depth -= 1,
            _ => {}
        }
        if depth == 0 {
            return Ok(text);
        }
        text.push(ch);
    }
}

/// Read up to the first unescaped character in `stops`.
///
/// Escaped stop characters are kept in their two-character form. Returns the
/// text and the stop character that ended it, which is consumed.
pub fn parse_till_unescaped_char(
    stream: &mut CharStream,
    stops: &[char],
) -> Result<(String, char), EndOfInput> {
    let mut text = String::new();
    loop {
        let mut escaped = false;
        for stop in stops {
            if escape_starts_here(stream, std::slice::from_ref(stop)) {
                text.push(stream.next_char()?);
                text.push(stream.next_char()?);
                escaped = true;
            }
        }
        if escaped {
            continue;
        }
        let ch = stream.next_char()?;
        if stops.contains(&ch) {
            return Ok((text, ch));
        }
        text.push(ch);
    }
}

/// Remove one level of backslash escaping.
///
/// A trailing lone backslash is kept as is.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some(escaped) => out.push(escaped),
                None => out.push(ch),
            }
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Position;

    fn stream(text: &str) -> CharStream {
        CharStream::new(text, Position::default())
    }

    #[test]
    fn test_escape_starts_here() {
        assert!(escape_starts_here(&stream(r"\$"), DEFAULT_ESCAPES));
        assert!(escape_starts_here(&stream(r"\`x"), DEFAULT_ESCAPES));
        assert!(!escape_starts_here(&stream(r"\n"), DEFAULT_ESCAPES));
        assert!(!escape_starts_here(&stream(r"\$"), BRACE_ESCAPES));
        assert!(!escape_starts_here(&stream(r"\"), DEFAULT_ESCAPES));
        assert!(!escape_starts_here(&stream(""), DEFAULT_ESCAPES));
    }

    #[test]
    fn test_parse_number() {
        let mut s = stream("123abc");
        assert_eq!(parse_number(&mut s), 123);
        assert_eq!(s.peek_char(), Some('a'));

        let mut s = stream("007}");
        assert_eq!(parse_number(&mut s), 7);
        assert_eq!(s.peek_char(), Some('}'));
    }

    #[test]
    fn test_number_len_at() {
        assert_eq!(number_len_at(&stream("$12}"), 1), 2);
        assert_eq!(number_len_at(&stream("${7"), 2), 1);
        assert_eq!(number_len_at(&stream("$x"), 1), 0);
        assert_eq!(number_len_at(&stream("$"), 1), 0);
    }

    #[test]
    fn test_number_len_at_overflow() {
        let input = format!("${}", "9".repeat(40));
        assert_eq!(number_len_at(&stream(&input), 1), 0);
        let max = format!("${}", usize::MAX);
        assert_eq!(number_len_at(&stream(&max), 1), max.len() - 1);
    }

    #[test]
    fn test_closing_brace_simple() {
        let mut s = stream("hello} rest");
        assert_eq!(parse_till_closing_brace(&mut s), Ok("hello".to_string()));
        assert_eq!(s.peek_char(), Some(' '));
    }

    #[test]
    fn test_closing_brace_nested() {
        let mut s = stream("a{b{c}}d}e");
        assert_eq!(parse_till_closing_brace(&mut s), Ok("a{b{c}}d".to_string()));
        assert_eq!(s.peek_char(), Some('e'));
    }

    #[test]
    fn test_closing_brace_escaped() {
        let mut s = stream(r"a\}b\{c}");
        assert_eq!(parse_till_closing_brace(&mut s), Ok(r"a\}b\{c".to_string()));
        assert!(s.is_exhausted());
    }

    #[test]
    fn test_closing_brace_unterminated() {
        let mut s = stream("a{b}");
        assert_eq!(parse_till_closing_brace(&mut s), Err(EndOfInput));
    }

    #[test]
    fn test_unescaped_char() {
        let mut s = stream("foo/bar/");
        assert_eq!(
            parse_till_unescaped_char(&mut s, &['/']),
            Ok(("foo".to_string(), '/'))
        );
        assert_eq!(
            parse_till_unescaped_char(&mut s, &['/']),
            Ok(("bar".to_string(), '/'))
        );
        assert!(s.is_exhausted());
    }

    #[test]
    fn test_unescaped_char_keeps_escapes() {
        let mut s = stream(r"a\/b\}c}");
        assert_eq!(
            parse_till_unescaped_char(&mut s, &['/', '}']),
            Ok((r"a\/b\}c".to_string(), '}'))
        );
    }

    #[test]
    fn test_unescaped_char_ignores_other_escapes() {
        let mut s = stream(r"a\$b`");
        assert_eq!(
            parse_till_unescaped_char(&mut s, &['`']),
            Ok((r"a\$b".to_string(), '`'))
        );
    }

    #[test]
    fn test_unescaped_char_reports_stop() {
        let mut s = stream("abc/x}");
        assert_eq!(
            parse_till_unescaped_char(&mut s, &['/', '}']),
            Ok(("abc".to_string(), '/'))
        );
        assert_eq!(
            parse_till_unescaped_char(&mut s, &['/', '}']),
            Ok(("x".to_string(), '}'))
        );
    }

    #[test]
    fn test_unescaped_char_unterminated() {
        let mut s = stream("no stop here");
        assert_eq!(parse_till_unescaped_char(&mut s, &['`']), Err(EndOfInput));
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r"a\/b"), "a/b");
        assert_eq!(unescape(r"\\\}"), r"\}");
        assert_eq!(unescape("plain"), "plain");
        assert_eq!(unescape(r"end\"), r"end\");
        assert_eq!(unescape(""), "");
    }
}
