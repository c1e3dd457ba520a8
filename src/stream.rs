//! Positional character access over source text.

use crate::diagnostics::{Diagnostic, SourcePosition};

pub struct CharStream {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl CharStream {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 0,
        }
    }

    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    pub fn eof(&self) -> bool {
        self.pos >= self.chars.len()
    }

    pub fn location(&self) -> SourcePosition {
        SourcePosition::new(self.line, self.column)
    }

    /// Builds a lexer diagnostic tagged with the current line and column.
    pub fn error(&self, message: impl Into<String>) -> Diagnostic {
        Diagnostic::lexer(message).with_position(self.location())
    }

    /// Consumes characters while `predicate` holds and returns them.
    pub fn read_while<F>(&mut self, mut predicate: F) -> String
    where
        F: FnMut(char) -> bool,
    {
        let mut taken = String::new();
        while let Some(ch) = self.peek() {
            if !predicate(ch) {
                break;
            }
            taken.push(ch);
            self.next();
        }
        taken
    }
}

impl Iterator for CharStream {
    type Item = char;

    /// Returns the current character and advances past it.
    fn next(&mut self) -> Option<char> {
        let ch = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(ch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;

    #[test]
    fn tracks_line_and_column() {
        let mut stream = CharStream::new("ab\nc");
        assert_eq!(stream.next(), Some('a'));
        assert_eq!(stream.next(), Some('b'));
        assert_eq!(stream.location(), SourcePosition::new(1, 2));
        assert_eq!(stream.next(), Some('\n'));
        assert_eq!(stream.location(), SourcePosition::new(2, 0));
        assert_eq!(stream.peek(), Some('c'));
        assert_eq!(stream.next(), Some('c'));
        assert!(stream.eof());
        assert_eq!(stream.next(), None);
    }

    #[test]
    fn error_carries_position() {
        let mut stream = CharStream::new("x\nyz");
        stream.next();
        stream.next();
        stream.next();
        let diag = stream.error("boom");
        assert_eq!(diag.kind, DiagnosticKind::Lexer);
        assert_eq!(diag.position, Some(SourcePosition::new(2, 1)));
    }

    #[test]
    fn read_while_stops_at_predicate() {
        let mut stream = CharStream::new("123 rest");
        assert_eq!(stream.read_while(|ch| ch.is_ascii_digit()), "123");
        assert_eq!(stream.peek(), Some(' '));
    }
}
