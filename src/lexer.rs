use crate::{
    diagnostics::{Diagnostic, SourcePosition},
    stream::CharStream,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Quote,
    Quasiquote,
    Unquote,
    SpliceUnquote,
    Deref,
    Meta,
    Number,
    String,
    Keyword,
    Operator,
    Identifier,
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub position: SourcePosition,
}

impl Token {
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

/// Single forward pass over a [`CharStream`], caching at most one token of
/// look-ahead.
pub struct Lexer {
    stream: CharStream,
    lookahead: Option<Token>,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            stream: CharStream::new(source),
            lookahead: None,
        }
    }

    pub fn peek(&mut self) -> Result<&Token, Diagnostic> {
        let token = match self.lookahead.take() {
            Some(token) => token,
            None => self.read_next()?,
        };
        Ok(&*self.lookahead.insert(token))
    }

    pub fn next_token(&mut self) -> Result<Token, Diagnostic> {
        match self.lookahead.take() {
            Some(token) => Ok(token),
            None => self.read_next(),
        }
    }

    pub fn eof(&mut self) -> Result<bool, Diagnostic> {
        Ok(self.peek()?.is(TokenKind::Eof))
    }

    /// Drains the stream, including the trailing `Eof` token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, Diagnostic> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.is(TokenKind::Eof);
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            self.stream.read_while(is_separator);
            if self.stream.peek() != Some(';') {
                break;
            }
            self.stream.read_while(|ch| ch != '\n');
        }
    }

    fn read_next(&mut self) -> Result<Token, Diagnostic> {
        self.skip_whitespace_and_comments();
        let position = self.stream.location();
        let Some(ch) = self.stream.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                lexeme: String::new(),
                position,
            });
        };

        let (kind, lexeme) = match ch {
            '(' | ')' | '[' | ']' | '{' | '}' => {
                self.stream.next();
                let kind = match ch {
                    '(' => TokenKind::LParen,
                    ')' => TokenKind::RParen,
                    '[' => TokenKind::LBracket,
                    ']' => TokenKind::RBracket,
                    '{' => TokenKind::LBrace,
                    _ => TokenKind::RBrace,
                };
                (kind, ch.to_string())
            }
            '+' | '-' | '/' | '*' | '%' => (TokenKind::Operator, self.word()),
            '<' | '>' | '=' => (TokenKind::Operator, self.relational_operator()),
            '0'..='9' | '.' => (
                TokenKind::Number,
                self.stream.read_while(|ch| ch.is_ascii_digit() || ch == '.'),
            ),
            '"' => (TokenKind::String, self.string_literal(position)?),
            '\'' | '`' | '~' => self.quote(),
            ':' => (TokenKind::Keyword, self.word()),
            '@' => {
                self.stream.next();
                (TokenKind::Deref, ch.to_string())
            }
            '^' => {
                self.stream.next();
                (TokenKind::Meta, ch.to_string())
            }
            _ if ch.is_alphabetic() || ch == '_' => (TokenKind::Identifier, self.word()),
            _ => return Err(self.stream.error(format!("unrecognized character `{ch}`"))),
        };

        Ok(Token {
            kind,
            lexeme,
            position,
        })
    }

    /// Maximal run up to the next separator or container delimiter.
    fn word(&mut self) -> String {
        self.stream.read_while(|ch| !is_separator(ch) && !is_container(ch))
    }

    fn relational_operator(&mut self) -> String {
        let mut operator = String::new();
        if let Some(first) = self.stream.next() {
            operator.push(first);
            if first != '=' && self.stream.peek() == Some('=') {
                self.stream.next();
                operator.push('=');
            }
        }
        operator
    }

    fn quote(&mut self) -> (TokenKind, String) {
        match self.stream.next() {
            Some('~') if self.stream.peek() == Some('@') => {
                self.stream.next();
                (TokenKind::SpliceUnquote, "~@".to_string())
            }
            Some('~') => (TokenKind::Unquote, "~".to_string()),
            Some('`') => (TokenKind::Quasiquote, "`".to_string()),
            _ => (TokenKind::Quote, "'".to_string()),
        }
    }

    /// Reads up to the closing quote, which is kept in the lexeme. A quote
    /// preceded by an odd number of backslashes does not close the string.
    fn string_literal(&mut self, start: SourcePosition) -> Result<String, Diagnostic> {
        let mut lexeme = String::new();
        if let Some(open) = self.stream.next() {
            lexeme.push(open);
        }
        loop {
            lexeme.push_str(&self.stream.read_while(|ch| ch != '"'));
            let Some(quote) = self.stream.next() else {
                return Err(self
                    .stream
                    .error("unterminated string literal")
                    .with_note(format!("string opened at {start}")));
            };
            let backslashes = lexeme.chars().rev().take_while(|&ch| ch == '\\').count();
            lexeme.push(quote);
            if backslashes % 2 == 0 {
                return Ok(lexeme);
            }
        }
    }
}

fn is_separator(ch: char) -> bool {
    ch.is_whitespace() || ch == ','
}

fn is_container(ch: char) -> bool {
    matches!(ch, '(' | ')' | '[' | ']' | '{' | '}')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;

    fn lexemes(source: &str) -> Vec<String> {
        Lexer::new(source)
            .tokenize()
            .expect("tokenize")
            .into_iter()
            .filter(|token| !token.is(TokenKind::Eof))
            .map(|token| token.lexeme)
            .collect()
    }

    #[test]
    fn splits_containers_and_atoms() {
        assert_eq!(
            lexemes("(+ 1 [2, 3] {:a \"b\"})"),
            vec!["(", "+", "1", "[", "2", "3", "]", "{", ":a", "\"b\"", "}", ")"]
        );
    }

    #[test]
    fn math_operator_absorbs_following_characters() {
        assert_eq!(lexemes("(-5 +abc)"), vec!["(", "-5", "+abc", ")"]);
    }

    #[test]
    fn relational_operators_extend_with_equals() {
        assert_eq!(lexemes("<= >= < > ="), vec!["<=", ">=", "<", ">", "="]);
        assert_eq!(lexemes("=="), vec!["=", "="]);
    }

    #[test]
    fn quote_markers() {
        let tokens = Lexer::new("' ` ~ ~@ @ ^").tokenize().expect("tokenize");
        let kinds: Vec<_> = tokens.iter().map(|token| token.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Quote,
                TokenKind::Quasiquote,
                TokenKind::Unquote,
                TokenKind::SpliceUnquote,
                TokenKind::Deref,
                TokenKind::Meta,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn escaped_quotes_do_not_close_strings() {
        assert_eq!(lexemes(r#""a \"b\" c" x"#), vec![r#""a \"b\" c""#, "x"]);
        assert_eq!(lexemes(r#""a\\" x"#), vec![r#""a\\""#, "x"]);
    }

    #[test]
    fn unterminated_string_is_lex_error() {
        let err = Lexer::new("(x \"abc").tokenize().unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::Lexer);
        assert_eq!(err.position, Some(SourcePosition::new(1, 7)));
        assert_eq!(err.notes, vec!["string opened at 1:3".to_string()]);
    }

    #[test]
    fn rejects_unknown_leading_character() {
        let err = Lexer::new("(a #b)").tokenize().unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::Lexer);
        assert_eq!(err.position, Some(SourcePosition::new(1, 3)));
    }

    #[test]
    fn skips_comments() {
        assert_eq!(lexemes("; header\n(a ; trailing\n b)"), vec!["(", "a", "b", ")"]);
    }

    #[test]
    fn peek_caches_one_token() {
        let mut lexer = Lexer::new("foo bar");
        assert_eq!(lexer.peek().expect("peek").lexeme, "foo");
        assert_eq!(lexer.peek().expect("peek").lexeme, "foo");
        assert_eq!(lexer.next_token().expect("next").lexeme, "foo");
        assert_eq!(lexer.next_token().expect("next").lexeme, "bar");
        assert!(lexer.eof().expect("eof"));
    }
}
