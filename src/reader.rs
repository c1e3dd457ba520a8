use crate::{
    diagnostics::Diagnostic,
    lexer::{Lexer, Token, TokenKind},
    node::Node,
};

/// Reads the first form of `source`. Anything after it is ignored.
pub fn read_str(source: &str) -> Result<Node, Diagnostic> {
    Reader::new(source).read_form()
}

/// Reads every top-level form of `source`.
pub fn read_all(source: &str) -> Result<Vec<Node>, Diagnostic> {
    let mut reader = Reader::new(source);
    let mut forms = Vec::new();
    while !reader.lexer.eof()? {
        forms.push(reader.read_form()?);
    }
    Ok(forms)
}

/// Recursive-descent reader over a [`Lexer`].
pub struct Reader {
    lexer: Lexer,
}

impl Reader {
    pub fn new(source: &str) -> Self {
        Self {
            lexer: Lexer::new(source),
        }
    }

    pub fn read_form(&mut self) -> Result<Node, Diagnostic> {
        let token = self.lexer.peek()?.clone();
        match token.kind {
            TokenKind::Eof => Err(Diagnostic::parser("unexpected end of input")
                .with_position(token.position)),
            TokenKind::LParen => Ok(Node::List(self.read_container(TokenKind::RParen)?)),
            TokenKind::LBracket => Ok(Node::Vector(self.read_container(TokenKind::RBracket)?)),
            TokenKind::LBrace => Ok(Node::Hashmap(self.read_container(TokenKind::RBrace)?)),
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                Err(Diagnostic::parser(format!("unexpected `{}`", token.lexeme))
                    .with_position(token.position))
            }
            TokenKind::Quote => Ok(Node::Quote(self.read_wrapped()?)),
            TokenKind::Quasiquote => Ok(Node::Quasiquote(self.read_wrapped()?)),
            TokenKind::Unquote => Ok(Node::Unquote(self.read_wrapped()?)),
            TokenKind::SpliceUnquote => Ok(Node::SpliceUnquote(self.read_wrapped()?)),
            TokenKind::Deref => Ok(Node::Deref(self.read_wrapped()?)),
            TokenKind::Meta => {
                self.lexer.next_token()?;
                let first = self.read_form()?;
                let second = self.read_form()?;
                Ok(Node::WithMeta(Box::new([first, second])))
            }
            _ => {
                let token = self.lexer.next_token()?;
                read_atom(&token)
            }
        }
    }

    fn read_container(&mut self, close: TokenKind) -> Result<Vec<Node>, Diagnostic> {
        let open = self.lexer.next_token()?;
        let mut items = Vec::new();
        loop {
            let next = self.lexer.peek()?;
            if next.is(close) {
                break;
            }
            if next.is(TokenKind::Eof) {
                return Err(Diagnostic::parser(format!(
                    "expected `{}`, got end of input",
                    closing_delimiter(close)
                ))
                .with_position(next.position)
                .with_note(format!("container opened at {}", open.position)));
            }
            items.push(self.read_form()?);
        }
        self.lexer.next_token()?;
        Ok(items)
    }

    fn read_wrapped(&mut self) -> Result<Box<Node>, Diagnostic> {
        self.lexer.next_token()?;
        Ok(Box::new(self.read_form()?))
    }
}

fn read_atom(token: &Token) -> Result<Node, Diagnostic> {
    let lexeme = token.lexeme.as_str();
    if let Ok(n) = lexeme.parse::<i64>() {
        return Ok(Node::Number(n));
    }
    if is_numeric_run(lexeme) {
        let message = if lexeme.contains('.') {
            format!("unsupported numeric literal `{lexeme}`")
        } else {
            format!("integer literal `{lexeme}` out of range")
        };
        return Err(Diagnostic::parser(message).with_position(token.position));
    }
    let node = match lexeme {
        "true" => Node::Boolean(true),
        "false" => Node::Boolean(false),
        _ if token.is(TokenKind::String) => Node::StringLit(lexeme.to_string()),
        _ => Node::symbol(lexeme),
    };
    Ok(node)
}

/// Digits and dots with at least one digit, optionally signed.
fn is_numeric_run(lexeme: &str) -> bool {
    let digits = lexeme.strip_prefix(['-', '+']).unwrap_or(lexeme);
    digits.chars().any(|ch| ch.is_ascii_digit())
        && digits.chars().all(|ch| ch.is_ascii_digit() || ch == '.')
}

fn closing_delimiter(kind: TokenKind) -> char {
    match kind {
        TokenKind::RBracket => ']',
        TokenKind::RBrace => '}',
        _ => ')',
    }
}
