use std::fmt;

use thiserror::Error;

/// A line/column location inside the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
}

impl SourcePosition {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Classification of a diagnostic event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Unrecognized character or malformed lexeme.
    Lexer,
    /// Unterminated container or premature end of input.
    Parser,
    /// Name not found anywhere in the environment chain.
    UnboundSymbol(String),
    /// Closure applied to the wrong number of arguments.
    Arity { expected: usize, actual: usize },
    /// The head of an application is neither a primitive nor a closure.
    NotCallable,
    /// Node that has no textual form.
    Printer,
    Runtime,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DiagnosticKind::Lexer => "LexError",
            DiagnosticKind::Parser => "ParseError",
            DiagnosticKind::UnboundSymbol(_) => "UnboundSymbolError",
            DiagnosticKind::Arity { .. } => "ArityError",
            DiagnosticKind::NotCallable => "NotCallableError",
            DiagnosticKind::Printer => "PrintError",
            DiagnosticKind::Runtime => "RuntimeError",
        };
        f.write_str(label)
    }
}

/// Rich diagnostic information surfaced to end users.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub position: Option<SourcePosition>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            position: None,
            notes: Vec::new(),
        }
    }

    pub fn lexer(message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Lexer, message)
    }

    pub fn parser(message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Parser, message)
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Runtime, message)
    }

    pub fn unbound(name: &str) -> Self {
        Self::new(
            DiagnosticKind::UnboundSymbol(name.to_string()),
            format!("symbol `{name}` not found"),
        )
    }

    pub fn with_position(mut self, position: SourcePosition) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let Some(position) = self.position {
            write!(f, " ({position})")?;
        }
        for note in &self.notes {
            write!(f, "\n  note: {note}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostic {}

/// Unified error type for the interpreter and its command line.
#[derive(Debug, Error)]
pub enum WalnutError {
    #[error("{0}")]
    Diagnostic(#[from] Diagnostic),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WalnutError {
    /// The diagnostic kind, when the failure came from the interpreter itself.
    pub fn kind(&self) -> Option<&DiagnosticKind> {
        match self {
            WalnutError::Diagnostic(diag) => Some(&diag.kind),
            WalnutError::Io(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, WalnutError>;
