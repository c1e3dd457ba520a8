//! Core library for the walnut Lisp: a character stream and tokenizer, a
//! recursive-descent reader, lexically scoped environments, a tree-walking
//! evaluator, and a printer that renders results back to source text.

pub mod diagnostics;
pub mod environment;
pub mod lexer;
pub mod node;
pub mod printer;
pub mod reader;
pub mod repl;
pub mod runtime;
pub mod stdlib;
pub mod stream;

pub use diagnostics::{Diagnostic, DiagnosticKind, SourcePosition, WalnutError};
pub use environment::{Environment, EnvironmentRef};
pub use node::Node;
pub use printer::print;
pub use reader::{read_all, read_str};
pub use repl::Repl;
pub use runtime::{eval, ExecutionContext, Interpreter};
