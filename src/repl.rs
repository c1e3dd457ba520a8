use rustyline::{error::ReadlineError, DefaultEditor};

use crate::{
    diagnostics::{Result, WalnutError},
    runtime::{ExecutionContext, Interpreter},
};

/// Line-editing host loop: read, evaluate, print, and keep going on errors.
pub struct Repl {
    interpreter: Interpreter,
}

impl Default for Repl {
    fn default() -> Self {
        Self::new()
    }
}

impl Repl {
    pub fn new() -> Self {
        Self::with_context(ExecutionContext::default())
    }

    pub fn with_context(context: ExecutionContext) -> Self {
        Self {
            interpreter: Interpreter::with_context(context),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let mut editor = DefaultEditor::new().map_err(readline_error)?;
        let context = self.interpreter.context().clone();
        if let Some(path) = &context.history_file {
            // A missing history file is expected on first use.
            editor.load_history(path).ok();
        }
        loop {
            match editor.readline(&context.prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed == ":quit" || trimmed == ":exit" {
                        break;
                    }
                    if trimmed.is_empty() {
                        continue;
                    }
                    editor.add_history_entry(trimmed).ok();
                    match self.interpreter.rep(trimmed) {
                        Ok(output) => println!("{output}"),
                        Err(err) => eprintln!("{err}"),
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => return Err(readline_error(err)),
            }
        }
        if let Some(path) = &context.history_file {
            editor.save_history(path).map_err(readline_error)?;
        }
        Ok(())
    }
}

fn readline_error(err: ReadlineError) -> WalnutError {
    match err {
        ReadlineError::Io(io) => WalnutError::Io(io),
        other => WalnutError::Io(std::io::Error::new(std::io::ErrorKind::Other, other)),
    }
}
