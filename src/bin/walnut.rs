use std::{fs, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};

use walnut::{print, ExecutionContext, Interpreter, Repl, WalnutError};

#[derive(Parser)]
#[command(author, version, about = "walnut Lisp interpreter")]
struct Args {
    /// Prompt shown by the interactive session
    #[arg(long, global = true, default_value = "user> ")]
    prompt: String,
    /// File used to load and save REPL history
    #[arg(long, global = true)]
    history: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start an interactive REPL session
    Repl,
    /// Evaluate every form in a script file and print the last result
    Run { script: PathBuf },
    /// Evaluate a snippet and print the result
    Eval { source: String },
}

fn main() -> ExitCode {
    let args = Args::parse();
    let context = ExecutionContext {
        prompt: args.prompt,
        history_file: args.history,
    };
    let outcome = match args.command.unwrap_or(Command::Repl) {
        Command::Repl => Repl::with_context(context).run(),
        Command::Run { script } => run_script(script, context),
        Command::Eval { source } => eval_snippet(&source, context),
    };
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run_script(path: PathBuf, context: ExecutionContext) -> Result<(), WalnutError> {
    let source = fs::read_to_string(&path)?;
    eval_snippet(&source, context)
}

fn eval_snippet(source: &str, context: ExecutionContext) -> Result<(), WalnutError> {
    let mut interpreter = Interpreter::with_context(context);
    let value = interpreter.eval_source(source)?;
    println!("{}", print(&value)?);
    Ok(())
}
