use std::{path::PathBuf, rc::Rc};

use crate::{
    diagnostics::{Diagnostic, DiagnosticKind, Result, WalnutError},
    environment::{Environment, EnvironmentRef},
    node::{Closure, Node},
    printer, reader, stdlib,
};

/// Session settings for an interactive host loop.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    pub prompt: String,
    pub history_file: Option<PathBuf>,
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self {
            prompt: "user> ".to_string(),
            history_file: None,
        }
    }
}

/// Owns a root environment preloaded with the primitive table.
pub struct Interpreter {
    env: EnvironmentRef,
    context: ExecutionContext,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_context(ExecutionContext::default())
    }

    pub fn with_context(context: ExecutionContext) -> Self {
        let env = Environment::new();
        stdlib::install(&env);
        Self { env, context }
    }

    pub fn env(&self) -> &EnvironmentRef {
        &self.env
    }

    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }

    /// Evaluates every form in `source`, returning the last result (`nil`
    /// for empty input).
    pub fn eval_source(&mut self, source: &str) -> Result<Node> {
        let forms = reader::read_all(source)?;
        let mut last = Node::nil();
        for form in &forms {
            last = eval(form, &self.env)?;
        }
        Ok(last)
    }

    /// Read, evaluate and print a single form.
    pub fn rep(&mut self, line: &str) -> Result<String> {
        let form = reader::read_str(line)?;
        let value = eval(&form, &self.env)?;
        Ok(printer::print(&value)?)
    }
}

/// Evaluates `node` against `env`.
pub fn eval(node: &Node, env: &EnvironmentRef) -> Result<Node> {
    match node {
        Node::Symbol(name) => Environment::get(env, name),
        Node::List(items) => eval_list(items, env),
        Node::Vector(items) => Ok(Node::Vector(eval_each(items, env)?)),
        Node::Hashmap(items) => eval_hashmap(items, env),
        Node::Quote(inner) => Ok((**inner).clone()),
        _ => Ok(node.clone()),
    }
}

fn eval_each(items: &[Node], env: &EnvironmentRef) -> Result<Vec<Node>> {
    items.iter().map(|item| eval(item, env)).collect()
}

fn eval_list(items: &[Node], env: &EnvironmentRef) -> Result<Node> {
    let Some(head) = items.first() else {
        return Ok(Node::List(Vec::new()));
    };
    let args = &items[1..];
    match head.as_symbol() {
        Some("def!") => eval_def(args, env),
        Some("let*") => eval_let(args, env),
        Some("do") => eval_do(args, env),
        Some("if") => eval_if(args, env),
        Some("fn*") => eval_fn(args, env),
        _ => {
            let mut values = eval_each(items, env)?.into_iter();
            let callee = values.next().unwrap_or_else(Node::nil);
            apply(head, callee, values.collect())
        }
    }
}

fn eval_def(args: &[Node], env: &EnvironmentRef) -> Result<Node> {
    let [name, expr] = args else {
        return Err(malformed("def!", "expects a name and a value"));
    };
    let name = expect_symbol(name, "def!")?;
    let value = eval(expr, env)?;
    env.borrow_mut().set(name, value);
    Ok(Node::Def(name.to_string()))
}

fn eval_let(args: &[Node], env: &EnvironmentRef) -> Result<Node> {
    let [bindings, body] = args else {
        return Err(malformed("let*", "expects a binding list and a body"));
    };
    let bindings = bindings
        .as_sequence()
        .ok_or_else(|| malformed("let*", "bindings must be a list or vector"))?;
    if bindings.len() % 2 != 0 {
        return Err(malformed("let*", "bindings must come in name/value pairs"));
    }
    let child = Environment::with_outer(Rc::clone(env));
    for pair in bindings.chunks(2) {
        let name = expect_symbol(&pair[0], "let*")?;
        let value = eval(&pair[1], &child)?;
        child.borrow_mut().set(name, value);
    }
    eval(body, &child)
}

fn eval_do(args: &[Node], env: &EnvironmentRef) -> Result<Node> {
    let Some((last, init)) = args.split_last() else {
        return Err(malformed("do", "expects at least one form"));
    };
    for form in init {
        eval(form, env)?;
    }
    eval(last, env)
}

fn eval_if(args: &[Node], env: &EnvironmentRef) -> Result<Node> {
    let (condition, then_branch, else_branch) = match args {
        [condition, then_branch] => (condition, then_branch, None),
        [condition, then_branch, else_branch] => (condition, then_branch, Some(else_branch)),
        _ => return Err(malformed("if", "expects a condition and one or two branches")),
    };
    if eval(condition, env)?.is_truthy() {
        eval(then_branch, env)
    } else {
        match else_branch {
            Some(branch) => eval(branch, env),
            None => Ok(Node::nil()),
        }
    }
}

fn eval_fn(args: &[Node], env: &EnvironmentRef) -> Result<Node> {
    let [params, body] = args else {
        return Err(malformed("fn*", "expects a parameter list and a body"));
    };
    let params = params
        .as_sequence()
        .ok_or_else(|| malformed("fn*", "parameters must be a list or vector"))?
        .iter()
        .map(|param| expect_symbol(param, "fn*").map(str::to_string))
        .collect::<Result<Vec<_>>>()?;
    Ok(Node::Closure(Rc::new(Closure {
        params,
        body: body.clone(),
        env: Rc::clone(env),
    })))
}

/// Keys stay as written, values are evaluated, pairing order is kept.
fn eval_hashmap(items: &[Node], env: &EnvironmentRef) -> Result<Node> {
    if items.len() % 2 != 0 {
        return Err(
            Diagnostic::runtime("hashmap literal requires an even number of forms").into(),
        );
    }
    let mut evaluated = Vec::with_capacity(items.len());
    for pair in items.chunks(2) {
        evaluated.push(pair[0].clone());
        evaluated.push(eval(&pair[1], env)?);
    }
    Ok(Node::Hashmap(evaluated))
}

fn apply(head: &Node, callee: Node, args: Vec<Node>) -> Result<Node> {
    match callee {
        Node::Primitive(fun) => fun.call(&args),
        Node::Closure(closure) => apply_closure(&closure, args),
        other => {
            let shown = printer::print(head).unwrap_or_else(|_| other.type_name().to_string());
            Err(Diagnostic::new(
                DiagnosticKind::NotCallable,
                format!("`{shown}` is not callable"),
            )
            .with_note(format!("it evaluated to a {}", other.type_name()))
            .into())
        }
    }
}

/// Binds the arguments in a fresh frame under the captured environment and
/// evaluates the body there.
pub fn apply_closure(closure: &Closure, args: Vec<Node>) -> Result<Node> {
    let expected = closure.params.len();
    let actual = args.len();
    if expected != actual {
        return Err(Diagnostic::new(
            DiagnosticKind::Arity { expected, actual },
            format!("closure expected {expected} arguments but received {actual}"),
        )
        .into());
    }
    let frame = Environment::with_bindings(Some(Rc::clone(&closure.env)), &closure.params, args);
    eval(&closure.body, &frame)
}

fn expect_symbol<'a>(node: &'a Node, form: &str) -> Result<&'a str> {
    node.as_symbol().ok_or_else(|| {
        let message = format!("expected a symbol but found {}", node.type_name());
        malformed(form, &message)
    })
}

fn malformed(form: &str, message: &str) -> WalnutError {
    Diagnostic::runtime(format!("`{form}` {message}")).into()
}
