//! Primitive functions installed into a root environment.

use crate::{
    diagnostics::{Diagnostic, Result},
    environment::EnvironmentRef,
    node::{NativeFunction, Node, VARIADIC},
};

pub fn install(env: &EnvironmentRef) {
    let mut scope = env.borrow_mut();
    for fun in primitives() {
        scope.set(fun.name, Node::Primitive(fun));
    }
    scope.set("nil", Node::nil());
}

fn primitives() -> Vec<NativeFunction> {
    vec![
        native("+", VARIADIC, math_add),
        native("-", VARIADIC, math_sub),
        native("*", VARIADIC, math_mul),
        native("/", VARIADIC, math_div),
        native("%", 2, math_rem),
        native("<", 2, cmp_lt),
        native("<=", 2, cmp_le),
        native(">", 2, cmp_gt),
        native(">=", 2, cmp_ge),
        native("=", 2, cmp_eq),
        native("list", VARIADIC, list_new),
        native("list?", 1, list_is_list),
        native("empty?", 1, list_is_empty),
        native("count", 1, list_count),
    ]
}

fn native(
    name: &'static str,
    arity: usize,
    callback: fn(&[Node]) -> Result<Node>,
) -> NativeFunction {
    NativeFunction {
        name,
        arity,
        callback,
    }
}

fn ensure_min(args: &[Node], min: usize, name: &str) -> Result<()> {
    if args.len() < min {
        return Err(Diagnostic::runtime(format!(
            "`{name}` expected at least {min} arguments but received {}",
            args.len()
        ))
        .into());
    }
    Ok(())
}

fn expect_number(value: &Node, name: &str) -> Result<i64> {
    match value {
        Node::Number(n) => Ok(*n),
        _ => Err(Diagnostic::runtime(format!(
            "`{name}` expected Number but found {}",
            value.type_name()
        ))
        .into()),
    }
}

fn expect_sequence<'a>(value: &'a Node, name: &str) -> Result<&'a [Node]> {
    if value.is_nil() {
        return Ok(&[]);
    }
    let items = value.as_sequence().ok_or_else(|| {
        Diagnostic::runtime(format!(
            "`{name}` expected List or Vector but found {}",
            value.type_name()
        ))
    })?;
    Ok(items)
}

/// Folds the arguments left to right, starting from the first one.
fn reduce(args: &[Node], name: &str, op: fn(i64, i64) -> Option<i64>) -> Result<Node> {
    ensure_min(args, 1, name)?;
    let mut acc = expect_number(&args[0], name)?;
    for arg in &args[1..] {
        let n = expect_number(arg, name)?;
        acc = op(acc, n)
            .ok_or_else(|| Diagnostic::runtime(format!("`{name}`: integer overflow")))?;
    }
    Ok(Node::Number(acc))
}

fn math_add(args: &[Node]) -> Result<Node> {
    if args.is_empty() {
        return Ok(Node::Number(0));
    }
    reduce(args, "+", i64::checked_add)
}

fn math_sub(args: &[Node]) -> Result<Node> {
    reduce(args, "-", i64::checked_sub)
}

fn math_mul(args: &[Node]) -> Result<Node> {
    if args.is_empty() {
        return Ok(Node::Number(1));
    }
    reduce(args, "*", i64::checked_mul)
}

fn math_div(args: &[Node]) -> Result<Node> {
    if args.iter().skip(1).any(|arg| matches!(arg, Node::Number(0))) {
        return Err(Diagnostic::runtime("`/`: division by zero").into());
    }
    reduce(args, "/", i64::checked_div)
}

fn math_rem(args: &[Node]) -> Result<Node> {
    if matches!(args[1], Node::Number(0)) {
        return Err(Diagnostic::runtime("`%`: division by zero").into());
    }
    reduce(args, "%", i64::checked_rem)
}

fn compare(args: &[Node], name: &str, op: fn(&i64, &i64) -> bool) -> Result<Node> {
    let left = expect_number(&args[0], name)?;
    let right = expect_number(&args[1], name)?;
    Ok(Node::Boolean(op(&left, &right)))
}

fn cmp_lt(args: &[Node]) -> Result<Node> {
    compare(args, "<", i64::lt)
}

fn cmp_le(args: &[Node]) -> Result<Node> {
    compare(args, "<=", i64::le)
}

fn cmp_gt(args: &[Node]) -> Result<Node> {
    compare(args, ">", i64::gt)
}

fn cmp_ge(args: &[Node]) -> Result<Node> {
    compare(args, ">=", i64::ge)
}

fn cmp_eq(args: &[Node]) -> Result<Node> {
    Ok(Node::Boolean(equal(&args[0], &args[1])))
}

/// Structural equality where a `List` and a `Vector` with equal elements match.
fn equal(left: &Node, right: &Node) -> bool {
    match (left.as_sequence(), right.as_sequence()) {
        (Some(a), Some(b)) => a.len() == b.len() && a.iter().zip(b).all(|(x, y)| equal(x, y)),
        _ => left == right,
    }
}

fn list_new(args: &[Node]) -> Result<Node> {
    Ok(Node::List(args.to_vec()))
}

fn list_is_list(args: &[Node]) -> Result<Node> {
    Ok(Node::Boolean(matches!(args[0], Node::List(_))))
}

fn list_is_empty(args: &[Node]) -> Result<Node> {
    Ok(Node::Boolean(expect_sequence(&args[0], "empty?")?.is_empty()))
}

fn list_count(args: &[Node]) -> Result<Node> {
    let len = expect_sequence(&args[0], "count")?.len();
    Ok(Node::Number(len as i64))
}
