use std::{fmt, rc::Rc};

use crate::{
    diagnostics::{Diagnostic, Result},
    environment::EnvironmentRef,
};

/// Universal value type: parsed syntax and evaluation results alike.
#[derive(Clone)]
pub enum Node {
    Number(i64),
    Boolean(bool),
    /// Raw string token, surrounding quotes and escapes included.
    StringLit(String),
    Symbol(String),
    List(Vec<Node>),
    Vector(Vec<Node>),
    /// Alternating key/value forms in source order.
    Hashmap(Vec<Node>),
    Closure(Rc<Closure>),
    Primitive(NativeFunction),
    Quote(Box<Node>),
    Quasiquote(Box<Node>),
    Unquote(Box<Node>),
    SpliceUnquote(Box<Node>),
    Deref(Box<Node>),
    /// The two forms following `^`, in the order they were read.
    WithMeta(Box<[Node; 2]>),
    /// Marker returned by `def!`, carrying the bound name.
    Def(String),
}

impl Node {
    pub fn symbol(name: impl Into<String>) -> Self {
        Node::Symbol(name.into())
    }

    pub fn nil() -> Self {
        Node::symbol("nil")
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Node::Symbol(name) if name == "nil")
    }

    /// Only the boolean `false` is falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Node::Boolean(false))
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Node::Symbol(name) => Some(name),
            _ => None,
        }
    }

    /// Elements of a `List` or `Vector`.
    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::List(items) | Node::Vector(items) => Some(items),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Number(_) => "Number",
            Node::Boolean(_) => "Boolean",
            Node::StringLit(_) => "String",
            Node::Symbol(_) => "Symbol",
            Node::List(_) => "List",
            Node::Vector(_) => "Vector",
            Node::Hashmap(_) => "Hashmap",
            Node::Closure(_) => "Closure",
            Node::Primitive(_) => "Primitive",
            Node::Quote(_) => "Quote",
            Node::Quasiquote(_) => "Quasiquote",
            Node::Unquote(_) => "Unquote",
            Node::SpliceUnquote(_) => "SpliceUnquote",
            Node::Deref(_) => "Deref",
            Node::WithMeta(_) => "WithMeta",
            Node::Def(_) => "Def",
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Number(a), Node::Number(b)) => a == b,
            (Node::Boolean(a), Node::Boolean(b)) => a == b,
            (Node::StringLit(a), Node::StringLit(b))
            | (Node::Symbol(a), Node::Symbol(b))
            | (Node::Def(a), Node::Def(b)) => a == b,
            (Node::List(a), Node::List(b))
            | (Node::Vector(a), Node::Vector(b))
            | (Node::Hashmap(a), Node::Hashmap(b)) => a == b,
            (Node::Closure(a), Node::Closure(b)) => Rc::ptr_eq(a, b),
            (Node::Primitive(a), Node::Primitive(b)) => a.name == b.name,
            (Node::Quote(a), Node::Quote(b))
            | (Node::Quasiquote(a), Node::Quasiquote(b))
            | (Node::Unquote(a), Node::Unquote(b))
            | (Node::SpliceUnquote(a), Node::SpliceUnquote(b))
            | (Node::Deref(a), Node::Deref(b)) => a == b,
            (Node::WithMeta(a), Node::WithMeta(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Number(n) => write!(f, "Number({n})"),
            Node::Boolean(b) => write!(f, "Boolean({b})"),
            Node::StringLit(s) => write!(f, "StringLit({s})"),
            Node::Symbol(name) => write!(f, "Symbol({name})"),
            Node::List(items) => f.debug_tuple("List").field(items).finish(),
            Node::Vector(items) => f.debug_tuple("Vector").field(items).finish(),
            Node::Hashmap(items) => f.debug_tuple("Hashmap").field(items).finish(),
            Node::Closure(closure) => write!(f, "{closure:?}"),
            Node::Primitive(fun) => write!(f, "{fun:?}"),
            Node::Quote(inner) => f.debug_tuple("Quote").field(inner).finish(),
            Node::Quasiquote(inner) => f.debug_tuple("Quasiquote").field(inner).finish(),
            Node::Unquote(inner) => f.debug_tuple("Unquote").field(inner).finish(),
            Node::SpliceUnquote(inner) => f.debug_tuple("SpliceUnquote").field(inner).finish(),
            Node::Deref(inner) => f.debug_tuple("Deref").field(inner).finish(),
            Node::WithMeta(pair) => f
                .debug_tuple("WithMeta")
                .field(&pair[0])
                .field(&pair[1])
                .finish(),
            Node::Def(name) => write!(f, "Def({name})"),
        }
    }
}

/// User-defined function: parameters, body, and the frame it was created in.
pub struct Closure {
    pub params: Vec<String>,
    pub body: Node,
    pub env: EnvironmentRef,
}

impl fmt::Debug for Closure {
    // The captured frame may hold this closure, so it is left out.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("params", &self.params)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

/// Marker arity for primitives that take any number of arguments.
pub const VARIADIC: usize = usize::MAX;

#[derive(Clone)]
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub callback: fn(&[Node]) -> Result<Node>,
}

impl NativeFunction {
    pub fn call(&self, args: &[Node]) -> Result<Node> {
        if self.arity != VARIADIC && args.len() != self.arity {
            return Err(Diagnostic::runtime(format!(
                "`{}` expected {} arguments but received {}",
                self.name,
                self.arity,
                args.len()
            ))
            .into());
        }
        (self.callback)(args)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}
