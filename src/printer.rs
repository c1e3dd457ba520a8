use crate::{
    diagnostics::{Diagnostic, DiagnosticKind},
    node::Node,
};

/// Placeholder printed for closures, which have no source form.
pub const CLOSURE_PLACEHOLDER: &str = "#";

/// Renders `node` back to source text.
pub fn print(node: &Node) -> Result<String, Diagnostic> {
    let text = match node {
        Node::List(items) => format!("({})", print_seq(items)?),
        Node::Vector(items) => format!("[{}]", print_seq(items)?),
        Node::Hashmap(items) => format!("{{{}}}", print_seq(items)?),
        Node::Quote(inner) => print_wrapped("quote", inner)?,
        Node::Quasiquote(inner) => print_wrapped("quasiquote", inner)?,
        Node::Unquote(inner) => print_wrapped("unquote", inner)?,
        Node::SpliceUnquote(inner) => print_wrapped("splice-unquote", inner)?,
        Node::Deref(inner) => print_wrapped("deref", inner)?,
        Node::WithMeta(pair) => {
            format!("(with-meta {} {})", print(&pair[1])?, print(&pair[0])?)
        }
        Node::Symbol(name) | Node::Def(name) => name.clone(),
        Node::StringLit(raw) => raw.clone(),
        Node::Number(n) => n.to_string(),
        Node::Boolean(b) => b.to_string(),
        Node::Closure(_) => CLOSURE_PLACEHOLDER.to_string(),
        Node::Primitive(fun) => {
            return Err(Diagnostic::new(
                DiagnosticKind::Printer,
                format!("cannot print primitive function `{}`", fun.name),
            ));
        }
    };
    Ok(text)
}

fn print_seq(items: &[Node]) -> Result<String, Diagnostic> {
    let parts = items.iter().map(print).collect::<Result<Vec<_>, _>>()?;
    Ok(parts.join(" "))
}

fn print_wrapped(tag: &str, inner: &Node) -> Result<String, Diagnostic> {
    Ok(format!("({tag} {})", print(inner)?))
}
