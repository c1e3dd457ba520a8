use std::{cell::RefCell, rc::Rc};

use indexmap::IndexMap;

use crate::{
    diagnostics::{Diagnostic, Result},
    node::Node,
};

pub type EnvironmentRef = Rc<RefCell<Environment>>;

/// One lexical scope, linked to the scope that encloses it.
#[derive(Debug, Default)]
pub struct Environment {
    outer: Option<EnvironmentRef>,
    bindings: IndexMap<String, Binding>,
}

#[derive(Debug, Clone)]
pub enum Binding {
    Bound(Node),
    /// A parameter that received no value.
    Unbound,
}

impl Environment {
    /// Creates a root frame.
    pub fn new() -> EnvironmentRef {
        Rc::new(RefCell::new(Self::default()))
    }

    pub fn with_outer(outer: EnvironmentRef) -> EnvironmentRef {
        Rc::new(RefCell::new(Self {
            outer: Some(outer),
            bindings: IndexMap::new(),
        }))
    }

    /// Creates a frame binding `names[i]` to `values[i]`. Names past the end
    /// of `values` are bound to [`Binding::Unbound`].
    pub fn with_bindings(
        outer: Option<EnvironmentRef>,
        names: &[String],
        values: Vec<Node>,
    ) -> EnvironmentRef {
        let mut values = values.into_iter();
        let bindings = names
            .iter()
            .map(|name| {
                let binding = values.next().map_or(Binding::Unbound, Binding::Bound);
                (name.clone(), binding)
            })
            .collect();
        Rc::new(RefCell::new(Self { outer, bindings }))
    }

    pub fn outer(&self) -> Option<EnvironmentRef> {
        self.outer.clone()
    }

    /// Inserts or overwrites `name` in this frame only.
    pub fn set(&mut self, name: impl Into<String>, value: Node) {
        self.bindings.insert(name.into(), Binding::Bound(value));
    }

    pub fn contains_local(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn local(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    /// Nearest frame, starting at `env` and walking outward, that defines `name`.
    pub fn find(env: &EnvironmentRef, name: &str) -> Option<EnvironmentRef> {
        let mut current = Rc::clone(env);
        loop {
            if current.borrow().contains_local(name) {
                return Some(current);
            }
            let outer = current.borrow().outer()?;
            current = outer;
        }
    }

    pub fn get(env: &EnvironmentRef, name: &str) -> Result<Node> {
        let frame = Environment::find(env, name).ok_or_else(|| Diagnostic::unbound(name))?;
        let frame = frame.borrow();
        match frame.local(name) {
            Some(Binding::Bound(value)) => Ok(value.clone()),
            _ => Err(Diagnostic::unbound(name)
                .with_note("the name exists but was never given a value")
                .into()),
        }
    }
}
