use crate::value::Value;
use log::trace;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared handle to a scope. A closure keeps its defining scope alive
/// through one of these, so a scope lives as long as its longest holder.
pub type Env = Rc<RefCell<Environment>>;

/// One lexical scope: its own bindings plus an optional parent.
#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<Env>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: Env) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// A fresh root scope behind a shared handle.
    pub fn new_shared() -> Env {
        Rc::new(RefCell::new(Environment::new()))
    }

    /// A fresh child scope of `enclosing` behind a shared handle.
    pub fn new_enclosed(enclosing: &Env) -> Env {
        Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(enclosing))))
    }

    /// Bind `name` in this scope only, replacing any binding it already
    /// has here. Outer scopes are never touched.
    pub fn define(&mut self, name: &str, value: Value) {
        trace!("Binding '{}' = {}", name, value);

        self.values.insert(name.to_string(), value);
    }

    /// Look `name` up here, then outward through the enclosing chain.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.values.get(name) {
            Some(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            None
        }
    }
}
