//! Lexically scoped environments.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::value::Value;

/// A scope mapping identifier names to values, with an optional parent link.
///
/// Environments are shared (`Rc`) because function values capture the scope
/// they were defined in; a captured scope may outlive the block that created
/// it and may be the parent of many call scopes at once.
#[derive(Debug)]
pub struct Env {
    parent: Option<Rc<Env>>,
    bindings: RefCell<HashMap<String, Value>>,
}

impl Env {
    /// Creates a fresh global scope.
    pub fn new() -> Rc<Env> {
        Rc::new(Env {
            parent: None,
            bindings: RefCell::new(HashMap::new()),
        })
    }

    /// Creates a scope enclosed by `parent`.
    pub fn new_enclosed(parent: Rc<Env>) -> Rc<Env> {
        Rc::new(Env {
            parent: Some(parent),
            bindings: RefCell::new(HashMap::new()),
        })
    }

    /// Looks up `name`, walking the parent chain.
    pub fn get(&self, name: &str) -> Option<Value> {
        match self.bindings.borrow().get(name) {
            Some(v) => Some(v.clone()),
            None => self.parent.as_ref().and_then(|p| p.get(name)),
        }
    }

    /// Binds `name` in this scope, shadowing any outer binding of the same
    /// name. Outer bindings are never written through.
    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.bindings.borrow_mut().insert(name.into(), value);
    }
}
