//! Chained lexical scopes.

use crate::Object;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared handle to an [`Environment`]. A scope lives as long as any function captured in it.
pub type Env = Rc<RefCell<Environment>>;

/// A single scope: bindings plus an optional enclosing scope.
#[derive(Clone, Default)]
pub struct Environment {
    store: FxHashMap<String, Object>,
    outer: Option<Env>,
}

impl Environment {
    /// Creates a new global scope.
    pub fn new() -> Env {
        Rc::new(RefCell::new(Environment::default()))
    }

    /// Creates a new scope enclosed by `outer`.
    pub fn new_enclosed(outer: &Env) -> Env {
        Rc::new(RefCell::new(Environment {
            store: FxHashMap::default(),
            outer: Some(Rc::clone(outer)),
        }))
    }

    /// Looks up `name` in this scope, then in every enclosing scope.
    pub fn get(&self, name: &str) -> Option<Object> {
        match self.store.get(name) {
            Some(value) => Some(value.clone()),
            None => self.outer.as_ref().and_then(|outer| outer.borrow().get(name)),
        }
    }

    /// Binds `name` in this scope, shadowing any binding in an enclosing scope.
    pub fn define(&mut self, name: impl Into<String>, value: Object) {
        self.store.insert(name.into(), value);
    }

    /// Rebinds `name` in the nearest scope that already binds it, or defines it here if none does.
    pub fn set(&mut self, name: &str, value: Object) {
        if self.store.contains_key(name) {
            self.store.insert(name.to_string(), value);
            return;
        }
        if let Some(outer) = &self.outer {
            if outer.borrow().contains(name) {
                outer.borrow_mut().set(name, value);
                return;
            }
        }
        self.store.insert(name.to_string(), value);
    }

    /// Returns `true` if `name` is bound in this scope or an enclosing one.
    pub fn contains(&self, name: &str) -> bool {
        self.store.contains_key(name)
            || self
                .outer
                .as_ref()
                .map_or(false, |outer| outer.borrow().contains(name))
    }

    /// Copies this scope's bindings into an independent scope with the same enclosing scope.
    pub fn snapshot(&self) -> Env {
        Rc::new(RefCell::new(self.clone()))
    }
}
