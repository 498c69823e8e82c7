// ABOUTME: Environment module for lexical scope frames and bindings

use crate::form::Form;
use std::cell::RefCell;
use std::rc::Rc;

/// A frame in the lexical environment chain. Bindings keep insertion order;
/// lookup scans this frame newest-first, then the parent chain, so a later
/// binding shadows an earlier one of the same name.
#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<Vec<(Rc<str>, Form)>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    /// Creates the global environment with no parent
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(Vec::new()),
            parent: None,
        })
    }

    /// Creates a child frame of `parent`
    pub fn with_parent(parent: Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(Vec::new()),
            parent: Some(parent),
        })
    }

    /// Appends a binding to THIS frame
    pub fn define(&self, name: Rc<str>, value: Form) {
        self.bindings.borrow_mut().push((name, value));
    }

    /// Looks up a word in this frame and then the parent chain
    pub fn get(&self, name: &str) -> Option<Form> {
        if let Some((_, value)) = self
            .bindings
            .borrow()
            .iter()
            .rev()
            .find(|(bound, _)| &**bound == name)
        {
            return Some(value.clone());
        }

        if let Some(ref parent) = self.parent {
            return parent.get(name);
        }

        None
    }

    /// Number of bindings in THIS frame
    pub fn binding_count(&self) -> usize {
        self.bindings.borrow().len()
    }

    /// Rewrites this frame's binding values in place, positionally. Used by
    /// `loop` to splice a continuation packet; the caller has already
    /// checked that `values` matches the frame's binding count.
    pub fn rebind_all(&self, values: &[Form]) {
        let mut bindings = self.bindings.borrow_mut();
        for ((_, slot), value) in bindings.iter_mut().zip(values) {
            *slot = value.clone();
        }
    }
}
