// ABOUTME: Registry of user-defined funcs and macros

use crate::form::Form;
use std::rc::Rc;

/// A user-defined callable. Funcs evaluate their arguments; macros receive
/// them unevaluated and have their result evaluated once more at the call
/// site. With a rest parameter, surplus arguments arrive as a fresh list.
#[derive(Debug, Clone)]
pub struct FuncMacro {
    pub is_macro: bool,
    pub params: Vec<Rc<str>>,
    pub rest_param: Option<Rc<str>>,
    pub bodies: Rc<[Form]>,
}

/// Flat, insertion-ordered table of definitions. Registration appends;
/// lookup scans newest-first so redefinition shadows.
#[derive(Debug, Default)]
pub struct FuncMacroRegistry {
    entries: Vec<(Rc<str>, Rc<FuncMacro>)>,
}

impl FuncMacroRegistry {
    pub fn new() -> Self {
        FuncMacroRegistry {
            entries: Vec::new(),
        }
    }

    pub fn define(&mut self, name: Rc<str>, func_macro: FuncMacro) {
        self.entries.push((name, Rc::new(func_macro)));
    }

    pub fn get(&self, name: &str) -> Option<Rc<FuncMacro>> {
        self.entries
            .iter()
            .rev()
            .find(|(bound, _)| &**bound == name)
            .map(|(_, func_macro)| func_macro.clone())
    }
}
