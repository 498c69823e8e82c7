//! # Built-in Operators
//!
//! The fixed operator set, organized by category:
//!
//! - **[arithmetic]** (7): add, sub, bit-and, bit-or, bit-xor,
//!   bit-shift-left, bit-shift-right-signed
//! - **[comparison]** (5): lt, le, ge, gt, eq
//! - **[words]** (4): is-word, is-list, size, gensym
//! - **[lists]** (3): at, slice, concat
//! - **[console]** (2): log, abort
//!
//! Builtins are consulted only after the func/macro registry, so a user
//! definition of the same name shadows the builtin.

use crate::error::Error;
use crate::form::Form;
use std::rc::Rc;

pub mod arithmetic;
pub mod comparison;
pub mod console;
pub mod lists;
pub mod words;

pub type BuiltinFn = fn(&[Form]) -> Result<Form, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

#[derive(Debug, Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub arity: Arity,
    pub run: BuiltinFn,
}

impl Builtin {
    /// Check arity, then run
    pub fn call(&self, args: &[Form]) -> Result<Form, Error> {
        match self.arity {
            Arity::Exactly(n) if args.len() != n => {
                Err(Error::arity(self.name, n.to_string(), args.len()))
            }
            Arity::AtLeast(n) if args.len() < n => {
                Err(Error::arity(self.name, format!("at least {}", n), args.len()))
            }
            _ => (self.run)(args),
        }
    }
}

/// Name-keyed table of every builtin, populated once at startup
#[derive(Debug)]
pub struct BuiltinTable {
    entries: Vec<Builtin>,
}

impl Default for BuiltinTable {
    fn default() -> Self {
        Self::new()
    }
}

impl BuiltinTable {
    pub fn new() -> Self {
        let mut table = BuiltinTable {
            entries: Vec::new(),
        };
        arithmetic::register(&mut table);
        comparison::register(&mut table);
        words::register(&mut table);
        lists::register(&mut table);
        console::register(&mut table);
        table
    }

    pub fn define(&mut self, name: &'static str, arity: Arity, run: BuiltinFn) {
        self.entries.push(Builtin { name, arity, run });
    }

    pub fn get(&self, name: &str) -> Option<&Builtin> {
        self.entries.iter().find(|builtin| builtin.name == name)
    }
}

// ===== Shared argument coercions =====

/// The word argument at `position`
pub(crate) fn word_arg<'a>(
    function: &'static str,
    args: &'a [Form],
    position: usize,
) -> Result<&'a Rc<str>, Error> {
    match &args[position] {
        Form::Word(word) => Ok(word),
        other => Err(Error::type_mismatch(function, "word", other, position)),
    }
}

/// The list argument at `position`
pub(crate) fn list_arg<'a>(
    function: &'static str,
    args: &'a [Form],
    position: usize,
) -> Result<&'a Rc<[Form]>, Error> {
    match &args[position] {
        Form::List(items) => Ok(items),
        other => Err(Error::type_mismatch(function, "list", other, position)),
    }
}

/// The decimal word (digits only) at `position`, converted to the host
/// integer. Conversion overflow is fatal.
pub(crate) fn decimal_arg(
    function: &'static str,
    args: &[Form],
    position: usize,
) -> Result<i64, Error> {
    let word = word_arg(function, args, position)?;
    if word.is_empty() || !word.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::NotDecimal {
            function: function.to_string(),
            word: word.to_string(),
        });
    }
    word.parse::<i64>().map_err(|_| Error::overflow(function))
}

/// An index word at `position`: digits with an optional leading `-`.
/// Negative indices count from the end of the indexed value.
pub(crate) fn index_arg(
    function: &'static str,
    args: &[Form],
    position: usize,
) -> Result<i64, Error> {
    let word = word_arg(function, args, position)?;
    let digits = word.strip_prefix('-').unwrap_or(word.as_ref());
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::NotDecimal {
            function: function.to_string(),
            word: word.to_string(),
        });
    }
    word.parse::<i64>().map_err(|_| Error::overflow(function))
}
