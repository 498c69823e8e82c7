//! Form predicates, size, and fresh word generation
//!
//! - `is-word` / `is-list`: variant predicates returning `"1"`/`"0"`
//! - `size`: element count of a list, byte length of a word
//! - `gensym`: a fresh `gensym<N>` word, distinct within a run

use super::{Arity, BuiltinTable};
use crate::error::Error;
use crate::form::Form;
use std::cell::Cell;

thread_local! {
    static GENSYM_COUNTER: Cell<u64> = const { Cell::new(0) };
}

pub fn builtin_is_word(args: &[Form]) -> Result<Form, Error> {
    Ok(Form::from_bool(args[0].is_word()))
}

pub fn builtin_is_list(args: &[Form]) -> Result<Form, Error> {
    Ok(Form::from_bool(args[0].is_list()))
}

pub fn builtin_size(args: &[Form]) -> Result<Form, Error> {
    let size = match &args[0] {
        Form::Word(word) => word.len(),
        Form::List(items) => items.len(),
    };
    Ok(Form::from_int(size as i64))
}

pub fn builtin_gensym(_args: &[Form]) -> Result<Form, Error> {
    let n = GENSYM_COUNTER.with(|counter| {
        let n = counter.get();
        counter.set(n + 1);
        n
    });
    Ok(Form::word(format!("gensym{}", n)))
}

pub fn register(table: &mut BuiltinTable) {
    table.define("is-word", Arity::Exactly(1), builtin_is_word);
    table.define("is-list", Arity::Exactly(1), builtin_is_list);
    table.define("size", Arity::Exactly(1), builtin_size);
    table.define("gensym", Arity::Exactly(0), builtin_gensym);
}
