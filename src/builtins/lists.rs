//! List access and construction: at, slice, concat
//!
//! - `at`: index into a list (the element) or a word (the byte value as a
//!   decimal word); negative indices count from the end; out of range fatal
//! - `slice`: JS-style sublist with clamped indices; empty or inverted
//!   ranges yield unit rather than an error
//! - `concat`: fresh concatenation of any number of lists

use super::{index_arg, list_arg, Arity, BuiltinTable};
use crate::error::Error;
use crate::form::Form;

pub fn builtin_at(args: &[Form]) -> Result<Form, Error> {
    let len = match &args[0] {
        Form::Word(word) => word.len(),
        Form::List(items) => items.len(),
    };
    let raw = index_arg("at", args, 1)?;
    let index = if raw < 0 { len as i64 + raw } else { raw };
    if index < 0 || index >= len as i64 {
        return Err(Error::IndexOutOfRange {
            function: "at".to_string(),
            index: raw,
            len,
        });
    }
    match &args[0] {
        Form::List(items) => Ok(items[index as usize].clone()),
        Form::Word(word) => Ok(Form::from_int(word.as_bytes()[index as usize] as i64)),
    }
}

/// Clamp a possibly-negative slice index into `[0, len]`
fn clamp_index(raw: i64, len: usize) -> usize {
    let len = len as i64;
    let index = if raw < 0 { len + raw } else { raw };
    index.clamp(0, len) as usize
}

pub fn builtin_slice(args: &[Form]) -> Result<Form, Error> {
    let items = list_arg("slice", args, 0)?;
    let start = clamp_index(index_arg("slice", args, 1)?, items.len());
    let end = clamp_index(index_arg("slice", args, 2)?, items.len());
    if start >= end {
        return Ok(Form::unit());
    }
    Ok(Form::list(items[start..end].to_vec()))
}

pub fn builtin_concat(args: &[Form]) -> Result<Form, Error> {
    let mut items = Vec::new();
    for position in 0..args.len() {
        items.extend_from_slice(list_arg("concat", args, position)?.as_ref());
    }
    Ok(Form::list(items))
}

pub fn register(table: &mut BuiltinTable) {
    table.define("at", Arity::Exactly(2), builtin_at);
    table.define("slice", Arity::Exactly(3), builtin_slice);
    table.define("concat", Arity::AtLeast(0), builtin_concat);
}
