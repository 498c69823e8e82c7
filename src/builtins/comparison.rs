//! Comparisons: lt, le, ge, gt on decimal words, eq on any words
//!
//! All return the word `"1"` or `"0"`.

use super::{decimal_arg, word_arg, Arity, BuiltinTable};
use crate::error::Error;
use crate::form::Form;

fn compare(
    function: &'static str,
    args: &[Form],
    op: impl Fn(i64, i64) -> bool,
) -> Result<Form, Error> {
    let a = decimal_arg(function, args, 0)?;
    let b = decimal_arg(function, args, 1)?;
    Ok(Form::from_bool(op(a, b)))
}

pub fn builtin_lt(args: &[Form]) -> Result<Form, Error> {
    compare("lt", args, |a, b| a < b)
}

pub fn builtin_le(args: &[Form]) -> Result<Form, Error> {
    compare("le", args, |a, b| a <= b)
}

pub fn builtin_ge(args: &[Form]) -> Result<Form, Error> {
    compare("ge", args, |a, b| a >= b)
}

pub fn builtin_gt(args: &[Form]) -> Result<Form, Error> {
    compare("gt", args, |a, b| a > b)
}

/// Byte-wise equality of two words. Lists are not comparable with `eq`.
pub fn builtin_eq(args: &[Form]) -> Result<Form, Error> {
    let a = word_arg("eq", args, 0)?;
    let b = word_arg("eq", args, 1)?;
    Ok(Form::from_bool(a == b))
}

pub fn register(table: &mut BuiltinTable) {
    table.define("lt", Arity::Exactly(2), builtin_lt);
    table.define("le", Arity::Exactly(2), builtin_le);
    table.define("ge", Arity::Exactly(2), builtin_ge);
    table.define("gt", Arity::Exactly(2), builtin_gt);
    table.define("eq", Arity::Exactly(2), builtin_eq);
}
