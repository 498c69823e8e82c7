//! Arithmetic and bitwise operations on decimal words
//!
//! All take exactly two decimal words and return a word rendering of the
//! host integer result. Conversion overflow, arithmetic overflow, and
//! out-of-range shift counts are fatal.

use super::{decimal_arg, Arity, BuiltinTable};
use crate::error::Error;
use crate::form::Form;

fn binary_op(
    function: &'static str,
    args: &[Form],
    op: impl Fn(i64, i64) -> Option<i64>,
) -> Result<Form, Error> {
    let a = decimal_arg(function, args, 0)?;
    let b = decimal_arg(function, args, 1)?;
    let result = op(a, b).ok_or_else(|| Error::overflow(function))?;
    Ok(Form::from_int(result))
}

pub fn builtin_add(args: &[Form]) -> Result<Form, Error> {
    binary_op("add", args, i64::checked_add)
}

pub fn builtin_sub(args: &[Form]) -> Result<Form, Error> {
    binary_op("sub", args, i64::checked_sub)
}

pub fn builtin_bit_and(args: &[Form]) -> Result<Form, Error> {
    binary_op("bit-and", args, |a, b| Some(a & b))
}

pub fn builtin_bit_or(args: &[Form]) -> Result<Form, Error> {
    binary_op("bit-or", args, |a, b| Some(a | b))
}

pub fn builtin_bit_xor(args: &[Form]) -> Result<Form, Error> {
    binary_op("bit-xor", args, |a, b| Some(a ^ b))
}

pub fn builtin_bit_shift_left(args: &[Form]) -> Result<Form, Error> {
    binary_op("bit-shift-left", args, |a, b| {
        u32::try_from(b).ok().and_then(|shift| a.checked_shl(shift))
    })
}

/// Arithmetic right shift; the sign bit fills vacated positions
pub fn builtin_bit_shift_right_signed(args: &[Form]) -> Result<Form, Error> {
    binary_op("bit-shift-right-signed", args, |a, b| {
        u32::try_from(b).ok().and_then(|shift| a.checked_shr(shift))
    })
}

pub fn register(table: &mut BuiltinTable) {
    table.define("add", Arity::Exactly(2), builtin_add);
    table.define("sub", Arity::Exactly(2), builtin_sub);
    table.define("bit-and", Arity::Exactly(2), builtin_bit_and);
    table.define("bit-or", Arity::Exactly(2), builtin_bit_or);
    table.define("bit-xor", Arity::Exactly(2), builtin_bit_xor);
    table.define("bit-shift-left", Arity::Exactly(2), builtin_bit_shift_left);
    table.define(
        "bit-shift-right-signed",
        Arity::Exactly(2),
        builtin_bit_shift_right_signed,
    );
}
