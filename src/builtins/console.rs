//! Diagnostic output: log, abort
//!
//! - `log`: writes `wuns: <form>` and a newline to stdout, returns unit
//! - `abort`: fatal; the driver prints the diagnostic and exits non-zero

use super::{Arity, BuiltinTable};
use crate::error::Error;
use crate::form::Form;

pub fn builtin_log(args: &[Form]) -> Result<Form, Error> {
    println!("wuns: {}", args[0]);
    Ok(Form::unit())
}

pub fn builtin_abort(_args: &[Form]) -> Result<Form, Error> {
    Err(Error::Aborted)
}

pub fn register(table: &mut BuiltinTable) {
    table.define("log", Arity::Exactly(1), builtin_log);
    table.define("abort", Arity::Exactly(0), builtin_abort);
}
