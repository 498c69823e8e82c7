// ABOUTME: Error types for lexing, parsing, and evaluation failures

use crate::form::Form;
use thiserror::Error;

/// Every error in the interpreter is fatal: the driver prints the
/// diagnostic line and exits non-zero. Nothing is caught or retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ===== Lexer =====
    #[error("lex error: disallowed byte 0x{0:02x}")]
    DisallowedByte(u8),

    #[error("lex error: lexeme exceeds {0}-byte buffer")]
    LexemeTooLong(usize),

    #[error("lex error: {0}")]
    Read(String),

    // ===== Parser =====
    #[error("parse error: unexpected ']'")]
    UnexpectedCloseBracket,

    #[error("parse error: unexpected end of input")]
    UnexpectedEof,

    // ===== Evaluator =====
    /// Arity error with function name, expected count/range, and actual count
    #[error("{function}: expected {expected} argument{}, got {actual}", if *.expected == "1" { "" } else { "s" })]
    Arity {
        function: String,
        expected: String, // "2", "at least 1"
        actual: usize,
    },

    /// Type mismatch with function name, expected/actual kinds, and argument position
    #[error("{function}: expected {expected}, got {actual} at argument {position}")]
    TypeMismatch {
        function: String,
        expected: &'static str,
        actual: &'static str,
        position: usize,
    },

    #[error("unbound word: {0}")]
    Unbound(String),

    #[error("{function}: {word} is not a decimal word")]
    NotDecimal { function: String, word: String },

    #[error("{function}: integer overflow")]
    Overflow { function: String },

    #[error("{function}: index {index} out of range for length {len}")]
    IndexOutOfRange {
        function: String,
        index: i64,
        len: usize,
    },

    /// Malformed special form or call shape
    #[error("{function}: {message}")]
    Structure { function: String, message: String },

    #[error("unknown function: {0}")]
    UnknownFunction(String),

    #[error("aborted")]
    Aborted,
}

impl Error {
    /// Create an arity error with expected and actual counts
    pub fn arity(function: &str, expected: impl Into<String>, actual: usize) -> Self {
        Error::Arity {
            function: function.to_string(),
            expected: expected.into(),
            actual,
        }
    }

    /// Create a type mismatch error; `position` is the 0-based argument index
    pub fn type_mismatch(
        function: &str,
        expected: &'static str,
        actual: &Form,
        position: usize,
    ) -> Self {
        Error::TypeMismatch {
            function: function.to_string(),
            expected,
            actual: actual.type_name(),
            position: position + 1,
        }
    }

    /// Create a structural error with function context
    pub fn structure(function: &str, message: impl Into<String>) -> Self {
        Error::Structure {
            function: function.to_string(),
            message: message.into(),
        }
    }

    pub fn overflow(function: &str) -> Self {
        Error::Overflow {
            function: function.to_string(),
        }
    }
}
