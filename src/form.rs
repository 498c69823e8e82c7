// ABOUTME: Form type representing wuns data: words and lists, nothing else

use std::fmt;
use std::rc::Rc;

/// Marker word heading a loop-continuation packet. The `*` byte is outside
/// the lexer's word character class, so no source text can produce it.
pub const CONTINUE_MARKER: &str = "*continue*";

/// The single value type of the language. Forms are immutable after
/// construction and shared by reference; cloning is a pointer copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Form {
    Word(Rc<str>),
    List(Rc<[Form]>),
}

impl Form {
    pub fn word(word: impl Into<Rc<str>>) -> Self {
        Form::Word(word.into())
    }

    pub fn list(items: Vec<Form>) -> Self {
        Form::List(items.into())
    }

    /// The empty list, the canonical unit value
    pub fn unit() -> Self {
        Form::List(Rc::from([]))
    }

    /// Decimal rendering of a host integer as a word
    pub fn from_int(n: i64) -> Self {
        Form::word(n.to_string())
    }

    /// The boolean convention: `"1"` for true, `"0"` for false
    pub fn from_bool(b: bool) -> Self {
        Form::word(if b { "1" } else { "0" })
    }

    pub fn is_word(&self) -> bool {
        matches!(self, Form::Word(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Form::List(_))
    }

    /// Only the word `"0"` is false; every other form, unit included, is true
    pub fn is_false(&self) -> bool {
        matches!(self, Form::Word(word) if &**word == "0")
    }

    /// A word whose bytes are all ASCII digits: the integer encoding.
    /// Decimal words evaluate to themselves; a leading `-` disqualifies.
    pub fn is_decimal_word(&self) -> bool {
        match self {
            Form::Word(word) => !word.is_empty() && word.bytes().all(|b| b.is_ascii_digit()),
            Form::List(_) => false,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Form::Word(_) => "word",
            Form::List(_) => "list",
        }
    }
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Form::Word(word) => write!(f, "{}", word),
            Form::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}
