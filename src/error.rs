use std::fmt;

use crate::value::ValueKind;

/// The closed set of ways a Joy program can fail.
///
/// Every primitive checks its precondition before it commits any side
/// effect, so by the time one of these is constructed the stack and
/// dictionary are still in the state they were in just before the
/// failing call.
#[derive(Debug)]
pub enum JoyError {
    Underflow {
        op: &'static str,
        required: usize,
        actual: usize,
    },
    TypeMismatch {
        op: &'static str,
        expected: &'static str,
        found: ValueKind,
    },
    Domain {
        op: &'static str,
        message: String,
    },
    Undefined {
        name: String,
    },
}

impl JoyError {
    pub fn underflow(op: &'static str, required: usize, actual: usize) -> Self {
        Self::Underflow {
            op,
            required,
            actual,
        }
    }

    pub fn type_mismatch(op: &'static str, expected: &'static str, found: ValueKind) -> Self {
        Self::TypeMismatch {
            op,
            expected,
            found,
        }
    }

    pub fn domain(op: &'static str, message: impl Into<String>) -> Self {
        Self::Domain {
            op,
            message: message.into(),
        }
    }

    pub fn undefined(name: impl Into<String>) -> Self {
        Self::Undefined { name: name.into() }
    }
}

impl fmt::Display for JoyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Underflow {
                op,
                required,
                actual,
            } => write!(
                f,
                "Joy stack underflow in '{op}': need {required}, have {actual}"
            ),
            Self::TypeMismatch {
                op,
                expected,
                found,
            } => write!(
                f,
                "Joy type error in '{op}': expected {expected}, got {found}"
            ),
            Self::Domain { op, message } => write!(f, "Joy error in '{op}': {message}"),
            Self::Undefined { name } => write!(f, "Undefined word: {name}"),
        }
    }
}

impl std::error::Error for JoyError {}

pub type JoyResult<T> = Result<T, JoyError>;
