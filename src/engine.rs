//! The execution engine: the place literal-push and symbol-dispatch are
//! actually decided. Everything else — every combinator, every recursion
//! scheme — is built out of repeated calls back into `execute_value`/
//! `execute_quotation`.

use crate::context::Context;
use crate::dictionary::Word;
use crate::error::{JoyError, JoyResult};
use crate::value::Value;

/// Dispatch a single term: a Symbol resolves through the dictionary and
/// runs; anything else is pushed as a deep copy. The deep copy happens even
/// for plain literals because the term may still belong to an enclosing
/// quotation that could be executed again later — it must not be moved out
/// from under that quotation.
pub fn execute_value(ctx: &mut Context, value: &Value) -> JoyResult<()> {
    match value {
        Value::Symbol(sym) => {
            if ctx.flags.trace {
                log::trace!("exec: {}", sym.as_str());
            }
            execute_symbol(ctx, sym.as_str())
        }
        other => {
            ctx.stack.push(other.clone());
            Ok(())
        }
    }
}

/// Run every term of a quotation (or a list used as one) in order.
pub fn execute_quotation(ctx: &mut Context, terms: &[Value]) -> JoyResult<()> {
    for term in terms {
        execute_value(ctx, term)?;
    }
    Ok(())
}

fn execute_symbol(ctx: &mut Context, name: &str) -> JoyResult<()> {
    match ctx.dictionary.lookup(name) {
        Some(Word::Primitive(f)) => {
            let f = *f;
            f(ctx)
        }
        Some(Word::User(body)) => {
            let body = body.clone();
            execute_quotation(ctx, &body)
        }
        None => {
            if ctx.flags.undeferror {
                log::warn!("ignoring undefined word: {name}");
                Ok(())
            } else {
                Err(JoyError::undefined(name))
            }
        }
    }
}
