//! Type predicates (`integer`, `float`, …) and their `if*`-prefixed
//! conditional-preserve variants, which test the top value's type without
//! consuming it and then execute one of two branches.

use crate::context::Context;
use crate::dictionary::Dictionary;
use crate::engine::execute_quotation;
use crate::error::JoyResult;
use crate::value::Value;

pub fn register(dict: &mut Dictionary) {
    dict.define_primitive("integer", is_integer);
    dict.define_primitive("float", is_float);
    dict.define_primitive("logical", is_logical);
    dict.define_primitive("char", is_char);
    dict.define_primitive("string", is_string);
    dict.define_primitive("list", is_list);
    dict.define_primitive("set", is_set);
    dict.define_primitive("leaf", is_leaf);
    dict.define_primitive("file", is_file);
    dict.define_primitive("user", is_user);

    dict.define_primitive("ifinteger", if_integer);
    dict.define_primitive("iffloat", if_float);
    dict.define_primitive("iflogical", if_logical);
    dict.define_primitive("ifchar", if_char);
    dict.define_primitive("ifstring", if_string);
    dict.define_primitive("iflist", if_list);
    dict.define_primitive("ifset", if_set);
    dict.define_primitive("iffile", if_file);
}

fn predicate(ctx: &mut Context, op: &'static str, test: impl FnOnce(&Value) -> bool) -> JoyResult<()> {
    let v = ctx.stack.pop(op)?;
    ctx.stack.push(Value::Boolean(test(&v)));
    Ok(())
}

fn is_integer(ctx: &mut Context) -> JoyResult<()> {
    predicate(ctx, "integer", |v| matches!(v, Value::Integer(_)))
}
fn is_float(ctx: &mut Context) -> JoyResult<()> {
    predicate(ctx, "float", |v| matches!(v, Value::Float(_)))
}
fn is_logical(ctx: &mut Context) -> JoyResult<()> {
    predicate(ctx, "logical", |v| matches!(v, Value::Boolean(_)))
}
fn is_char(ctx: &mut Context) -> JoyResult<()> {
    predicate(ctx, "char", |v| matches!(v, Value::Char(_)))
}
fn is_string(ctx: &mut Context) -> JoyResult<()> {
    predicate(ctx, "string", |v| matches!(v, Value::String(_)))
}
fn is_list(ctx: &mut Context) -> JoyResult<()> {
    predicate(ctx, "list", |v| matches!(v, Value::List(_) | Value::Quotation(_)))
}
fn is_set(ctx: &mut Context) -> JoyResult<()> {
    predicate(ctx, "set", |v| matches!(v, Value::Set(_)))
}
fn is_leaf(ctx: &mut Context) -> JoyResult<()> {
    predicate(ctx, "leaf", Value::is_leaf)
}
fn is_file(ctx: &mut Context) -> JoyResult<()> {
    predicate(ctx, "file", |v| matches!(v, Value::File(_)))
}
/// `user` tests whether the top is a Symbol naming a user-defined word
/// (as opposed to a primitive or an undefined name).
fn is_user(ctx: &mut Context) -> JoyResult<()> {
    let v = ctx.stack.pop("user")?;
    let is_user_word = match &v {
        Value::Symbol(s) => matches!(
            ctx.dictionary.lookup(s.as_str()),
            Some(crate::dictionary::Word::User(_))
        ),
        _ => false,
    };
    ctx.stack.push(Value::Boolean(is_user_word));
    Ok(())
}

/// Every `if*` variant preserves the tested value on the stack (unlike the
/// bare predicates, which consume it), then executes T or F.
fn if_variant(
    ctx: &mut Context,
    op: &'static str,
    test: impl FnOnce(&Value) -> bool,
) -> JoyResult<()> {
    let f = ctx.stack.pop_aggregate(op)?;
    let t = ctx.stack.pop_aggregate(op)?;
    let v = ctx.stack.peek(op)?.clone();
    execute_quotation(ctx, if test(&v) { &t } else { &f })
}

fn if_integer(ctx: &mut Context) -> JoyResult<()> {
    if_variant(ctx, "ifinteger", |v| matches!(v, Value::Integer(_)))
}
fn if_float(ctx: &mut Context) -> JoyResult<()> {
    if_variant(ctx, "iffloat", |v| matches!(v, Value::Float(_)))
}
fn if_logical(ctx: &mut Context) -> JoyResult<()> {
    if_variant(ctx, "iflogical", |v| matches!(v, Value::Boolean(_)))
}
fn if_char(ctx: &mut Context) -> JoyResult<()> {
    if_variant(ctx, "ifchar", |v| matches!(v, Value::Char(_)))
}
fn if_string(ctx: &mut Context) -> JoyResult<()> {
    if_variant(ctx, "ifstring", |v| matches!(v, Value::String(_)))
}
fn if_list(ctx: &mut Context) -> JoyResult<()> {
    if_variant(ctx, "iflist", |v| matches!(v, Value::List(_) | Value::Quotation(_)))
}
fn if_set(ctx: &mut Context) -> JoyResult<()> {
    if_variant(ctx, "ifset", |v| matches!(v, Value::Set(_)))
}
fn if_file(ctx: &mut Context) -> JoyResult<()> {
    if_variant(ctx, "iffile", |v| matches!(v, Value::File(_)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_predicate_consumes_value() {
        let mut ctx = Context::new();
        ctx.stack.push(Value::Integer(1));
        is_integer(&mut ctx).unwrap();
        assert_eq!(ctx.stack.depth(), 1);
        assert_eq!(*ctx.stack.peek("test").unwrap(), Value::Boolean(true));
    }

    #[test]
    fn if_integer_preserves_tested_value() {
        let mut ctx = Context::new();
        ctx.stack.push(Value::Integer(5));
        ctx.stack.push(Value::Quotation(vec![Value::Integer(1)]));
        ctx.stack.push(Value::Quotation(vec![Value::Integer(2)]));
        if_integer(&mut ctx).unwrap();
        assert_eq!(
            ctx.stack.to_list_top_to_bottom(),
            vec![Value::Integer(1), Value::Integer(5)]
        );
    }
}
