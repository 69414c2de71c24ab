use std::cmp::Ordering;

use crate::context::Context;
use crate::dictionary::Dictionary;
use crate::error::JoyResult;
use crate::value::Value;

pub fn register(dict: &mut Dictionary) {
    dict.define_primitive("=", eq);
    dict.define_primitive("!=", neq);
    dict.define_primitive("<", lt);
    dict.define_primitive(">", gt);
    dict.define_primitive("<=", le);
    dict.define_primitive(">=", ge);
    dict.define_primitive("compare", compare);
}

fn eq(ctx: &mut Context) -> JoyResult<()> {
    let b = ctx.stack.pop("=")?;
    let a = ctx.stack.pop("=")?;
    ctx.stack.push(Value::Boolean(a.structural_eq(&b)));
    Ok(())
}

fn neq(ctx: &mut Context) -> JoyResult<()> {
    let b = ctx.stack.pop("!=")?;
    let a = ctx.stack.pop("!=")?;
    ctx.stack.push(Value::Boolean(!a.structural_eq(&b)));
    Ok(())
}

/// On a type pairing with no defined order (e.g. two lists), the
/// comparison is simply false rather than an error.
fn order(ctx: &mut Context, op: &'static str) -> JoyResult<Option<Ordering>> {
    let b = ctx.stack.pop(op)?;
    let a = ctx.stack.pop(op)?;
    Ok(a.partial_compare(&b))
}

fn lt(ctx: &mut Context) -> JoyResult<()> {
    let ord = order(ctx, "<")?;
    ctx.stack
        .push(Value::Boolean(ord == Some(Ordering::Less)));
    Ok(())
}

fn gt(ctx: &mut Context) -> JoyResult<()> {
    let ord = order(ctx, ">")?;
    ctx.stack
        .push(Value::Boolean(ord == Some(Ordering::Greater)));
    Ok(())
}

fn le(ctx: &mut Context) -> JoyResult<()> {
    let ord = order(ctx, "<=")?;
    ctx.stack
        .push(Value::Boolean(matches!(ord, Some(Ordering::Less | Ordering::Equal))));
    Ok(())
}

fn ge(ctx: &mut Context) -> JoyResult<()> {
    let ord = order(ctx, ">=")?;
    ctx.stack.push(Value::Boolean(matches!(
        ord,
        Some(Ordering::Greater | Ordering::Equal)
    )));
    Ok(())
}

/// Pushes -1, 0, or 1, the familiar three-way `compare` result; unordered
/// pairs compare equal (0).
fn compare(ctx: &mut Context) -> JoyResult<()> {
    let ord = order(ctx, "compare")?;
    let n = match ord {
        Some(Ordering::Less) => -1,
        Some(Ordering::Equal) | None => 0,
        Some(Ordering::Greater) => 1,
    };
    ctx.stack.push(Value::Integer(n));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eq_treats_integer_and_float_as_equal() {
        let mut ctx = Context::new();
        ctx.stack.push(Value::Integer(2));
        ctx.stack.push(Value::Float(2.0));
        eq(&mut ctx).unwrap();
        assert_eq!(*ctx.stack.peek("test").unwrap(), Value::Boolean(true));
    }

    #[test]
    fn unordered_pair_compares_false() {
        let mut ctx = Context::new();
        ctx.stack.push(Value::List(vec![]));
        ctx.stack.push(Value::Integer(1));
        lt(&mut ctx).unwrap();
        assert_eq!(*ctx.stack.peek("test").unwrap(), Value::Boolean(false));
    }
}
