//! `and or not xor` operate in two regimes: on a pair of Sets they act
//! bitwise (intersection/union/complement/symmetric difference); otherwise
//! they evaluate through truthiness and produce a Boolean. `choice` is the
//! one non-destructive ternary selector in this family.

use crate::context::Context;
use crate::dictionary::Dictionary;
use crate::error::JoyResult;
use crate::value::Value;

pub fn register(dict: &mut Dictionary) {
    dict.define_primitive("and", and);
    dict.define_primitive("or", or);
    dict.define_primitive("xor", xor);
    dict.define_primitive("not", not);
    dict.define_primitive("choice", choice);
}

fn and(ctx: &mut Context) -> JoyResult<()> {
    let b = ctx.stack.pop("and")?;
    let a = ctx.stack.pop("and")?;
    match (a, b) {
        (Value::Set(a), Value::Set(b)) => ctx.stack.push(Value::Set(a & b)),
        (a, b) => ctx.stack.push(Value::Boolean(a.truthy() && b.truthy())),
    }
    Ok(())
}

fn or(ctx: &mut Context) -> JoyResult<()> {
    let b = ctx.stack.pop("or")?;
    let a = ctx.stack.pop("or")?;
    match (a, b) {
        (Value::Set(a), Value::Set(b)) => ctx.stack.push(Value::Set(a | b)),
        (a, b) => ctx.stack.push(Value::Boolean(a.truthy() || b.truthy())),
    }
    Ok(())
}

fn xor(ctx: &mut Context) -> JoyResult<()> {
    let b = ctx.stack.pop("xor")?;
    let a = ctx.stack.pop("xor")?;
    match (a, b) {
        (Value::Set(a), Value::Set(b)) => ctx.stack.push(Value::Set(a ^ b)),
        (a, b) => ctx.stack.push(Value::Boolean(a.truthy() ^ b.truthy())),
    }
    Ok(())
}

fn not(ctx: &mut Context) -> JoyResult<()> {
    match ctx.stack.pop("not")? {
        Value::Set(bits) => ctx.stack.push(Value::Set(!bits)),
        other => ctx.stack.push(Value::Boolean(!other.truthy())),
    }
    Ok(())
}

/// B T F choice → T if B is truthy, else F. B is consumed; the unchosen
/// branch is simply dropped.
fn choice(ctx: &mut Context) -> JoyResult<()> {
    let f = ctx.stack.pop("choice")?;
    let t = ctx.stack.pop("choice")?;
    let b = ctx.stack.pop("choice")?;
    ctx.stack.push(if b.truthy() { t } else { f });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_on_sets_is_intersection() {
        let mut ctx = Context::new();
        ctx.stack.push(Value::Set(0b110));
        ctx.stack.push(Value::Set(0b011));
        and(&mut ctx).unwrap();
        assert_eq!(*ctx.stack.peek("test").unwrap(), Value::Set(0b010));
    }

    #[test]
    fn and_on_non_sets_is_boolean() {
        let mut ctx = Context::new();
        ctx.stack.push(Value::Integer(1));
        ctx.stack.push(Value::Integer(0));
        and(&mut ctx).unwrap();
        assert_eq!(*ctx.stack.peek("test").unwrap(), Value::Boolean(false));
    }

    #[test]
    fn set_complement_and_union_laws() {
        let full = u64::MAX;
        let mut ctx = Context::new();
        ctx.stack.push(Value::Set(full));
        not(&mut ctx).unwrap();
        let complement = ctx.stack.pop("test").unwrap();
        assert_eq!(complement, Value::Set(0));
    }
}
