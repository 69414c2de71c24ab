//! `+ - * / rem` and the small family around them. Integer op integer stays
//! integer unless the checked operation overflows, in which case it
//! promotes to float; any operand that is already a float always yields a
//! float. Float results never silently truncate back to integer — only
//! `floor`/`ceil`/`trunc` (see `math_fns`) convert explicitly.

use crate::context::Context;
use crate::dictionary::Dictionary;
use crate::error::{JoyError, JoyResult};
use crate::value::Value;

pub fn register(dict: &mut Dictionary) {
    dict.define_primitive("+", add);
    dict.define_primitive("-", sub);
    dict.define_primitive("*", mul);
    dict.define_primitive("/", div);
    dict.define_primitive("rem", rem);
    dict.define_primitive("succ", succ);
    dict.define_primitive("pred", pred);
    dict.define_primitive("abs", abs);
    dict.define_primitive("neg", neg);
    dict.define_primitive("sign", sign);
    dict.define_primitive("max", max);
    dict.define_primitive("min", min);
}

enum Pair {
    Ints(i64, i64),
    Floats(f64, f64),
}

fn pop_pair(ctx: &mut Context, op: &'static str) -> JoyResult<Pair> {
    let y = ctx.stack.pop(op)?;
    let x = ctx.stack.pop(op)?;
    match (x, y) {
        (Value::Integer(a), Value::Integer(b)) => Ok(Pair::Ints(a, b)),
        (Value::Integer(a), Value::Float(b)) => Ok(Pair::Floats(a as f64, b)),
        (Value::Float(a), Value::Integer(b)) => Ok(Pair::Floats(a, b as f64)),
        (Value::Float(a), Value::Float(b)) => Ok(Pair::Floats(a, b)),
        (x, _) => Err(JoyError::type_mismatch(op, "numeric", x.kind())),
    }
}

fn add(ctx: &mut Context) -> JoyResult<()> {
    let result = match pop_pair(ctx, "+")? {
        Pair::Ints(a, b) => match a.checked_add(b) {
            Some(n) => Value::Integer(n),
            None => Value::Float(a as f64 + b as f64),
        },
        Pair::Floats(a, b) => Value::Float(a + b),
    };
    ctx.stack.push(result);
    Ok(())
}

fn sub(ctx: &mut Context) -> JoyResult<()> {
    let result = match pop_pair(ctx, "-")? {
        Pair::Ints(a, b) => match a.checked_sub(b) {
            Some(n) => Value::Integer(n),
            None => Value::Float(a as f64 - b as f64),
        },
        Pair::Floats(a, b) => Value::Float(a - b),
    };
    ctx.stack.push(result);
    Ok(())
}

fn mul(ctx: &mut Context) -> JoyResult<()> {
    let result = match pop_pair(ctx, "*")? {
        Pair::Ints(a, b) => match a.checked_mul(b) {
            Some(n) => Value::Integer(n),
            None => Value::Float(a as f64 * b as f64),
        },
        Pair::Floats(a, b) => Value::Float(a * b),
    };
    ctx.stack.push(result);
    Ok(())
}

/// Integer over integer truncates towards zero and stays an integer, the
/// same as the other arithmetic operators; only an operand that is already
/// a float pulls the result to float.
fn div(ctx: &mut Context) -> JoyResult<()> {
    let result = match pop_pair(ctx, "/")? {
        Pair::Ints(a, b) => {
            if b == 0 {
                return Err(JoyError::domain("/", "division by zero"));
            }
            match a.checked_div(b) {
                Some(n) => Value::Integer(n),
                None => Value::Float(a as f64 / b as f64),
            }
        }
        Pair::Floats(a, b) => {
            if b == 0.0 {
                return Err(JoyError::domain("/", "division by zero"));
            }
            Value::Float(a / b)
        }
    };
    ctx.stack.push(result);
    Ok(())
}

fn rem(ctx: &mut Context) -> JoyResult<()> {
    let b = ctx.stack.pop_integer("rem")?;
    let a = ctx.stack.pop_integer("rem")?;
    if b == 0 {
        return Err(JoyError::domain("rem", "division by zero"));
    }
    ctx.stack.push(Value::Integer(a % b));
    Ok(())
}

fn succ(ctx: &mut Context) -> JoyResult<()> {
    match ctx.stack.pop("succ")? {
        Value::Integer(n) => ctx.stack.push(Value::Integer(n + 1)),
        Value::Float(x) => ctx.stack.push(Value::Float(x + 1.0)),
        other => return Err(JoyError::type_mismatch("succ", "numeric", other.kind())),
    }
    Ok(())
}

fn pred(ctx: &mut Context) -> JoyResult<()> {
    match ctx.stack.pop("pred")? {
        Value::Integer(n) => ctx.stack.push(Value::Integer(n - 1)),
        Value::Float(x) => ctx.stack.push(Value::Float(x - 1.0)),
        other => return Err(JoyError::type_mismatch("pred", "numeric", other.kind())),
    }
    Ok(())
}

fn abs(ctx: &mut Context) -> JoyResult<()> {
    match ctx.stack.pop("abs")? {
        Value::Integer(n) => ctx.stack.push(Value::Integer(n.abs())),
        Value::Float(x) => ctx.stack.push(Value::Float(x.abs())),
        other => return Err(JoyError::type_mismatch("abs", "numeric", other.kind())),
    }
    Ok(())
}

fn neg(ctx: &mut Context) -> JoyResult<()> {
    match ctx.stack.pop("neg")? {
        Value::Integer(n) => ctx.stack.push(Value::Integer(-n)),
        Value::Float(x) => ctx.stack.push(Value::Float(-x)),
        other => return Err(JoyError::type_mismatch("neg", "numeric", other.kind())),
    }
    Ok(())
}

fn sign(ctx: &mut Context) -> JoyResult<()> {
    let n = match ctx.stack.pop("sign")? {
        Value::Integer(n) => n.signum(),
        Value::Float(x) => x.signum() as i64,
        other => return Err(JoyError::type_mismatch("sign", "numeric", other.kind())),
    };
    ctx.stack.push(Value::Integer(n));
    Ok(())
}

fn max(ctx: &mut Context) -> JoyResult<()> {
    let result = match pop_pair(ctx, "max")? {
        Pair::Ints(a, b) => Value::Integer(a.max(b)),
        Pair::Floats(a, b) => Value::Float(a.max(b)),
    };
    ctx.stack.push(result);
    Ok(())
}

fn min(ctx: &mut Context) -> JoyResult<()> {
    let result = match pop_pair(ctx, "min")? {
        Pair::Ints(a, b) => Value::Integer(a.min(b)),
        Pair::Floats(a, b) => Value::Float(a.min(b)),
    };
    ctx.stack.push(result);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_addition_stays_integer() {
        let mut ctx = Context::new();
        ctx.stack.push(Value::Integer(2));
        ctx.stack.push(Value::Integer(3));
        add(&mut ctx).unwrap();
        assert_eq!(*ctx.stack.peek("test").unwrap(), Value::Integer(5));
    }

    #[test]
    fn mixed_numeric_widens_to_float() {
        let mut ctx = Context::new();
        ctx.stack.push(Value::Integer(2));
        ctx.stack.push(Value::Float(3.5));
        add(&mut ctx).unwrap();
        assert_eq!(*ctx.stack.peek("test").unwrap(), Value::Float(5.5));
    }

    #[test]
    fn integer_overflow_promotes_to_float() {
        let mut ctx = Context::new();
        ctx.stack.push(Value::Integer(i64::MAX));
        ctx.stack.push(Value::Integer(1));
        add(&mut ctx).unwrap();
        assert!(matches!(
            ctx.stack.peek("test").unwrap(),
            Value::Float(_)
        ));
    }

    #[test]
    fn division_by_zero_is_domain_error() {
        let mut ctx = Context::new();
        ctx.stack.push(Value::Integer(1));
        ctx.stack.push(Value::Integer(0));
        assert!(div(&mut ctx).is_err());
    }

    #[test]
    fn integer_division_truncates_and_stays_integer() {
        let mut ctx = Context::new();
        ctx.stack.push(Value::Integer(7));
        ctx.stack.push(Value::Integer(2));
        div(&mut ctx).unwrap();
        assert_eq!(*ctx.stack.peek("test").unwrap(), Value::Integer(3));
    }
}
