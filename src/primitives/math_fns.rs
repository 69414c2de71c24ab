//! Floating-point math functions. Every input is widened (integers become
//! floats); `floor`/`ceil`/`trunc` are the sole operators that convert a
//! float result back down to an integer, and they do so explicitly.

use crate::context::Context;
use crate::dictionary::Dictionary;
use crate::error::JoyResult;
use crate::value::Value;

pub fn register(dict: &mut Dictionary) {
    dict.define_primitive("sin", sin);
    dict.define_primitive("cos", cos);
    dict.define_primitive("tan", tan);
    dict.define_primitive("asin", asin);
    dict.define_primitive("acos", acos);
    dict.define_primitive("atan", atan);
    dict.define_primitive("atan2", atan2);
    dict.define_primitive("sinh", sinh);
    dict.define_primitive("cosh", cosh);
    dict.define_primitive("tanh", tanh);
    dict.define_primitive("sqrt", sqrt);
    dict.define_primitive("exp", exp);
    dict.define_primitive("log", ln);
    dict.define_primitive("log10", log10);
    dict.define_primitive("pow", pow);
    dict.define_primitive("floor", floor);
    dict.define_primitive("ceil", ceil);
    dict.define_primitive("trunc", trunc);
    dict.define_primitive("frexp", frexp);
    dict.define_primitive("ldexp", ldexp);
    dict.define_primitive("modf", modf);
}

fn unary(ctx: &mut Context, op: &'static str, f: impl FnOnce(f64) -> f64) -> JoyResult<()> {
    let x = ctx.stack.pop_number(op)?;
    ctx.stack.push(Value::Float(f(x)));
    Ok(())
}

fn sin(ctx: &mut Context) -> JoyResult<()> {
    unary(ctx, "sin", f64::sin)
}
fn cos(ctx: &mut Context) -> JoyResult<()> {
    unary(ctx, "cos", f64::cos)
}
fn tan(ctx: &mut Context) -> JoyResult<()> {
    unary(ctx, "tan", f64::tan)
}
fn asin(ctx: &mut Context) -> JoyResult<()> {
    unary(ctx, "asin", f64::asin)
}
fn acos(ctx: &mut Context) -> JoyResult<()> {
    unary(ctx, "acos", f64::acos)
}
fn atan(ctx: &mut Context) -> JoyResult<()> {
    unary(ctx, "atan", f64::atan)
}
fn sinh(ctx: &mut Context) -> JoyResult<()> {
    unary(ctx, "sinh", f64::sinh)
}
fn cosh(ctx: &mut Context) -> JoyResult<()> {
    unary(ctx, "cosh", f64::cosh)
}
fn tanh(ctx: &mut Context) -> JoyResult<()> {
    unary(ctx, "tanh", f64::tanh)
}
fn sqrt(ctx: &mut Context) -> JoyResult<()> {
    unary(ctx, "sqrt", f64::sqrt)
}
fn exp(ctx: &mut Context) -> JoyResult<()> {
    unary(ctx, "exp", f64::exp)
}
fn ln(ctx: &mut Context) -> JoyResult<()> {
    unary(ctx, "log", f64::ln)
}
fn log10(ctx: &mut Context) -> JoyResult<()> {
    unary(ctx, "log10", f64::log10)
}

fn atan2(ctx: &mut Context) -> JoyResult<()> {
    let y = ctx.stack.pop_number("atan2")?;
    let x = ctx.stack.pop_number("atan2")?;
    ctx.stack.push(Value::Float(x.atan2(y)));
    Ok(())
}

fn pow(ctx: &mut Context) -> JoyResult<()> {
    let y = ctx.stack.pop_number("pow")?;
    let x = ctx.stack.pop_number("pow")?;
    ctx.stack.push(Value::Float(x.powf(y)));
    Ok(())
}

fn floor(ctx: &mut Context) -> JoyResult<()> {
    let x = ctx.stack.pop_number("floor")?;
    ctx.stack.push(Value::Integer(x.floor() as i64));
    Ok(())
}

fn ceil(ctx: &mut Context) -> JoyResult<()> {
    let x = ctx.stack.pop_number("ceil")?;
    ctx.stack.push(Value::Integer(x.ceil() as i64));
    Ok(())
}

fn trunc(ctx: &mut Context) -> JoyResult<()> {
    let x = ctx.stack.pop_number("trunc")?;
    ctx.stack.push(Value::Integer(x.trunc() as i64));
    Ok(())
}

/// Pushes the mantissa and exponent such that `x == mantissa * 2^exponent`.
fn frexp(ctx: &mut Context) -> JoyResult<()> {
    let x = ctx.stack.pop_number("frexp")?;
    if x == 0.0 {
        ctx.stack.push(Value::Float(0.0));
        ctx.stack.push(Value::Integer(0));
        return Ok(());
    }
    let bits = x.abs().to_bits();
    let raw_exp = ((bits >> 52) & 0x7ff) as i64;
    let (mantissa, exponent) = if raw_exp == 0 {
        // subnormal: fall back to a scaling loop
        let mut m = x;
        let mut e = 0i64;
        while m.abs() < 0.5 {
            m *= 2.0;
            e -= 1;
        }
        (m, e)
    } else {
        let exponent = raw_exp - 1022;
        let mantissa = x / 2f64.powi(exponent as i32);
        (mantissa, exponent)
    };
    ctx.stack.push(Value::Float(mantissa));
    ctx.stack.push(Value::Integer(exponent));
    Ok(())
}

fn ldexp(ctx: &mut Context) -> JoyResult<()> {
    let exponent = ctx.stack.pop_integer("ldexp")?;
    let mantissa = ctx.stack.pop_number("ldexp")?;
    ctx.stack
        .push(Value::Float(mantissa * 2f64.powi(exponent as i32)));
    Ok(())
}

/// Pushes the fractional and integer parts of x, in that order.
fn modf(ctx: &mut Context) -> JoyResult<()> {
    let x = ctx.stack.pop_number("modf")?;
    let integer = x.trunc();
    ctx.stack.push(Value::Float(x - integer));
    ctx.stack.push(Value::Float(integer));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqrt_widens_integer_input() {
        let mut ctx = Context::new();
        ctx.stack.push(Value::Integer(4));
        sqrt(&mut ctx).unwrap();
        assert_eq!(*ctx.stack.peek("test").unwrap(), Value::Float(2.0));
    }

    #[test]
    fn floor_returns_integer() {
        let mut ctx = Context::new();
        ctx.stack.push(Value::Float(3.7));
        floor(&mut ctx).unwrap();
        assert_eq!(*ctx.stack.peek("test").unwrap(), Value::Integer(3));
    }
}
