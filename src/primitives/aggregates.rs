//! Aggregate manipulation: the operators shared across List, Quotation,
//! String, and (where it makes sense) Set.

use crate::aggregate;
use crate::context::Context;
use crate::dictionary::Dictionary;
use crate::error::{JoyError, JoyResult};
use crate::value::{JoyString, Value};

pub fn register(dict: &mut Dictionary) {
    dict.define_primitive("first", first);
    dict.define_primitive("rest", rest);
    dict.define_primitive("cons", cons);
    dict.define_primitive("swons", swons);
    dict.define_primitive("uncons", uncons);
    dict.define_primitive("unswons", unswons);
    dict.define_primitive("concat", concat);
    dict.define_primitive("swoncat", swoncat);
    dict.define_primitive("size", size);
    dict.define_primitive("at", at);
    dict.define_primitive("of", of);
    dict.define_primitive("drop", drop);
    dict.define_primitive("take", take);
    dict.define_primitive("null", null);
    dict.define_primitive("small", small);
    dict.define_primitive("has", has);
    dict.define_primitive("in", contains);
    dict.define_primitive("enconcat", enconcat);
}

/// Wraps `items` back up in whichever of List/Quotation `like` was.
fn rewrap(like: &Value, items: Vec<Value>) -> Value {
    match like {
        Value::Quotation(_) => Value::Quotation(items),
        _ => Value::List(items),
    }
}

fn first(ctx: &mut Context) -> JoyResult<()> {
    match ctx.stack.pop("first")? {
        Value::List(items) | Value::Quotation(items) => {
            let head = aggregate::first(&items)
                .cloned()
                .ok_or_else(|| JoyError::domain("first", "empty aggregate"))?;
            ctx.stack.push(head);
            Ok(())
        }
        Value::String(s) => {
            let head = *s
                .0
                .first()
                .ok_or_else(|| JoyError::domain("first", "empty string"))?;
            ctx.stack.push(Value::Char(head));
            Ok(())
        }
        other => Err(JoyError::type_mismatch("first", "aggregate", other.kind())),
    }
}

fn rest(ctx: &mut Context) -> JoyResult<()> {
    match ctx.stack.pop("rest")? {
        v @ (Value::List(_) | Value::Quotation(_)) => {
            let items = v.as_elements().unwrap().to_vec();
            let tail = aggregate::rest(&items);
            ctx.stack.push(rewrap(&v, tail));
            Ok(())
        }
        Value::String(s) => {
            let tail = aggregate::string_drop(&s.0, 1);
            ctx.stack.push(Value::String(JoyString(tail)));
            Ok(())
        }
        other => Err(JoyError::type_mismatch("rest", "aggregate", other.kind())),
    }
}

fn cons(ctx: &mut Context) -> JoyResult<()> {
    let agg = ctx.stack.pop("cons")?;
    let head = ctx.stack.pop("cons")?;
    match agg {
        v @ (Value::List(_) | Value::Quotation(_)) => {
            let items = v.as_elements().unwrap().to_vec();
            ctx.stack.push(rewrap(&v, aggregate::cons(head, items)));
            Ok(())
        }
        Value::String(s) => match head {
            Value::Char(c) => {
                let mut bytes = vec![c];
                bytes.extend_from_slice(&s.0);
                ctx.stack.push(Value::String(JoyString(bytes)));
                Ok(())
            }
            other => Err(JoyError::type_mismatch("cons", "char", other.kind())),
        },
        Value::Set(bits) => match head {
            Value::Integer(n) => {
                if !(0..64).contains(&n) {
                    return Err(JoyError::domain("cons", "set member out of range 0..63"));
                }
                ctx.stack.push(Value::Set(aggregate::set_insert(bits, n)));
                Ok(())
            }
            other => Err(JoyError::type_mismatch("cons", "integer", other.kind())),
        },
        other => Err(JoyError::type_mismatch("cons", "aggregate", other.kind())),
    }
}

/// `swons` is `cons` with its arguments already in agg-then-head order on
/// the stack: `agg head swons` ≡ `head agg cons` using the stack's own
/// existing top-two.
fn swons(ctx: &mut Context) -> JoyResult<()> {
    let head = ctx.stack.pop("swons")?;
    let agg = ctx.stack.pop("swons")?;
    ctx.stack.push(agg);
    ctx.stack.push(head);
    cons(ctx)
}

fn uncons(ctx: &mut Context) -> JoyResult<()> {
    let agg = ctx.stack.peek("uncons")?.clone();
    ctx.stack.push(agg);
    first(ctx)?;
    let head = ctx.stack.pop("uncons")?;
    rest(ctx)?;
    let tail = ctx.stack.pop("uncons")?;
    ctx.stack.push(head);
    ctx.stack.push(tail);
    Ok(())
}

fn unswons(ctx: &mut Context) -> JoyResult<()> {
    uncons(ctx)?;
    let tail = ctx.stack.pop("unswons")?;
    let head = ctx.stack.pop("unswons")?;
    ctx.stack.push(tail);
    ctx.stack.push(head);
    Ok(())
}

fn concat(ctx: &mut Context) -> JoyResult<()> {
    let b = ctx.stack.pop("concat")?;
    let a = ctx.stack.pop("concat")?;
    match (a, b) {
        (Value::List(a), Value::List(b)) => {
            ctx.stack.push(Value::List(aggregate::concat(a, &b)));
            Ok(())
        }
        (Value::Quotation(a), Value::Quotation(b)) => {
            ctx.stack.push(Value::Quotation(aggregate::concat(a, &b)));
            Ok(())
        }
        (Value::String(a), Value::String(b)) => {
            let mut bytes = a.0;
            bytes.extend_from_slice(&b.0);
            ctx.stack.push(Value::String(JoyString(bytes)));
            Ok(())
        }
        (Value::List(_) | Value::Quotation(_), b) => {
            Err(JoyError::type_mismatch("concat", "matching aggregate type", b.kind()))
        }
        (a, _) => Err(JoyError::type_mismatch("concat", "matching aggregates", a.kind())),
    }
}

fn swoncat(ctx: &mut Context) -> JoyResult<()> {
    let b = ctx.stack.pop("swoncat")?;
    let a = ctx.stack.pop("swoncat")?;
    ctx.stack.push(b);
    ctx.stack.push(a);
    concat(ctx)
}

fn size(ctx: &mut Context) -> JoyResult<()> {
    let n = match ctx.stack.pop("size")? {
        Value::List(items) | Value::Quotation(items) => items.len(),
        Value::String(s) => s.len(),
        Value::Set(bits) => aggregate::set_popcount(bits) as usize,
        other => return Err(JoyError::type_mismatch("size", "aggregate", other.kind())),
    };
    ctx.stack.push(Value::Integer(n as i64));
    Ok(())
}

fn at(ctx: &mut Context) -> JoyResult<()> {
    let index = ctx.stack.pop_integer("at")?;
    let agg = ctx.stack.pop("at")?;
    if index < 0 {
        return Err(JoyError::domain("at", "negative index"));
    }
    match agg {
        Value::List(items) | Value::Quotation(items) => {
            let v = aggregate::at(&items, index)
                .cloned()
                .ok_or_else(|| JoyError::domain("at", "index out of bounds"))?;
            ctx.stack.push(v);
        }
        Value::String(s) => {
            let c = *s
                .0
                .get(index as usize)
                .ok_or_else(|| JoyError::domain("at", "index out of bounds"))?;
            ctx.stack.push(Value::Char(c));
        }
        other => return Err(JoyError::type_mismatch("at", "aggregate", other.kind())),
    }
    Ok(())
}

/// `of` is `at` with the index and aggregate swapped on entry.
fn of(ctx: &mut Context) -> JoyResult<()> {
    let agg = ctx.stack.pop("of")?;
    let index = ctx.stack.pop("of")?;
    ctx.stack.push(agg);
    ctx.stack.push(index);
    at(ctx)
}

fn drop(ctx: &mut Context) -> JoyResult<()> {
    let n = ctx.stack.pop_integer("drop")?;
    match ctx.stack.pop("drop")? {
        v @ (Value::List(_) | Value::Quotation(_)) => {
            let items = v.as_elements().unwrap().to_vec();
            ctx.stack.push(rewrap(&v, aggregate::drop(&items, n)));
        }
        Value::String(s) => {
            ctx.stack
                .push(Value::String(JoyString(aggregate::string_drop(&s.0, n))));
        }
        Value::Set(bits) => {
            ctx.stack.push(Value::Set(aggregate::set_drop(bits, n)));
        }
        other => return Err(JoyError::type_mismatch("drop", "aggregate", other.kind())),
    }
    Ok(())
}

fn take(ctx: &mut Context) -> JoyResult<()> {
    let n = ctx.stack.pop_integer("take")?;
    match ctx.stack.pop("take")? {
        v @ (Value::List(_) | Value::Quotation(_)) => {
            let items = v.as_elements().unwrap().to_vec();
            ctx.stack.push(rewrap(&v, aggregate::take(&items, n)));
        }
        Value::String(s) => {
            ctx.stack
                .push(Value::String(JoyString(aggregate::string_take(&s.0, n))));
        }
        Value::Set(bits) => {
            ctx.stack.push(Value::Set(aggregate::set_take(bits, n)));
        }
        other => return Err(JoyError::type_mismatch("take", "aggregate", other.kind())),
    }
    Ok(())
}

fn null(ctx: &mut Context) -> JoyResult<()> {
    let v = ctx.stack.pop("null")?;
    ctx.stack.push(Value::Boolean(!v.truthy()));
    Ok(())
}

fn small(ctx: &mut Context) -> JoyResult<()> {
    let is_small = match ctx.stack.peek("small")? {
        Value::Integer(n) => (-1..=1).contains(n),
        Value::List(items) | Value::Quotation(items) => items.len() <= 1,
        Value::String(s) => s.len() <= 1,
        Value::Set(bits) => aggregate::set_popcount(*bits) <= 1,
        _ => false,
    };
    ctx.stack.pop("small")?;
    ctx.stack.push(Value::Boolean(is_small));
    Ok(())
}

/// {..} X has → B. Out-of-range integers simply test false.
fn has(ctx: &mut Context) -> JoyResult<()> {
    let member = ctx.stack.pop_integer("has")?;
    let bits = ctx.stack.pop_set("has")?;
    ctx.stack
        .push(Value::Boolean(aggregate::set_member(bits, member)));
    Ok(())
}

/// X A in → B. Membership test against a List/Quotation (structural
/// equality), a String (substring-of-length-one via Char), or a Set (via
/// `has`'s integer rule).
fn contains(ctx: &mut Context) -> JoyResult<()> {
    let agg = ctx.stack.pop("in")?;
    let x = ctx.stack.pop("in")?;
    let found = match &agg {
        Value::List(items) | Value::Quotation(items) => items.iter().any(|v| v.structural_eq(&x)),
        Value::String(s) => match x {
            Value::Char(c) => s.0.contains(&c),
            _ => false,
        },
        Value::Set(bits) => match x {
            Value::Integer(n) => aggregate::set_member(*bits, n),
            _ => false,
        },
        other => return Err(JoyError::type_mismatch("in", "aggregate", other.kind())),
    };
    ctx.stack.push(Value::Boolean(found));
    Ok(())
}

/// X S T enconcat → U. Insert X between S and T, then concatenate: the
/// same as `swapd cons concat`. S and T must be the same aggregate shape;
/// X must fit that shape's element kind.
fn enconcat(ctx: &mut Context) -> JoyResult<()> {
    let t = ctx.stack.pop("enconcat")?;
    let s = ctx.stack.pop("enconcat")?;
    let x = ctx.stack.pop("enconcat")?;
    match (s, t) {
        (Value::List(mut items), Value::List(tail)) => {
            items.push(x);
            items.extend_from_slice(&tail);
            ctx.stack.push(Value::List(items));
            Ok(())
        }
        (Value::Quotation(mut items), Value::Quotation(tail)) => {
            items.push(x);
            items.extend_from_slice(&tail);
            ctx.stack.push(Value::Quotation(items));
            Ok(())
        }
        (Value::String(s), Value::String(t)) => match x {
            Value::Char(c) => {
                let mut bytes = s.0;
                bytes.push(c);
                bytes.extend_from_slice(&t.0);
                ctx.stack.push(Value::String(JoyString(bytes)));
                Ok(())
            }
            other => Err(JoyError::type_mismatch("enconcat", "char", other.kind())),
        },
        (Value::List(_) | Value::Quotation(_), t) => {
            Err(JoyError::type_mismatch("enconcat", "matching aggregate type", t.kind()))
        }
        (s, _) => Err(JoyError::type_mismatch(
            "enconcat",
            "matching aggregates",
            s.kind(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncons_splits_head_and_tail() {
        let mut ctx = Context::new();
        ctx.stack
            .push(Value::List(vec![Value::Integer(1), Value::Integer(2)]));
        uncons(&mut ctx).unwrap();
        let tail = ctx.stack.pop("test").unwrap();
        let head = ctx.stack.pop("test").unwrap();
        assert_eq!(head, Value::Integer(1));
        assert_eq!(tail, Value::List(vec![Value::Integer(2)]));
    }

    #[test]
    fn at_rejects_negative_and_out_of_bounds() {
        let mut ctx = Context::new();
        ctx.stack.push(Value::List(vec![Value::Integer(1)]));
        ctx.stack.push(Value::Integer(-1));
        assert!(at(&mut ctx).is_err());

        let mut ctx = Context::new();
        ctx.stack.push(Value::List(vec![Value::Integer(1)]));
        ctx.stack.push(Value::Integer(5));
        assert!(at(&mut ctx).is_err());
    }

    #[test]
    fn has_is_false_out_of_range_not_an_error() {
        let mut ctx = Context::new();
        ctx.stack.push(Value::Set(0));
        ctx.stack.push(Value::Integer(200));
        has(&mut ctx).unwrap();
        assert_eq!(*ctx.stack.peek("test").unwrap(), Value::Boolean(false));
    }
}
