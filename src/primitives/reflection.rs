use crate::context::Context;
use crate::dictionary::Dictionary;
use crate::error::JoyResult;
use crate::value::{JoyString, JoySymbol, Value};

pub fn register(dict: &mut Dictionary) {
    dict.define_primitive("name", name);
    dict.define_primitive("intern", intern);
    dict.define_primitive("body", body);
}

/// V name → S: a printable tag for V. For a Symbol this is just its text;
/// for anything else it's the canonical `Display` rendering.
fn name(ctx: &mut Context) -> JoyResult<()> {
    let v = ctx.stack.pop("name")?;
    let text = match &v {
        Value::Symbol(s) => s.as_str().to_string(),
        other => other.to_string(),
    };
    ctx.stack.push(Value::String(JoyString::from_str(&text)));
    Ok(())
}

/// S intern → sym: build a Symbol from a string's text.
fn intern(ctx: &mut Context) -> JoyResult<()> {
    let s = ctx.stack.pop_string("intern")?;
    ctx.stack
        .push(Value::Symbol(JoySymbol::new(s.to_string())));
    Ok(())
}

/// U body → Q: the bound quotation of a user-defined symbol; an empty
/// quotation for a primitive or an unknown name.
fn body(ctx: &mut Context) -> JoyResult<()> {
    let sym = ctx.stack.pop_symbol("body")?;
    let quot = ctx.dictionary.body_of(sym.as_str());
    ctx.stack.push(Value::Quotation(quot));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_renders_symbol_text() {
        let mut ctx = Context::new();
        ctx.stack.push(Value::Symbol(JoySymbol::new("dup")));
        name(&mut ctx).unwrap();
        assert_eq!(
            *ctx.stack.peek("test").unwrap(),
            Value::String(JoyString::from_str("dup"))
        );
    }

    #[test]
    fn body_of_user_word_returns_its_quotation() {
        let mut ctx = Context::new();
        ctx.dictionary
            .define_user("double", vec![Value::Integer(2), Value::Symbol(JoySymbol::new("*"))]);
        ctx.stack.push(Value::Symbol(JoySymbol::new("double")));
        body(&mut ctx).unwrap();
        assert_eq!(
            *ctx.stack.peek("test").unwrap(),
            Value::Quotation(vec![Value::Integer(2), Value::Symbol(JoySymbol::new("*"))])
        );
    }

    #[test]
    fn body_of_primitive_is_empty() {
        let mut ctx = Context::new();
        ctx.stack.push(Value::Symbol(JoySymbol::new("dup")));
        body(&mut ctx).unwrap();
        assert_eq!(*ctx.stack.peek("test").unwrap(), Value::Quotation(vec![]));
    }
}
