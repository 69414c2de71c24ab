//! Stack shuffling: the operators that rearrange the top of the stack
//! without inspecting the values' contents.

use crate::context::Context;
use crate::dictionary::Dictionary;
use crate::error::JoyResult;
use crate::value::Value;

pub fn register(dict: &mut Dictionary) {
    dict.define_primitive("dup", dup);
    dict.define_primitive("pop", pop);
    dict.define_primitive("swap", swap);
    dict.define_primitive("rollup", rollup);
    dict.define_primitive("rolldown", rolldown);
    dict.define_primitive("rotate", rotate);
    dict.define_primitive("over", over);
    dict.define_primitive("dup2", dup2);
    dict.define_primitive("dupd", dupd);
    dict.define_primitive("swapd", swapd);
    dict.define_primitive("popd", popd);
    dict.define_primitive("rollupd", rollupd);
    dict.define_primitive("rolldownd", rolldownd);
    dict.define_primitive("rotated", rotated);
    dict.define_primitive("id", id);
    dict.define_primitive("stack", stack);
    dict.define_primitive("unstack", unstack);
}

fn dup(ctx: &mut Context) -> JoyResult<()> {
    let top = ctx.stack.peek("dup")?.clone();
    ctx.stack.push(top);
    Ok(())
}

fn pop(ctx: &mut Context) -> JoyResult<()> {
    ctx.stack.pop("pop")?;
    Ok(())
}

fn swap(ctx: &mut Context) -> JoyResult<()> {
    let y = ctx.stack.pop("swap")?;
    let x = ctx.stack.pop("swap")?;
    ctx.stack.push(y);
    ctx.stack.push(x);
    Ok(())
}

/// X Y Z → Z X Y
fn rollup(ctx: &mut Context) -> JoyResult<()> {
    let z = ctx.stack.pop("rollup")?;
    let y = ctx.stack.pop("rollup")?;
    let x = ctx.stack.pop("rollup")?;
    ctx.stack.push(z);
    ctx.stack.push(x);
    ctx.stack.push(y);
    Ok(())
}

/// X Y Z → Y Z X
fn rolldown(ctx: &mut Context) -> JoyResult<()> {
    let z = ctx.stack.pop("rolldown")?;
    let y = ctx.stack.pop("rolldown")?;
    let x = ctx.stack.pop("rolldown")?;
    ctx.stack.push(y);
    ctx.stack.push(z);
    ctx.stack.push(x);
    Ok(())
}

/// X Y Z → Z Y X
fn rotate(ctx: &mut Context) -> JoyResult<()> {
    let z = ctx.stack.pop("rotate")?;
    let y = ctx.stack.pop("rotate")?;
    let x = ctx.stack.pop("rotate")?;
    ctx.stack.push(z);
    ctx.stack.push(y);
    ctx.stack.push(x);
    Ok(())
}

/// X Y → X Y X
fn over(ctx: &mut Context) -> JoyResult<()> {
    let x = ctx.stack.peek_n("over", 1)?.clone();
    ctx.stack.push(x);
    Ok(())
}

/// X Y → X Y X Y
fn dup2(ctx: &mut Context) -> JoyResult<()> {
    let x = ctx.stack.peek_n("dup2", 1)?.clone();
    let y = ctx.stack.peek_n("dup2", 0)?.clone();
    ctx.stack.push(x);
    ctx.stack.push(y);
    Ok(())
}

/// X Y → X X Y
fn dupd(ctx: &mut Context) -> JoyResult<()> {
    let y = ctx.stack.pop("dupd")?;
    dup(ctx)?;
    ctx.stack.push(y);
    Ok(())
}

/// X Y Z → Y X Z
fn swapd(ctx: &mut Context) -> JoyResult<()> {
    let z = ctx.stack.pop("swapd")?;
    swap(ctx)?;
    ctx.stack.push(z);
    Ok(())
}

/// X Y → Y
fn popd(ctx: &mut Context) -> JoyResult<()> {
    let y = ctx.stack.pop("popd")?;
    pop(ctx)?;
    ctx.stack.push(y);
    Ok(())
}

fn rollupd(ctx: &mut Context) -> JoyResult<()> {
    let w = ctx.stack.pop("rollupd")?;
    rollup(ctx)?;
    ctx.stack.push(w);
    Ok(())
}

fn rolldownd(ctx: &mut Context) -> JoyResult<()> {
    let w = ctx.stack.pop("rolldownd")?;
    rolldown(ctx)?;
    ctx.stack.push(w);
    Ok(())
}

fn rotated(ctx: &mut Context) -> JoyResult<()> {
    let w = ctx.stack.pop("rotated")?;
    rotate(ctx)?;
    ctx.stack.push(w);
    Ok(())
}

fn id(_ctx: &mut Context) -> JoyResult<()> {
    Ok(())
}

/// Packs the whole stack into a top-to-bottom list, without clearing it.
fn stack(ctx: &mut Context) -> JoyResult<()> {
    let items = ctx.stack.to_list_top_to_bottom();
    ctx.stack.push(Value::List(items));
    Ok(())
}

/// Clears the stack, then pushes the popped list's contents bottom-first so
/// the original top-to-bottom order is reconstructed.
fn unstack(ctx: &mut Context) -> JoyResult<()> {
    let items = ctx.stack.pop_list("unstack")?;
    ctx.stack.clear();
    let mut items = items;
    items.reverse();
    ctx.stack.extend_bottom_first(items);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx_with(values: Vec<Value>) -> Context {
        let mut ctx = Context::new();
        for v in values {
            ctx.stack.push(v);
        }
        ctx
    }

    #[test]
    fn rollup_rotates_top_three() {
        let mut ctx = ctx_with(vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]);
        rollup(&mut ctx).unwrap();
        let top_to_bottom = ctx.stack.to_list_top_to_bottom();
        assert_eq!(
            top_to_bottom,
            vec![Value::Integer(2), Value::Integer(1), Value::Integer(3)]
        );
    }

    #[test]
    fn stack_does_not_clear() {
        let mut ctx = ctx_with(vec![Value::Integer(1), Value::Integer(2)]);
        stack(&mut ctx).unwrap();
        assert_eq!(ctx.stack.depth(), 3);
    }

    #[test]
    fn unstack_rebuilds_original_order() {
        let mut ctx = ctx_with(vec![Value::Integer(1), Value::Integer(2)]);
        stack(&mut ctx).unwrap();
        // stack is now: 1 2 [2 1]
        unstack(&mut ctx).unwrap();
        assert_eq!(
            ctx.stack.to_list_top_to_bottom(),
            vec![Value::Integer(2), Value::Integer(1)]
        );
    }
}
