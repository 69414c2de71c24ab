//! The control-flow combinators. None of these are special forms at the
//! engine level — they're ordinary primitives that happen to call back
//! into `engine::execute_quotation`, snapshotting and restoring the stack
//! around any quotation they run only to *test*, never to produce the
//! primitive's real result.

use crate::context::Context;
use crate::dictionary::Dictionary;
use crate::engine::execute_quotation;
use crate::error::{JoyError, JoyResult};
use crate::value::Value;

pub fn register(dict: &mut Dictionary) {
    dict.define_primitive("i", i);
    dict.define_primitive("x", x);
    dict.define_primitive("dip", dip);
    dict.define_primitive("ifte", ifte);
    dict.define_primitive("branch", branch);
    dict.define_primitive("times", times);
    dict.define_primitive("while", while_);
    dict.define_primitive("map", map);
    dict.define_primitive("step", step);
    dict.define_primitive("filter", filter);
    dict.define_primitive("fold", fold);
    dict.define_primitive("split", split);
    dict.define_primitive("some", some);
    dict.define_primitive("all", all);
    dict.define_primitive("cond", cond);
    dict.define_primitive("infra", infra);
    dict.define_primitive("nullary", nullary);
    dict.define_primitive("unary", unary);
    dict.define_primitive("binary", binary);
    dict.define_primitive("ternary", ternary);
    dict.define_primitive("unary2", unary2);
    dict.define_primitive("unary3", unary3);
    dict.define_primitive("unary4", unary4);
    dict.define_primitive("app1", app1);
    dict.define_primitive("app2", app2);
    dict.define_primitive("app3", app3);
    dict.define_primitive("app4", app4);
    dict.define_primitive("app11", app11);
    dict.define_primitive("app12", app12);
    dict.define_primitive("cleave", cleave);
    dict.define_primitive("construct", construct);
}

/// Pop a quotation-or-list and run it.
fn i(ctx: &mut Context) -> JoyResult<()> {
    let body = ctx.stack.pop_aggregate("i")?;
    execute_quotation(ctx, &body)
}

/// `x` ≡ `dup i`: run a copy of the top, leaving the original in place.
fn x(ctx: &mut Context) -> JoyResult<()> {
    let body = ctx.stack.peek("x")?.clone();
    let items = body
        .as_elements()
        .ok_or_else(|| JoyError::type_mismatch("x", "list or quotation", body.kind()))?
        .to_vec();
    execute_quotation(ctx, &items)
}

/// X Q dip: Q runs with X hidden below it, then X is pushed back on top.
fn dip(ctx: &mut Context) -> JoyResult<()> {
    let body = ctx.stack.pop_aggregate("dip")?;
    let saved = ctx.stack.pop("dip")?;
    execute_quotation(ctx, &body)?;
    ctx.stack.push(saved);
    Ok(())
}

/// C T F ifte: snapshot, test C, restore, then run T or F.
fn ifte(ctx: &mut Context) -> JoyResult<()> {
    let f = ctx.stack.pop_aggregate("ifte")?;
    let t = ctx.stack.pop_aggregate("ifte")?;
    let c = ctx.stack.pop_aggregate("ifte")?;

    let snapshot = ctx.stack.snapshot();
    execute_quotation(ctx, &c)?;
    let result = ctx.stack.pop("ifte")?.truthy();
    ctx.stack.restore(snapshot);

    execute_quotation(ctx, if result { &t } else { &f })
}

/// B T F branch: non-probing — pop the condition and run the chosen branch
/// directly on the real stack.
fn branch(ctx: &mut Context) -> JoyResult<()> {
    let f = ctx.stack.pop_aggregate("branch")?;
    let t = ctx.stack.pop_aggregate("branch")?;
    let b = ctx.stack.pop_boolean("branch")?;
    execute_quotation(ctx, if b { &t } else { &f })
}

/// N Q times: run Q exactly max(N, 0) times.
fn times(ctx: &mut Context) -> JoyResult<()> {
    let body = ctx.stack.pop_aggregate("times")?;
    let n = ctx.stack.pop_integer("times")?;
    for _ in 0..n.max(0) {
        execute_quotation(ctx, &body)?;
    }
    Ok(())
}

/// C B while: repeatedly snapshot-test C; if truthy, run B on the real
/// stack and loop, otherwise stop (the snapshot is restored even on the
/// iteration that breaks).
fn while_(ctx: &mut Context) -> JoyResult<()> {
    let body = ctx.stack.pop_aggregate("while")?;
    let cond = ctx.stack.pop_aggregate("while")?;
    loop {
        let snapshot = ctx.stack.snapshot();
        execute_quotation(ctx, &cond)?;
        let keep_going = ctx.stack.pop("while")?.truthy();
        ctx.stack.restore(snapshot);
        if !keep_going {
            break;
        }
        execute_quotation(ctx, &body)?;
    }
    Ok(())
}

fn map(ctx: &mut Context) -> JoyResult<()> {
    let body = ctx.stack.pop_aggregate("map")?;
    let agg = ctx.stack.pop("map")?;
    let items = agg
        .as_elements()
        .ok_or_else(|| JoyError::type_mismatch("map", "list or quotation", agg.kind()))?
        .to_vec();

    let mut results = Vec::with_capacity(items.len());
    for item in items {
        ctx.stack.push(item);
        execute_quotation(ctx, &body)?;
        results.push(ctx.stack.pop("map")?);
    }
    ctx.stack.push(match agg {
        Value::Quotation(_) => Value::Quotation(results),
        _ => Value::List(results),
    });
    Ok(())
}

fn step(ctx: &mut Context) -> JoyResult<()> {
    let body = ctx.stack.pop_aggregate("step")?;
    let items = ctx.stack.pop_aggregate("step")?;
    for item in items {
        ctx.stack.push(item);
        execute_quotation(ctx, &body)?;
    }
    Ok(())
}

fn filter(ctx: &mut Context) -> JoyResult<()> {
    let body = ctx.stack.pop_aggregate("filter")?;
    let agg = ctx.stack.pop("filter")?;
    let items = agg
        .as_elements()
        .ok_or_else(|| JoyError::type_mismatch("filter", "list or quotation", agg.kind()))?
        .to_vec();

    let mut kept = Vec::new();
    for item in items {
        ctx.stack.push(item.clone());
        execute_quotation(ctx, &body)?;
        if ctx.stack.pop("filter")?.truthy() {
            kept.push(item);
        }
    }
    ctx.stack.push(match agg {
        Value::Quotation(_) => Value::Quotation(kept),
        _ => Value::List(kept),
    });
    Ok(())
}

/// A I Q fold: seed the stack with I once, then run Q once per element of
/// A, each time pushing the next element first. Q is responsible for
/// consuming [accumulator, element] and leaving the next accumulator; the
/// primitive itself never re-pushes an intermediate result.
fn fold(ctx: &mut Context) -> JoyResult<()> {
    let body = ctx.stack.pop_aggregate("fold")?;
    let init = ctx.stack.pop("fold")?;
    let items = ctx.stack.pop_aggregate("fold")?;

    ctx.stack.push(init);
    for item in items {
        ctx.stack.push(item);
        execute_quotation(ctx, &body)?;
    }
    Ok(())
}

fn split(ctx: &mut Context) -> JoyResult<()> {
    let body = ctx.stack.pop_aggregate("split")?;
    let agg = ctx.stack.pop("split")?;
    let items = agg
        .as_elements()
        .ok_or_else(|| JoyError::type_mismatch("split", "list or quotation", agg.kind()))?
        .to_vec();

    let mut pass = Vec::new();
    let mut fail = Vec::new();
    for item in items {
        ctx.stack.push(item.clone());
        execute_quotation(ctx, &body)?;
        if ctx.stack.pop("split")?.truthy() {
            pass.push(item);
        } else {
            fail.push(item);
        }
    }
    let wrap = |items| match agg {
        Value::Quotation(_) => Value::Quotation(items),
        _ => Value::List(items),
    };
    ctx.stack.push(wrap(pass));
    ctx.stack.push(wrap(fail));
    Ok(())
}

fn some(ctx: &mut Context) -> JoyResult<()> {
    let body = ctx.stack.pop_aggregate("some")?;
    let items = ctx.stack.pop_aggregate("some")?;
    let mut found = false;
    for item in items {
        ctx.stack.push(item);
        execute_quotation(ctx, &body)?;
        if ctx.stack.pop("some")?.truthy() {
            found = true;
            break;
        }
    }
    ctx.stack.push(Value::Boolean(found));
    Ok(())
}

fn all(ctx: &mut Context) -> JoyResult<()> {
    let body = ctx.stack.pop_aggregate("all")?;
    let items = ctx.stack.pop_aggregate("all")?;
    let mut every = true;
    for item in items {
        ctx.stack.push(item);
        execute_quotation(ctx, &body)?;
        if !ctx.stack.pop("all")?.truthy() {
            every = false;
            break;
        }
    }
    ctx.stack.push(Value::Boolean(every));
    Ok(())
}

/// [[B1 body…] … [default]] cond: scan clauses in order. The last clause
/// is always the unconditional default body. A clause with zero terms is
/// skipped without being tested. An empty clause *list* leaves the stack
/// untouched — the whole call is a silent no-op.
fn cond(ctx: &mut Context) -> JoyResult<()> {
    let clauses = ctx.stack.pop_aggregate("cond")?;
    if clauses.is_empty() {
        return Ok(());
    }

    let snapshot = ctx.stack.snapshot();
    let last = clauses.len() - 1;

    for (idx, clause) in clauses.iter().enumerate() {
        let terms = match clause.as_elements() {
            Some(terms) => terms,
            None => continue,
        };

        if idx == last {
            ctx.stack.restore(snapshot.clone());
            return execute_quotation(ctx, terms);
        }

        if terms.is_empty() {
            continue;
        }

        let (test, body) = terms.split_first().unwrap();
        let test_items = match test.as_elements() {
            Some(items) => items.to_vec(),
            None => vec![test.clone()],
        };

        ctx.stack.restore(snapshot.clone());
        execute_quotation(ctx, &test_items)?;
        let matched = ctx.stack.pop("cond")?.truthy();
        if matched {
            ctx.stack.restore(snapshot);
            return execute_quotation(ctx, body);
        }
    }

    ctx.stack.restore(snapshot);
    Ok(())
}

/// L P infra: replace the stack's contents with L's elements (in order,
/// so L's last element ends up on top), run P, then collect the resulting
/// stack's contents — bottom to top — into a list and restore the outer
/// stack with that list pushed on top.
fn infra(ctx: &mut Context) -> JoyResult<()> {
    let body = ctx.stack.pop_aggregate("infra")?;
    let substituted = ctx.stack.pop_aggregate("infra")?;

    let outer = ctx.stack.snapshot();
    ctx.stack.set_contents(substituted);
    execute_quotation(ctx, &body)?;
    let collected = ctx.stack.as_slice().to_vec();

    ctx.stack.restore(outer);
    ctx.stack.push(Value::List(collected));
    Ok(())
}

/// Arity wrappers: snapshot, clear the stack down to exactly the stated
/// argument count so Q cannot see anything beneath them, run Q, then
/// restore everything below the result(s) Q actually produced.
fn arity_wrapper(ctx: &mut Context, op: &'static str, arity: usize, results: usize) -> JoyResult<()> {
    let body = ctx.stack.pop_aggregate(op)?;
    ctx.stack.require(op, arity)?;
    let snapshot = ctx.stack.snapshot();

    let mut args = Vec::with_capacity(arity);
    for _ in 0..arity {
        args.push(ctx.stack.pop(op)?);
    }
    args.reverse();
    ctx.stack.clear();
    for arg in args {
        ctx.stack.push(arg);
    }

    execute_quotation(ctx, &body)?;
    ctx.stack.require(op, results)?;
    let mut produced = Vec::with_capacity(results);
    for _ in 0..results {
        produced.push(ctx.stack.pop(op)?);
    }
    produced.reverse();
    ctx.stack.restore(snapshot);
    for _ in 0..arity {
        ctx.stack.pop(op)?;
    }
    for v in produced {
        ctx.stack.push(v);
    }
    Ok(())
}

fn nullary(ctx: &mut Context) -> JoyResult<()> {
    arity_wrapper(ctx, "nullary", 0, 1)
}

fn unary(ctx: &mut Context) -> JoyResult<()> {
    arity_wrapper(ctx, "unary", 1, 1)
}

fn binary(ctx: &mut Context) -> JoyResult<()> {
    arity_wrapper(ctx, "binary", 2, 1)
}

fn ternary(ctx: &mut Context) -> JoyResult<()> {
    arity_wrapper(ctx, "ternary", 3, 1)
}

/// Apply Q separately to each of the top N values, each run isolated to a
/// single-element stack so Q can't see the other arguments or whatever
/// lies beneath them, preserving every individual result (unlike `unary`,
/// which keeps only one).
fn unary_n(ctx: &mut Context, op: &'static str, n: usize) -> JoyResult<()> {
    let body = ctx.stack.pop_aggregate(op)?;
    ctx.stack.require(op, n)?;
    let mut args = Vec::with_capacity(n);
    for _ in 0..n {
        args.push(ctx.stack.pop(op)?);
    }
    args.reverse();

    let outer = ctx.stack.snapshot();
    let mut results = Vec::with_capacity(n);
    for arg in args {
        ctx.stack.clear();
        ctx.stack.push(arg);
        execute_quotation(ctx, &body)?;
        ctx.stack.require(op, 1)?;
        results.push(ctx.stack.pop(op)?);
    }
    ctx.stack.restore(outer);
    for v in results {
        ctx.stack.push(v);
    }
    Ok(())
}

fn unary2(ctx: &mut Context) -> JoyResult<()> {
    unary_n(ctx, "unary2", 2)
}

fn unary3(ctx: &mut Context) -> JoyResult<()> {
    unary_n(ctx, "unary3", 3)
}

fn unary4(ctx: &mut Context) -> JoyResult<()> {
    unary_n(ctx, "unary4", 4)
}

/// appN: run N separate quotations, each against a fresh snapshot of the
/// same starting stack, collecting each one's single top result.
fn app_n(ctx: &mut Context, op: &'static str, n: usize) -> JoyResult<()> {
    let mut bodies = Vec::with_capacity(n);
    for _ in 0..n {
        bodies.push(ctx.stack.pop_aggregate(op)?);
    }
    bodies.reverse();

    let base = ctx.stack.snapshot();
    let mut results = Vec::with_capacity(n);
    for body in &bodies {
        ctx.stack.restore(base.clone());
        execute_quotation(ctx, body)?;
        results.push(ctx.stack.pop(op)?);
    }
    ctx.stack.restore(base);
    for v in results {
        ctx.stack.push(v);
    }
    Ok(())
}

fn app1(ctx: &mut Context) -> JoyResult<()> {
    app_n(ctx, "app1", 1)
}

fn app2(ctx: &mut Context) -> JoyResult<()> {
    app_n(ctx, "app2", 2)
}

fn app3(ctx: &mut Context) -> JoyResult<()> {
    app_n(ctx, "app3", 3)
}

fn app4(ctx: &mut Context) -> JoyResult<()> {
    app_n(ctx, "app4", 4)
}

/// app11: two quotations, each consuming its own single argument
/// (X [P] Y [Q] app11 → P(X) Q(Y)).
fn app11(ctx: &mut Context) -> JoyResult<()> {
    let q = ctx.stack.pop_aggregate("app11")?;
    let y = ctx.stack.pop("app11")?;
    let p = ctx.stack.pop_aggregate("app11")?;
    let x = ctx.stack.pop("app11")?;

    ctx.stack.push(x);
    execute_quotation(ctx, &p)?;
    let px = ctx.stack.pop("app11")?;

    ctx.stack.push(y);
    execute_quotation(ctx, &q)?;
    let qy = ctx.stack.pop("app11")?;

    ctx.stack.push(px);
    ctx.stack.push(qy);
    Ok(())
}

/// app12: one argument fed to two quotations (X [P] [Q] app12 → P(X) Q(X)).
fn app12(ctx: &mut Context) -> JoyResult<()> {
    let q = ctx.stack.pop_aggregate("app12")?;
    let p = ctx.stack.pop_aggregate("app12")?;
    let x = ctx.stack.pop("app12")?;

    ctx.stack.push(x.clone());
    execute_quotation(ctx, &p)?;
    let px = ctx.stack.pop("app12")?;

    ctx.stack.push(x);
    execute_quotation(ctx, &q)?;
    let qx = ctx.stack.pop("app12")?;

    ctx.stack.push(px);
    ctx.stack.push(qx);
    Ok(())
}

/// cleave: X [P1]..[Pn] cleave → P1(X) .. Pn(X), same idea as app12
/// generalized to a list of quotations.
fn cleave(ctx: &mut Context) -> JoyResult<()> {
    let bodies = ctx.stack.pop_aggregate("cleave")?;
    let x = ctx.stack.pop("cleave")?;

    let mut results = Vec::with_capacity(bodies.len());
    for body in &bodies {
        let terms = body
            .as_elements()
            .ok_or_else(|| JoyError::type_mismatch("cleave", "quotation", body.kind()))?
            .to_vec();
        ctx.stack.push(x.clone());
        execute_quotation(ctx, &terms)?;
        results.push(ctx.stack.pop("cleave")?);
    }
    for v in results {
        ctx.stack.push(v);
    }
    Ok(())
}

/// construct [P] [[Q1]…[Qn]]: run P, snapshot the post-P stack, then run
/// each Qi independently against that same snapshot and collect their top
/// results.
fn construct(ctx: &mut Context) -> JoyResult<()> {
    let quots = ctx.stack.pop_aggregate("construct")?;
    let p = ctx.stack.pop_aggregate("construct")?;

    execute_quotation(ctx, &p)?;
    let base = ctx.stack.snapshot();

    let mut results = Vec::with_capacity(quots.len());
    for q in &quots {
        let terms = q
            .as_elements()
            .ok_or_else(|| JoyError::type_mismatch("construct", "quotation", q.kind()))?
            .to_vec();
        ctx.stack.restore(base.clone());
        execute_quotation(ctx, &terms)?;
        results.push(ctx.stack.pop("construct")?);
    }
    ctx.stack.restore(base);
    for v in results {
        ctx.stack.push(v);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::JoySymbol;

    fn sym(name: &str) -> Value {
        Value::Symbol(JoySymbol::new(name))
    }

    #[test]
    fn i_runs_inline() {
        let mut ctx = Context::new();
        ctx.stack.push(Value::Integer(2));
        ctx.stack.push(Value::Quotation(vec![Value::Integer(3), sym("+")]));
        i(&mut ctx).unwrap();
        assert_eq!(*ctx.stack.peek("test").unwrap(), Value::Integer(5));
    }

    #[test]
    fn dip_hides_then_restores_x() {
        let mut ctx = Context::new();
        ctx.stack.push(Value::Integer(10));
        ctx.stack.push(Value::Integer(2));
        ctx.stack.push(Value::Quotation(vec![Value::Integer(3), sym("+")]));
        dip(&mut ctx).unwrap();
        assert_eq!(ctx.stack.to_list_top_to_bottom(), vec![
            Value::Integer(10),
            Value::Integer(5),
        ]);
    }

    #[test]
    fn ifte_restores_stack_before_branch() {
        let mut ctx = Context::new();
        ctx.stack.push(Value::Integer(1));
        ctx.stack.push(Value::Quotation(vec![Value::Boolean(true)]));
        ctx.stack.push(Value::Quotation(vec![Value::Integer(10)]));
        ctx.stack.push(Value::Quotation(vec![Value::Integer(20)]));
        ifte(&mut ctx).unwrap();
        assert_eq!(
            ctx.stack.to_list_top_to_bottom(),
            vec![Value::Integer(10), Value::Integer(1)]
        );
    }

    #[test]
    fn map_applies_to_every_element() {
        let mut ctx = Context::new();
        ctx.stack.push(Value::List(vec![
            Value::Integer(1),
            Value::Integer(2),
            Value::Integer(3),
        ]));
        ctx.stack
            .push(Value::Quotation(vec![Value::Integer(2), sym("*")]));
        map(&mut ctx).unwrap();
        assert_eq!(
            *ctx.stack.peek("test").unwrap(),
            Value::List(vec![Value::Integer(2), Value::Integer(4), Value::Integer(6)])
        );
    }

    #[test]
    fn fold_threads_accumulator_through_real_stack() {
        let mut ctx = Context::new();
        ctx.stack.push(Value::List(vec![
            Value::Integer(1),
            Value::Integer(2),
            Value::Integer(3),
            Value::Integer(4),
            Value::Integer(5),
        ]));
        ctx.stack.push(Value::Integer(0));
        ctx.stack.push(Value::Quotation(vec![sym("+")]));
        fold(&mut ctx).unwrap();
        assert_eq!(*ctx.stack.peek("test").unwrap(), Value::Integer(15));
    }

    #[test]
    fn cond_empty_clause_list_is_noop() {
        let mut ctx = Context::new();
        ctx.stack.push(Value::Integer(7));
        ctx.stack.push(Value::List(vec![]));
        cond(&mut ctx).unwrap();
        assert_eq!(ctx.stack.depth(), 1);
        assert_eq!(*ctx.stack.peek("test").unwrap(), Value::Integer(7));
    }

    #[test]
    fn cond_skips_empty_clause_and_falls_to_default() {
        let mut ctx = Context::new();
        let empty_clause = Value::List(vec![]);
        let default = Value::List(vec![Value::Integer(99)]);
        ctx.stack
            .push(Value::List(vec![empty_clause, default]));
        cond(&mut ctx).unwrap();
        assert_eq!(*ctx.stack.peek("test").unwrap(), Value::Integer(99));
    }

    #[test]
    fn infra_substitutes_and_collects_stack() {
        let mut ctx = Context::new();
        ctx.stack.push(Value::Integer(100));
        ctx.stack.push(Value::List(vec![Value::Integer(1), Value::Integer(2)]));
        ctx.stack
            .push(Value::Quotation(vec![Value::Integer(3), sym("+")]));
        infra(&mut ctx).unwrap();
        // outer 100 restored, with the collected-result list on top
        assert_eq!(
            ctx.stack.to_list_top_to_bottom(),
            vec![
                Value::List(vec![Value::Integer(1), Value::Integer(5)]),
                Value::Integer(100)
            ]
        );
    }

    #[test]
    fn cleave_applies_each_quotation_to_same_value() {
        let mut ctx = Context::new();
        ctx.stack.push(Value::Integer(4));
        ctx.stack.push(Value::List(vec![
            Value::Quotation(vec![Value::Integer(1), sym("+")]),
            Value::Quotation(vec![Value::Integer(2), sym("*")]),
        ]));
        cleave(&mut ctx).unwrap();
        assert_eq!(
            ctx.stack.to_list_top_to_bottom(),
            vec![Value::Integer(8), Value::Integer(5)]
        );
    }

    #[test]
    fn unary_isolates_q_from_the_stack_beneath() {
        // [100, 5] [pop] unary must run `pop` against a stack holding only
        // the one declared argument (5), not the live 100 beneath it.
        let mut ctx = Context::new();
        ctx.stack.push(Value::Integer(100));
        ctx.stack.push(Value::Integer(5));
        ctx.stack.push(Value::Quotation(vec![sym("pop")]));
        assert!(unary(&mut ctx).is_err());
    }

    #[test]
    fn unary_runs_q_over_isolated_argument() {
        let mut ctx = Context::new();
        ctx.stack.push(Value::Integer(100));
        ctx.stack.push(Value::Integer(5));
        ctx.stack
            .push(Value::Quotation(vec![Value::Integer(1), sym("+")]));
        unary(&mut ctx).unwrap();
        assert_eq!(
            ctx.stack.to_list_top_to_bottom(),
            vec![Value::Integer(6), Value::Integer(100)]
        );
    }

    #[test]
    fn binary_isolates_q_from_the_stack_beneath() {
        let mut ctx = Context::new();
        ctx.stack.push(Value::Integer(100));
        ctx.stack.push(Value::Integer(2));
        ctx.stack.push(Value::Integer(3));
        ctx.stack.push(Value::Quotation(vec![sym("+")]));
        binary(&mut ctx).unwrap();
        assert_eq!(
            ctx.stack.to_list_top_to_bottom(),
            vec![Value::Integer(5), Value::Integer(100)]
        );
    }

    #[test]
    fn unary2_isolates_each_run_to_a_single_argument() {
        // [100, 5, 6] [pop] unary2 must run `pop` against a one-element
        // stack for each of 5 and 6, not a stack still carrying 100 or the
        // other argument.
        let mut ctx = Context::new();
        ctx.stack.push(Value::Integer(100));
        ctx.stack.push(Value::Integer(5));
        ctx.stack.push(Value::Integer(6));
        ctx.stack.push(Value::Quotation(vec![sym("pop")]));
        assert!(unary2(&mut ctx).is_err());
    }

    #[test]
    fn unary2_preserves_per_argument_results_and_outer_stack() {
        let mut ctx = Context::new();
        ctx.stack.push(Value::Integer(100));
        ctx.stack.push(Value::Integer(5));
        ctx.stack.push(Value::Integer(6));
        ctx.stack
            .push(Value::Quotation(vec![Value::Integer(1), sym("+")]));
        unary2(&mut ctx).unwrap();
        assert_eq!(
            ctx.stack.to_list_top_to_bottom(),
            vec![Value::Integer(7), Value::Integer(6), Value::Integer(100)]
        );
    }

    #[test]
    fn app1_runs_a_single_quotation_against_the_base_stack() {
        let mut ctx = Context::new();
        ctx.stack.push(Value::Integer(4));
        ctx.stack
            .push(Value::Quotation(vec![Value::Integer(1), sym("+")]));
        app1(&mut ctx).unwrap();
        assert_eq!(
            ctx.stack.to_list_top_to_bottom(),
            vec![Value::Integer(5), Value::Integer(4)]
        );
    }

    #[test]
    fn app2_runs_both_quotations_against_the_same_base_stack() {
        let mut ctx = Context::new();
        ctx.stack.push(Value::Integer(4));
        ctx.stack
            .push(Value::Quotation(vec![Value::Integer(1), sym("+")]));
        ctx.stack
            .push(Value::Quotation(vec![Value::Integer(2), sym("*")]));
        app2(&mut ctx).unwrap();
        assert_eq!(
            ctx.stack.to_list_top_to_bottom(),
            vec![Value::Integer(8), Value::Integer(5), Value::Integer(4)]
        );
    }

    #[test]
    fn app11_feeds_each_quotation_its_own_argument() {
        let mut ctx = Context::new();
        ctx.stack.push(Value::Integer(4));
        ctx.stack
            .push(Value::Quotation(vec![Value::Integer(1), sym("+")]));
        ctx.stack.push(Value::Integer(10));
        ctx.stack
            .push(Value::Quotation(vec![Value::Integer(2), sym("*")]));
        app11(&mut ctx).unwrap();
        assert_eq!(
            ctx.stack.to_list_top_to_bottom(),
            vec![Value::Integer(20), Value::Integer(5)]
        );
    }

    #[test]
    fn app12_feeds_one_argument_to_both_quotations() {
        let mut ctx = Context::new();
        ctx.stack.push(Value::Integer(4));
        ctx.stack
            .push(Value::Quotation(vec![Value::Integer(1), sym("+")]));
        ctx.stack
            .push(Value::Quotation(vec![Value::Integer(2), sym("*")]));
        app12(&mut ctx).unwrap();
        assert_eq!(
            ctx.stack.to_list_top_to_bottom(),
            vec![Value::Integer(8), Value::Integer(5)]
        );
    }

    #[test]
    fn construct_runs_each_quotation_against_the_post_p_stack() {
        let mut ctx = Context::new();
        ctx.stack.push(Value::Quotation(vec![Value::Integer(4)]));
        ctx.stack.push(Value::List(vec![
            Value::Quotation(vec![Value::Integer(1), sym("+")]),
            Value::Quotation(vec![Value::Integer(2), sym("*")]),
        ]));
        construct(&mut ctx).unwrap();
        assert_eq!(
            ctx.stack.to_list_top_to_bottom(),
            vec![Value::Integer(8), Value::Integer(5), Value::Integer(4)]
        );
    }
}
