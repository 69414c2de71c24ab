//! Recursion schemes. Each of these calls back into itself (as an ordinary
//! Rust function, not through the dictionary) to drive the recursive
//! structure; `tailrec` is the one exception, implemented as a native
//! `loop` so it costs O(1) Rust stack regardless of how many Joy-level
//! iterations it performs.

use crate::context::Context;
use crate::dictionary::Dictionary;
use crate::engine::execute_quotation;
use crate::error::{JoyError, JoyResult};
use crate::value::{JoySymbol, Value};

pub fn register(dict: &mut Dictionary) {
    dict.define_primitive("linrec", linrec);
    dict.define_primitive("binrec", binrec);
    dict.define_primitive("tailrec", tailrec);
    dict.define_primitive("primrec", primrec);
    dict.define_primitive("genrec", genrec);
    dict.define_primitive("condlinrec", condlinrec);
    dict.define_primitive("condnestrec", condnestrec);
    dict.define_primitive("treestep", treestep);
    dict.define_primitive("treerec", treerec);
    dict.define_primitive("treegenrec", treegenrec);
}

fn test_predicate(ctx: &mut Context, op: &'static str, p: &[Value]) -> JoyResult<bool> {
    let snapshot = ctx.stack.snapshot();
    execute_quotation(ctx, p)?;
    let result = ctx.stack.pop(op)?.truthy();
    ctx.stack.restore(snapshot);
    Ok(result)
}

/// P T R1 R2 linrec: if P then T else (R1; recurse; R2).
fn linrec(ctx: &mut Context) -> JoyResult<()> {
    let r2 = ctx.stack.pop_aggregate("linrec")?;
    let r1 = ctx.stack.pop_aggregate("linrec")?;
    let t = ctx.stack.pop_aggregate("linrec")?;
    let p = ctx.stack.pop_aggregate("linrec")?;
    linrec_aux(ctx, &p, &t, &r1, &r2)
}

fn linrec_aux(
    ctx: &mut Context,
    p: &[Value],
    t: &[Value],
    r1: &[Value],
    r2: &[Value],
) -> JoyResult<()> {
    if test_predicate(ctx, "linrec", p)? {
        return execute_quotation(ctx, t);
    }
    execute_quotation(ctx, r1)?;
    linrec_aux(ctx, p, t, r1, r2)?;
    execute_quotation(ctx, r2)
}

/// P T R1 R2 binrec: if P then T else (R1 splits into two values; recurse
/// on each; R2 combines). R1 is expected to leave exactly two values on
/// the stack — the two subproblems — with the second subproblem on top.
fn binrec(ctx: &mut Context) -> JoyResult<()> {
    let r2 = ctx.stack.pop_aggregate("binrec")?;
    let r1 = ctx.stack.pop_aggregate("binrec")?;
    let t = ctx.stack.pop_aggregate("binrec")?;
    let p = ctx.stack.pop_aggregate("binrec")?;
    binrec_aux(ctx, &p, &t, &r1, &r2)
}

fn binrec_aux(
    ctx: &mut Context,
    p: &[Value],
    t: &[Value],
    r1: &[Value],
    r2: &[Value],
) -> JoyResult<()> {
    if test_predicate(ctx, "binrec", p)? {
        return execute_quotation(ctx, t);
    }
    execute_quotation(ctx, r1)?;
    let first_arg = ctx.stack.pop("binrec")?;
    binrec_aux(ctx, p, t, r1, r2)?;
    let first_result = ctx.stack.pop("binrec")?;
    ctx.stack.push(first_arg);
    binrec_aux(ctx, p, t, r1, r2)?;
    ctx.stack.push(first_result);
    execute_quotation(ctx, r2)
}

/// P T R1 tailrec: an actual iterative loop, not real recursion — the
/// predicate is re-tested (snapshot/restore) every pass.
fn tailrec(ctx: &mut Context) -> JoyResult<()> {
    let r1 = ctx.stack.pop_aggregate("tailrec")?;
    let t = ctx.stack.pop_aggregate("tailrec")?;
    let p = ctx.stack.pop_aggregate("tailrec")?;
    loop {
        if test_predicate(ctx, "tailrec", &p)? {
            return execute_quotation(ctx, &t);
        }
        execute_quotation(ctx, &r1)?;
    }
}

/// X I C primrec: run I once to seed, then run C once per "member" of X —
/// 1..=X for an integer, elements for a list, bytes (as Char) for a
/// string — pushing the member before each run of C.
fn primrec(ctx: &mut Context) -> JoyResult<()> {
    let c = ctx.stack.pop_aggregate("primrec")?;
    let i = ctx.stack.pop_aggregate("primrec")?;
    let x = ctx.stack.pop("primrec")?;

    execute_quotation(ctx, &i)?;

    match x {
        Value::Integer(n) => {
            for j in 1..=n {
                ctx.stack.push(Value::Integer(j));
                execute_quotation(ctx, &c)?;
            }
        }
        Value::List(items) | Value::Quotation(items) => {
            for item in items {
                ctx.stack.push(item);
                execute_quotation(ctx, &c)?;
            }
        }
        Value::String(s) => {
            for byte in s.0 {
                ctx.stack.push(Value::Char(byte));
                execute_quotation(ctx, &c)?;
            }
        }
        other => return Err(JoyError::type_mismatch("primrec", "integer, list, or string", other.kind())),
    }
    Ok(())
}

/// P T R1 R2 genrec: if P then T; else run R1, then construct (as an
/// ordinary *data* value, not executed) a quotation equal to
/// `[P T R1 R2 genrec]` and push it, then run R2 — R2 decides whether and
/// when to `i` that self-referential continuation, which is how this
/// scheme supports non-tail recursion through data instead of a native
/// recursive call.
fn genrec(ctx: &mut Context) -> JoyResult<()> {
    let r2 = ctx.stack.pop_aggregate("genrec")?;
    let r1 = ctx.stack.pop_aggregate("genrec")?;
    let t = ctx.stack.pop_aggregate("genrec")?;
    let p = ctx.stack.pop_aggregate("genrec")?;

    if test_predicate(ctx, "genrec", &p)? {
        return execute_quotation(ctx, &t);
    }

    execute_quotation(ctx, &r1)?;

    let continuation = vec![
        Value::Quotation(p),
        Value::Quotation(t),
        Value::Quotation(r1),
        Value::Quotation(r2.clone()),
        Value::Symbol(JoySymbol::new("genrec")),
    ];
    ctx.stack.push(Value::Quotation(continuation));

    execute_quotation(ctx, &r2)
}

/// [[B1 P1a P1b…] … [Pdefault]] condlinrec: cond-shaped linear recursion.
/// Each non-last clause is a test followed by one or more body parts; the
/// first part runs directly, and every subsequent part is preceded by a
/// recursive call over the whole clause list (the same "R1; recurse; R2"
/// shape as `linrec`, generalized to N parts and guarded by a `cond` test
/// instead of a single predicate).
fn condlinrec(ctx: &mut Context) -> JoyResult<()> {
    let clauses = ctx.stack.pop_aggregate("condlinrec")?;
    condlinrec_aux(ctx, &clauses)
}

fn condlinrec_aux(ctx: &mut Context, clauses: &[Value]) -> JoyResult<()> {
    if clauses.is_empty() {
        return Ok(());
    }
    let snapshot = ctx.stack.snapshot();
    let last = clauses.len() - 1;

    for (idx, clause) in clauses.iter().enumerate() {
        let terms = match clause.as_elements() {
            Some(t) => t,
            None => continue,
        };

        // The default (last) clause has no test to consume — its whole
        // term list is parts, run through the same first-part/recurse
        // loop as a matched clause.
        if idx == last {
            ctx.stack.restore(snapshot);
            return run_clause_parts(ctx, clauses, terms);
        }
        // A non-last clause needs at least a test and one body part.
        if terms.len() < 2 {
            continue;
        }

        let (test, parts) = terms.split_first().unwrap();
        let test_items = test.as_elements().map(|s| s.to_vec()).unwrap_or_else(|| vec![test.clone()]);

        ctx.stack.restore(snapshot.clone());
        execute_quotation(ctx, &test_items)?;
        let matched = ctx.stack.pop("condlinrec")?.truthy();
        if !matched {
            continue;
        }

        ctx.stack.restore(snapshot);
        return run_clause_parts(ctx, clauses, parts);
    }

    ctx.stack.restore(snapshot);
    Ok(())
}

/// Run a clause's body parts: the first part runs directly, and every
/// subsequent part is preceded by a recursive call over the whole clause
/// list — the same path a matched clause's parts and the default clause's
/// (test-free) parts both go through.
fn run_clause_parts(ctx: &mut Context, clauses: &[Value], parts: &[Value]) -> JoyResult<()> {
    if parts.is_empty() {
        return Ok(());
    }
    execute_value_or_quotation(ctx, &parts[0])?;
    for part in &parts[1..] {
        condlinrec_aux(ctx, clauses)?;
        execute_value_or_quotation(ctx, part)?;
    }
    Ok(())
}

/// condnestrec has the identical clause shape and scan order as
/// `condlinrec`; the distinction that gives it its name is that nested
/// (non-tail) recursive structure is expected in how its clause bodies are
/// authored, not in a different traversal algorithm — so it shares the
/// same engine-level walk.
fn condnestrec(ctx: &mut Context) -> JoyResult<()> {
    let clauses = ctx.stack.pop_aggregate("condnestrec")?;
    condlinrec_aux(ctx, &clauses)
}

fn execute_value_or_quotation(ctx: &mut Context, term: &Value) -> JoyResult<()> {
    match term.as_elements() {
        Some(items) => execute_quotation(ctx, &items.to_vec()),
        None => crate::engine::execute_value(ctx, term),
    }
}

/// Tree [Q] treestep: visit every leaf of a nested List/Quotation in order,
/// running Q with the leaf pushed.
fn treestep(ctx: &mut Context) -> JoyResult<()> {
    let body = ctx.stack.pop_aggregate("treestep")?;
    let tree = ctx.stack.pop("treestep")?;
    treestep_aux(ctx, &tree, &body)
}

fn treestep_aux(ctx: &mut Context, tree: &Value, body: &[Value]) -> JoyResult<()> {
    if tree.is_leaf() {
        ctx.stack.push(tree.clone());
        return execute_quotation(ctx, body);
    }
    for child in tree.as_elements().unwrap() {
        treestep_aux(ctx, child, body)?;
    }
    Ok(())
}

/// Tree [O] [C] treerec: map every leaf through O, then combine each
/// branch's mapped children into one value through C (C receives the
/// list of that branch's combined children and must leave one value).
fn treerec(ctx: &mut Context) -> JoyResult<()> {
    let c = ctx.stack.pop_aggregate("treerec")?;
    let o = ctx.stack.pop_aggregate("treerec")?;
    let tree = ctx.stack.pop("treerec")?;
    let result = treerec_aux(ctx, &tree, &o, &c)?;
    ctx.stack.push(result);
    Ok(())
}

fn treerec_aux(ctx: &mut Context, tree: &Value, o: &[Value], c: &[Value]) -> JoyResult<Value> {
    if tree.is_leaf() {
        ctx.stack.push(tree.clone());
        execute_quotation(ctx, o)?;
        return ctx.stack.pop("treerec");
    }
    let mut results = Vec::new();
    for child in tree.as_elements().unwrap() {
        results.push(treerec_aux(ctx, child, o, c)?);
    }
    ctx.stack.push(Value::List(results));
    execute_quotation(ctx, c)?;
    ctx.stack.pop("treerec")
}

/// Tree [O] [B] [C] treegenrec: like `treerec`, but runs B (for effect,
/// pre-order) on every branch node before descending into its children.
fn treegenrec(ctx: &mut Context) -> JoyResult<()> {
    let c = ctx.stack.pop_aggregate("treegenrec")?;
    let b = ctx.stack.pop_aggregate("treegenrec")?;
    let o = ctx.stack.pop_aggregate("treegenrec")?;
    let tree = ctx.stack.pop("treegenrec")?;
    let result = treegenrec_aux(ctx, &tree, &o, &b, &c)?;
    ctx.stack.push(result);
    Ok(())
}

fn treegenrec_aux(
    ctx: &mut Context,
    tree: &Value,
    o: &[Value],
    b: &[Value],
    c: &[Value],
) -> JoyResult<Value> {
    if tree.is_leaf() {
        ctx.stack.push(tree.clone());
        execute_quotation(ctx, o)?;
        return ctx.stack.pop("treegenrec");
    }
    ctx.stack.push(tree.clone());
    execute_quotation(ctx, b)?;
    ctx.stack.pop("treegenrec")?;

    let mut results = Vec::new();
    for child in tree.as_elements().unwrap() {
        results.push(treegenrec_aux(ctx, child, o, b, c)?);
    }
    ctx.stack.push(Value::List(results));
    execute_quotation(ctx, c)?;
    ctx.stack.pop("treegenrec")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::JoySymbol;

    fn sym(name: &str) -> Value {
        Value::Symbol(JoySymbol::new(name))
    }

    #[test]
    fn linrec_computes_factorial() {
        let mut ctx = Context::new();
        ctx.stack.push(Value::Integer(10));
        ctx.stack
            .push(Value::Quotation(vec![Value::Integer(1), sym("<=")]));
        ctx.stack.push(Value::Quotation(vec![Value::Integer(1)]));
        ctx.stack
            .push(Value::Quotation(vec![sym("dup"), Value::Integer(1), sym("-")]));
        ctx.stack.push(Value::Quotation(vec![sym("*")]));
        linrec(&mut ctx).unwrap();
        assert_eq!(*ctx.stack.peek("test").unwrap(), Value::Integer(3628800));
    }

    #[test]
    fn primrec_computes_factorial() {
        let mut ctx = Context::new();
        ctx.stack.push(Value::Integer(5));
        ctx.stack.push(Value::Quotation(vec![Value::Integer(1)]));
        ctx.stack.push(Value::Quotation(vec![sym("*")]));
        primrec(&mut ctx).unwrap();
        assert_eq!(*ctx.stack.peek("test").unwrap(), Value::Integer(120));
    }

    #[test]
    fn tailrec_terminates_without_growing_native_stack() {
        let mut ctx = Context::new();
        ctx.stack.push(Value::Integer(100_000));
        ctx.stack
            .push(Value::Quotation(vec![Value::Integer(0), sym("<=")]));
        ctx.stack.push(Value::Quotation(vec![]));
        ctx.stack
            .push(Value::Quotation(vec![Value::Integer(1), sym("-")]));
        tailrec(&mut ctx).unwrap();
        assert_eq!(*ctx.stack.peek("test").unwrap(), Value::Integer(0));
    }

    #[test]
    fn binrec_computes_fibonacci() {
        // fib == [small] [] [pred dup pred] [+] binrec — the standard
        // two-subproblem (non-tail) binrec idiom: R1 splits n into n-1 and
        // n-2, both get recursed on, R2 adds the two results back together.
        let mut ctx = Context::new();
        ctx.stack.push(Value::Integer(5));
        ctx.stack.push(Value::Quotation(vec![sym("small")]));
        ctx.stack.push(Value::Quotation(vec![]));
        ctx.stack
            .push(Value::Quotation(vec![sym("pred"), sym("dup"), sym("pred")]));
        ctx.stack.push(Value::Quotation(vec![sym("+")]));
        binrec(&mut ctx).unwrap();
        assert_eq!(*ctx.stack.peek("test").unwrap(), Value::Integer(5));
    }

    #[test]
    fn genrec_computes_factorial() {
        // fact == [null] [succ] [dup pred] [i *] genrec — R1 duplicates and
        // decrements n, R2 builds the self-referential continuation and
        // runs it via `i` before multiplying by the n R1 left behind.
        let mut ctx = Context::new();
        ctx.stack.push(Value::Integer(5));
        ctx.stack.push(Value::Quotation(vec![sym("null")]));
        ctx.stack.push(Value::Quotation(vec![sym("succ")]));
        ctx.stack.push(Value::Quotation(vec![sym("dup"), sym("pred")]));
        ctx.stack
            .push(Value::Quotation(vec![sym("i"), sym("*")]));
        genrec(&mut ctx).unwrap();
        assert_eq!(*ctx.stack.peek("test").unwrap(), Value::Integer(120));
    }

    #[test]
    fn condlinrec_runs_multi_part_default_clause_with_recursion_interleaved() {
        // Factorial encoded as condlinrec with a two-part default clause:
        // R1 (dup pred) runs directly, then condlinrec recurses over the
        // same clause list before R2 (*) runs — the same "R1; recurse; R2"
        // shape linrec uses, but reached through the default (test-free)
        // clause instead of a dedicated predicate quotation.
        let mut ctx = Context::new();
        ctx.stack.push(Value::Integer(3));

        let base_clause = Value::List(vec![
            Value::Quotation(vec![sym("dup"), Value::Integer(1), sym("<=")]),
            Value::Quotation(vec![sym("pop"), Value::Integer(1)]),
        ]);
        let default_clause = Value::List(vec![
            Value::Quotation(vec![sym("dup"), sym("pred")]),
            Value::Quotation(vec![sym("*")]),
        ]);
        ctx.stack
            .push(Value::List(vec![base_clause, default_clause]));

        condlinrec(&mut ctx).unwrap();
        assert_eq!(*ctx.stack.peek("test").unwrap(), Value::Integer(6));
    }

    #[test]
    fn condnestrec_shares_condlinrec_clause_interleaving() {
        let mut ctx = Context::new();
        ctx.stack.push(Value::Integer(3));

        let base_clause = Value::List(vec![
            Value::Quotation(vec![sym("dup"), Value::Integer(1), sym("<=")]),
            Value::Quotation(vec![sym("pop"), Value::Integer(1)]),
        ]);
        let default_clause = Value::List(vec![
            Value::Quotation(vec![sym("dup"), sym("pred")]),
            Value::Quotation(vec![sym("*")]),
        ]);
        ctx.stack
            .push(Value::List(vec![base_clause, default_clause]));

        condnestrec(&mut ctx).unwrap();
        assert_eq!(*ctx.stack.peek("test").unwrap(), Value::Integer(6));
    }

    #[test]
    fn treerec_maps_leaves_and_combines_siblings() {
        let mut ctx = Context::new();
        let tree = Value::List(vec![
            Value::Integer(1),
            Value::List(vec![Value::Integer(2), Value::Integer(3)]),
        ]);
        ctx.stack.push(tree);
        ctx.stack
            .push(Value::Quotation(vec![Value::Integer(1), sym("+")]));
        ctx.stack.push(Value::Quotation(vec![
            Value::Integer(0),
            Value::Quotation(vec![sym("+")]),
            sym("fold"),
        ]));
        treerec(&mut ctx).unwrap();
        assert_eq!(*ctx.stack.peek("test").unwrap(), Value::Integer(9));
    }

    #[test]
    fn treegenrec_runs_preorder_branch_op_then_combines_like_treerec() {
        let mut ctx = Context::new();
        let tree = Value::List(vec![
            Value::Integer(1),
            Value::List(vec![Value::Integer(2), Value::Integer(3)]),
        ]);
        ctx.stack.push(tree);
        ctx.stack
            .push(Value::Quotation(vec![Value::Integer(1), sym("+")]));
        ctx.stack.push(Value::Quotation(vec![sym("size")]));
        ctx.stack.push(Value::Quotation(vec![
            Value::Integer(0),
            Value::Quotation(vec![sym("+")]),
            sym("fold"),
        ]));
        treegenrec(&mut ctx).unwrap();
        assert_eq!(*ctx.stack.peek("test").unwrap(), Value::Integer(9));
    }

    #[test]
    fn treestep_visits_every_leaf_in_order() {
        let mut ctx = Context::new();
        let tree = Value::List(vec![
            Value::Integer(1),
            Value::List(vec![Value::Integer(2), Value::Integer(3)]),
            Value::List(vec![Value::Integer(4), Value::List(vec![Value::Integer(5)])]),
        ]);
        ctx.stack.push(tree);
        ctx.stack
            .push(Value::Quotation(vec![Value::Integer(1), sym("+")]));
        treestep(&mut ctx).unwrap();
        assert_eq!(
            ctx.stack.to_list_top_to_bottom(),
            vec![
                Value::Integer(6),
                Value::Integer(5),
                Value::Integer(4),
                Value::Integer(3),
                Value::Integer(2),
            ]
        );
    }
}
