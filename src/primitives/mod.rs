//! The closed primitive set. Each submodule owns one operator family and
//! exposes a `register` function that binds its primitives by name into a
//! [`Dictionary`](crate::dictionary::Dictionary); [`register_all`] is the
//! single entry point [`crate::context::Context::with_args`] calls to
//! populate a fresh dictionary.

mod aggregates;
mod arithmetic;
mod combinators;
mod comparison;
mod io;
mod logic;
mod math_fns;
mod predicates;
mod recursion;
mod reflection;
mod stack_ops;
mod system;

use crate::dictionary::Dictionary;

pub fn register_all(dict: &mut Dictionary) {
    stack_ops::register(dict);
    arithmetic::register(dict);
    math_fns::register(dict);
    comparison::register(dict);
    logic::register(dict);
    aggregates::register(dict);
    combinators::register(dict);
    recursion::register(dict);
    predicates::register(dict);
    reflection::register(dict);
    io::register(dict);
    system::register(dict);
}
