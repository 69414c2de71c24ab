use joy::{execute_quotation, Context, JoySymbol, Value};

/// A small demonstration program: push 2 and 3, add them, and print the
/// result. Parsing Joy source text is out of scope for this runtime — a
/// program is built directly out of `Value` terms, the same way the test
/// suites across this crate construct quotations.
fn demo_program() -> Vec<Value> {
    vec![
        Value::Integer(2),
        Value::Integer(3),
        Value::Symbol(JoySymbol::new("+")),
        Value::Symbol(JoySymbol::new(".")),
    ]
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut ctx = Context::with_args(args);

    if let Err(e) = execute_quotation(&mut ctx, &demo_program()) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
