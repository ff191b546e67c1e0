//! Significant-figure and decimal-place propagation through CL arithmetic,
//! driven end to end through the interpreter rather than by calling
//! `quantity::ops` directly.

use chemlang::interpreter::Interpreter;
use chemlang::parser;
use chemlang::scanner::scan;
use chemlang::value::Value;

fn run(src: &str) -> Interpreter {
    let interpreter = Interpreter::new();
    let program = parser::parse(scan(src).unwrap()).unwrap();
    interpreter.run(&program).unwrap();
    interpreter
}

fn decimals_of(interp: &Interpreter, name: &str) -> u32 {
    match interp.globals.get(name) {
        Some(Value::Quantity(q)) => q.magnitude.decimals,
        other => panic!("expected a quantity for `{name}`, got {other:?}"),
    }
}

#[test]
fn addition_keeps_the_fewest_decimal_places() {
    // 1.2345 + 1.2 keeps only one decimal place of precision, even though
    // the raw sum (2.4345) carries more digits.
    let interp = run("result = 1.2345 + 1.2\n");
    let result = match interp.globals.get("result") {
        Some(Value::Quantity(q)) => q,
        other => panic!("expected a quantity, got {other:?}"),
    };
    assert_eq!(result.magnitude.decimals, 1);
    assert_eq!(result.magnitude.magnitude, rust_decimal::Decimal::new(24345, 4));
    assert_eq!(result.to_string(), "2.4");
}

#[test]
fn multiplication_keeps_the_fewest_significant_figures() {
    let interp = run("result = 2.0 * 3.24\n");
    let result = match interp.globals.get("result") {
        Some(Value::Quantity(q)) => q,
        other => panic!("expected a quantity, got {other:?}"),
    };
    assert_eq!(result.magnitude.sig_figs, chemlang::decimal::SigFigs::Finite(2));
}

#[test]
fn integer_literals_never_limit_a_product() {
    // `3` has infinite sig figs; the product's precision comes from `1.25`.
    let interp = run("result = 3 * 1.25\n");
    let result = match interp.globals.get("result") {
        Some(Value::Quantity(q)) => q,
        other => panic!("expected a quantity, got {other:?}"),
    };
    assert_eq!(result.magnitude.sig_figs, chemlang::decimal::SigFigs::Finite(3));
}

#[test]
fn chained_addition_propagates_the_tightest_decimal_count() {
    let interp = run("result = 1.2345 + 1.2 + 0.001\n");
    assert_eq!(decimals_of(&interp, "result"), 1);
}

#[test]
fn division_by_zero_aborts_the_statement() {
    let interpreter = Interpreter::new();
    let program = parser::parse(scan("result = 1.0 / 0\n").unwrap()).unwrap();
    assert!(interpreter.run(&program).is_err());
}
