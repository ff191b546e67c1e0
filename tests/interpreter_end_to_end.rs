//! Full-language scenarios driving the scanner, parser, and interpreter
//! together end to end.

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

fn quantity(interp: &Interpreter, name: &str) -> chemlang::quantity::Quantity {
    match interp.globals.get(name) {
        Some(Value::Quantity(q)) => q,
        other => panic!("expected a quantity for `{name}`, got {other:?}"),
    }
}

#[test]
fn during_loop_accumulates_a_running_total() {
    let interp = run(
        "total = 0\ni = 0\nduring i < 5\n    total += i\n    i += 1\nresult = total\n",
    );
    let result = quantity(&interp, "result");
    assert_eq!(result.magnitude.magnitude, rust_decimal::Decimal::from(10));
}

#[test]
fn redo_loop_iterates_an_interval() {
    let interp = run("total = 0\nredo i 0...5\n    total += i\nresult = total\n");
    let result = quantity(&interp, "result");
    assert_eq!(result.magnitude.magnitude, rust_decimal::Decimal::from(10));
}

#[test]
fn if_elif_else_selects_the_matching_branch() {
    let interp = run(
        "x = 7\nif x < 5\n    result = 1\nelif x < 10\n    result = 2\nelse\n    result = 3\n",
    );
    let result = quantity(&interp, "result");
    assert_eq!(result.magnitude.magnitude, rust_decimal::Decimal::from(2));
}

#[test]
fn work_function_with_early_give_short_circuits() {
    let interp = run(
        "work classify(n)\n    if n < 0\n        give 0 - 1\n    give 1\na = classify(0 - 3)\nb = classify(3)\n",
    );
    assert_eq!(quantity(&interp, "a").magnitude.magnitude, rust_decimal::Decimal::from(-1));
    assert_eq!(quantity(&interp, "b").magnitude.magnitude, rust_decimal::Decimal::from(1));
}

#[test]
fn builtins_operate_on_dimensionless_scalars() {
    let interp = run("result = sqrt(9)\n");
    assert_eq!(quantity(&interp, "result").magnitude.magnitude, rust_decimal::Decimal::from(3));
}

#[test]
fn builtins_reject_unit_bearing_arguments() {
    let interpreter = Interpreter::new();
    let program = parser::parse(scan("result = sqrt(9 g)\n").unwrap()).unwrap();
    assert!(interpreter.run(&program).is_err());
}

#[test]
fn interpolated_strings_embed_expression_results() {
    let interp = run("name = \"sample\"\nn = 3\nresult = s\"{name} holds {n} mol\"\n");
    match interp.globals.get("result") {
        Some(Value::Str(s)) => assert_eq!(s, "sample holds 3 mol"),
        other => panic!("expected a string, got {other:?}"),
    }
}

#[test]
fn an_unbound_identifier_is_an_error() {
    let interpreter = Interpreter::new();
    let program = parser::parse(scan("result = unknown_name + 1\n").unwrap()).unwrap();
    assert!(interpreter.run(&program).is_err());
}

#[test]
fn reassigning_an_existing_name_mutates_rather_than_shadows() {
    let interp = run("work bump_and_report()\n    x = 1\n    work inner()\n        x = x + 1\n        give x\n    give inner()\nresult = bump_and_report()\n");
    assert_eq!(quantity(&interp, "result").magnitude.magnitude, rust_decimal::Decimal::from(2));
}
