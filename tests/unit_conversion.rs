//! Direct dimensional conversion and formula-mediated mass/mole conversion
//! via the `->` operator, driven through the interpreter.

use chemlang::interpreter::Interpreter;
use chemlang::parser;
use chemlang::scanner::scan;
use chemlang::value::Value;
use std::str::FromStr;

fn quantity(src: &str) -> chemlang::quantity::Quantity {
    let interpreter = Interpreter::new();
    let program = parser::parse(scan(src).unwrap()).unwrap();
    interpreter.run(&program).unwrap();
    match interpreter.globals.get("result") {
        Some(Value::Quantity(q)) => q,
        other => panic!("expected a quantity, got {other:?}"),
    }
}

#[test]
fn direct_conversion_across_si_prefixes() {
    let q = quantity("result = 10.000 km + 20.000 m -> mm\n");
    assert_eq!(q.magnitude.magnitude, rust_decimal::Decimal::from_str("10020000").unwrap());
}

#[test]
fn formula_mediated_mass_and_mole_addition() {
    // 10.00 g H2O (molar mass 18.015 g/mol) plus 1.00 mol H2O converted
    // and added in grams: 10.00 g + 18.015 g == 28.015 g, rounded to the
    // fewer decimal places (2) carried by 10.00.
    let q = quantity("result = 10.00 g H2O + 1.00 mol H2O\n");
    assert_eq!(q.magnitude.decimals, 2);
    assert!(q.formula.is_some());
}

#[test]
fn incompatible_units_without_a_mediating_formula_are_an_error() {
    let interpreter = Interpreter::new();
    let program = parser::parse(scan("result = 10.00 km + 20.00 g\n").unwrap()).unwrap();
    assert!(interpreter.run(&program).is_err());
}

#[test]
fn formula_relabel_requires_an_equal_formula() {
    let interpreter = Interpreter::new();
    let program = parser::parse(scan("result = 2.0 mol H2O -> NaCl\n").unwrap()).unwrap();
    assert!(interpreter.run(&program).is_err());
}

#[test]
fn round_trip_conversion_is_stable() {
    let q = quantity("result = (5.000 kg -> g) -> kg\n");
    assert_eq!(q.magnitude.magnitude, rust_decimal::Decimal::from_str("5.000").unwrap());
}
