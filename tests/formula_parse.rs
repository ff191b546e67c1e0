//! Chemical formula parsing and molar-mass evaluation.

use chemlang::formula;
use std::str::FromStr;

#[test]
fn parses_a_parenthesized_group_and_computes_molar_mass() {
    let f = formula::parse("Fe(NO3)_{2}").unwrap();
    assert_eq!(f.counts, vec![("Fe".to_string(), 1), ("N".to_string(), 2), ("O".to_string(), 6)]);
    let molar_mass = f.molar_mass().unwrap();
    // Fe (55.845) + 2 N (14.007) + 6 O (15.999) == 179.853
    let expected = rust_decimal::Decimal::from_str("179.853").unwrap();
    assert!((molar_mass - expected).abs() < rust_decimal::Decimal::new(1, 2));
}

#[test]
fn formula_equality_ignores_write_order_and_parenthesization() {
    assert_eq!(formula::parse("H2O").unwrap(), formula::parse("OH2").unwrap());
    assert_eq!(formula::parse("Cu(OH)2").unwrap(), formula::parse("CuO2H2").unwrap());
}

#[test]
fn formula_equality_accounts_for_charge() {
    let ion = formula::parse("H2O^{2+}").unwrap();
    let neutral = formula::parse("H2O").unwrap();
    assert_ne!(ion, neutral);
}

#[test]
fn charges_render_as_unicode_superscripts() {
    let ion = formula::parse("H2O^{2+}").unwrap();
    assert_eq!(ion.to_string(), "H₂O²⁺");
}

#[test]
fn subscripted_counts_render_as_unicode_subscripts() {
    let water = formula::parse("H2O").unwrap();
    assert_eq!(water.to_string(), "H₂O");
}

#[test]
fn unknown_element_symbols_are_rejected() {
    assert!(formula::parse("Xx2").is_err());
}

#[test]
fn unbalanced_parentheses_are_rejected() {
    assert!(formula::parse("Fe(NO3_{2}").is_err());
}
