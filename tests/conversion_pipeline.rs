//! The `->` conversion pipeline's reaction-mediated branch: converting a
//! quantity of one reaction species into the equivalent mass of another,
//! scaled by the reaction's balanced coefficient ratio.

use chemlang::conversion::{self, ConversionTarget};
use chemlang::decimal::{Decimal, RawDecimal};
use chemlang::formula;
use chemlang::quantity::Quantity;
use chemlang::reaction::Reaction;
use chemlang::unit::registry;

fn copper_sulfate_reaction() -> Reaction {
    // CuSO4 + 2 NaOH -> Cu(OH)2 + Na2SO4
    Reaction::new(
        vec![formula::parse("CuSO4").unwrap(), formula::parse("NaOH").unwrap()],
        vec![formula::parse("Cu(OH)2").unwrap(), formula::parse("Na2SO4").unwrap()],
    )
}

#[test]
fn converts_sodium_hydroxide_mass_into_copper_sulfate_mass() {
    let mut reaction = copper_sulfate_reaction();
    let g = registry::resolve("g").unwrap();
    // 50.00 g NaOH (molar mass ~40.00 g/mol) is 1.25 mol NaOH, which is
    // 0.625 mol CuSO4 (1:2 ratio) -> ~99.76 g CuSO4.
    let source = Quantity {
        magnitude: Decimal::from_literal("50.00").unwrap(),
        unit: g.clone(),
        formula: Some(formula::parse("NaOH").unwrap()),
        is_bool: false,
    };
    let target = ConversionTarget::UnitOfFormula(g, formula::parse("CuSO4").unwrap());
    let converted = conversion::convert(&source, Some(&mut reaction), &target).unwrap();
    assert!((converted.magnitude.magnitude - RawDecimal::new(9976, 2)).abs() < RawDecimal::new(2, 1));
}

#[test]
fn species_not_present_in_the_reaction_is_rejected() {
    let mut reaction = copper_sulfate_reaction();
    let g = registry::resolve("g").unwrap();
    let source = Quantity {
        magnitude: Decimal::from_literal("10.0").unwrap(),
        unit: g.clone(),
        formula: Some(formula::parse("NaOH").unwrap()),
        is_bool: false,
    };
    let target = ConversionTarget::UnitOfFormula(g, formula::parse("HCl").unwrap());
    assert!(conversion::convert(&source, Some(&mut reaction), &target).is_err());
}

#[test]
fn same_side_species_cannot_convert_into_each_other() {
    let mut reaction = copper_sulfate_reaction();
    let g = registry::resolve("g").unwrap();
    let source = Quantity {
        magnitude: Decimal::from_literal("10.0").unwrap(),
        unit: g.clone(),
        formula: Some(formula::parse("CuSO4").unwrap()),
        is_bool: false,
    };
    // CuSO4 and NaOH are both reactants; there is no product-side target.
    let target = ConversionTarget::UnitOfFormula(g, formula::parse("NaOH").unwrap());
    assert!(conversion::convert(&source, Some(&mut reaction), &target).is_err());
}

#[test]
fn butane_combustion_converts_moles_of_fuel_into_mass_of_carbon_dioxide() {
    // C4H10 + O2 -> CO2 + H2O balances to 2 C4H10 + 13 O2 -> 8 CO2 + 10 H2O,
    // a 1:4 mole ratio of C4H10 to CO2.
    let mut reaction = Reaction::new(
        vec![formula::parse("C4H10").unwrap(), formula::parse("O2").unwrap()],
        vec![formula::parse("CO2").unwrap(), formula::parse("H2O").unwrap()],
    );
    let g = registry::resolve("g").unwrap();
    let source = Quantity {
        magnitude: Decimal::from_literal("16.00").unwrap(),
        unit: registry::resolve("mol").unwrap(),
        formula: Some(formula::parse("C4H10").unwrap()),
        is_bool: false,
    };
    let target = ConversionTarget::UnitOfFormula(g, formula::parse("CO2").unwrap());
    let converted = conversion::convert(&source, Some(&mut reaction), &target).unwrap();
    // 16.00 mol C4H10 * 4 * 44.01 g/mol CO2 == 2817 g CO2 (4 sig figs).
    assert!((converted.magnitude.magnitude - RawDecimal::new(2817, 0)).abs() < RawDecimal::new(1, 0));
    assert_eq!(converted.magnitude.sig_figs, chemlang::decimal::SigFigs::Finite(4));
}

#[test]
fn a_formula_relabel_with_no_unit_change_preserves_magnitude() {
    let mol = registry::resolve("mol").unwrap();
    let source = Quantity {
        magnitude: Decimal::from_literal("3.00").unwrap(),
        unit: mol,
        formula: Some(formula::parse("H2O").unwrap()),
        is_bool: false,
    };
    let target = ConversionTarget::Formula(formula::parse("OH2").unwrap());
    let converted = conversion::convert(&source, None, &target).unwrap();
    assert_eq!(converted.magnitude.magnitude, source.magnitude.magnitude);
}
