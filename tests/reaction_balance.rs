//! Stoichiometric balancing of reaction skeletons.

use chemlang::formula;
use chemlang::reaction::Reaction;

#[test]
fn balances_combustion_of_propane() {
    let mut reaction = Reaction::new(
        vec![formula::parse("C3H8").unwrap(), formula::parse("O2").unwrap()],
        vec![formula::parse("CO2").unwrap(), formula::parse("H2O").unwrap()],
    );
    reaction.balance().unwrap();
    let coeffs: Vec<u64> = reaction
        .reactants
        .iter()
        .chain(reaction.products.iter())
        .map(|s| s.coefficient.unwrap())
        .collect();
    assert_eq!(coeffs, vec![1, 5, 3, 4]);
}

#[test]
fn balancing_is_idempotent() {
    let mut reaction = Reaction::new(
        vec![formula::parse("CH4").unwrap(), formula::parse("O2").unwrap()],
        vec![formula::parse("CO2").unwrap(), formula::parse("H2O").unwrap()],
    );
    reaction.balance().unwrap();
    let first: Vec<u64> = reaction.reactants.iter().chain(reaction.products.iter()).map(|s| s.coefficient.unwrap()).collect();
    reaction.balance().unwrap();
    let second: Vec<u64> = reaction.reactants.iter().chain(reaction.products.iter()).map(|s| s.coefficient.unwrap()).collect();
    assert_eq!(first, second);
}

#[test]
fn neutralization_reaction_conserves_charge() {
    // H+ + OH- -> H2O: a one-line acid/base neutralization.
    let mut reaction = Reaction::new(
        vec![formula::parse("H^{1+}").unwrap(), formula::parse("OH^{1-}").unwrap()],
        vec![formula::parse("H2O").unwrap()],
    );
    reaction.balance().unwrap();
    let coeffs: Vec<u64> = reaction
        .reactants
        .iter()
        .chain(reaction.products.iter())
        .map(|s| s.coefficient.unwrap())
        .collect();
    assert_eq!(coeffs, vec![1, 1, 1]);
}

#[test]
fn a_reaction_with_no_unique_solution_is_rejected() {
    let mut reaction = Reaction::new(vec![formula::parse("H2").unwrap()], vec![formula::parse("O2").unwrap()]);
    assert!(reaction.balance().is_err());
}

#[test]
fn display_renders_coefficients_and_an_arrow() {
    let mut reaction = Reaction::new(
        vec![formula::parse("H2").unwrap(), formula::parse("O2").unwrap()],
        vec![formula::parse("H2O").unwrap()],
    );
    reaction.balance().unwrap();
    assert_eq!(reaction.to_string(), "2H₂ + O₂ -> 2H₂O");
}
