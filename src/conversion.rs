/*!
The `->` conversion pipeline: direct dimensional conversion when possible,
formula relabelling when only the formula changes, formula-mediated
mass/mole/atom conversion, and reaction-mediated conversion when a reaction
literal (`:...:`) mediates the hop between two species. A chained
`a -> b -> c` is just two calls to [`convert`] applied left to right, so
this module only has to get a single hop right.
*/

use crate::decimal::{Decimal, RawDecimal};
use crate::error::{CLError, CLResult, ErrorKind, IncompatibleFormulas, SpeciesNotInReaction};
use crate::formula::Formula;
use crate::quantity::Quantity;
use crate::reaction::Reaction;
use crate::unit::{registry, Unit};

/// The right-hand side of a `->` expression: a bare unit, a bare formula
/// (a relabel with no dimension change), or a unit applied to a formula
/// (`g NaCl`).
#[derive(Debug, Clone)]
pub enum ConversionTarget {
    Unit(Unit),
    Formula(Formula),
    UnitOfFormula(Unit, Formula),
}

/// Applies one `->` hop. `reaction` is `Some` when the conversion was
/// written `Q :R:-> T`.
pub fn convert(source: &Quantity, reaction: Option<&mut Reaction>, target: &ConversionTarget) -> CLResult<Quantity> {
    match reaction {
        Some(reaction) => {
            tracing::debug!("conversion pipeline: reaction-mediated branch");
            reaction_mediated(source, reaction, target)
        }
        None => match target {
            ConversionTarget::Formula(f) => {
                tracing::debug!("conversion pipeline: formula relabel branch");
                relabel_formula(source, f)
            }
            ConversionTarget::UnitOfFormula(unit, f) => {
                tracing::debug!("conversion pipeline: formula relabel + unit branch");
                let relabeled = relabel_formula(source, f)?;
                relabeled.convert_to(unit, Some(f))
            }
            ConversionTarget::Unit(unit) => {
                tracing::debug!("conversion pipeline: direct/formula-mediated unit branch");
                source.convert_to(unit, source.formula.as_ref())
            }
        },
    }
}

fn relabel_formula(source: &Quantity, target_formula: &Formula) -> CLResult<Quantity> {
    match &source.formula {
        Some(f) if f == target_formula => Ok(Quantity { formula: Some(target_formula.clone()), ..source.clone() }),
        Some(f) => Err(CLError::new(ErrorKind::IncompatibleFormulas(IncompatibleFormulas(f.clone(), target_formula.clone())))),
        None => Err(CLError::new(ErrorKind::IncompatibleFormulas(IncompatibleFormulas(
            Formula { counts: Vec::new(), charge: 0 },
            target_formula.clone(),
        )))),
    }
}

fn mol_unit() -> Unit {
    registry::resolve("mol").expect("`mol` is seeded in the unit registry")
}

fn species_not_in_reaction(formula: &Formula, reaction: &Reaction) -> CLError {
    CLError::new(ErrorKind::SpeciesNotInReaction(SpeciesNotInReaction {
        formula: formula.clone(),
        reaction: reaction.to_string(),
    }))
}

fn reaction_mediated(source: &Quantity, reaction: &mut Reaction, target: &ConversionTarget) -> CLResult<Quantity> {
    reaction.balance()?;

    let source_formula = source
        .formula
        .clone()
        .ok_or_else(|| CLError::new(ErrorKind::TypeError("a reaction-mediated conversion requires a source formula".into())))?;
    let (target_unit, target_formula) = match target {
        ConversionTarget::Formula(f) => (mol_unit(), f.clone()),
        ConversionTarget::UnitOfFormula(u, f) => (u.clone(), f.clone()),
        ConversionTarget::Unit(_) => {
            return Err(CLError::new(ErrorKind::TypeError(
                "a reaction-mediated conversion requires a target formula".into(),
            )));
        }
    };

    let source_side = reaction.side_of(&source_formula).ok_or_else(|| species_not_in_reaction(&source_formula, reaction))?;
    let target_side = reaction.side_of(&target_formula).ok_or_else(|| species_not_in_reaction(&target_formula, reaction))?;
    if source_side == target_side {
        return Err(species_not_in_reaction(&target_formula, reaction));
    }

    let moles_of_source = source.convert_to(&mol_unit(), Some(&source_formula))?;
    let coeff_source = reaction.coefficient_of(&source_formula).ok_or_else(|| species_not_in_reaction(&source_formula, reaction))?;
    let coeff_target = reaction.coefficient_of(&target_formula).ok_or_else(|| species_not_in_reaction(&target_formula, reaction))?;

    let ratio = Decimal::checked_div(RawDecimal::from(coeff_target), RawDecimal::from(coeff_source))?;
    let magnitude = Decimal::checked_mul(moles_of_source.magnitude.magnitude, ratio)?;
    let moles_of_target = Quantity {
        magnitude: Decimal { magnitude, sig_figs: moles_of_source.magnitude.sig_figs, decimals: magnitude.scale() },
        unit: mol_unit(),
        formula: Some(target_formula.clone()),
        is_bool: false,
    };

    moles_of_target.convert_to(&target_unit, Some(&target_formula))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Decimal;
    use crate::formula;

    fn water_reaction() -> Reaction {
        Reaction::new(
            vec![formula::parse("H2").unwrap(), formula::parse("O2").unwrap()],
            vec![formula::parse("H2O").unwrap()],
        )
    }

    #[test]
    fn relabels_formula_when_equal() {
        let mol = registry::resolve("mol").unwrap();
        let q = Quantity {
            magnitude: Decimal::from_literal("2.0").unwrap(),
            unit: mol,
            formula: Some(formula::parse("H2O").unwrap()),
            is_bool: false,
        };
        let target = ConversionTarget::Formula(formula::parse("OH2").unwrap());
        let converted = convert(&q, None, &target).unwrap();
        assert_eq!(converted.formula, Some(formula::parse("H2O").unwrap()));
    }

    #[test]
    fn reaction_mediated_conversion_uses_coefficient_ratio() {
        let mut reaction = water_reaction();
        let g = registry::resolve("g").unwrap();
        let source = Quantity {
            magnitude: Decimal::from_literal("2.0").unwrap(),
            unit: registry::resolve("mol").unwrap(),
            formula: Some(formula::parse("H2").unwrap()),
            is_bool: false,
        };
        let target = ConversionTarget::UnitOfFormula(g, formula::parse("H2O").unwrap());
        let converted = convert(&source, Some(&mut reaction), &target).unwrap();
        // 2 mol H2 -> 2 mol H2O (1:1 ratio) -> ~36.03 g
        assert!((converted.magnitude.magnitude - RawDecimal::new(3603, 2)).abs() < RawDecimal::new(1, 1));
    }

    #[test]
    fn species_absent_from_reaction_is_an_error() {
        let mut reaction = water_reaction();
        let source = Quantity {
            magnitude: Decimal::from_literal("1.0").unwrap(),
            unit: registry::resolve("mol").unwrap(),
            formula: Some(formula::parse("H2").unwrap()),
            is_bool: false,
        };
        let target = ConversionTarget::Formula(formula::parse("NaCl").unwrap());
        assert!(convert(&source, Some(&mut reaction), &target).is_err());
    }
}
