/*!
[`Quantity`], the single universal value CL programs compute with: every
number in flight is a Quantity, there are no separate numeric types. A
scalar is a dimensionless, formula-less Quantity; `pass` and `fail` are
dimensionless Quantities with a boolean tag for display.

Generalized from a value parameterized over `f64`/`Complex<f64>` magnitudes
with a compile-time-fixed [`Unit`](crate::unit::Unit) to a
dynamically-typed value whose unit is resolved at runtime and which
additionally carries an optional chemical [`Formula`].
*/

pub mod ops;

use crate::decimal::{Decimal, RawDecimal, SigFigs};
use crate::error::{CLError, CLResult, ErrorKind, IncompatibleUnits};
use crate::formula::Formula;
use crate::unit::Unit;
use std::fmt;

/// The three kinds of unit a formula-carrying Quantity may legally have:
/// if a Quantity carries a formula, its unit must be mass-dimensioned,
/// amount-dimensioned (moles), or the atom-count pseudo-unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Mass,
    Moles,
    Atoms,
}

fn classify(unit: &Unit) -> Option<Kind> {
    if unit.atom_tagged {
        Some(Kind::Atoms)
    } else if unit.dims == crate::unit::Dimensions::mass() {
        Some(Kind::Mass)
    } else if unit.dims == crate::unit::Dimensions::amount() {
        Some(Kind::Moles)
    } else {
        None
    }
}

#[derive(Debug, Clone)]
pub struct Quantity {
    pub magnitude: Decimal,
    pub unit: Unit,
    pub formula: Option<Formula>,
    /// Set on the canonical `pass`/`fail` literals and on comparison results,
    /// so [`fmt::Display`] prints `pass`/`fail` rather than `1`/`0`.
    pub is_bool: bool,
}

impl Quantity {
    pub fn scalar(magnitude: Decimal) -> Quantity {
        Quantity { magnitude, unit: Unit::dimensionless(), formula: None, is_bool: false }
    }

    pub fn pass() -> Quantity {
        Quantity { magnitude: Decimal::exact(RawDecimal::ONE), unit: Unit::dimensionless(), formula: None, is_bool: true }
    }

    pub fn fail() -> Quantity {
        Quantity { magnitude: Decimal::zero(), unit: Unit::dimensionless(), formula: None, is_bool: true }
    }

    pub fn from_bool(b: bool) -> Quantity {
        if b { Quantity::pass() } else { Quantity::fail() }
    }

    pub fn is_truthy(&self) -> bool {
        !self.magnitude.is_zero()
    }

    pub fn is_dimensionless_scalar(&self) -> bool {
        self.unit.is_dimensionless() && self.formula.is_none()
    }

    /// Converts this Quantity into `target`, trying a direct dimensional
    /// conversion first and falling back to formula-mediated mass/mole/atom
    /// conversion. `formula_hint` supplies a formula to
    /// mediate with when this Quantity itself carries none (used by `+`/`-`
    /// when only one side carries a formula).
    pub fn convert_to(&self, target: &Unit, formula_hint: Option<&Formula>) -> CLResult<Quantity> {
        if self.unit.is_convertible_with(target) {
            return Ok(self.direct_convert(target));
        }
        let formula = self
            .formula
            .as_ref()
            .or(formula_hint)
            .ok_or_else(|| CLError::new(ErrorKind::IncompatibleUnits(IncompatibleUnits(self.unit.clone(), target.clone()))))?;
        let molar_mass = formula.molar_mass()?;
        let src_kind = classify(&self.unit)
            .ok_or_else(|| CLError::new(ErrorKind::IncompatibleUnits(IncompatibleUnits(self.unit.clone(), target.clone()))))?;
        let tgt_kind = classify(target)
            .ok_or_else(|| CLError::new(ErrorKind::IncompatibleUnits(IncompatibleUnits(self.unit.clone(), target.clone()))))?;

        let avogadro = avogadro_decimal();
        let grams_per_kg = RawDecimal::from(1000);

        let base = Decimal::checked_mul(self.magnitude.magnitude, self.unit.scale)?;
        let moles = match src_kind {
            Kind::Moles => base,
            Kind::Mass => Decimal::checked_div(Decimal::checked_mul(base, grams_per_kg)?, molar_mass)?,
            Kind::Atoms => Decimal::checked_div(base, avogadro)?,
        };
        let target_base = match tgt_kind {
            Kind::Moles => moles,
            Kind::Mass => Decimal::checked_div(Decimal::checked_mul(moles, molar_mass)?, grams_per_kg)?,
            Kind::Atoms => Decimal::checked_mul(moles, avogadro)?,
        };
        let magnitude = Decimal::checked_div(target_base, target.scale)?;

        // The molar mass never artificially limits precision; the result
        // inherits the source's sig_figs verbatim.
        Ok(Quantity {
            magnitude: Decimal { magnitude, sig_figs: self.magnitude.sig_figs, decimals: magnitude.scale() },
            unit: target.clone(),
            formula: Some(formula.clone()),
            is_bool: false,
        })
    }

    fn direct_convert(&self, target: &Unit) -> Quantity {
        let si_base = self.magnitude.magnitude * self.unit.scale;
        let magnitude = si_base / target.scale;
        Quantity {
            magnitude: Decimal { magnitude, sig_figs: self.magnitude.sig_figs, decimals: magnitude.scale() },
            unit: target.clone(),
            formula: self.formula.clone(),
            is_bool: false,
        }
    }
}

/// Avogadro's number at full working precision, used by the mole <-> atom
/// leg of formula-mediated conversion.
fn avogadro_decimal() -> RawDecimal {
    RawDecimal::from_scientific("6.02214076e23").expect("Avogadro's number is a valid decimal literal")
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_bool {
            return write!(f, "{}", if self.is_truthy() { "pass" } else { "fail" });
        }
        // An `Infinite` sig-fig count (an integer literal, an exact
        // constant) means "don't round" - rounding it to the working
        // precision would pad it with spurious trailing zeros instead of
        // printing it as written.
        let sig_figs = self.magnitude.sig_figs.or_working_precision();
        let rounded = match self.magnitude.sig_figs {
            SigFigs::Infinite => self.magnitude.magnitude,
            SigFigs::Finite(n) => Decimal::round_to_sig_figs(self.magnitude.magnitude, n),
        };
        let abs = rounded.abs();
        let ten_pow_sf = RawDecimal::from(10i64).checked_powi(sig_figs as i64).unwrap_or(RawDecimal::MAX);
        let small_threshold = RawDecimal::new(1, 4); // 1e-4
        let use_scientific = !abs.is_zero() && (abs >= ten_pow_sf || abs < small_threshold);

        if use_scientific {
            write_scientific(f, rounded, sig_figs)?;
        } else {
            write!(f, "{rounded}")?;
        }
        if !self.unit.is_dimensionless() {
            write!(f, " {}", self.unit)?;
        }
        if let Some(formula) = &self.formula {
            write!(f, " {formula}")?;
        }
        Ok(())
    }
}

fn write_scientific(f: &mut fmt::Formatter<'_>, value: RawDecimal, sig_figs: u32) -> fmt::Result {
    use rust_decimal::prelude::ToPrimitive;
    let as_f64 = value.to_f64().unwrap_or(0.0);
    if as_f64 == 0.0 {
        return write!(f, "0");
    }
    let exponent = as_f64.abs().log10().floor() as i32;
    let mantissa = value / RawDecimal::from(10i64).checked_powi(exponent as i64).unwrap_or(RawDecimal::ONE);
    let digits = (sig_figs.max(1) - 1) as usize;
    write!(f, "{mantissa:.digits$}×10{}", to_superscript(exponent))
}

fn to_superscript(n: i32) -> String {
    const SUP: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];
    let mut out = String::new();
    if n < 0 {
        out.push('⁻');
    }
    for c in n.unsigned_abs().to_string().chars() {
        out.push(SUP[c.to_digit(10).unwrap() as usize]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Decimal;

    #[test]
    fn scalar_is_dimensionless_and_formula_less() {
        let q = Quantity::scalar(Decimal::from_literal("3.0").unwrap());
        assert!(q.is_dimensionless_scalar());
    }

    #[test]
    fn pass_and_fail_print_as_keywords() {
        assert_eq!(Quantity::pass().to_string(), "pass");
        assert_eq!(Quantity::fail().to_string(), "fail");
    }

    #[test]
    fn direct_conversion_between_prefixed_units() {
        let km = crate::unit::registry::resolve("km").unwrap();
        let m = crate::unit::registry::resolve("m").unwrap();
        let q = Quantity {
            magnitude: Decimal::from_literal("2.000").unwrap(),
            unit: km,
            formula: None,
            is_bool: false,
        };
        let converted = q.convert_to(&m, None).unwrap();
        assert_eq!(converted.magnitude.magnitude, RawDecimal::from(2000));
    }
}
