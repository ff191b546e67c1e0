/*!
Binary and unary operator semantics over [`Quantity`].
Logical short-circuiting (`&`, `|`) is deliberately not implemented here: it
needs to avoid evaluating its right operand, which only the AST-walking
interpreter can do - this module only ever sees already-evaluated operands.
*/

use super::Quantity;
use crate::decimal::{Decimal, RawDecimal, SigFigs};
use crate::error::{CLError, CLResult, ErrorKind, IncompatibleFormulas, IncompatibleUnits};
use crate::formula::Formula;
use crate::unit::Unit;
use std::cmp::Ordering;

fn incompatible_units(a: &Quantity, b: &Quantity) -> CLError {
    CLError::new(ErrorKind::IncompatibleUnits(IncompatibleUnits(a.unit.clone(), b.unit.clone())))
}

/// Brings `rhs` into `lhs`'s unit, resolving the formula to mediate with
/// (whichever side carries one) per the addition/comparison rule: the
/// left operand's unit always wins.
fn align(lhs: &Quantity, rhs: &Quantity) -> CLResult<Quantity> {
    if let (Some(lf), Some(rf)) = (&lhs.formula, &rhs.formula) {
        if lf != rf {
            return Err(CLError::new(ErrorKind::IncompatibleFormulas(IncompatibleFormulas(lf.clone(), rf.clone()))));
        }
    }
    let hint = lhs.formula.as_ref().or(rhs.formula.as_ref());
    rhs.convert_to(&lhs.unit, hint).map_err(|_| incompatible_units(lhs, rhs))
}

pub fn add(lhs: &Quantity, rhs: &Quantity) -> CLResult<Quantity> {
    if lhs.is_dimensionless_scalar() && rhs.is_dimensionless_scalar() {
        let magnitude = Decimal::checked_add(lhs.magnitude.magnitude, rhs.magnitude.magnitude)?;
        let decimals = lhs.magnitude.decimals.min(rhs.magnitude.decimals);
        return Ok(Quantity::scalar(Decimal {
            magnitude,
            sig_figs: Decimal::sig_figs_after_rounding_to_decimals(magnitude, decimals),
            decimals,
        }));
    }
    let rhs_aligned = align(lhs, rhs)?;
    let magnitude = Decimal::checked_add(lhs.magnitude.magnitude, rhs_aligned.magnitude.magnitude)?;
    let decimals = lhs.magnitude.decimals.min(rhs_aligned.magnitude.decimals);
    Ok(Quantity {
        magnitude: Decimal { magnitude, sig_figs: Decimal::sig_figs_after_rounding_to_decimals(magnitude, decimals), decimals },
        unit: lhs.unit.clone(),
        formula: lhs.formula.clone(),
        is_bool: false,
    })
}

pub fn sub(lhs: &Quantity, rhs: &Quantity) -> CLResult<Quantity> {
    if lhs.is_dimensionless_scalar() && rhs.is_dimensionless_scalar() {
        let magnitude = Decimal::checked_sub(lhs.magnitude.magnitude, rhs.magnitude.magnitude)?;
        let decimals = lhs.magnitude.decimals.min(rhs.magnitude.decimals);
        return Ok(Quantity::scalar(Decimal {
            magnitude,
            sig_figs: Decimal::sig_figs_after_rounding_to_decimals(magnitude, decimals),
            decimals,
        }));
    }
    let rhs_aligned = align(lhs, rhs)?;
    let magnitude = Decimal::checked_sub(lhs.magnitude.magnitude, rhs_aligned.magnitude.magnitude)?;
    let decimals = lhs.magnitude.decimals.min(rhs_aligned.magnitude.decimals);
    Ok(Quantity {
        magnitude: Decimal { magnitude, sig_figs: Decimal::sig_figs_after_rounding_to_decimals(magnitude, decimals), decimals },
        unit: lhs.unit.clone(),
        formula: lhs.formula.clone(),
        is_bool: false,
    })
}

pub fn mul(lhs: &Quantity, rhs: &Quantity) -> CLResult<Quantity> {
    let magnitude = Decimal::checked_mul(lhs.magnitude.magnitude, rhs.magnitude.magnitude)?;
    let unit = &lhs.unit * &rhs.unit;
    let formula = combine_formula(lhs, rhs);
    let sig_figs = lhs.magnitude.sig_figs.min(rhs.magnitude.sig_figs);
    Ok(Quantity {
        magnitude: Decimal { magnitude, sig_figs, decimals: magnitude.scale() },
        unit,
        formula,
        is_bool: false,
    })
}

pub fn div(lhs: &Quantity, rhs: &Quantity) -> CLResult<Quantity> {
    if rhs.magnitude.is_zero() {
        return Err(CLError::new(ErrorKind::DivisionByZero));
    }
    let magnitude = Decimal::checked_div(lhs.magnitude.magnitude, rhs.magnitude.magnitude)?;
    let unit = &lhs.unit / &rhs.unit;
    let formula = combine_formula(lhs, rhs);
    let sig_figs = lhs.magnitude.sig_figs.min(rhs.magnitude.sig_figs);
    Ok(Quantity {
        magnitude: Decimal { magnitude, sig_figs, decimals: magnitude.scale() },
        unit,
        formula,
        is_bool: false,
    })
}

/// A Quantity carries its operand's formula into a product/quotient only
/// when the other operand is a bare dimensionless scalar; otherwise
/// stoichiometry across two distinct formulas is undefined and the formula
/// is simply dropped.
fn combine_formula(lhs: &Quantity, rhs: &Quantity) -> Option<Formula> {
    match (&lhs.formula, &rhs.formula) {
        (Some(f), None) if rhs.is_dimensionless_scalar() => Some(f.clone()),
        (None, Some(f)) if lhs.is_dimensionless_scalar() => Some(f.clone()),
        _ => None,
    }
}

pub fn rem(lhs: &Quantity, rhs: &Quantity) -> CLResult<Quantity> {
    if lhs.unit != rhs.unit {
        return Err(incompatible_units(lhs, rhs));
    }
    if lhs.formula != rhs.formula {
        let lf = lhs.formula.clone().unwrap_or_else(|| Formula::single(""));
        let rf = rhs.formula.clone().unwrap_or_else(|| Formula::single(""));
        return Err(CLError::new(ErrorKind::IncompatibleFormulas(IncompatibleFormulas(lf, rf))));
    }
    let magnitude = Decimal::checked_rem(lhs.magnitude.magnitude, rhs.magnitude.magnitude)?;
    Ok(Quantity {
        magnitude: Decimal {
            magnitude,
            sig_figs: lhs.magnitude.sig_figs.min(rhs.magnitude.sig_figs),
            decimals: lhs.magnitude.decimals.min(rhs.magnitude.decimals),
        },
        unit: lhs.unit.clone(),
        formula: lhs.formula.clone(),
        is_bool: false,
    })
}

pub fn pow(base: &Quantity, exponent: &Quantity) -> CLResult<Quantity> {
    if !exponent.is_dimensionless_scalar() {
        return Err(CLError::new(ErrorKind::TypeError("exponent must be dimensionless and formula-less".into())));
    }
    if exponent.magnitude.is_integer_valued() {
        use rust_decimal::prelude::ToPrimitive;
        let n = exponent
            .magnitude
            .magnitude
            .to_i64()
            .ok_or_else(|| CLError::new(ErrorKind::TypeError("exponent out of range".into())))?;
        let magnitude = Decimal::checked_powi(base.magnitude.magnitude, n)?;
        let unit = base.unit.powi(n as i32);
        let formula = if n == 1 { base.formula.clone() } else { None };
        Ok(Quantity {
            magnitude: Decimal {
                magnitude,
                sig_figs: base.magnitude.sig_figs.min(exponent.magnitude.sig_figs),
                decimals: magnitude.scale(),
            },
            unit,
            formula,
            is_bool: false,
        })
    } else {
        if !base.unit.is_dimensionless() || base.formula.is_some() {
            return Err(CLError::new(ErrorKind::TypeError(
                "a non-integer exponent requires a dimensionless, formula-less base".into(),
            )));
        }
        let magnitude = Decimal::powf(base.magnitude.magnitude, exponent.magnitude.magnitude)?;
        Ok(Quantity {
            magnitude: Decimal { magnitude, sig_figs: base.magnitude.sig_figs, decimals: magnitude.scale() },
            unit: Unit::dimensionless(),
            formula: None,
            is_bool: false,
        })
    }
}

fn ordering(lhs: &Quantity, rhs: &Quantity) -> CLResult<Ordering> {
    let rhs_aligned = align(lhs, rhs)?;
    Ok(lhs.magnitude.magnitude.cmp(&rhs_aligned.magnitude.magnitude))
}

pub fn eq(lhs: &Quantity, rhs: &Quantity) -> CLResult<Quantity> {
    Ok(Quantity::from_bool(ordering(lhs, rhs)? == Ordering::Equal))
}

pub fn ne(lhs: &Quantity, rhs: &Quantity) -> CLResult<Quantity> {
    Ok(Quantity::from_bool(ordering(lhs, rhs)? != Ordering::Equal))
}

pub fn lt(lhs: &Quantity, rhs: &Quantity) -> CLResult<Quantity> {
    Ok(Quantity::from_bool(ordering(lhs, rhs)? == Ordering::Less))
}

pub fn le(lhs: &Quantity, rhs: &Quantity) -> CLResult<Quantity> {
    Ok(Quantity::from_bool(ordering(lhs, rhs)? != Ordering::Greater))
}

pub fn gt(lhs: &Quantity, rhs: &Quantity) -> CLResult<Quantity> {
    Ok(Quantity::from_bool(ordering(lhs, rhs)? == Ordering::Greater))
}

pub fn ge(lhs: &Quantity, rhs: &Quantity) -> CLResult<Quantity> {
    Ok(Quantity::from_bool(ordering(lhs, rhs)? != Ordering::Less))
}

pub fn neg(q: &Quantity) -> Quantity {
    Quantity {
        magnitude: Decimal { magnitude: -q.magnitude.magnitude, ..q.magnitude },
        unit: q.unit.clone(),
        formula: q.formula.clone(),
        is_bool: false,
    }
}

pub fn pos(q: &Quantity) -> Quantity {
    q.clone()
}

pub fn not(q: &Quantity) -> Quantity {
    Quantity::from_bool(!q.is_truthy())
}

/// Bitwise complement; requires an integer-valued dimensionless scalar.
pub fn bitnot(q: &Quantity) -> CLResult<Quantity> {
    if !q.is_dimensionless_scalar() || !q.magnitude.is_integer_valued() {
        return Err(CLError::new(ErrorKind::TypeError("`~` requires an integer-valued dimensionless scalar".into())));
    }
    use rust_decimal::prelude::ToPrimitive;
    let n = q
        .magnitude
        .magnitude
        .to_i64()
        .ok_or_else(|| CLError::new(ErrorKind::TypeError("value too large for `~`".into())))?;
    Ok(Quantity::scalar(Decimal::exact(RawDecimal::from(!n))))
}

/// Validates and extracts the integer endpoints of an `a ... b` interval
/// expression: both sides must be integer-valued dimensionless scalars.
pub fn interval_bounds(a: &Quantity, b: &Quantity) -> CLResult<(i64, i64)> {
    use rust_decimal::prelude::ToPrimitive;
    if !a.is_dimensionless_scalar() || !a.magnitude.is_integer_valued() {
        return Err(CLError::new(ErrorKind::TypeError("interval endpoints must be integer-valued dimensionless scalars".into())));
    }
    if !b.is_dimensionless_scalar() || !b.magnitude.is_integer_valued() {
        return Err(CLError::new(ErrorKind::TypeError("interval endpoints must be integer-valued dimensionless scalars".into())));
    }
    let lo = a.magnitude.magnitude.to_i64().ok_or_else(|| CLError::new(ErrorKind::TypeError("interval bound out of range".into())))?;
    let hi = b.magnitude.magnitude.to_i64().ok_or_else(|| CLError::new(ErrorKind::TypeError("interval bound out of range".into())))?;
    Ok((lo, hi))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Decimal;

    fn scalar(text: &str) -> Quantity {
        Quantity::scalar(Decimal::from_literal(text).unwrap())
    }

    #[test]
    fn addition_propagates_minimum_decimals() {
        let sum = add(&scalar("1.2345"), &scalar("1.2")).unwrap();
        assert_eq!(sum.magnitude.decimals, 1);
    }

    #[test]
    fn multiplication_propagates_minimum_sig_figs() {
        let product = mul(&scalar("2.0"), &scalar("3.24")).unwrap();
        assert_eq!(product.magnitude.sig_figs, SigFigs::Finite(2));
    }

    #[test]
    fn division_by_zero_quantity_is_an_error() {
        assert!(div(&scalar("1.0"), &scalar("0")).is_err());
    }

    #[test]
    fn comparison_produces_boolean_quantity() {
        let result = gt(&scalar("5"), &scalar("3")).unwrap();
        assert!(result.is_bool);
        assert!(result.is_truthy());
    }

    #[test]
    fn exponent_multiplies_unit_dimensions() {
        let m = crate::unit::registry::resolve("m").unwrap();
        let length = Quantity { magnitude: Decimal::from_literal("3.0").unwrap(), unit: m, formula: None, is_bool: false };
        let area = pow(&length, &scalar("2")).unwrap();
        assert_eq!(area.unit.dims, crate::unit::Dimensions::length().powi(2));
    }

    #[test]
    fn incompatible_units_reject_addition() {
        let m = crate::unit::registry::resolve("m").unwrap();
        let s = crate::unit::registry::resolve("s").unwrap();
        let length = Quantity { magnitude: Decimal::from_literal("3.0").unwrap(), unit: m, formula: None, is_bool: false };
        let time = Quantity { magnitude: Decimal::from_literal("3.0").unwrap(), unit: s, formula: None, is_bool: false };
        assert!(add(&length, &time).is_err());
    }
}
