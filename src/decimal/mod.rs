/*!
The decimal engine: arbitrary-precision signed decimals with a declared
working precision, plus the two derived counters ("significant figures" and
"decimal places") that ride alongside every value without being consulted by
the raw arithmetic itself - the engine exposes only raw arithmetic; the
caller combines precision metadata per operator.

Magnitudes are backed by [`rust_decimal::Decimal`], a 96-bit fixed-point
type supporting roughly 28-29 significant digits - close enough to this
language's documented default working precision of 28 significant digits
that no separate bignum representation is needed (see DESIGN.md).
*/

use crate::error::{CLError, ErrorKind};
use rust_decimal::MathematicalOps;
use rust_decimal::prelude::ToPrimitive;
pub use rust_decimal::Decimal as RawDecimal;
use std::fmt;
use std::str::FromStr;

/// Default working precision, in significant digits.
pub const WORKING_PRECISION: u32 = 28;

/// Significant-figure count of a value. Integer literals carry `Infinite`:
/// they never limit a multiplicative result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigFigs {
    Infinite,
    Finite(u32),
}

impl SigFigs {
    pub fn min(self, other: SigFigs) -> SigFigs {
        match (self, other) {
            (SigFigs::Infinite, SigFigs::Infinite) => SigFigs::Infinite,
            (SigFigs::Infinite, other) => other,
            (this, SigFigs::Infinite) => this,
            (SigFigs::Finite(a), SigFigs::Finite(b)) => SigFigs::Finite(a.min(b)),
        }
    }

    /// The digit count to use when a *display* or further computation needs
    /// a concrete number (an "infinite" literal behaves as if it had as many
    /// digits as the working precision).
    pub fn or_working_precision(self) -> u32 {
        match self {
            SigFigs::Infinite => WORKING_PRECISION,
            SigFigs::Finite(n) => n,
        }
    }
}

/// A decimal magnitude with its sig-fig/decimal-place metadata. Raw
/// arithmetic (the `checked_*` methods) only touches `magnitude`; callers
/// (`crate::quantity::ops`) are responsible for combining `sig_figs`/
/// `decimals` per the operator in question.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decimal {
    pub magnitude: RawDecimal,
    pub sig_figs: SigFigs,
    pub decimals: u32,
}

impl Decimal {
    /// An exact value (a physical constant, a conversion factor, the result
    /// of relabelling a formula) which never limits a multiplicative chain.
    pub fn exact(magnitude: RawDecimal) -> Decimal {
        Decimal {
            magnitude,
            sig_figs: SigFigs::Infinite,
            decimals: magnitude.scale(),
        }
    }

    pub fn zero() -> Decimal {
        Decimal::exact(RawDecimal::ZERO)
    }

    /// Parses a literal exactly as the user wrote it (e.g. `"1.2345"`,
    /// `"2.0"`, `"1200"`), deriving `sig_figs` and `decimals` from the
    /// written digits rather than from the parsed value.
    pub fn from_literal(text: &str) -> Result<Decimal, CLError> {
        let magnitude = RawDecimal::from_str(text)
            .map_err(|e| CLError::new(ErrorKind::ParseError(format!("invalid number `{text}`: {e}"))))?;
        let digits: Vec<char> = text.chars().filter(|c| c.is_ascii_digit()).collect();
        let decimals = match text.find('.') {
            Some(dot) => (text.len() - dot - 1) as u32,
            None => 0,
        };
        let sig_figs = if !text.contains('.') {
            SigFigs::Infinite
        } else {
            match digits.iter().position(|&c| c != '0') {
                Some(first_nonzero) => SigFigs::Finite((digits.len() - first_nonzero) as u32),
                None => SigFigs::Finite(1),
            }
        };
        Ok(Decimal { magnitude, sig_figs, decimals })
    }

    pub fn is_zero(&self) -> bool {
        self.magnitude.is_zero()
    }

    pub fn is_integer_valued(&self) -> bool {
        self.magnitude.fract().is_zero()
    }

    /// Rounds `magnitude` to exactly `sig_figs` significant digits. Used to
    /// collapse a decimal-place-governed value (the result of `+`/`-`) into
    /// an equivalent significant-figure count before a multiplicative
    /// operator consumes it (see DESIGN.md for the collapse rule).
    pub fn round_to_sig_figs(magnitude: RawDecimal, sig_figs: u32) -> RawDecimal {
        if magnitude.is_zero() || sig_figs == 0 {
            return magnitude;
        }
        let order = order_of_magnitude(magnitude);
        let dp = sig_figs as i32 - 1 - order;
        if dp <= 0 {
            magnitude.round_dp(0)
        } else {
            magnitude.round_dp(dp as u32)
        }
    }

    /// The significant-figure count of `magnitude` once rounded to `decimals`
    /// decimal places - the inverse of [`Decimal::round_to_sig_figs`], used
    /// to collapse a `+`/`-` result's `decimals` count into a `sig_figs`
    /// count before a later multiplicative operator consumes it.
    pub fn sig_figs_after_rounding_to_decimals(magnitude: RawDecimal, decimals: u32) -> SigFigs {
        let rounded = magnitude.round_dp(decimals);
        if rounded.is_zero() {
            return SigFigs::Finite(1);
        }
        let order = order_of_magnitude(rounded);
        let digits = order + decimals as i32 + 1;
        SigFigs::Finite(digits.max(1) as u32)
    }

    pub fn checked_add(a: RawDecimal, b: RawDecimal) -> Result<RawDecimal, CLError> {
        a.checked_add(b)
            .ok_or_else(|| CLError::new(ErrorKind::TypeError("decimal overflow".into())))
    }

    pub fn checked_sub(a: RawDecimal, b: RawDecimal) -> Result<RawDecimal, CLError> {
        a.checked_sub(b)
            .ok_or_else(|| CLError::new(ErrorKind::TypeError("decimal overflow".into())))
    }

    pub fn checked_mul(a: RawDecimal, b: RawDecimal) -> Result<RawDecimal, CLError> {
        a.checked_mul(b)
            .ok_or_else(|| CLError::new(ErrorKind::TypeError("decimal overflow".into())))
    }

    pub fn checked_div(a: RawDecimal, b: RawDecimal) -> Result<RawDecimal, CLError> {
        if b.is_zero() {
            return Err(CLError::new(ErrorKind::DivisionByZero));
        }
        Ok(a / b)
    }

    pub fn checked_rem(a: RawDecimal, b: RawDecimal) -> Result<RawDecimal, CLError> {
        if b.is_zero() {
            return Err(CLError::new(ErrorKind::DivisionByZero));
        }
        Ok(a % b)
    }

    pub fn checked_powi(a: RawDecimal, n: i64) -> Result<RawDecimal, CLError> {
        a.checked_powi(n)
            .ok_or_else(|| CLError::new(ErrorKind::TypeError("decimal overflow in exponent".into())))
    }

    pub fn powf(a: RawDecimal, exponent: RawDecimal) -> Result<RawDecimal, CLError> {
        a.checked_powd(exponent)
            .ok_or_else(|| CLError::new(ErrorKind::TypeError("invalid exponentiation".into())))
    }

    pub fn ln(a: RawDecimal) -> Result<RawDecimal, CLError> {
        a.checked_ln()
            .ok_or_else(|| CLError::new(ErrorKind::TypeError("ln requires a positive argument".into())))
    }

    pub fn log2(a: RawDecimal) -> Result<RawDecimal, CLError> {
        let ln2 = RawDecimal::from_str("0.6931471805599453").unwrap();
        Ok(Decimal::ln(a)? / ln2)
    }

    pub fn log10(a: RawDecimal) -> Result<RawDecimal, CLError> {
        let ln10 = RawDecimal::from_str("2.302585092994046").unwrap();
        Ok(Decimal::ln(a)? / ln10)
    }

    pub fn sqrt(a: RawDecimal) -> Result<RawDecimal, CLError> {
        a.sqrt()
            .ok_or_else(|| CLError::new(ErrorKind::TypeError("sqrt requires a non-negative argument".into())))
    }

    /// `rust_decimal` has no closed-form trigonometric functions; these
    /// round-trip through `f64`, which is adequate for homework-scale
    /// inputs but is not exact to the full 28-digit working precision
    /// (documented in DESIGN.md).
    pub fn sin(a: RawDecimal) -> RawDecimal {
        RawDecimal::from_f64_retain(a.to_f64().unwrap_or(0.0).sin()).unwrap_or(RawDecimal::ZERO)
    }

    pub fn cos(a: RawDecimal) -> RawDecimal {
        RawDecimal::from_f64_retain(a.to_f64().unwrap_or(0.0).cos()).unwrap_or(RawDecimal::ZERO)
    }

    pub fn tan(a: RawDecimal) -> RawDecimal {
        RawDecimal::from_f64_retain(a.to_f64().unwrap_or(0.0).tan()).unwrap_or(RawDecimal::ZERO)
    }
}

fn order_of_magnitude(value: RawDecimal) -> i32 {
    let abs = value.abs().to_f64().unwrap_or(0.0);
    if abs == 0.0 {
        0
    } else {
        abs.log10().floor() as i32
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.magnitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_sig_figs_and_decimals() {
        let d = Decimal::from_literal("1.2345").unwrap();
        assert_eq!(d.sig_figs, SigFigs::Finite(5));
        assert_eq!(d.decimals, 4);

        let d = Decimal::from_literal("2.0").unwrap();
        assert_eq!(d.sig_figs, SigFigs::Finite(2));
        assert_eq!(d.decimals, 1);

        let d = Decimal::from_literal("1200").unwrap();
        assert_eq!(d.sig_figs, SigFigs::Infinite);
        assert_eq!(d.decimals, 0);
    }

    #[test]
    fn leading_zeros_do_not_count_as_significant() {
        let d = Decimal::from_literal("0.0050").unwrap();
        assert_eq!(d.sig_figs, SigFigs::Finite(2));
    }

    #[test]
    fn division_by_zero_is_an_error() {
        assert!(Decimal::checked_div(RawDecimal::from(1), RawDecimal::ZERO).is_err());
    }

    #[test]
    fn round_to_sig_figs_rounds_away_extra_digits() {
        let value = RawDecimal::from_str("10.020000").unwrap();
        let rounded = Decimal::round_to_sig_figs(value, 5);
        assert_eq!(rounded, RawDecimal::from_str("10.020").unwrap());
    }
}
