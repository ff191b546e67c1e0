/*!
The [`Unit`] struct and its dimension algebra.

Generalizes a fixed 7-field dimension-exponent struct (here [`Dimensions`])
from a value that is always *resolved* at parse time into a value
[`registry::resolve`] produces by name lookup, since CL units are written
directly as source-text identifiers rather than chosen from a fixed
compile-time enum.
*/

pub mod registry;

use crate::decimal::RawDecimal;
use std::ops::{Div, DivAssign, Mul, MulAssign};

/// Exponent vector over the seven SI base dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dimensions {
    pub length: i32,
    pub mass: i32,
    pub time: i32,
    pub amount: i32,
    pub current: i32,
    pub temperature: i32,
    pub luminosity: i32,
}

impl Dimensions {
    pub const fn dimensionless() -> Self {
        Dimensions {
            length: 0,
            mass: 0,
            time: 0,
            amount: 0,
            current: 0,
            temperature: 0,
            luminosity: 0,
        }
    }

    pub const fn length() -> Self {
        Dimensions { length: 1, ..Dimensions::dimensionless() }
    }
    pub const fn mass() -> Self {
        Dimensions { mass: 1, ..Dimensions::dimensionless() }
    }
    pub const fn time() -> Self {
        Dimensions { time: 1, ..Dimensions::dimensionless() }
    }
    pub const fn amount() -> Self {
        Dimensions { amount: 1, ..Dimensions::dimensionless() }
    }
    pub const fn current() -> Self {
        Dimensions { current: 1, ..Dimensions::dimensionless() }
    }
    pub const fn temperature() -> Self {
        Dimensions { temperature: 1, ..Dimensions::dimensionless() }
    }
    pub const fn luminosity() -> Self {
        Dimensions { luminosity: 1, ..Dimensions::dimensionless() }
    }

    pub fn is_dimensionless(&self) -> bool {
        *self == Dimensions::dimensionless()
    }

    pub fn powi(mut self, n: i32) -> Self {
        self.length *= n;
        self.mass *= n;
        self.time *= n;
        self.amount *= n;
        self.current *= n;
        self.temperature *= n;
        self.luminosity *= n;
        self
    }

}

impl Mul for Dimensions {
    type Output = Dimensions;
    fn mul(self, rhs: Dimensions) -> Dimensions {
        Dimensions {
            length: self.length + rhs.length,
            mass: self.mass + rhs.mass,
            time: self.time + rhs.time,
            amount: self.amount + rhs.amount,
            current: self.current + rhs.current,
            temperature: self.temperature + rhs.temperature,
            luminosity: self.luminosity + rhs.luminosity,
        }
    }
}
impl MulAssign for Dimensions {
    fn mul_assign(&mut self, rhs: Dimensions) {
        *self = *self * rhs;
    }
}
impl Div for Dimensions {
    type Output = Dimensions;
    fn div(self, rhs: Dimensions) -> Dimensions {
        self * rhs.powi(-1)
    }
}
impl DivAssign for Dimensions {
    fn div_assign(&mut self, rhs: Dimensions) {
        *self = *self / rhs;
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts = [
            ("m", self.length),
            ("kg", self.mass),
            ("s", self.time),
            ("mol", self.amount),
            ("A", self.current),
            ("K", self.temperature),
            ("cd", self.luminosity),
        ];
        let rendered: Vec<String> = parts
            .into_iter()
            .filter(|(_, exp)| *exp != 0)
            .map(|(sym, exp)| if exp == 1 { sym.to_string() } else { format!("{sym}^{exp}") })
            .collect();
        if rendered.is_empty() {
            write!(f, "1")
        } else {
            write!(f, "{}", rendered.join(" "))
        }
    }
}

/// A unit of measurement: a dimension vector plus a scale factor to SI
/// base units, and a flag marking the `atom` pseudo-unit (dimensionless, but
/// tagged so mass/mole <-> atom conversions go through Avogadro's number
/// instead of being treated as a bare scalar).
#[derive(Debug, Clone)]
pub struct Unit {
    pub dims: Dimensions,
    pub scale: RawDecimal,
    pub atom_tagged: bool,
    /// Printable name, when the unit came straight out of the registry
    /// (e.g. `"km"`); composite units built up through arithmetic fall back
    /// to [`Dimensions`]'s rendering.
    pub name: Option<String>,
}

impl Unit {
    pub fn dimensionless() -> Unit {
        Unit {
            dims: Dimensions::dimensionless(),
            scale: RawDecimal::ONE,
            atom_tagged: false,
            name: None,
        }
    }

    pub fn is_dimensionless(&self) -> bool {
        self.dims.is_dimensionless() && !self.atom_tagged
    }

    /// Two units are *convertible* iff their dimension vectors match.
    pub fn is_convertible_with(&self, other: &Unit) -> bool {
        self.dims == other.dims
    }

    /// The ratio to multiply a magnitude in `self` by to get the equivalent
    /// magnitude in `other`. Only meaningful when convertible.
    pub fn conversion_factor_to(&self, other: &Unit) -> RawDecimal {
        self.scale / other.scale
    }

    pub fn powi(&self, n: i32) -> Unit {
        Unit {
            dims: self.dims.powi(n),
            scale: pow_decimal(self.scale, n),
            atom_tagged: self.atom_tagged && n == 1,
            name: None,
        }
    }
}

fn pow_decimal(base: RawDecimal, n: i32) -> RawDecimal {
    if n >= 0 {
        base.powi(n as i64)
    } else {
        RawDecimal::ONE / base.powi((-n) as i64)
    }
}

impl Mul for &Unit {
    type Output = Unit;
    fn mul(self, rhs: &Unit) -> Unit {
        Unit {
            dims: self.dims * rhs.dims,
            scale: self.scale * rhs.scale,
            atom_tagged: self.atom_tagged || rhs.atom_tagged,
            name: None,
        }
    }
}

impl Div for &Unit {
    type Output = Unit;
    fn div(self, rhs: &Unit) -> Unit {
        Unit {
            dims: self.dims / rhs.dims,
            scale: self.scale / rhs.scale,
            atom_tagged: self.atom_tagged,
            name: None,
        }
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.dims == other.dims && self.scale == other.scale && self.atom_tagged == other.atom_tagged
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{name}")
        } else if self.atom_tagged {
            write!(f, "atom")
        } else {
            write!(f, "{}", self.dims)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn powi_scales_dimensions_and_scale_factor() {
        let meter = Unit {
            dims: Dimensions::length(),
            scale: RawDecimal::ONE,
            atom_tagged: false,
            name: Some("m".into()),
        };
        let sq_meter = meter.powi(2);
        assert_eq!(sq_meter.dims, Dimensions::length().powi(2));
    }

    #[test]
    fn dimensionless_units_are_convertible_with_each_other() {
        assert!(Unit::dimensionless().is_convertible_with(&Unit::dimensionless()));
    }
}
