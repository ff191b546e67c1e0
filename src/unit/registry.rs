/*!
The unit registry: resolves a written unit identifier -- with an optional
SI prefix and an optional plural suffix -- to a [`Unit`]. Seeded once into
a `LazyLock`, read-only thereafter.
*/

use super::{Dimensions, Unit};
use crate::decimal::RawDecimal;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy)]
struct UnitSpec {
    dims: Dimensions,
    scale: f64,
    atom_tagged: bool,
}

impl UnitSpec {
    const fn new(dims: Dimensions, scale: f64) -> Self {
        UnitSpec { dims, scale, atom_tagged: false }
    }
}

/// `(prefix, multiplier)`, longest prefixes first so e.g. `"da"` is not
/// mistaken for `"d"` followed by base unit `"a"`.
const PREFIXES: &[(&str, f64)] = &[
    ("da", 1e1),
    ("k", 1e3),
    ("M", 1e6),
    ("G", 1e9),
    ("T", 1e12),
    ("m", 1e-3),
    ("µ", 1e-6),
    ("u", 1e-6),
    ("n", 1e-9),
    ("p", 1e-12),
    ("c", 1e-2),
    ("d", 1e-1),
    ("h", 1e2),
];

static BASE_UNITS: LazyLock<HashMap<&'static str, UnitSpec>> = LazyLock::new(|| {
    use Dimensions as D;
    let mut m = HashMap::new();
    m.insert("s", UnitSpec::new(D::time(), 1.0));
    m.insert("m", UnitSpec::new(D::length(), 1.0));
    m.insert("g", UnitSpec::new(D::mass(), 1e-3));
    m.insert("A", UnitSpec::new(D::current(), 1.0));
    m.insert("K", UnitSpec::new(D::temperature(), 1.0));
    m.insert("mol", UnitSpec::new(D::amount(), 1.0));
    m.insert("cd", UnitSpec::new(D::luminosity(), 1.0));
    m.insert("L", UnitSpec::new(D::length().powi(3), 1e-3));

    // Imperial.
    m.insert("in", UnitSpec::new(D::length(), 0.0254));
    m.insert("ft", UnitSpec::new(D::length(), 0.3048));
    m.insert("yd", UnitSpec::new(D::length(), 0.9144));
    m.insert("mi", UnitSpec::new(D::length(), 1609.344));
    m.insert("acre", UnitSpec::new(D::length().powi(2), 4046.8564224));

    // Derived SI, expressed in base-unit exponents.
    let newton = D::mass() * D::length() * D::time().powi(-2);
    let joule = newton * D::length();
    let watt = joule * D::time().powi(-1);
    let hertz = D::time().powi(-1);
    let volt = watt * D::current().powi(-1);
    m.insert("N", UnitSpec::new(newton, 1.0));
    m.insert("J", UnitSpec::new(joule, 1.0));
    m.insert("W", UnitSpec::new(watt, 1.0));
    m.insert("Hz", UnitSpec::new(hertz, 1.0));
    m.insert("V", UnitSpec::new(volt, 1.0));

    // The `atom` pseudo-unit: dimensionless, but tagged so that
    // mass/mole <-> atom conversions go through Avogadro's number
    // instead of being treated as a bare scalar.
    m.insert(
        "atom",
        UnitSpec { dims: D::dimensionless(), scale: 1.0, atom_tagged: true },
    );
    m
});

fn lookup_exact(name: &str) -> Option<UnitSpec> {
    BASE_UNITS.get(name).copied()
}

/// Candidate singular forms for a name that might be a plural unit
/// identifier (`s`, `es`, `ves`, `ies` suffixes).
fn plural_candidates(name: &str) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(stem) = name.strip_suffix("ies") {
        out.push(format!("{stem}y"));
    }
    if let Some(stem) = name.strip_suffix("ves") {
        out.push(format!("{stem}f"));
        out.push(format!("{stem}fe"));
    }
    if let Some(stem) = name.strip_suffix("es") {
        out.push(stem.to_string());
    }
    if let Some(stem) = name.strip_suffix('s') {
        out.push(stem.to_string());
    }
    out
}

fn to_unit(spec: UnitSpec, name: Option<String>) -> Unit {
    Unit {
        dims: spec.dims,
        scale: RawDecimal::from_str(&format!("{:.12}", spec.scale)).unwrap_or(RawDecimal::ONE),
        atom_tagged: spec.atom_tagged,
        name,
    }
}

/// Resolves a written unit identifier, trying (in order): an exact base
/// unit, a plural-stripped base unit, and a prefixed base unit. Returns
/// `None` on lookup failure (caller raises `UnknownUnit`).
pub fn resolve(raw: &str) -> Option<Unit> {
    if let Some(spec) = lookup_exact(raw) {
        return Some(to_unit(spec, Some(raw.to_string())));
    }
    for candidate in plural_candidates(raw) {
        if let Some(spec) = lookup_exact(&candidate) {
            return Some(to_unit(spec, Some(raw.to_string())));
        }
    }
    for (prefix, factor) in PREFIXES {
        if let Some(rest) = raw.strip_prefix(prefix) {
            if rest.is_empty() {
                continue;
            }
            if let Some(base) = lookup_exact(rest) {
                let mut spec = base;
                spec.scale *= factor;
                return Some(to_unit(spec, Some(raw.to_string())));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_base_unit() {
        let m = resolve("m").unwrap();
        assert_eq!(m.dims, Dimensions::length());
    }

    #[test]
    fn resolves_prefixed_unit() {
        let km = resolve("km").unwrap();
        assert_eq!(km.dims, Dimensions::length());
        assert_eq!(km.scale, RawDecimal::from_str("1000.000000000000").unwrap());
    }

    #[test]
    fn resolves_plural() {
        let atoms = resolve("atoms").unwrap();
        assert!(atoms.atom_tagged);
    }

    #[test]
    fn unknown_unit_is_none() {
        assert!(resolve("frobnicate").is_none());
    }
}
