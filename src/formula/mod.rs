/*!
The chemical-formula model and parser.

Formula literals are parsed from plain text, the way `chemistry_parser` and
`molecular-formulas`-style crates in the wider Rust ecosystem do it (a
hand-written recursive-descent walk over `char`s, not a token stream) -
`crate::parser` reconstructs the literal's source text from adjacent,
whitespace-free scanner tokens and hands it to [`parse`].
*/

use crate::decimal::RawDecimal;
use crate::element;
use crate::error::{CLError, ErrorKind};
use std::fmt;
use std::str::FromStr;

/// An ordered element-count multiset plus a signed charge. Order is
/// parse/insertion order (used for canonical printing); equality ignores
/// order but accounts for charge (two formulas are the same substance iff
/// they have the same element counts and the same charge).
#[derive(Debug, Clone)]
pub struct Formula {
    pub counts: Vec<(String, u32)>,
    pub charge: i32,
}

impl Formula {
    pub fn single(symbol: &str) -> Formula {
        Formula {
            counts: vec![(symbol.to_string(), 1)],
            charge: 0,
        }
    }

    /// Sum of `count * standard atomic weight` over every element present.
    pub fn molar_mass(&self) -> Result<RawDecimal, CLError> {
        let mut total = 0.0f64;
        for (symbol, count) in &self.counts {
            let weight = element::atomic_weight(symbol)
                .ok_or_else(|| CLError::new(ErrorKind::UnknownElement(symbol.clone())))?;
            total += weight * f64::from(*count);
        }
        RawDecimal::from_str(&format!("{total:.6}"))
            .map_err(|_| CLError::new(ErrorKind::TypeError("molar mass overflow".into())))
    }

    fn sorted_counts(&self) -> Vec<(&str, u32)> {
        let mut v: Vec<(&str, u32)> = self
            .counts
            .iter()
            .filter(|(_, n)| *n != 0)
            .map(|(s, n)| (s.as_str(), *n))
            .collect();
        v.sort_by(|a, b| a.0.cmp(b.0));
        v
    }
}

impl PartialEq for Formula {
    fn eq(&self, other: &Self) -> bool {
        self.charge == other.charge && self.sorted_counts() == other.sorted_counts()
    }
}
impl Eq for Formula {}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (symbol, count) in &self.counts {
            write!(f, "{symbol}")?;
            if *count != 1 {
                write!(f, "{}", to_subscript(*count))?;
            }
        }
        if self.charge != 0 {
            write!(f, "{}", to_charge_superscript(self.charge))?;
        }
        Ok(())
    }
}

fn to_subscript(n: u32) -> String {
    n.to_string()
        .chars()
        .map(|c| char::from_u32(0x2080 + c.to_digit(10).unwrap()).unwrap())
        .collect()
}

fn to_charge_superscript(charge: i32) -> String {
    const SUP_DIGITS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];
    let magnitude = charge.unsigned_abs();
    let mut out = String::new();
    if magnitude != 1 {
        for c in magnitude.to_string().chars() {
            out.push(SUP_DIGITS[c.to_digit(10).unwrap() as usize]);
        }
    }
    out.push(if charge > 0 { '⁺' } else { '⁻' });
    out
}

/// Parses a chemical formula from plain text, e.g. `"Fe(NO3)_{2}"`,
/// `"Cu(OH)2"`, `"H2O^{2+}"`.
pub fn parse(text: &str) -> Result<Formula, CLError> {
    let mut parser = FormulaParser {
        chars: text.chars().collect(),
        pos: 0,
    };
    let counts = parser.parse_compound()?;
    if parser.peek() == Some(')') {
        return Err(unbalanced(text));
    }
    let charge = parser.parse_charge_suffix()?;
    if parser.pos != parser.chars.len() {
        return Err(CLError::new(ErrorKind::FormulaParseError(format!(
            "unexpected trailing characters in `{text}`"
        ))));
    }
    if counts.is_empty() {
        return Err(CLError::new(ErrorKind::FormulaParseError(format!(
            "`{text}` contains no elements"
        ))));
    }
    Ok(Formula { counts, charge })
}

fn unbalanced(text: &str) -> CLError {
    CLError::new(ErrorKind::FormulaParseError(format!(
        "unbalanced parenthesis in `{text}`"
    )))
}

struct FormulaParser {
    chars: Vec<char>,
    pos: usize,
}

impl FormulaParser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn parse_compound(&mut self) -> Result<Vec<(String, u32)>, CLError> {
        let mut counts: Vec<(String, u32)> = Vec::new();
        while let Some(c) = self.peek() {
            if c == ')' || c == '^' {
                break;
            } else if c == '(' {
                self.bump();
                let inner = self.parse_compound()?;
                if self.bump() != Some(')') {
                    return Err(unbalanced(&self.remaining_source()));
                }
                let multiplier = self.parse_subscript()?.unwrap_or(1);
                for (symbol, n) in inner {
                    add_count(&mut counts, symbol, n * multiplier);
                }
            } else if c.is_ascii_uppercase() {
                let symbol = self.parse_element_symbol()?;
                let n = self.parse_subscript()?.unwrap_or(1);
                add_count(&mut counts, symbol, n);
            } else {
                return Err(CLError::new(ErrorKind::FormulaParseError(format!(
                    "unexpected character `{c}`"
                ))));
            }
        }
        Ok(counts)
    }

    fn remaining_source(&self) -> String {
        self.chars.iter().collect()
    }

    fn parse_element_symbol(&mut self) -> Result<String, CLError> {
        let first = self.bump().expect("caller checked an uppercase letter is present");
        let mut two = String::new();
        two.push(first);
        if let Some(second) = self.peek() {
            if second.is_ascii_lowercase() {
                let mut candidate = two.clone();
                candidate.push(second);
                if element::is_element(&candidate) {
                    self.bump();
                    return Ok(candidate);
                }
            }
        }
        if element::is_element(&two) {
            Ok(two)
        } else {
            Err(CLError::new(ErrorKind::UnknownElement(two)))
        }
    }

    fn parse_subscript(&mut self) -> Result<Option<u32>, CLError> {
        match self.peek() {
            Some('_') => {
                self.bump();
                if self.peek() == Some('{') {
                    self.bump();
                    let n = self.parse_digits()?;
                    if self.bump() != Some('}') {
                        return Err(CLError::new(ErrorKind::FormulaParseError(
                            "missing closing `}` in subscript".into(),
                        )));
                    }
                    Ok(Some(n))
                } else {
                    Ok(Some(self.parse_digits()?))
                }
            }
            Some(c) if c.is_ascii_digit() => Ok(Some(self.parse_digits()?)),
            _ => Ok(None),
        }
    }

    fn parse_digits(&mut self) -> Result<u32, CLError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        if start == self.pos {
            return Err(CLError::new(ErrorKind::FormulaParseError(
                "expected a digit".into(),
            )));
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse()
            .map_err(|_| CLError::new(ErrorKind::FormulaParseError(format!("invalid count `{text}`"))))
    }

    fn parse_charge_suffix(&mut self) -> Result<i32, CLError> {
        if self.peek() != Some('^') {
            return Ok(0);
        }
        self.bump();
        if self.bump() != Some('{') {
            return Err(CLError::new(ErrorKind::FormulaParseError(
                "expected `{` after `^` in charge".into(),
            )));
        }
        let magnitude = if self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.parse_digits()?
        } else {
            1
        };
        let sign = match self.bump() {
            Some('+') => 1,
            Some('-') | Some('\u{2212}') => -1,
            other => {
                return Err(CLError::new(ErrorKind::FormulaParseError(format!(
                    "expected `+` or `-` in charge, found {other:?}"
                ))));
            }
        };
        if self.bump() != Some('}') {
            return Err(CLError::new(ErrorKind::FormulaParseError(
                "missing closing `}` in charge".into(),
            )));
        }
        Ok(magnitude as i32 * sign)
    }
}

fn add_count(counts: &mut Vec<(String, u32)>, symbol: String, n: u32) {
    if let Some(entry) = counts.iter_mut().find(|(s, _)| *s == symbol) {
        entry.1 += n;
    } else {
        counts.push((symbol, n));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_compound() {
        let f = parse("H2O").unwrap();
        assert_eq!(f.counts, vec![("H".to_string(), 2), ("O".to_string(), 1)]);
    }

    #[test]
    fn parses_parenthesized_group_with_brace_subscript() {
        let f = parse("Fe(NO3)_{2}").unwrap();
        assert_eq!(
            f.counts,
            vec![
                ("Fe".to_string(), 1),
                ("N".to_string(), 2),
                ("O".to_string(), 6),
            ]
        );
    }

    #[test]
    fn parses_bare_trailing_subscript() {
        let f = parse("Cu(OH)2").unwrap();
        assert_eq!(
            f.counts,
            vec![("Cu".to_string(), 1), ("O".to_string(), 2), ("H".to_string(), 2)]
        );
    }

    #[test]
    fn parses_charge_superscript() {
        let f = parse("H2O^{2+}").unwrap();
        assert_eq!(f.charge, 2);
    }

    #[test]
    fn equality_is_multiset_equality() {
        assert_eq!(parse("H2O").unwrap(), parse("OH2").unwrap());
    }

    #[test]
    fn unknown_element_is_an_error() {
        assert!(parse("Xx2").is_err());
    }

    #[test]
    fn unbalanced_parenthesis_is_an_error() {
        assert!(parse("(NaCl").is_err());
        assert!(parse("NaCl)").is_err());
    }
}
