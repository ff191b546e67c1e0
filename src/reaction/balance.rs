/*!
The null-space solver behind [`super::Reaction::balance`]: build the
element/charge conservation matrix, row-reduce it over `num::BigRational`,
and read off the 1-dimensional null space as the smallest positive integer
coefficient vector.
*/

use super::Reaction;
use crate::error::{CLError, CLResult, ErrorKind};
use num::{BigInt, BigRational, One, Signed, Zero};
use std::collections::BTreeSet;

pub(super) fn balance(reaction: &mut Reaction) -> CLResult<()> {
    let mut elements: BTreeSet<String> = BTreeSet::new();
    for species in reaction.reactants.iter().chain(reaction.products.iter()) {
        for (symbol, _) in &species.formula.counts {
            elements.insert(symbol.clone());
        }
    }
    let elements: Vec<String> = elements.into_iter().collect();
    let cols = reaction.reactants.len() + reaction.products.len();
    let rows = elements.len() + 1; // + charge row

    let mut matrix: Vec<Vec<BigRational>> = vec![vec![BigRational::zero(); cols]; rows];
    for (col, species) in reaction.reactants.iter().chain(reaction.products.iter()).enumerate() {
        let sign: i64 = if col < reaction.reactants.len() { 1 } else { -1 };
        for (row, element) in elements.iter().enumerate() {
            let count = species
                .formula
                .counts
                .iter()
                .find(|(symbol, _)| symbol == element)
                .map(|(_, n)| *n)
                .unwrap_or(0);
            matrix[row][col] = BigRational::from_integer(BigInt::from(sign * i64::from(count)));
        }
        let charge_row = elements.len();
        matrix[charge_row][col] = BigRational::from_integer(BigInt::from(sign * i64::from(species.formula.charge)));
    }

    tracing::debug!(rows, cols, elements = elements.len(), "balancing reaction conservation matrix");
    let solution = null_space_basis(rows, cols, &matrix)
        .map_err(|msg| CLError::new(ErrorKind::UnbalanceableReaction(msg)))?;
    let coefficients = to_smallest_positive_integers(&solution)
        .map_err(|msg| CLError::new(ErrorKind::UnbalanceableReaction(msg)))?;
    tracing::trace!(?coefficients, "reaction balanced");

    for (species, coeff) in reaction
        .reactants
        .iter_mut()
        .chain(reaction.products.iter_mut())
        .zip(coefficients)
    {
        species.coefficient = Some(coeff);
    }
    Ok(())
}

/// Row-reduces `matrix` to reduced row-echelon form and returns the unique
/// null-space basis vector, if the null space is exactly 1-dimensional.
fn null_space_basis(rows: usize, cols: usize, matrix: &[Vec<BigRational>]) -> Result<Vec<BigRational>, String> {
    let mut m: Vec<Vec<BigRational>> = matrix.to_vec();
    let mut pivot_cols: Vec<usize> = Vec::new();
    let mut pivot_row = 0;

    for col in 0..cols {
        if pivot_row >= rows {
            break;
        }
        let Some(sel) = (pivot_row..rows).find(|&r| !m[r][col].is_zero()) else {
            continue;
        };
        m.swap(pivot_row, sel);
        let pivot_val = m[pivot_row][col].clone();
        for c in 0..cols {
            m[pivot_row][c] = &m[pivot_row][c] / &pivot_val;
        }
        for r in 0..rows {
            if r != pivot_row && !m[r][col].is_zero() {
                let factor = m[r][col].clone();
                for c in 0..cols {
                    let delta = &factor * &m[pivot_row][c];
                    m[r][c] = &m[r][c] - &delta;
                }
            }
        }
        pivot_cols.push(col);
        pivot_row += 1;
    }

    let free_cols: Vec<usize> = (0..cols).filter(|c| !pivot_cols.contains(c)).collect();
    if free_cols.len() != 1 {
        return Err(format!(
            "expected a one-dimensional solution space, found dimension {}",
            free_cols.len()
        ));
    }
    let free = free_cols[0];

    let mut x = vec![BigRational::zero(); cols];
    x[free] = BigRational::one();
    for (row_idx, &pc) in pivot_cols.iter().enumerate() {
        x[pc] = -m[row_idx][free].clone();
    }
    Ok(x)
}

/// Clears denominators and reduces by gcd to the smallest positive integer
/// coefficient vector, forcing a uniform sign: a null-space vector is only
/// defined up to scale and sign, and a balanced equation needs both fixed.
fn to_smallest_positive_integers(x: &[BigRational]) -> Result<Vec<u64>, String> {
    if x.iter().all(|v| v.is_zero()) {
        return Err("the only solution is the trivial all-zero vector".to_string());
    }
    let lcm_denominator = x.iter().fold(BigInt::one(), |acc, v| lcm(&acc, v.denom()));
    let mut integers: Vec<BigInt> = x.iter().map(|v| (v * BigRational::from_integer(lcm_denominator.clone())).to_integer()).collect();

    let negative_count = integers.iter().filter(|v| v.is_negative()).count();
    let positive_count = integers.iter().filter(|v| v.is_positive()).count();
    if negative_count > 0 && positive_count > 0 {
        return Err("solution vector mixes positive and negative coefficients".to_string());
    }
    if negative_count > 0 {
        for v in &mut integers {
            *v = -v.clone();
        }
    }

    let gcd_all = integers.iter().fold(BigInt::zero(), |acc, v| gcd(&acc, v));
    if !gcd_all.is_zero() {
        for v in &mut integers {
            *v /= &gcd_all;
        }
    }

    integers
        .into_iter()
        .map(|v| v.to_string().parse::<u64>().map_err(|_| "coefficient too large to represent".to_string()))
        .collect()
}

fn gcd(a: &BigInt, b: &BigInt) -> BigInt {
    let (mut a, mut b) = (a.abs(), b.abs());
    while !b.is_zero() {
        let r = &a % &b;
        a = b;
        b = r;
    }
    a
}

fn lcm(a: &BigInt, b: &BigInt) -> BigInt {
    if a.is_zero() || b.is_zero() {
        return BigInt::zero();
    }
    (a * b).abs() / gcd(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula;
    use crate::reaction::Reaction;

    #[test]
    fn balances_combustion_of_methane() {
        let mut reaction = Reaction::new(
            vec![formula::parse("CH4").unwrap(), formula::parse("O2").unwrap()],
            vec![formula::parse("CO2").unwrap(), formula::parse("H2O").unwrap()],
        );
        reaction.balance().unwrap();
        let coeffs: Vec<u64> = reaction
            .reactants
            .iter()
            .chain(reaction.products.iter())
            .map(|s| s.coefficient.unwrap())
            .collect();
        assert_eq!(coeffs, vec![1, 2, 1, 2]);
    }

    #[test]
    fn rejects_a_reaction_with_no_unique_balance() {
        let mut reaction = Reaction::new(vec![formula::parse("H2").unwrap()], vec![formula::parse("O2").unwrap()]);
        assert!(reaction.balance().is_err());
    }
}
