/*!
Chemical reactions and the stoichiometric balancer.

A [`Reaction`] starts out as an unbalanced skeleton - a list of reactant and
product formulas, as written in a `:...:` reaction literal - and
[`Reaction::balance`] fills in the smallest positive integer coefficients by
a null-space search over the element/charge conservation matrix, built on
the same exact-rational arithmetic (`num::BigRational`) `ChainSafe-forest`
uses for reward-curve math in `actors/reward_v9/src/logic.rs`, here
generalized from a single fixed-size ratio to a full linear system.
*/

pub mod balance;

use crate::error::CLResult;
use crate::formula::Formula;
use std::fmt;

/// One reactant or product, with its balanced coefficient once
/// [`Reaction::balance`] has run.
#[derive(Debug, Clone)]
pub struct Species {
    pub formula: Formula,
    pub coefficient: Option<u64>,
}

impl Species {
    pub fn new(formula: Formula) -> Species {
        Species { formula, coefficient: None }
    }
}

#[derive(Debug, Clone)]
pub struct Reaction {
    pub reactants: Vec<Species>,
    pub products: Vec<Species>,
}

impl Reaction {
    pub fn new(reactants: Vec<Formula>, products: Vec<Formula>) -> Reaction {
        Reaction {
            reactants: reactants.into_iter().map(Species::new).collect(),
            products: products.into_iter().map(Species::new).collect(),
        }
    }

    /// Assigns smallest positive integer coefficients to every species.
    /// Idempotent: balancing twice produces the same coefficients.
    pub fn balance(&mut self) -> CLResult<()> {
        balance::balance(self)
    }

    /// The coefficient of `formula` on whichever side it appears (needed to
    /// compute a reaction-mediated conversion ratio). Returns `None` if the
    /// formula is not a species of this reaction, or balancing has not run
    /// yet.
    pub fn coefficient_of(&self, formula: &Formula) -> Option<u64> {
        self.reactants
            .iter()
            .chain(self.products.iter())
            .find(|s| &s.formula == formula)
            .and_then(|s| s.coefficient)
    }

    /// Whether `formula` is a reactant (`true`) or a product (`false`) of
    /// this reaction.
    pub fn side_of(&self, formula: &Formula) -> Option<bool> {
        if self.reactants.iter().any(|s| &s.formula == formula) {
            Some(true)
        } else if self.products.iter().any(|s| &s.formula == formula) {
            Some(false)
        } else {
            None
        }
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_side(f, &self.reactants)?;
        write!(f, " -> ")?;
        write_side(f, &self.products)
    }
}

fn write_side(f: &mut fmt::Formatter<'_>, side: &[Species]) -> fmt::Result {
    for (i, species) in side.iter().enumerate() {
        if i > 0 {
            write!(f, " + ")?;
        }
        match species.coefficient {
            Some(1) | None => write!(f, "{}", species.formula)?,
            Some(n) => write!(f, "{n} {}", species.formula)?,
        }
    }
    Ok(())
}
