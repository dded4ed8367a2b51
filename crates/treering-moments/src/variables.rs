//! State and disturbance variables.

use num_traits::One;
use treering_poly::{Coeff, Polynomial, Symbol};

/// A state variable together with its update relation.
///
/// The relation gives the variable's value one time step later as a
/// polynomial in state and disturbance symbols. It never changes once
/// defined.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateVariable {
    symbol: Symbol,
    update_relation: Polynomial,
}

impl StateVariable {
    /// Creates a state variable.
    #[must_use]
    pub fn new(symbol: Symbol, update_relation: Polynomial) -> Self {
        Self {
            symbol,
            update_relation,
        }
    }

    /// Returns the symbol.
    #[must_use]
    pub fn symbol(&self) -> Symbol {
        self.symbol
    }

    /// Returns the update relation.
    #[must_use]
    pub fn update_relation(&self) -> &Polynomial {
        &self.update_relation
    }
}

/// Raw moments `E[w^k]` of a disturbance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Moments {
    /// Explicit moments; entry `k - 1` holds `E[w^k]`.
    Listed(Vec<Coeff>),
    /// A Bernoulli variable with success probability `p`: every moment is `p`.
    Bernoulli(Coeff),
    /// A degenerate variable that always equals `c`: `E[w^k] = c^k`.
    Constant(Coeff),
}

/// An exogenous noise variable.
///
/// Disturbances are never expanded; they only contribute expectations when
/// a basis variable's update is expressed over the basis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisturbanceVariable {
    symbol: Symbol,
    moments: Moments,
}

impl DisturbanceVariable {
    /// Creates a disturbance variable.
    #[must_use]
    pub fn new(symbol: Symbol, moments: Moments) -> Self {
        Self { symbol, moments }
    }

    /// Returns the symbol.
    #[must_use]
    pub fn symbol(&self) -> Symbol {
        self.symbol
    }

    /// Returns the moment description.
    #[must_use]
    pub fn moments(&self) -> &Moments {
        &self.moments
    }

    /// Returns `E[w^order]`, or `None` if it is not known.
    #[must_use]
    pub fn moment(&self, order: u32) -> Option<Coeff> {
        if order == 0 {
            return Some(Coeff::one());
        }
        match &self.moments {
            Moments::Listed(list) => list.get(order as usize - 1).cloned(),
            Moments::Bernoulli(p) => Some(p.clone()),
            Moments::Constant(c) => Some(c.pow(order)),
        }
    }
}
