//! Expected updates expressed over a closed basis.
//!
//! Disturbances are assumed mutually independent and independent of the
//! current state, so the expectation of a term factors into the state
//! monomial times the product of the disturbance moments.

use num_traits::{One, Zero};
use smallvec::SmallVec;
use std::fmt;

use treering_poly::{Coeff, Monomial, Polynomial, Symbol, SymbolKind, SymbolTable};

use crate::basis::MomentBasis;
use crate::error::CompletionError;
use crate::limits::UpdateForm;
use crate::system::PolynomialSystem;
use crate::traits::DependenceStructure;

/// One term of an expected update: a coefficient times a product of basis
/// variables, referenced by basis position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MomentTerm {
    /// The coefficient.
    pub coeff: Coeff,
    /// Basis positions of the factors, ascending. Empty for a constant.
    pub factors: SmallVec<[usize; 2]>,
}

/// The expected one-step update of one basis variable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MomentUpdate {
    /// Basis position of the updated variable.
    pub target: usize,
    /// Terms of the update; no two share the same factors.
    pub terms: Vec<MomentTerm>,
}

impl MomentUpdate {
    /// Returns a displayable view naming basis variables through `basis` and
    /// `table`.
    #[must_use]
    pub fn display<'a>(
        &'a self,
        basis: &'a MomentBasis,
        table: &'a SymbolTable,
    ) -> DisplayUpdate<'a> {
        DisplayUpdate {
            update: self,
            basis,
            table,
        }
    }
}

impl PolynomialSystem {
    /// Takes the expectation of `expr` over the disturbances.
    ///
    /// Returns the state monomials of `expr` paired with their expected
    /// coefficients, in descending graded order. Monomials whose expected
    /// coefficient vanishes are dropped.
    ///
    /// # Errors
    ///
    /// Fails if a non-state symbol of `expr` is not a declared disturbance,
    /// or a required moment is unknown.
    pub fn expectation(&self, expr: &Polynomial) -> Result<Vec<(Monomial, Coeff)>, CompletionError> {
        let table = self.symbols();
        let groups = expr.collect_by(|s| matches!(table.kind(s), Ok(SymbolKind::State)));

        let mut expected = Vec::with_capacity(groups.len());
        for (state_part, noise) in groups {
            let mut total = Coeff::zero();
            for (m, c) in noise.terms() {
                let mut value = c.clone();
                for &(w, order) in m.powers() {
                    value = value * self.moment_of(w, order)?;
                }
                total = total + value;
            }
            if !total.is_zero() {
                expected.push((state_part, total));
            }
        }
        Ok(expected)
    }

    /// Expresses the expected update of every basis variable over `basis`.
    ///
    /// # Errors
    ///
    /// Returns [`CompletionError::NotClosed`] if a monomial (or, in reduced
    /// form, a component of one) is not tracked by the basis, and propagates
    /// expectation failures.
    pub fn update_form(
        &self,
        basis: &MomentBasis,
        form: UpdateForm,
    ) -> Result<Vec<MomentUpdate>, CompletionError> {
        let mut updates = Vec::with_capacity(basis.len());
        for (target, variable) in basis.iter().enumerate() {
            let mut terms = Vec::new();
            for (monomial, coeff) in self.expectation(variable.update_relation())? {
                let factors = self.factor_positions(&monomial, basis, form)?;
                terms.push(MomentTerm { coeff, factors });
            }
            updates.push(MomentUpdate { target, terms });
        }
        Ok(updates)
    }

    fn factor_positions(
        &self,
        monomial: &Monomial,
        basis: &MomentBasis,
        form: UpdateForm,
    ) -> Result<SmallVec<[usize; 2]>, CompletionError> {
        if monomial.is_one() {
            return Ok(SmallVec::new());
        }

        let position = |m: &Monomial| {
            basis.position(m).ok_or_else(|| {
                CompletionError::NotClosed(m.display(self.symbols()).to_string())
            })
        };

        let mut factors: SmallVec<[usize; 2]> = match form {
            UpdateForm::Unreduced => smallvec::smallvec![position(monomial)?],
            UpdateForm::Reduced => {
                let active: Vec<Symbol> = monomial.symbols().collect();
                self.dependence_graph()
                    .components(&active)?
                    .iter()
                    .map(|component| position(&monomial.restrict(component)))
                    .collect::<Result<_, _>>()?
            }
        };
        factors.sort_unstable();
        Ok(factors)
    }

    fn moment_of(&self, symbol: Symbol, order: u32) -> Result<Coeff, CompletionError> {
        let name = || self.symbols().display_name(symbol);
        let disturbance = self
            .disturbance(symbol)
            .ok_or_else(|| CompletionError::NotADisturbance(name()))?;
        disturbance
            .moment(order)
            .ok_or_else(|| CompletionError::MissingMoment {
                name: name(),
                order,
            })
    }
}

/// A [`MomentUpdate`] paired with the names it needs.
pub struct DisplayUpdate<'a> {
    update: &'a MomentUpdate,
    basis: &'a MomentBasis,
    table: &'a SymbolTable,
}

impl DisplayUpdate<'_> {
    fn write_factor(&self, f: &mut fmt::Formatter<'_>, position: usize) -> fmt::Result {
        match self.basis.get(position) {
            Some(v) => write!(f, "E[{}]", v.monomial().display(self.table)),
            None => write!(f, "E[#{position}]"),
        }
    }
}

impl fmt::Display for DisplayUpdate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_factor(f, self.update.target)?;
        write!(f, "' = ")?;

        if self.update.terms.is_empty() {
            return write!(f, "0");
        }

        for (i, term) in self.update.terms.iter().enumerate() {
            let negative = term.coeff.is_negative();
            let magnitude = if negative { -term.coeff.clone() } else { term.coeff.clone() };
            match (i, negative) {
                (0, true) => write!(f, "-")?,
                (0, false) => {}
                (_, true) => write!(f, " - ")?,
                (_, false) => write!(f, " + ")?,
            }

            if term.factors.is_empty() {
                write!(f, "{magnitude}")?;
                continue;
            }
            if !magnitude.is_one() {
                write!(f, "{magnitude}*")?;
            }
            for (j, &position) in term.factors.iter().enumerate() {
                if j > 0 {
                    write!(f, "*")?;
                }
                self.write_factor(f, position)?;
            }
        }
        Ok(())
    }
}
