//! Capabilities the completion engine needs from its collaborators.
//!
//! The engine never looks inside expressions or graphs. Any algebra backend
//! that can multiply, exponentiate and report the support of an expression,
//! and any dependence structure that can split a set of variables into
//! connected components, can drive a completion.

use std::fmt::Debug;

use treering_graph::UndirectedGraph;
use treering_poly::polynomial::ExponentTuple;
use treering_poly::Symbol;

use crate::error::CompletionError;

/// The algebra of update relations.
pub trait UpdateAlgebra {
    /// The expression type of update relations.
    type Expr: Clone + Debug;

    /// The multiplicative identity (update of the constant monomial).
    fn unit(&self) -> Self::Expr;

    /// Returns the update relation of a state variable.
    ///
    /// # Errors
    ///
    /// Fails if `var` is not a state variable with a defined relation.
    fn update_relation(&self, var: Symbol) -> Result<&Self::Expr, CompletionError>;

    /// Multiplies two expressions.
    ///
    /// # Errors
    ///
    /// Fails if the product is not representable, e.g. an exponent
    /// overflows.
    fn multiply(&self, lhs: &Self::Expr, rhs: &Self::Expr) -> Result<Self::Expr, CompletionError>;

    /// Raises an expression to a non-negative power.
    ///
    /// # Errors
    ///
    /// Fails if the power is not representable.
    fn power(&self, base: &Self::Expr, exp: u32) -> Result<Self::Expr, CompletionError>;

    /// Expands `expr` as a polynomial in the ordered `gens` and returns the
    /// distinct exponent tuples of its terms.
    ///
    /// # Errors
    ///
    /// Fails if `expr` is not polynomial in `gens` over the remaining
    /// symbols.
    fn exponent_tuples(
        &self,
        expr: &Self::Expr,
        gens: &[Symbol],
    ) -> Result<Vec<ExponentTuple>, CompletionError>;
}

/// Graph decomposition of active variables.
pub trait DependenceStructure {
    /// Connected components of the subgraph induced by `active`.
    ///
    /// # Errors
    ///
    /// Fails if a variable of `active` is not a node of the structure.
    fn components(&self, active: &[Symbol]) -> Result<Vec<Vec<Symbol>>, CompletionError>;
}

impl DependenceStructure for UndirectedGraph<Symbol> {
    fn components(&self, active: &[Symbol]) -> Result<Vec<Vec<Symbol>>, CompletionError> {
        Ok(self.components_of(active)?)
    }
}

/// Equivalence of a tracked monomial with a raw variable-power mapping.
pub trait EquivalentPowers {
    /// Returns true if the mapping denotes the same monomial, ignoring zero
    /// entries and ordering.
    fn is_equivalent(&self, mapping: &[(Symbol, u32)]) -> bool;
}
