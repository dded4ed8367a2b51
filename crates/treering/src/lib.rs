//! # Treering
//!
//! Moment closure for discrete-time stochastic systems with polynomial
//! update rules.
//!
//! ## Features
//!
//! - **Exact Arithmetic**: Sparse polynomials over arbitrary precision rationals
//! - **Graph-Aware Closure**: Monomials split along the dependence graph
//! - **Bounded Search**: Basis size, degree and depth limits
//! - **Update Forms**: Expected updates expressed over the closed basis
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use treering::prelude::*;
//!
//! let mut system = PolynomialSystem::new();
//! let x = system.add_state("x")?;
//! let w = system.add_disturbance("w", Moments::Bernoulli(Coeff::new(1, 2)))?;
//! system.define(x, Polynomial::var(x).add(&Polynomial::var(w)))?;
//!
//! let basis = system.complete(&[(x, 2)], UpdateForm::Reduced, CompletionLimits::default())?;
//! let updates = system.update_form(&basis, UpdateForm::Reduced)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use treering_graph as graph;
pub use treering_moments as moments;
pub use treering_poly as poly;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use treering_graph::UndirectedGraph;
    pub use treering_moments::{
        BasisVariable, CompletionError, CompletionLimits, MomentBasis, MomentUpdate, Moments,
        PolynomialSystem, UpdateForm,
    };
    pub use treering_poly::{Coeff, Monomial, Polynomial, Symbol, SymbolTable};
}
