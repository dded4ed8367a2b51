//! # treering-moments
//!
//! Moment closure for stochastic systems with polynomial update rules.
//!
//! Starting from a monomial of state variables, the completion engine
//! builds the monomial's one-step update expression, expands it, and keeps
//! materializing basis variables for every monomial the update introduces
//! until the basis is closed under the dynamics.
//!
//! ## Update Forms
//!
//! - **Unreduced**: every discovered monomial is tracked as a whole.
//! - **Reduced**: a discovered monomial is split into the connected
//!   components its variables induce in the dependence graph, and each
//!   component is tracked on its own.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use treering_moments::{CompletionLimits, PolynomialSystem, UpdateForm};
//! use treering_poly::Polynomial;
//!
//! let mut system = PolynomialSystem::new();
//! let x = system.add_state("x")?;
//! let y = system.add_state("y")?;
//! system.define(x, Polynomial::var(x).add(&Polynomial::var(y)))?;
//! system.define(y, Polynomial::var(y))?;
//! system.couple(x, y)?;
//!
//! let basis = system.complete(&[(x, 1)], UpdateForm::Reduced, CompletionLimits::default())?;
//! assert_eq!(basis.len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod basis;
pub mod engine;
pub mod error;
pub mod limits;
pub mod system;
pub mod traits;
pub mod update_form;
pub mod variables;

#[cfg(test)]
mod proptests;

pub use basis::{BasisVariable, MomentBasis};
pub use engine::{expand, BasisCompletion};
pub use error::CompletionError;
pub use limits::{CompletionLimits, UpdateForm};
pub use system::PolynomialSystem;
pub use traits::{DependenceStructure, EquivalentPowers, UpdateAlgebra};
pub use update_form::{MomentTerm, MomentUpdate};
pub use variables::{DisturbanceVariable, Moments, StateVariable};
