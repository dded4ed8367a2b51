//! # treering-poly
//!
//! Polynomial algebra for moment closure.
//!
//! This crate provides:
//! - Interned symbols tagged as state or disturbance variables
//! - Exact rational coefficients backed by `dashu`
//! - Canonical sparse monomials (zero exponents never stored)
//! - Sparse multivariate polynomials with support extraction over an
//!   ordered list of generators
//!
//! ## Canonical Form
//!
//! Monomials keep their `(symbol, exponent)` pairs sorted by symbol with
//! every exponent positive, so two variable-power mappings that differ only
//! in zero entries or insertion order compare and hash equal.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod coeff;
pub mod error;
pub mod monomial;
pub mod polynomial;
pub mod symbol;

#[cfg(test)]
mod proptests;

pub use coeff::Coeff;
pub use error::PolyError;
pub use monomial::Monomial;
pub use polynomial::Polynomial;
pub use symbol::{Symbol, SymbolKind, SymbolTable};
