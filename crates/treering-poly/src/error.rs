//! Errors raised by the polynomial layer.

use thiserror::Error;

use crate::symbol::SymbolKind;

/// Errors that can occur while building or decomposing polynomials.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PolyError {
    /// A symbol id that was never interned in the table.
    #[error("unknown symbol #{0}")]
    UnknownSymbol(u32),

    /// A name was declared twice with different kinds.
    #[error("symbol `{name}` already declared as a {existing} variable")]
    KindConflict {
        /// The symbol name.
        name: String,
        /// The kind it was first declared with.
        existing: SymbolKind,
    },

    /// A state symbol appears in a polynomial but not in the generator list.
    #[error("state symbol `{0}` is not among the expansion generators")]
    StrayGenerator(String),

    /// An exponent does not fit in `u32`.
    #[error("exponent overflow: a power exceeds u32::MAX")]
    ExponentOverflow,

    /// The symbol table has no ids left.
    #[error("symbol table capacity of {0} symbols exceeded")]
    CapacityExceeded(u32),
}
