//! Errors raised while completing a moment basis.

use thiserror::Error;
use treering_graph::GraphError;
use treering_poly::PolyError;

/// Errors that abort a basis completion.
///
/// Precondition violations come from the algebra and graph layers; the
/// `*LimitExceeded` variants mean the configured [`CompletionLimits`] were
/// too small for the model, or the model never closes.
///
/// [`CompletionLimits`]: crate::limits::CompletionLimits
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CompletionError {
    /// The polynomial layer rejected an expression.
    #[error(transparent)]
    Poly(#[from] PolyError),

    /// The dependence graph rejected a query.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// A state variable was expanded before its update relation was defined.
    #[error("state variable `{0}` has no update relation")]
    MissingUpdateRelation(String),

    /// An update relation or disturbance was defined twice.
    #[error("`{0}` is already defined")]
    AlreadyDefined(String),

    /// A symbol was used where a state variable is required.
    #[error("symbol `{0}` is not a state variable")]
    NotAState(String),

    /// A symbol was used where a disturbance variable is required.
    #[error("symbol `{0}` is not a disturbance variable")]
    NotADisturbance(String),

    /// The basis already holds the maximum number of variables.
    #[error("moment basis reached its limit of {limit} variables")]
    BasisLimitExceeded {
        /// The configured limit.
        limit: usize,
    },

    /// A discovered monomial exceeds the degree limit.
    #[error("monomial {monomial} has degree {degree}, above the limit of {limit}")]
    DegreeLimitExceeded {
        /// The offending monomial.
        monomial: String,
        /// Its total degree.
        degree: u64,
        /// The configured limit.
        limit: u32,
    },

    /// The discovery chain grew deeper than allowed.
    #[error("expansion depth exceeded the limit of {limit}")]
    DepthLimitExceeded {
        /// The configured limit.
        limit: usize,
    },

    /// A disturbance moment needed for an expectation is unknown.
    #[error("disturbance `{name}` has no moment of order {order}")]
    MissingMoment {
        /// The disturbance name.
        name: String,
        /// The requested order.
        order: u32,
    },

    /// An update refers to a monomial the basis does not contain.
    #[error("monomial {0} is not represented in the moment basis")]
    NotClosed(String),
}
