//! Graph errors.

use thiserror::Error;

/// Errors raised by graph queries.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A node was referenced that is not part of the graph.
    #[error("node {0} is not in the dependence graph")]
    UnknownNode(String),
}
