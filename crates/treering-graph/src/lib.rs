//! # treering-graph
//!
//! Dependence graphs for moment closure.
//!
//! An edge between two state variables states that they may appear together
//! in a coupled interaction term. The closure engine only needs three things
//! from a graph:
//! - the graph itself, undirected, over state variables
//! - the subgraph induced by an arbitrary subset of nodes
//! - the connected components of that subgraph

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod graph;

#[cfg(test)]
mod proptests;

pub use error::GraphError;
pub use graph::UndirectedGraph;
