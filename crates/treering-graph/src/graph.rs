//! Undirected graphs over copyable node ids.
//!
//! Adjacency lists are kept inline for low-degree nodes, which is the
//! common case for sparse interaction structures.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::GraphError;

/// An undirected simple graph.
///
/// Self-loops are ignored: they never change connectivity.
#[derive(Clone, Debug)]
pub struct UndirectedGraph<N> {
    /// Neighbour lists, one per node.
    adjacency: FxHashMap<N, SmallVec<[N; 4]>>,
    /// Nodes in insertion order.
    nodes: Vec<N>,
    /// Number of distinct edges.
    edge_count: usize,
}

impl<N> Default for UndirectedGraph<N> {
    fn default() -> Self {
        Self {
            adjacency: FxHashMap::default(),
            nodes: Vec::new(),
            edge_count: 0,
        }
    }
}

impl<N: Copy + Eq + Hash + Ord + Debug> UndirectedGraph<N> {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a graph with the given nodes and no edges.
    #[must_use]
    pub fn with_nodes(nodes: impl IntoIterator<Item = N>) -> Self {
        let mut graph = Self::new();
        for n in nodes {
            graph.add_node(n);
        }
        graph
    }

    /// Creates a graph from an edge list.
    #[must_use]
    pub fn from_edges(edges: impl IntoIterator<Item = (N, N)>) -> Self {
        let mut graph = Self::new();
        for (a, b) in edges {
            graph.add_edge(a, b);
        }
        graph
    }

    /// Adds a node. Returns false if it was already present.
    pub fn add_node(&mut self, n: N) -> bool {
        if self.adjacency.contains_key(&n) {
            return false;
        }
        self.adjacency.insert(n, SmallVec::new());
        self.nodes.push(n);
        true
    }

    /// Adds an edge, inserting missing endpoints.
    ///
    /// Returns false if the edge already existed or is a self-loop.
    pub fn add_edge(&mut self, a: N, b: N) -> bool {
        self.add_node(a);
        self.add_node(b);

        if a == b || self.has_edge(a, b) {
            return false;
        }

        if let Some(list) = self.adjacency.get_mut(&a) {
            list.push(b);
        }
        if let Some(list) = self.adjacency.get_mut(&b) {
            list.push(a);
        }
        self.edge_count += 1;
        true
    }

    /// Returns true if the node is in the graph.
    #[must_use]
    pub fn contains_node(&self, n: N) -> bool {
        self.adjacency.contains_key(&n)
    }

    /// Returns true if `a` and `b` are adjacent.
    #[must_use]
    pub fn has_edge(&self, a: N, b: N) -> bool {
        self.adjacency.get(&a).is_some_and(|list| list.contains(&b))
    }

    /// Returns the neighbours of a node.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] if the node is not in the graph.
    pub fn neighbors(&self, n: N) -> Result<&[N], GraphError> {
        self.adjacency
            .get(&n)
            .map(SmallVec::as_slice)
            .ok_or_else(|| GraphError::UnknownNode(format!("{n:?}")))
    }

    /// Returns the nodes in insertion order.
    #[must_use]
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Returns the subgraph induced by `subset`.
    ///
    /// The result keeps exactly the nodes of `subset` and every edge of
    /// `self` with both endpoints in `subset`. Repeated nodes are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] if a node of `subset` is not in
    /// the graph.
    pub fn induced_subgraph(&self, subset: &[N]) -> Result<Self, GraphError> {
        let keep: FxHashSet<N> = subset.iter().copied().collect();
        let mut sub = Self::new();

        for &n in subset {
            let neighbors = self.neighbors(n)?;
            sub.add_node(n);
            for &m in neighbors {
                if keep.contains(&m) {
                    sub.add_edge(n, m);
                }
            }
        }

        Ok(sub)
    }

    /// Finds the connected components using BFS.
    ///
    /// Each component is sorted; components are ordered by their smallest
    /// node. Isolated nodes form singleton components.
    #[must_use]
    pub fn connected_components(&self) -> Vec<Vec<N>> {
        let mut visited: FxHashSet<N> = FxHashSet::default();
        let mut components: Vec<Vec<N>> = Vec::new();

        for &start in &self.nodes {
            if !visited.insert(start) {
                continue;
            }
            let mut component = vec![start];
            let mut queue = VecDeque::from([start]);

            while let Some(node) = queue.pop_front() {
                for &neighbor in &self.adjacency[&node] {
                    if visited.insert(neighbor) {
                        component.push(neighbor);
                        queue.push_back(neighbor);
                    }
                }
            }

            component.sort_unstable();
            components.push(component);
        }

        components.sort_unstable_by_key(|c| c[0]);
        components
    }

    /// Connected components of the subgraph induced by `subset`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] if a node of `subset` is not in
    /// the graph.
    pub fn components_of(&self, subset: &[N]) -> Result<Vec<Vec<N>>, GraphError> {
        Ok(self.induced_subgraph(subset)?.connected_components())
    }

    /// Returns true if the graph has at most one component.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected_components().len() <= 1
    }
}
