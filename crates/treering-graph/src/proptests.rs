//! Property-based tests for induced components.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::graph::UndirectedGraph;

    const NUM_NODES: u32 = 8;

    // Strategy for random sparse graphs over a fixed node set
    fn sparse_graph() -> impl Strategy<Value = UndirectedGraph<u32>> {
        proptest::collection::vec((0..NUM_NODES, 0..NUM_NODES), 0..12).prop_map(|edges| {
            let mut g = UndirectedGraph::with_nodes(0..NUM_NODES);
            for (a, b) in edges {
                g.add_edge(a, b);
            }
            g
        })
    }

    fn node_subset() -> impl Strategy<Value = Vec<u32>> {
        proptest::collection::btree_set(0..NUM_NODES, 0..=NUM_NODES as usize)
            .prop_map(|s| s.into_iter().collect())
    }

    proptest! {
        #[test]
        fn components_partition_subset(g in sparse_graph(), subset in node_subset()) {
            let components = g.components_of(&subset).unwrap();

            let mut covered: Vec<u32> = components.iter().flatten().copied().collect();
            covered.sort_unstable();
            prop_assert_eq!(covered, subset);
        }

        #[test]
        fn components_are_not_adjacent(g in sparse_graph(), subset in node_subset()) {
            let components = g.components_of(&subset).unwrap();

            for (i, left) in components.iter().enumerate() {
                for right in &components[i + 1..] {
                    for &a in left {
                        for &b in right {
                            prop_assert!(!g.has_edge(a, b));
                        }
                    }
                }
            }
        }

        #[test]
        fn full_subset_matches_graph(g in sparse_graph()) {
            let all: Vec<u32> = (0..NUM_NODES).collect();
            prop_assert_eq!(g.components_of(&all).unwrap(), g.connected_components());
        }
    }
}
