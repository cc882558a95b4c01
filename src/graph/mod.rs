//! Graph algorithms for routing cycle detection.

pub mod build;
pub mod cycle;
pub mod scc;

pub use build::Graph;
pub use cycle::{longest_cycle, longest_cycle_through, SubGraph};
pub use scc::{tarjan_sccs, Scc};

use crate::record::Edge;

/// Longest simple cycle formed by a group's edges, in hops.
///
/// Duplicate edges are ignored. Returns 0 when the edges form no cycle.
pub fn find_longest_cycle(edges: &[Edge], max_path_length: usize) -> usize {
    let graph = Graph::from_edges(edges);
    if graph.is_empty() {
        return 0;
    }
    longest_cycle(&graph, max_path_length)
}
