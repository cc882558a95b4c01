use std::collections::{HashMap, HashSet};

use crate::record::Edge;

/// Deduplicated adjacency structure for one edge group.
///
/// Node names are interned to dense indices in first-seen order; successor
/// lists keep the order in which each distinct edge first appeared.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    names: Vec<String>,
    index: HashMap<String, usize>,
    successors: Vec<Vec<usize>>,
    edge_count: usize,
}

impl Graph {
    /// Build a graph from a group's edges, dropping repeated
    /// `(source, destination)` pairs.
    pub fn from_edges(edges: &[Edge]) -> Self {
        let mut graph = Graph::default();
        let mut seen: HashSet<(usize, usize)> = HashSet::with_capacity(edges.len());

        for edge in edges {
            let src = graph.intern(&edge.source);
            let dst = graph.intern(&edge.destination);
            if seen.insert((src, dst)) {
                graph.successors[src].push(dst);
                graph.edge_count += 1;
            }
        }
        graph
    }

    fn intern(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.names.len();
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), idx);
        self.successors.push(Vec::new());
        idx
    }

    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Number of distinct edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn name(&self, node: usize) -> &str {
        &self.names[node]
    }

    pub fn node_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// All node names, sources and destinations alike.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn successors(&self, node: usize) -> &[usize] {
        &self.successors[node]
    }

    /// Successor names of `name`, empty for unknown nodes and sinks.
    #[cfg(test)]
    pub fn successors_of(&self, name: &str) -> Vec<&str> {
        self.node_index(name)
            .map(|idx| self.successors[idx].iter().map(|&s| self.name(s)).collect())
            .unwrap_or_default()
    }

    pub fn has_self_loop(&self, node: usize) -> bool {
        self.successors[node].contains(&node)
    }
}
