//! Longest simple cycle search inside a strongly connected component.

use super::build::Graph;
use super::scc::{tarjan_sccs, Scc};

/// A component's induced subgraph, re-indexed densely from zero.
#[derive(Debug, Clone)]
pub struct SubGraph {
    nodes: Vec<usize>,
    successors: Vec<Vec<usize>>,
}

impl SubGraph {
    /// Keep only the edges of `graph` whose endpoints both lie in `scc`.
    pub fn restrict(graph: &Graph, scc: &Scc) -> Self {
        let mut local = vec![usize::MAX; graph.node_count()];
        for (i, &node) in scc.nodes().iter().enumerate() {
            local[node] = i;
        }

        let successors = scc
            .nodes()
            .iter()
            .map(|&node| {
                graph
                    .successors(node)
                    .iter()
                    .filter_map(|&s| match local[s] {
                        usize::MAX => None,
                        l => Some(l),
                    })
                    .collect()
            })
            .collect();

        Self {
            nodes: scc.nodes().to_vec(),
            successors,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Graph index of local node `local`.
    #[cfg(test)]
    pub fn global(&self, local: usize) -> usize {
        self.nodes[local]
    }
}

struct Frame {
    node: usize,
    next_child: usize,
    depth: usize,
}

/// Length in hops of the longest simple cycle that leaves `start` and
/// returns to it, or 0 if there is none.
///
/// Paths are never extended beyond `max_path_length` hops. The search
/// stops as soon as a cycle through every node of the subgraph is found.
pub fn longest_cycle_through(sub: &SubGraph, start: usize, max_path_length: usize) -> usize {
    let ceiling = sub.len().min(max_path_length);
    let mut visited = vec![false; sub.len()];
    visited[start] = true;

    let mut best = 0;
    // `depth` is the hop count of the path once the next edge is taken.
    let mut stack = vec![Frame { node: start, next_child: 0, depth: 1 }];

    while let Some(frame) = stack.last_mut() {
        let successors = &sub.successors[frame.node];
        if frame.next_child == successors.len() {
            let node = frame.node;
            stack.pop();
            if node != start {
                visited[node] = false;
            }
            continue;
        }

        let next = successors[frame.next_child];
        let depth = frame.depth;
        frame.next_child += 1;

        if next == start {
            best = best.max(depth);
            if best >= ceiling {
                return best;
            }
        } else if !visited[next] && depth < max_path_length {
            visited[next] = true;
            stack.push(Frame { node: next, next_child: 0, depth: depth + 1 });
        }
    }

    best
}

/// Longest simple cycle anywhere in `graph`, in hops; 0 when acyclic.
///
/// Only strongly connected components can hold cycles, so the search runs
/// per component on its induced subgraph. A self-looped singleton counts
/// as a cycle of length 1.
pub fn longest_cycle(graph: &Graph, max_path_length: usize) -> usize {
    let mut best = 0;

    for scc in tarjan_sccs(graph) {
        match scc.nodes() {
            [] => {}
            [node] => {
                if graph.has_self_loop(*node) {
                    best = best.max(1);
                }
            }
            nodes => {
                // A simple cycle cannot be longer than its component.
                if nodes.len() <= best || max_path_length <= best {
                    continue;
                }
                let sub = SubGraph::restrict(graph, &scc);
                let ceiling = sub.len().min(max_path_length);
                for start in 0..sub.len() {
                    best = best.max(longest_cycle_through(&sub, start, max_path_length));
                    if best >= ceiling {
                        break;
                    }
                }
            }
        }
    }

    best
}
