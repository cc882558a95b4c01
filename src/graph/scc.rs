//! Iterative Tarjan strongly connected components.
//!
//! The recursion of the textbook algorithm is replaced by an explicit
//! frame stack of `(node, next successor position)`, so graph depth is
//! bounded by heap size, not by the thread's call stack.

use super::build::Graph;

const UNVISITED: usize = usize::MAX;

/// A set of mutually reachable nodes, as graph indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scc {
    nodes: Vec<usize>,
}

impl Scc {
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// True when this component can contain a cycle: two or more nodes,
    /// or a single node with a self-loop.
    pub fn is_cyclic(&self, graph: &Graph) -> bool {
        match self.nodes.as_slice() {
            [] => false,
            [only] => graph.has_self_loop(*only),
            _ => true,
        }
    }
}

struct Frame {
    node: usize,
    next_child: usize,
}

/// Compute the strongly connected components of `graph`.
///
/// Components are returned in the order they complete, which is reverse
/// topological order of the condensation. Every node appears in exactly
/// one component.
pub fn tarjan_sccs(graph: &Graph) -> Vec<Scc> {
    let n = graph.node_count();
    let mut index = vec![UNVISITED; n];
    let mut lowlink = vec![0usize; n];
    let mut on_stack = vec![false; n];
    let mut stack: Vec<usize> = Vec::new();
    let mut work: Vec<Frame> = Vec::new();
    let mut sccs = Vec::new();
    let mut counter = 0usize;

    for root in 0..n {
        if index[root] != UNVISITED {
            continue;
        }

        index[root] = counter;
        lowlink[root] = counter;
        counter += 1;
        stack.push(root);
        on_stack[root] = true;
        work.push(Frame { node: root, next_child: 0 });

        while let Some(frame) = work.last_mut() {
            let node = frame.node;
            let successors = graph.successors(node);

            if frame.next_child < successors.len() {
                let child = successors[frame.next_child];
                frame.next_child += 1;

                if index[child] == UNVISITED {
                    index[child] = counter;
                    lowlink[child] = counter;
                    counter += 1;
                    stack.push(child);
                    on_stack[child] = true;
                    work.push(Frame { node: child, next_child: 0 });
                } else if on_stack[child] {
                    lowlink[node] = lowlink[node].min(index[child]);
                }
                continue;
            }

            work.pop();

            if lowlink[node] == index[node] {
                let mut members = Vec::new();
                while let Some(w) = stack.pop() {
                    on_stack[w] = false;
                    members.push(w);
                    if w == node {
                        break;
                    }
                }
                sccs.push(Scc { nodes: members });
            }

            if let Some(parent) = work.last() {
                lowlink[parent.node] = lowlink[parent.node].min(lowlink[node]);
            }
        }
    }

    sccs
}
