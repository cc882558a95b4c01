use std::collections::{BTreeMap, HashSet, VecDeque};
use std::io::Cursor;

use proptest::prelude::*;

use routecycle::graph::{find_longest_cycle, tarjan_sccs, Graph};
use routecycle::stream::{GroupStreamer, StreamOptions};
use routecycle::{Edge, GroupKey};

const NODES: &[&str] = &["A", "B", "C", "D", "E", "F"];

fn arb_edges() -> impl Strategy<Value = Vec<Edge>> {
    prop::collection::vec((0..NODES.len(), 0..NODES.len()), 0..16).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(s, d)| Edge::new(NODES[s], NODES[d]))
            .collect()
    })
}

/// Longest simple cycle by exhaustive search from every node of the
/// whole graph, without component pruning.
fn brute_force_longest(graph: &Graph) -> usize {
    fn walk(
        graph: &Graph,
        start: usize,
        node: usize,
        depth: usize,
        on_path: &mut Vec<bool>,
        best: &mut usize,
    ) {
        for &next in graph.successors(node) {
            if next == start {
                *best = (*best).max(depth);
            } else if !on_path[next] {
                on_path[next] = true;
                walk(graph, start, next, depth + 1, on_path, best);
                on_path[next] = false;
            }
        }
    }

    let mut best = 0;
    for start in 0..graph.node_count() {
        let mut on_path = vec![false; graph.node_count()];
        on_path[start] = true;
        walk(graph, start, start, 1, &mut on_path, &mut best);
    }
    best
}

fn reachable(graph: &Graph, from: usize) -> HashSet<usize> {
    let mut seen = HashSet::from([from]);
    let mut queue = VecDeque::from([from]);
    while let Some(node) = queue.pop_front() {
        for &next in graph.successors(node) {
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn duplicate_edges_do_not_change_cycle_length(edges in arb_edges()) {
        let mut doubled = edges.clone();
        doubled.extend(edges.iter().cloned());

        let mut unique = Vec::new();
        let mut seen = HashSet::new();
        for edge in &edges {
            if seen.insert(edge.clone()) {
                unique.push(edge.clone());
            }
        }

        let base = find_longest_cycle(&edges, 1000);
        prop_assert_eq!(find_longest_cycle(&doubled, 1000), base);
        prop_assert_eq!(find_longest_cycle(&unique, 1000), base);
    }

    #[test]
    fn component_pruning_matches_exhaustive_search(edges in arb_edges()) {
        let graph = Graph::from_edges(&edges);
        prop_assert_eq!(find_longest_cycle(&edges, 1000), brute_force_longest(&graph));
    }

    #[test]
    fn sccs_partition_nodes_into_mutually_reachable_sets(edges in arb_edges()) {
        let graph = Graph::from_edges(&edges);
        let sccs = tarjan_sccs(&graph);

        let mut owner = vec![usize::MAX; graph.node_count()];
        for (i, scc) in sccs.iter().enumerate() {
            for &node in scc.nodes() {
                prop_assert_eq!(owner[node], usize::MAX, "node in two components");
                owner[node] = i;
            }
        }
        prop_assert!(owner.iter().all(|&o| o != usize::MAX));

        let reach: Vec<HashSet<usize>> = (0..graph.node_count()).map(|n| reachable(&graph, n)).collect();
        for u in 0..graph.node_count() {
            for v in 0..graph.node_count() {
                let mutual = reach[u].contains(&v) && reach[v].contains(&u);
                prop_assert_eq!(mutual, owner[u] == owner[v]);
            }
        }
    }

    #[test]
    fn grouping_is_independent_of_line_order(
        lines in prop::collection::vec((0..4usize, 0..4usize, 0..3usize, 0..2usize), 0..40)
            .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
    ) {
        let (original, shuffled) = lines;
        let render = |rows: &[(usize, usize, usize, usize)]| -> String {
            rows.iter()
                .map(|(s, d, c, st)| format!("{}|{}|{}|{}\n", NODES[*s], NODES[*d], c, st))
                .collect()
        };

        let spill = tempfile::tempdir().unwrap();
        let streamer = GroupStreamer::new(StreamOptions {
            partitions: 7,
            spill_dir: Some(spill.path().to_path_buf()),
        });
        let grouped = |input: String| -> BTreeMap<GroupKey, Vec<Edge>> {
            streamer
                .open_reader(Cursor::new(input))
                .unwrap()
                .map(|g| {
                    let (key, mut edges) = g.unwrap();
                    edges.sort();
                    (key, edges)
                })
                .collect()
        };

        prop_assert_eq!(grouped(render(&original)), grouped(render(&shuffled)));
    }
}
