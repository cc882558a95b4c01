use std::collections::BTreeMap;
use std::path::Path;

use routecycle::detector::AnalysisOptions;
use routecycle::stream::StreamOptions;
use routecycle::RoutingCycleDetector;

use crate::routing_file;

fn detector(spill: &Path) -> RoutingCycleDetector {
    RoutingCycleDetector::new(AnalysisOptions {
        stream: StreamOptions {
            spill_dir: Some(spill.to_path_buf()),
            ..Default::default()
        },
        ..Default::default()
    })
}

fn check(routes: &[(&str, &str, &str, &str)], claim: &str, status: &str, length: usize) {
    let dir = tempfile::tempdir().unwrap();
    let spill = tempfile::tempdir().unwrap();
    let path = routing_file(dir.path(), routes);

    let result = detector(spill.path()).run_path(&path).unwrap();
    let cycle = result.cycle.expect("expected a cycle");
    assert_eq!(cycle.claim_id, claim);
    assert_eq!(cycle.status_code, status);
    assert_eq!(cycle.cycle_length, length);
    assert_eq!(result.total_hops, routes.len() as u64);
}

#[test]
fn test_three_node_cycle_wins() {
    check(
        &[
            ("Epic", "Availity", "123", "197"),
            ("Availity", "Optum", "123", "197"),
            ("Optum", "Epic", "123", "197"),
            ("Epic", "Availity", "891", "45"),
            ("Availity", "Epic", "891", "45"),
        ],
        "123",
        "197",
        3,
    );
}

#[test]
fn test_simple_two_node() {
    check(&[("A", "B", "1", "100"), ("B", "A", "1", "100")], "1", "100", 2);
}

#[test]
fn test_self_loop() {
    check(&[("A", "A", "1", "100")], "1", "100", 1);
}

#[test]
fn test_longest_of_multiple() {
    check(
        &[
            ("A", "B", "1", "100"),
            ("B", "A", "1", "100"),
            ("X", "Y", "2", "200"),
            ("Y", "Z", "2", "200"),
            ("Z", "W", "2", "200"),
            ("W", "X", "2", "200"),
        ],
        "2",
        "200",
        4,
    );
}

#[test]
fn test_status_codes_are_separate_groups() {
    check(
        &[
            ("A", "B", "1", "100"),
            ("B", "C", "1", "100"),
            ("C", "A", "1", "100"),
            ("A", "B", "1", "200"),
            ("B", "A", "1", "200"),
        ],
        "1",
        "100",
        3,
    );
}

#[test]
fn test_tie_broken_by_claim_id() {
    check(
        &[
            ("X", "Y", "2", "200"),
            ("Y", "Z", "2", "200"),
            ("Z", "X", "2", "200"),
            ("A", "B", "1", "100"),
            ("B", "C", "1", "100"),
            ("C", "A", "1", "100"),
        ],
        "1",
        "100",
        3,
    );
}

#[test]
fn test_tie_broken_by_status_code() {
    check(
        &[
            ("A", "B", "1", "200"),
            ("B", "C", "1", "200"),
            ("C", "A", "1", "200"),
            ("X", "Y", "1", "100"),
            ("Y", "Z", "1", "100"),
            ("Z", "X", "1", "100"),
        ],
        "1",
        "100",
        3,
    );
}

#[test]
fn test_edges_split_across_one_group_do_not_merge_cycles() {
    // Two disjoint cycles inside the same group: the longer one counts.
    check(
        &[
            ("A", "B", "1", "100"),
            ("B", "C", "1", "100"),
            ("C", "A", "1", "100"),
            ("X", "Y", "1", "100"),
            ("Y", "X", "1", "100"),
        ],
        "1",
        "100",
        3,
    );
}

#[test]
fn test_no_cycle_in_chain() {
    let dir = tempfile::tempdir().unwrap();
    let spill = tempfile::tempdir().unwrap();
    let path = routing_file(
        dir.path(),
        &[("A", "B", "1", "100"), ("B", "C", "1", "100"), ("C", "D", "1", "100")],
    );

    let result = detector(spill.path()).run_path(&path).unwrap();
    assert!(result.cycle.is_none());
    assert_eq!(result.total_hops, 3);
    assert!(result.cycles_per_status.is_empty());
}

#[test]
fn test_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let spill = tempfile::tempdir().unwrap();
    let path = routing_file(dir.path(), &[]);

    let result = detector(spill.path()).run_path(&path).unwrap();
    assert!(result.cycle.is_none());
    assert_eq!(result.total_hops, 0);
    assert_eq!(result.num_claims, 0);
    assert!(result.cycles_per_status.is_empty());
}

#[test]
fn test_cycles_per_status() {
    let dir = tempfile::tempdir().unwrap();
    let spill = tempfile::tempdir().unwrap();
    let path = routing_file(
        dir.path(),
        &[
            ("A", "B", "1", "100"),
            ("B", "A", "1", "100"),
            ("X", "Y", "2", "200"),
            ("Y", "Z", "2", "200"),
            ("Z", "X", "2", "200"),
            ("P", "Q", "3", "100"),
            ("Q", "P", "3", "100"),
        ],
    );

    let result = detector(spill.path()).run_path(&path).unwrap();
    assert_eq!(
        result.cycles_per_status,
        BTreeMap::from([("100".to_string(), 2), ("200".to_string(), 1)])
    );
    assert_eq!(result.num_claims, 3);
}

#[test]
fn test_ignores_blank_and_malformed_lines() {
    for content in [
        "\nA|B|1|100\n\nB|A|1|100\n\n",
        "A|B|1|100\ninvalid line\nB|A|1|100\nA|B|C\n",
    ] {
        let dir = tempfile::tempdir().unwrap();
        let spill = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.txt");
        std::fs::write(&path, content).unwrap();

        let result = detector(spill.path()).run_path(&path).unwrap();
        assert_eq!(result.cycle.unwrap().cycle_length, 2);
        assert_eq!(result.total_hops, 2);
    }
}

#[test]
fn test_reference_input_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let spill = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.txt");
    std::fs::write(&path, "A|B|1|100\nB|C|1|100\nC|A|1|100\nA|B|1|200\nB|A|1|200\n").unwrap();

    let result = detector(spill.path()).run_path(&path).unwrap();
    assert_eq!(result.cycle.unwrap().to_string(), "1,100,3");
    assert_eq!(result.total_hops, 5);
    assert_eq!(std::fs::read_dir(spill.path()).unwrap().count(), 0);
}
