mod detect_test;
mod properties_test;

use std::path::{Path, PathBuf};

/// Write `routes` as `src|dst|claim|status` lines into `dir/routes.txt`.
pub fn routing_file(dir: &Path, routes: &[(&str, &str, &str, &str)]) -> PathBuf {
    let content: String = routes
        .iter()
        .map(|(src, dst, claim, status)| format!("{}|{}|{}|{}\n", src, dst, claim, status))
        .collect();
    let path = dir.join("routes.txt");
    std::fs::write(&path, content).unwrap();
    path
}
