use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Result, RouteError};
use crate::record::{self, Edge, EdgeGroup, GroupKey};

/// Load one partition file and group its records by key.
///
/// Groups come back in ascending key order; edges keep their order of
/// arrival within each group.
pub fn read_partition(path: &Path) -> Result<Vec<EdgeGroup>> {
    let file = File::open(path).map_err(|e| RouteError::spill(path, e))?;
    group_records(BufReader::new(file), path)
}

pub(crate) fn group_records<R: BufRead>(mut reader: R, path: &Path) -> Result<Vec<EdgeGroup>> {
    let mut groups: BTreeMap<GroupKey, Vec<Edge>> = BTreeMap::new();
    let mut line = String::new();
    loop {
        line.clear();
        let n = reader
            .read_line(&mut line)
            .map_err(|e| RouteError::spill(path, e))?;
        if n == 0 {
            break;
        }
        if let Some((key, edge)) = record::parse_line(&line) {
            groups.entry(key).or_default().push(edge);
        }
    }
    Ok(groups.into_iter().collect())
}
