//! Record parsing for `source|destination|claim_id|status_code` lines.

use std::fmt;

use serde::Serialize;

pub const FIELD_DELIMITER: char = '|';
const EXPECTED_FIELD_COUNT: usize = 4;

// Field positions in a record.
const SOURCE_IDX: usize = 0;
const DESTINATION_IDX: usize = 1;
const CLAIM_ID_IDX: usize = 2;
const STATUS_CODE_IDX: usize = 3;

/// A directed hop between two systems.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub source: String,
    pub destination: String,
}

impl Edge {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

/// Identifies one independent subgraph. Ordered by claim id, then status code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GroupKey {
    pub claim_id: String,
    pub status_code: String,
}

impl GroupKey {
    pub fn new(claim_id: impl Into<String>, status_code: impl Into<String>) -> Self {
        Self {
            claim_id: claim_id.into(),
            status_code: status_code.into(),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.claim_id, self.status_code)
    }
}

/// A group key with its edges in arrival order.
pub type EdgeGroup = (GroupKey, Vec<Edge>);

/// Split a line into its four fields without allocating.
///
/// Surrounding whitespace is trimmed first; the fields themselves are
/// taken verbatim. Returns `None` for blank lines and for any other field
/// count.
pub fn split_fields(line: &str) -> Option<[&str; EXPECTED_FIELD_COUNT]> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let mut fields = [""; EXPECTED_FIELD_COUNT];
    let mut parts = line.split(FIELD_DELIMITER);
    for slot in fields.iter_mut() {
        *slot = parts.next()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(fields)
}

/// Parse one record into its group key and edge.
pub fn parse_line(line: &str) -> Option<(GroupKey, Edge)> {
    let fields = split_fields(line)?;
    Some((
        GroupKey::new(fields[CLAIM_ID_IDX], fields[STATUS_CODE_IDX]),
        Edge::new(fields[SOURCE_IDX], fields[DESTINATION_IDX]),
    ))
}

/// Borrowed `(claim_id, status_code)` of a record, for hashing without
/// building a [`GroupKey`].
pub fn key_fields(line: &str) -> Option<(&str, &str)> {
    let fields = split_fields(line)?;
    Some((fields[CLAIM_ID_IDX], fields[STATUS_CODE_IDX]))
}
