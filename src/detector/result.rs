use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::io::{self, Write};

use serde::Serialize;

use crate::record::GroupKey;

/// The best cycle found so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleResult {
    pub claim_id: String,
    pub status_code: String,
    pub cycle_length: usize,
}

impl CycleResult {
    pub fn new(key: &GroupKey, cycle_length: usize) -> Self {
        Self {
            claim_id: key.claim_id.clone(),
            status_code: key.status_code.clone(),
            cycle_length,
        }
    }

    /// Longer cycles win; equal lengths go to the smaller
    /// `(claim_id, status_code)`.
    pub fn beats(&self, other: &CycleResult) -> bool {
        match self.cycle_length.cmp(&other.cycle_length) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Equal => {
                (&self.claim_id, &self.status_code) < (&other.claim_id, &other.status_code)
            }
        }
    }
}

impl fmt::Display for CycleResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.claim_id, self.status_code, self.cycle_length)
    }
}

/// Outcome of a full run: the winning cycle plus aggregate counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub cycle: Option<CycleResult>,
    /// Edges across all groups, duplicates included.
    pub total_hops: u64,
    pub num_claims: usize,
    /// Groups containing a cycle, per status code.
    pub cycles_per_status: BTreeMap<String, usize>,
}

impl AnalysisResult {
    pub fn avg_hops_per_claim(&self) -> f64 {
        if self.num_claims == 0 {
            return 0.0;
        }
        self.total_hops as f64 / self.num_claims as f64
    }

    /// The `n` status codes with the most cycle-bearing groups, highest
    /// count first, ties by status code.
    pub fn top_status_codes(&self, n: usize) -> Vec<(&str, usize)> {
        let mut counts: Vec<(&str, usize)> = self
            .cycles_per_status
            .iter()
            .map(|(status, &count)| (status.as_str(), count))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        counts.truncate(n);
        counts
    }

    pub fn write_summary<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Total hops: {}", self.total_hops)?;
        writeln!(out, "Num claims: {}", self.num_claims)?;
        writeln!(out, "Avg hops/claim: {:.2}", self.avg_hops_per_claim())?;

        let top = self.top_status_codes(5);
        if !top.is_empty() {
            writeln!(out, "Top status codes in cycles:")?;
            for (status, count) in top {
                writeln!(out, "  {}: {}", status, count)?;
            }
        }

        match &self.cycle {
            Some(cycle) => writeln!(out, "Longest cycle: {}", cycle),
            None => writeln!(out, "No cycles found"),
        }
    }
}

/// Folds per-group outcomes into an [`AnalysisResult`].
#[derive(Debug, Default)]
pub struct ResultSelector {
    best: Option<CycleResult>,
    total_hops: u64,
    claims: HashSet<String>,
    cycles_per_status: BTreeMap<String, usize>,
}

impl ResultSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one group: `hops` edges, longest cycle `cycle_length`
    /// (0 = none).
    pub fn observe(&mut self, key: &GroupKey, hops: usize, cycle_length: usize) {
        self.total_hops += hops as u64;
        if !self.claims.contains(&key.claim_id) {
            self.claims.insert(key.claim_id.clone());
        }

        if cycle_length == 0 {
            return;
        }
        *self
            .cycles_per_status
            .entry(key.status_code.clone())
            .or_default() += 1;

        let candidate = CycleResult::new(key, cycle_length);
        let replace = match &self.best {
            None => true,
            Some(best) => candidate.beats(best),
        };
        if replace {
            self.best = Some(candidate);
        }
    }

    pub fn best(&self) -> Option<&CycleResult> {
        self.best.as_ref()
    }

    pub fn finish(self) -> AnalysisResult {
        AnalysisResult {
            cycle: self.best,
            total_hops: self.total_hops,
            num_claims: self.claims.len(),
            cycles_per_status: self.cycles_per_status,
        }
    }
}
