//! Run orchestration: streams groups, searches each one for its longest
//! cycle and folds the outcomes into an [`AnalysisResult`].

pub mod result;

use std::io::BufRead;
use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::{GlobalConfig, DEFAULT_MAX_PATH_LENGTH};
use crate::error::{Result, RouteError};
use crate::graph::find_longest_cycle;
use crate::record::EdgeGroup;
use crate::stream::{GroupStream, GroupStreamer, StreamOptions};

pub use result::{AnalysisResult, CycleResult, ResultSelector};

#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub stream: StreamOptions,
    pub max_path_length: usize,
    /// 1 = sequential, 0 = one worker per CPU.
    pub jobs: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            stream: StreamOptions::default(),
            max_path_length: DEFAULT_MAX_PATH_LENGTH,
            jobs: 1,
        }
    }
}

impl From<&GlobalConfig> for AnalysisOptions {
    fn from(config: &GlobalConfig) -> Self {
        Self {
            stream: StreamOptions::from(config),
            max_path_length: config.analysis.max_path_length,
            jobs: config.analysis.jobs,
        }
    }
}

/// Detects the longest routing cycle across all claim/status groups.
#[derive(Debug, Clone, Default)]
pub struct RoutingCycleDetector {
    options: AnalysisOptions,
}

impl RoutingCycleDetector {
    pub fn new(options: AnalysisOptions) -> Self {
        Self { options }
    }

    pub fn run_path(&self, path: &Path) -> Result<AnalysisResult> {
        let stream = self.streamer().open_path(path)?;
        self.run_stream(stream)
    }

    pub fn run_reader<R: BufRead>(&self, reader: R) -> Result<AnalysisResult> {
        let stream = self.streamer().open_reader(reader)?;
        self.run_stream(stream)
    }

    /// Consume `stream` partition by partition.
    ///
    /// Groups are fed to the selector in emission order whether or not the
    /// searches ran in parallel, so the outcome does not depend on `jobs`.
    pub fn run_stream(&self, mut stream: GroupStream) -> Result<AnalysisResult> {
        let pool = self.build_pool()?;
        let max_path_length = self.options.max_path_length;
        let mut selector = ResultSelector::new();
        let mut groups_seen = 0usize;

        while let Some(batch) = stream.next_partition() {
            let groups = batch?;
            let lengths = match &pool {
                Some(pool) => pool.install(|| search_parallel(&groups, max_path_length)),
                None => groups
                    .iter()
                    .map(|(_, edges)| find_longest_cycle(edges, max_path_length))
                    .collect(),
            };

            for ((key, edges), length) in groups.iter().zip(lengths) {
                if length > 0 {
                    debug!("group {} has a cycle of {} hops", key, length);
                }
                selector.observe(key, edges.len(), length);
            }
            groups_seen += groups.len();
        }

        let result = selector.finish();
        info!(
            "analysed {} groups ({} records, {} claims)",
            groups_seen, result.total_hops, result.num_claims
        );
        Ok(result)
    }

    fn streamer(&self) -> GroupStreamer {
        GroupStreamer::new(self.options.stream.clone())
    }

    fn build_pool(&self) -> Result<Option<rayon::ThreadPool>> {
        if self.options.jobs == 1 {
            return Ok(None);
        }
        let mut builder = rayon::ThreadPoolBuilder::new();
        if self.options.jobs > 1 {
            builder = builder.num_threads(self.options.jobs);
        }
        let pool = builder.build().map_err(|e| {
            RouteError::ConfigError(format!("failed to start worker pool: {}", e))
        })?;
        debug!("searching groups on {} workers", pool.current_num_threads());
        Ok(Some(pool))
    }
}

fn search_parallel(groups: &[EdgeGroup], max_path_length: usize) -> Vec<usize> {
    groups
        .par_iter()
        .map(|(_, edges)| find_longest_cycle(edges, max_path_length))
        .collect()
}
