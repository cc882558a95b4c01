//! External-memory grouping of edge records.
//!
//! A [`GroupStream`] goes through open, partition, per-partition read and
//! close. Opening streams the whole input once into hash partitions on disk.
//! Pulling from the stream then loads one partition at a time, groups it by
//! key and deletes its file before moving on. Dropping the stream at any
//! point, including after an error, deletes every partition still on disk.

pub mod group;
pub mod partition;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{GlobalConfig, DEFAULT_PARTITIONS};
use crate::error::{Result, RouteError};
use crate::record::EdgeGroup;

pub use partition::{partition_index, PartitionSet, PartitionStats};

#[derive(Debug, Clone)]
pub struct StreamOptions {
    pub partitions: usize,
    pub spill_dir: Option<PathBuf>,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            partitions: DEFAULT_PARTITIONS,
            spill_dir: None,
        }
    }
}

impl From<&GlobalConfig> for StreamOptions {
    fn from(config: &GlobalConfig) -> Self {
        Self {
            partitions: config.analysis.partitions,
            spill_dir: config.storage.spill_dir.clone(),
        }
    }
}

/// Opens [`GroupStream`]s over local input.
#[derive(Debug, Clone, Default)]
pub struct GroupStreamer {
    options: StreamOptions,
}

impl GroupStreamer {
    pub fn new(options: StreamOptions) -> Self {
        Self { options }
    }

    /// Partition the file at `path` and return a stream over its groups.
    pub fn open_path(&self, path: &Path) -> Result<GroupStream> {
        let file = File::open(path).map_err(|e| RouteError::from_io(path, e))?;
        self.open_labeled(BufReader::new(file), path)
    }

    /// Partition an already-open reader.
    pub fn open_reader<R: BufRead>(&self, reader: R) -> Result<GroupStream> {
        self.open_labeled(reader, Path::new("<input>"))
    }

    fn open_labeled<R: BufRead>(&self, reader: R, label: &Path) -> Result<GroupStream> {
        let partitions = PartitionSet::create(
            reader,
            label,
            self.options.partitions,
            self.options.spill_dir.as_deref(),
        )?;
        Ok(GroupStream {
            partitions,
            next: 0,
            pending: Vec::new().into_iter(),
        })
    }
}

/// Finite, ordered producer of `(GroupKey, edges)` pairs.
///
/// Groups are emitted partition by partition; within a partition they are
/// sorted by key. Order across partitions follows partition index.
pub struct GroupStream {
    partitions: PartitionSet,
    next: usize,
    pending: std::vec::IntoIter<EdgeGroup>,
}

impl GroupStream {
    /// Read, group and release the next partition.
    ///
    /// Returns `None` once every partition has been consumed. After an
    /// error the stream is exhausted and all remaining files are deleted.
    pub fn next_partition(&mut self) -> Option<Result<Vec<EdgeGroup>>> {
        if self.next >= self.partitions.len() {
            return None;
        }
        let idx = self.next;
        self.next += 1;

        let result = match self.partitions.path(idx) {
            Some(path) => group::read_partition(path),
            None => Ok(Vec::new()),
        };
        self.partitions.release(idx);

        match result {
            Ok(groups) => {
                debug!("partition {} yielded {} groups", idx, groups.len());
                Some(Ok(groups))
            }
            Err(e) => {
                self.next = self.partitions.len();
                self.partitions.close();
                Some(Err(e))
            }
        }
    }

    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    pub fn stats(&self) -> PartitionStats {
        self.partitions.stats()
    }

    /// Directory holding the partition files, until the stream is closed.
    pub fn spill_dir(&self) -> Option<&Path> {
        self.partitions.dir()
    }

    /// Delete all remaining partition files now.
    pub fn close(mut self) {
        self.partitions.close();
    }
}

impl Iterator for GroupStream {
    type Item = Result<EdgeGroup>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(group) = self.pending.next() {
                return Some(Ok(group));
            }
            match self.next_partition()? {
                Ok(groups) => self.pending = groups.into_iter(),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
