//! Hash partitioning of the input into on-disk spill files.
//!
//! Every valid record is appended to exactly one partition file chosen by a
//! stable hash of its group key, so all edges of a group end up in the same
//! file. Files live in a private temp directory owned by [`PartitionSet`];
//! dropping the set deletes whatever has not been consumed yet.

use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::error::{Result, RouteError};
use crate::record;

const KEY_SEPARATOR: u8 = 0x1f;

/// Map a group key onto `0..partitions`.
///
/// Pure and process-independent: the same key always selects the same
/// partition, on any machine. A `partitions` of 0 is treated as 1.
pub fn partition_index(claim_id: &str, status_code: &str, partitions: usize) -> usize {
    let mut hasher = Sha256::new();
    hasher.update(claim_id.as_bytes());
    hasher.update([KEY_SEPARATOR]);
    hasher.update(status_code.as_bytes());
    let digest = hasher.finalize();

    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    let partitions = partitions.max(1) as u64;
    (u64::from_be_bytes(prefix) % partitions) as usize
}

/// Counters gathered while partitioning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartitionStats {
    pub records: u64,
    pub skipped: u64,
}

/// The spill files produced by one partitioning pass.
pub struct PartitionSet {
    dir: Option<TempDir>,
    /// `None` once a partition has been consumed and deleted.
    paths: Vec<Option<PathBuf>>,
    stats: PartitionStats,
}

impl PartitionSet {
    /// Stream `reader` once, appending each valid record to its partition.
    ///
    /// `input` only labels errors. On failure every file created so far is
    /// removed before the error is returned.
    pub fn create<R: BufRead>(
        mut reader: R,
        input: &Path,
        partitions: usize,
        spill_dir: Option<&Path>,
    ) -> Result<Self> {
        let partitions = partitions.max(1);
        let dir = create_spill_dir(spill_dir)?;

        let mut paths = Vec::with_capacity(partitions);
        let mut writers = Vec::with_capacity(partitions);
        for i in 0..partitions {
            let path = dir.path().join(format!("partition-{:04}.txt", i));
            let file = File::create(&path).map_err(|e| RouteError::spill(&path, e))?;
            writers.push(BufWriter::new(file));
            paths.push(path);
        }
        debug!("created {} partitions in {}", partitions, dir.path().display());

        let mut stats = PartitionStats::default();
        let mut line = String::new();
        loop {
            line.clear();
            let n = reader
                .read_line(&mut line)
                .map_err(|e| RouteError::from_io(input, e))?;
            if n == 0 {
                break;
            }

            let Some((claim_id, status_code)) = record::key_fields(&line) else {
                stats.skipped += 1;
                continue;
            };
            let idx = partition_index(claim_id, status_code, partitions);
            let writer = &mut writers[idx];
            writer
                .write_all(line.trim().as_bytes())
                .and_then(|_| writer.write_all(b"\n"))
                .map_err(|e| RouteError::spill(&paths[idx], e))?;
            stats.records += 1;
        }

        for (writer, path) in writers.iter_mut().zip(&paths) {
            writer.flush().map_err(|e| RouteError::spill(path, e))?;
        }
        drop(writers);

        info!(
            "partitioned {} records into {} partitions ({} lines skipped)",
            stats.records, partitions, stats.skipped
        );

        Ok(Self {
            dir: Some(dir),
            paths: paths.into_iter().map(Some).collect(),
            stats,
        })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn stats(&self) -> PartitionStats {
        self.stats
    }

    /// Directory holding the spill files.
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_ref().map(|d| d.path())
    }

    /// Path of partition `idx`, or `None` if it was already released.
    pub fn path(&self, idx: usize) -> Option<&Path> {
        self.paths.get(idx).and_then(|p| p.as_deref())
    }

    /// Delete the backing file of partition `idx`.
    ///
    /// Idempotent; a file that is already gone is not an error.
    pub fn release(&mut self, idx: usize) {
        if let Some(path) = self.paths.get_mut(idx).and_then(Option::take) {
            remove_quietly(&path);
        }
    }

    /// Delete every remaining partition file and the spill directory.
    pub fn close(&mut self) {
        for idx in 0..self.paths.len() {
            self.release(idx);
        }
        if let Some(dir) = self.dir.take() {
            let path = dir.path().to_path_buf();
            if let Err(e) = dir.close() {
                warn!("failed to remove spill directory {}: {}", path.display(), e);
            }
        }
    }
}

impl Drop for PartitionSet {
    fn drop(&mut self) {
        self.close();
    }
}

fn create_spill_dir(spill_dir: Option<&Path>) -> Result<TempDir> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("routecycle-");
    match spill_dir {
        Some(parent) => {
            std::fs::create_dir_all(parent).map_err(|e| RouteError::spill(parent, e))?;
            builder
                .tempdir_in(parent)
                .map_err(|e| RouteError::spill(parent, e))
        }
        None => builder
            .tempdir()
            .map_err(|e| RouteError::spill(std::env::temp_dir(), e)),
    }
}

fn remove_quietly(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => debug!("released {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("failed to remove {}: {}", path.display(), e),
    }
}
