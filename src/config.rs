use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{RouteError, Result};

/// Number of spill partitions the input is hashed into.
pub const DEFAULT_PARTITIONS: usize = 128;
/// Upper bound on path depth explored by the cycle search.
pub const DEFAULT_MAX_PATH_LENGTH: usize = 1000;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct GlobalConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub network: NetworkConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisConfig {
    #[serde(default = "default_partitions")]
    pub partitions: usize,
    #[serde(default = "default_max_path_length")]
    pub max_path_length: usize,
    /// Worker threads for per-group cycle search. 1 = sequential,
    /// 0 = auto-detect (matches CPU count).
    #[serde(default = "default_jobs")]
    pub jobs: usize,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageConfig {
    /// Where partition files are created. Unset = system temp directory.
    #[serde(default)]
    pub spill_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NetworkConfig {
    #[serde(default = "default_timeout")]
    pub download_timeout: u64,
}

fn default_partitions() -> usize {
    DEFAULT_PARTITIONS
}
fn default_max_path_length() -> usize {
    DEFAULT_MAX_PATH_LENGTH
}
fn default_jobs() -> usize {
    1
}
fn default_timeout() -> u64 {
    300
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            partitions: default_partitions(),
            max_path_length: default_max_path_length(),
            jobs: default_jobs(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            download_timeout: default_timeout(),
        }
    }
}

/// Config files consulted when no `--config` is given, lowest priority first.
fn default_layers() -> Vec<PathBuf> {
    let user_dir = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| Path::new(&home).join(".config")));

    let mut layers = vec![PathBuf::from("/etc/routecycle/routecycle.toml")];
    layers.extend(user_dir.map(|dir| dir.join("routecycle").join("routecycle.toml")));
    layers.push(PathBuf::from("./routecycle.toml"));
    layers
}

/// Fold `top` into `base`: nested tables merge key by key, any other value
/// in `top` replaces the one in `base`.
fn overlay(base: &mut toml::Table, top: toml::Table) {
    for (key, value) in top {
        let value = match (base.remove(&key), value) {
            (Some(toml::Value::Table(mut inner)), toml::Value::Table(value)) => {
                overlay(&mut inner, value);
                toml::Value::Table(inner)
            }
            (_, value) => value,
        };
        base.insert(key, value);
    }
}

impl GlobalConfig {
    /// Load configuration with layered merging.
    ///
    /// An explicit `path` (from `--config`) is the only layer and must
    /// exist. Otherwise these layers are merged in ascending priority, each
    /// one only overriding the keys it names:
    ///
    ///   1. `/etc/routecycle/routecycle.toml`
    ///   2. `$XDG_CONFIG_HOME/routecycle/routecycle.toml`
    ///   3. `./routecycle.toml`
    ///
    /// Missing layers are skipped; with no file at all the built-in
    /// defaults apply. The result is always validated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let layers = match path {
            Some(p) if !p.exists() => {
                return Err(RouteError::ConfigError(format!(
                    "config file not found: {}",
                    p.display()
                )));
            }
            Some(p) => vec![p.to_path_buf()],
            None => default_layers(),
        };
        Self::load_layers(&layers)
    }

    fn load_layers(layers: &[PathBuf]) -> Result<Self> {
        let mut merged = toml::Table::new();
        for path in layers.iter().filter(|p| p.exists()) {
            let text = std::fs::read_to_string(path).map_err(|e| {
                RouteError::ConfigError(format!("failed to read {}: {}", path.display(), e))
            })?;
            overlay(&mut merged, toml::from_str(&text)?);
        }

        let config = GlobalConfig::deserialize(toml::Value::Table(merged))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.analysis.partitions == 0 {
            return Err(RouteError::ConfigError(
                "analysis.partitions must be at least 1".to_string(),
            ));
        }
        if self.analysis.max_path_length == 0 {
            return Err(RouteError::ConfigError(
                "analysis.max_path_length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
