//! Resolution of the command-line input into a local file.

use std::fmt;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::info;

use crate::error::{RouteError, Result};
use crate::util::download;

pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Where the routing data comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Url(String),
    Path(PathBuf),
}

impl InputSource {
    pub fn parse(s: &str) -> Self {
        if is_url(s) {
            InputSource::Url(s.to_string())
        } else {
            InputSource::Path(PathBuf::from(s))
        }
    }

    /// Check that a local source exists and is a regular file.
    ///
    /// URLs pass unchecked; they are validated by fetching them.
    pub fn validate(&self) -> Result<()> {
        let InputSource::Path(path) = self else {
            return Ok(());
        };
        let meta = std::fs::metadata(path).map_err(|e| RouteError::from_io(path, e))?;
        if !meta.is_file() {
            return Err(RouteError::NotAFile(path.clone()));
        }
        Ok(())
    }

    /// Produce a local file for the core to read, downloading if needed.
    pub fn resolve(&self, download_timeout: u64) -> Result<LocalInput> {
        self.validate()?;
        match self {
            InputSource::Path(path) => Ok(LocalInput {
                path: path.clone(),
                _download: None,
            }),
            InputSource::Url(url) => {
                info!("fetching {}", url);
                let tmp = download::download_to_temp(url, download_timeout)?;
                Ok(LocalInput {
                    path: tmp.path().to_path_buf(),
                    _download: Some(tmp),
                })
            }
        }
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Url(url) => write!(f, "{}", url),
            InputSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A readable local file. Downloaded content is deleted on drop.
#[derive(Debug)]
pub struct LocalInput {
    path: PathBuf,
    _download: Option<NamedTempFile>,
}

impl LocalInput {
    pub fn path(&self) -> &Path {
        &self.path
    }
}
