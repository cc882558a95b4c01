use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("spill error: {path}: {source}")]
    SpillError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("content is not valid UTF-8: {0}")]
    EncodingError(String),

    #[error("config error: {0}")]
    ConfigError(String),

    #[error("network error: {0}")]
    NetworkError(String),

    #[error("file not found: {0}")]
    NotFound(PathBuf),

    #[error("not a file: {0}")]
    NotAFile(PathBuf),

    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("TOML deserialization error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl RouteError {
    /// Wrap an I/O error raised while touching `path`, keeping the
    /// encoding and permission cases distinguishable for the caller.
    pub fn from_io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        match err.kind() {
            std::io::ErrorKind::InvalidData => {
                RouteError::EncodingError(path.display().to_string())
            }
            std::io::ErrorKind::PermissionDenied => RouteError::PermissionDenied(path),
            std::io::ErrorKind::NotFound => RouteError::NotFound(path),
            _ => RouteError::IoError(err),
        }
    }

    pub(crate) fn spill(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RouteError::SpillError { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, RouteError>;
