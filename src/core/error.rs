use std::path::PathBuf;
use thiserror::Error;

/// Content Fetcher failures.
///
/// Every variant carries owned strings so the type stays `Clone` — resolved
/// outcomes are shared across concurrent callers through the single-flight
/// channel, which requires cloning the error side as well.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("transport error fetching {url}: {cause}")]
    Transport { url: String, cause: String },

    #[error("HTTP {status} fetching {url}")]
    Http { url: String, status: u16 },

    #[error("SHA-1 mismatch for {path:?}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("IO error at {path:?}: {cause}")]
    Io { path: PathBuf, cause: String },

    #[error("failed to decode response from {url}: {cause}")]
    Decode { url: String, cause: String },

    #[error("fetch of {url} was cancelled")]
    Cancelled { url: String },
}

impl FetchError {
    pub fn transport(url: &str, err: &reqwest::Error) -> Self {
        FetchError::Transport {
            url: url.to_string(),
            cause: err.to_string(),
        }
    }

    pub fn io(path: &std::path::Path, err: &std::io::Error) -> Self {
        FetchError::Io {
            path: path.to_path_buf(),
            cause: err.to_string(),
        }
    }
}

/// Version Resolver failures. Fatal to one `resolve()` call, never cached —
/// a later request for the same id retries from scratch.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    #[error("version {0} not found in the remote manifest")]
    VersionNotFound(String),

    #[error("invalid metadata for version {version}: {cause}")]
    MetadataInvalid { version: String, cause: String },

    #[error("repair of version {version} failed: {cause}")]
    RepairFailed { version: String, cause: String },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("resolution of version {0} was cancelled")]
    Cancelled(String),
}

impl ResolveError {
    pub fn metadata(version: &str, cause: impl ToString) -> Self {
        ResolveError::MetadataInvalid {
            version: version.to_string(),
            cause: cause.to_string(),
        }
    }

    pub fn repair(version: &str, cause: impl ToString) -> Self {
        ResolveError::RepairFailed {
            version: version.to_string(),
            cause: cause.to_string(),
        }
    }
}

/// A single failed item inside a materialize batch. Never fatal to the batch.
#[derive(Debug, Clone, Error)]
#[error("failed to materialize {id}: {cause}")]
pub struct MaterializeItemError {
    pub id: String,
    pub cause: FetchError,
}

/// Launch Configuration Builder failures. Surfaced before any process spawns.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("missing identity field: {0}")]
    MissingIdentity(&'static str),
}

/// Umbrella error for callers driving the whole prepare pipeline.
#[derive(Debug, Error)]
pub enum LauncherError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type LauncherResult<T> = Result<T, LauncherError>;
