use std::path::PathBuf;

/// Failures surfaced by the fetch, notify and persist collaborators.
///
/// None of these are fatal: the poll driver logs them and decides whether to
/// skip the cycle or degrade (for example to an empty seen set).
#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    /// Network error, timeout or unreadable body.
    #[error("request to {target} failed: {source}")]
    Transport {
        target: String,
        source: reqwest::Error,
    },
    /// The remote answered, but not with the status we accept.
    #[error("{target} answered with status {status}")]
    Status {
        target: String,
        status: reqwest::StatusCode,
    },
    /// The job feed body was not the expected shape.
    #[error("could not decode job feed from {target}: {source}")]
    Decode {
        target: String,
        source: serde_json::Error,
    },
    #[error("invalid url {url}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("failed to read seen store {path}: {source}")]
    SeenStoreRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("seen store {path} is not a JSON list of ids: {source}")]
    SeenStoreCorrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to write seen store {path}: {source}")]
    SeenStoreWrite {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to append to alert log {path}: {source}")]
    AlertLog {
        path: PathBuf,
        source: csv::Error,
    },
}
