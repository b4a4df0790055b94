use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by loading, analysis and comparison requests.
///
/// Malformed markup is deliberately absent: the extractor recovers locally
/// and only logs what it skipped.
#[derive(Debug, Error)]
pub enum MaccabyteError {
    /// The requested input path does not exist.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    /// The input path carries an extension that is neither text nor markup.
    #[error("unsupported file type '.{0}': only .txt and .xml are supported")]
    UnsupportedFormat(String),
    /// The linguistic engine could not be started, reached, or understood.
    #[error("linguistic engine unavailable: {0}")]
    EngineUnavailable(String),
    /// A comparison mode other than `lemma` or `pos` was requested.
    #[error("invalid mode '{0}': use 'lemma' or 'pos'")]
    InvalidMode(String),
    #[error("invalid configuration in {path}: {reason}")]
    Config { path: String, reason: String },
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MaccabyteError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        MaccabyteError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, MaccabyteError>;
