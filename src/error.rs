use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexError>;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk corpus: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("failed to serialize index: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to move index into place: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("missing required setting `{0}`")]
    MissingSetting(&'static str),
}

impl IndexError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IndexError::Io {
            path: path.into(),
            source,
        }
    }
}
