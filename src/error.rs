use std::path::{Path, PathBuf};

pub type ParasolResult<T> = Result<T, ParasolError>;

#[derive(thiserror::Error, Debug)]
pub enum ParasolError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("structural error: {0}")]
    Structure(String),

    #[error("io error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ParasolError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn structure(msg: impl Into<String>) -> Self {
        Self::Structure(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn csv(path: impl AsRef<Path>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// True for rejections caused by caller arguments rather than the environment.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Structure(_))
    }
}
