//! Internal load results
//!
//! Every step of the ingestion pipeline reports one of these. The public
//! repository and checker operations translate them into empty collections,
//! `None` or fallback stubs, so callers never see them.

use thiserror::Error;

/// Why a piece of content could not be produced
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// Directory or file is absent
    #[error("not found: {0}")]
    NotFound(String),

    /// File was read but its content is unusable
    #[error("invalid content: {0}")]
    Invalid(String),

    /// Operating system level failure
    #[error("i/o error: {0}")]
    Io(String),
}

impl LoadError {
    /// Log at the level the error class calls for
    pub fn log(&self, context: &str) {
        match self {
            LoadError::NotFound(_) | LoadError::Invalid(_) => {
                tracing::warn!("{}: {}", context, self)
            }
            LoadError::Io(_) => tracing::error!("{}: {}", context, self),
        }
    }
}

pub type LoadResult<T> = Result<T, LoadError>;
