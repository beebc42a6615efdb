//! Error types for crontime operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CronTimeError {
    /// A malformed rule term, an unparseable instant, or an unsupported
    /// applicability level.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CronTimeError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        CronTimeError::InvalidArgument(message.into())
    }
}

pub type Result<T> = std::result::Result<T, CronTimeError>;
