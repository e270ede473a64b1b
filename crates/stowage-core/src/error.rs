//! Error taxonomy shared by every settings operation.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::SettingsPattern;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SettingsError>;

/// Failure kinds surfaced by the throwing API.
///
/// The `try_*` methods swallow every variant and report failure as
/// `None`/`false` instead.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A required input was blank (path, extension, capability arguments).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The referenced settings file does not exist.
    #[error("settings file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The running program's identity or an OS folder could not be determined.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The factory was asked for something it cannot build.
    #[error("unsupported capability: {0}")]
    UnsupportedCapability(String),

    /// Malformed or type-incompatible document content.
    #[error("{pattern} serialization failed: {message}")]
    Serialization {
        pattern: SettingsPattern,
        message: String,
    },

    /// Underlying I/O failure, passed through unchanged.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SettingsError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub(crate) fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    pub(crate) fn serialization(pattern: SettingsPattern, message: impl ToString) -> Self {
        Self::Serialization {
            pattern,
            message: message.to_string(),
        }
    }

    /// Returns true if this error is the not-found case.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
