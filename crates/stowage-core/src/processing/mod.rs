//! Typed read/write pipelines for settings files and streams.

pub mod reader;
pub mod writer;

use std::path::Path;

pub use reader::SettingsReader;
pub use writer::SettingsWriter;

use crate::error::{Result, SettingsError};

/// Reject empty or whitespace-only paths.
fn ensure_path(path: &Path) -> Result<()> {
    if path.to_string_lossy().trim().is_empty() {
        return Err(SettingsError::invalid_argument(
            "file name must not be empty or consist of whitespace only",
        ));
    }
    Ok(())
}

/// Log and discard a failure for the `try_*` surface.
fn swallow<R>(component: &'static str, result: Result<R>) -> Option<R> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(component, error = %err, "settings operation failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_paths_are_rejected() {
        for path in ["", "   ", "\t"] {
            let err = ensure_path(Path::new(path)).unwrap_err();
            assert!(matches!(err, SettingsError::InvalidArgument(_)));
        }
        assert!(ensure_path(Path::new("settings.conf")).is_ok());
    }

    #[test]
    fn swallow_turns_errors_into_none() {
        assert_eq!(swallow("test", Ok(5)), Some(5));
        let failed: Option<u8> = swallow("test", Err(SettingsError::invalid_state("boom")));
        assert_eq!(failed, None);
    }
}
