//! Settings reader.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::marker::PhantomData;
use std::path::Path;

use serde::de::DeserializeOwned;

use super::{ensure_path, swallow};
use crate::error::{Result, SettingsError};
use crate::format::{self, serializer_for_pattern};
use crate::options::SettingsOptions;

/// Loads settings of type `T`.
///
/// Methods without an options argument use the reader's own options; methods
/// without a path resolve it from the options in effect.
pub struct SettingsReader<T> {
    options: SettingsOptions,
    _settings: PhantomData<fn() -> T>,
}

impl<T> Default for SettingsReader<T> {
    fn default() -> Self {
        Self::with_options(SettingsOptions::default())
    }
}

impl<T> Clone for SettingsReader<T> {
    fn clone(&self) -> Self {
        Self::with_options(self.options.clone())
    }
}

impl<T> fmt::Debug for SettingsReader<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsReader")
            .field("settings", &std::any::type_name::<T>())
            .field("options", &self.options)
            .finish()
    }
}

impl<T> SettingsReader<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: SettingsOptions) -> Self {
        Self {
            options,
            _settings: PhantomData,
        }
    }

    /// Options used by the methods that take none.
    pub fn options(&self) -> &SettingsOptions {
        &self.options
    }
}

impl<T: DeserializeOwned> SettingsReader<T> {
    pub fn read(&self) -> Result<T> {
        self.read_with(&self.options)
    }

    pub fn read_with(&self, options: &SettingsOptions) -> Result<T> {
        let path = options.full_path()?;
        self.read_path_with(options, path)
    }

    pub fn read_path(&self, path: impl AsRef<Path>) -> Result<T> {
        self.read_path_with(&self.options, path)
    }

    /// Read from a file; fails with `NotFound` if it does not exist.
    pub fn read_path_with(&self, options: &SettingsOptions, path: impl AsRef<Path>) -> Result<T> {
        let path = path.as_ref();
        ensure_path(path)?;
        if !path.exists() {
            return Err(SettingsError::NotFound(path.to_path_buf()));
        }

        tracing::debug!(path = %path.display(), pattern = %options.pattern(), "reading settings");
        let file = File::open(path)?;
        self.read_stream_with(options, BufReader::new(file))
    }

    pub fn read_stream(&self, reader: impl Read) -> Result<T> {
        self.read_stream_with(&self.options, reader)
    }

    /// Decode a document from `reader`.
    ///
    /// A document holding only `null` carries no settings and is rejected,
    /// even when `T` could represent it (such as `Option<_>`).
    pub fn read_stream_with(&self, options: &SettingsOptions, mut reader: impl Read) -> Result<T> {
        let pattern = options.pattern();
        let tree = serializer_for_pattern(pattern).load(&mut reader)?;
        if tree.is_null() {
            return Err(SettingsError::serialization(
                pattern,
                "document holds no settings value",
            ));
        }
        format::decode(pattern, tree)
    }

    pub fn try_read(&self) -> Option<T> {
        swallow("reader", self.read())
    }

    pub fn try_read_with(&self, options: &SettingsOptions) -> Option<T> {
        swallow("reader", self.read_with(options))
    }

    pub fn try_read_path(&self, path: impl AsRef<Path>) -> Option<T> {
        swallow("reader", self.read_path(path))
    }

    pub fn try_read_path_with(
        &self,
        options: &SettingsOptions,
        path: impl AsRef<Path>,
    ) -> Option<T> {
        swallow("reader", self.read_path_with(options, path))
    }

    pub fn try_read_stream(&self, reader: impl Read) -> Option<T> {
        swallow("reader", self.read_stream(reader))
    }

    pub fn try_read_stream_with(&self, options: &SettingsOptions, reader: impl Read) -> Option<T> {
        swallow("reader", self.read_stream_with(options, reader))
    }
}
