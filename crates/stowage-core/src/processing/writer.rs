//! Settings writer.

use std::fmt;
use std::fs;
use std::io::Write;
use std::marker::PhantomData;
use std::path::Path;

use serde::Serialize;

use super::{ensure_path, swallow};
use crate::error::Result;
use crate::format::{self, serializer_for_pattern, type_root_name};
use crate::options::SettingsOptions;

/// Saves settings of type `T`.
///
/// File writes render the whole document into memory first. Nothing is
/// written when the rendered document is blank, and the file's parent
/// directory is created on demand.
pub struct SettingsWriter<T> {
    options: SettingsOptions,
    root_name: Option<String>,
    _settings: PhantomData<fn(&T)>,
}

impl<T> Default for SettingsWriter<T> {
    fn default() -> Self {
        Self::with_options(SettingsOptions::default())
    }
}

impl<T> Clone for SettingsWriter<T> {
    fn clone(&self) -> Self {
        Self {
            options: self.options.clone(),
            root_name: self.root_name.clone(),
            _settings: PhantomData,
        }
    }
}

impl<T> fmt::Debug for SettingsWriter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsWriter")
            .field("settings", &std::any::type_name::<T>())
            .field("root_name", &self.root_name())
            .field("options", &self.options)
            .finish()
    }
}

impl<T> SettingsWriter<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: SettingsOptions) -> Self {
        Self {
            options,
            root_name: None,
            _settings: PhantomData,
        }
    }

    /// Override the XML root element name. Blank names are ignored.
    pub fn with_root_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.trim().is_empty() {
            self.root_name = Some(name.trim().to_string());
        }
        self
    }

    pub fn options(&self) -> &SettingsOptions {
        &self.options
    }

    /// Root element name for XML documents. Defaults to the type's name.
    pub fn root_name(&self) -> &str {
        self.root_name
            .as_deref()
            .unwrap_or_else(|| type_root_name::<T>())
    }
}

impl<T: Serialize> SettingsWriter<T> {
    pub fn write(&self, settings: &T) -> Result<()> {
        self.write_with(&self.options, settings)
    }

    pub fn write_with(&self, options: &SettingsOptions, settings: &T) -> Result<()> {
        let path = options.full_path()?;
        self.write_path_with(options, path, settings)
    }

    pub fn write_path(&self, path: impl AsRef<Path>, settings: &T) -> Result<()> {
        self.write_path_with(&self.options, path, settings)
    }

    pub fn write_path_with(
        &self,
        options: &SettingsOptions,
        path: impl AsRef<Path>,
        settings: &T,
    ) -> Result<()> {
        let path = path.as_ref();
        ensure_path(path)?;

        let mut buffer = Vec::new();
        self.write_stream_with(options, &mut buffer, settings)?;
        if buffer.iter().all(u8::is_ascii_whitespace) {
            tracing::debug!(path = %path.display(), "rendered settings are blank, skipping write");
            return Ok(());
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        tracing::debug!(path = %path.display(), pattern = %options.pattern(), "writing settings");
        fs::write(path, buffer)?;
        Ok(())
    }

    pub fn write_stream(&self, writer: impl Write, settings: &T) -> Result<()> {
        self.write_stream_with(&self.options, writer, settings)
    }

    pub fn write_stream_with(
        &self,
        options: &SettingsOptions,
        mut writer: impl Write,
        settings: &T,
    ) -> Result<()> {
        let pattern = options.pattern();
        let tree = format::encode(pattern, settings)?;
        serializer_for_pattern(pattern).save(&mut writer, &tree, self.root_name())?;
        writer.flush()?;
        Ok(())
    }

    pub fn try_write(&self, settings: &T) -> bool {
        swallow("writer", self.write(settings)).is_some()
    }

    pub fn try_write_with(&self, options: &SettingsOptions, settings: &T) -> bool {
        swallow("writer", self.write_with(options, settings)).is_some()
    }

    pub fn try_write_path(&self, path: impl AsRef<Path>, settings: &T) -> bool {
        swallow("writer", self.write_path(path, settings)).is_some()
    }

    pub fn try_write_path_with(
        &self,
        options: &SettingsOptions,
        path: impl AsRef<Path>,
        settings: &T,
    ) -> bool {
        swallow("writer", self.write_path_with(options, path, settings)).is_some()
    }

    pub fn try_write_stream(&self, writer: impl Write, settings: &T) -> bool {
        swallow("writer", self.write_stream(writer, settings)).is_some()
    }

    pub fn try_write_stream_with(
        &self,
        options: &SettingsOptions,
        writer: impl Write,
        settings: &T,
    ) -> bool {
        swallow("writer", self.write_stream_with(options, writer, settings)).is_some()
    }
}
