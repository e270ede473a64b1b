//! Settings options: format, location, extension and version tagging.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::Result;
use crate::location::StorageResolver;
use crate::types::{SettingsPattern, StorageLocation};

/// Extension used when none (or a blank one) is given.
pub const DEFAULT_EXTENSION: &str = ".conf";

/// Property reported to change listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionsProperty {
    Pattern,
    Location,
    Extension,
    Versionized,
}

/// Positional constructor argument, matched to a property by its type.
#[derive(Debug, Clone)]
pub enum OptionArg {
    Pattern(SettingsPattern),
    Location(StorageLocation),
    Extension(String),
    Versionized(bool),
    Resolver(StorageResolver),
}

impl From<SettingsPattern> for OptionArg {
    fn from(value: SettingsPattern) -> Self {
        OptionArg::Pattern(value)
    }
}

impl From<StorageLocation> for OptionArg {
    fn from(value: StorageLocation) -> Self {
        OptionArg::Location(value)
    }
}

impl From<&str> for OptionArg {
    fn from(value: &str) -> Self {
        OptionArg::Extension(value.to_string())
    }
}

impl From<String> for OptionArg {
    fn from(value: String) -> Self {
        OptionArg::Extension(value)
    }
}

impl From<bool> for OptionArg {
    fn from(value: bool) -> Self {
        OptionArg::Versionized(value)
    }
}

impl From<StorageResolver> for OptionArg {
    fn from(value: StorageResolver) -> Self {
        OptionArg::Resolver(value)
    }
}

type ChangeListener = Arc<dyn Fn(OptionsProperty) + Send + Sync>;

/// Mutable options controlling where and how settings are stored.
///
/// Setters normalize their input and notify listeners only when the stored
/// value actually changes. Cloning copies values and resolver but not
/// listeners.
pub struct SettingsOptions {
    pattern: SettingsPattern,
    location: StorageLocation,
    extension: String,
    versionized: bool,
    resolver: StorageResolver,
    listeners: Vec<ChangeListener>,
}

impl Default for SettingsOptions {
    fn default() -> Self {
        Self {
            pattern: SettingsPattern::default(),
            location: StorageLocation::default(),
            extension: DEFAULT_EXTENSION.to_string(),
            versionized: false,
            resolver: StorageResolver::default(),
            listeners: Vec::new(),
        }
    }
}

impl Clone for SettingsOptions {
    fn clone(&self) -> Self {
        Self {
            pattern: self.pattern,
            location: self.location,
            extension: self.extension.clone(),
            versionized: self.versionized,
            resolver: self.resolver.clone(),
            listeners: Vec::new(),
        }
    }
}

impl fmt::Debug for SettingsOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsOptions")
            .field("pattern", &self.pattern)
            .field("location", &self.location)
            .field("extension", &self.extension)
            .field("versionized", &self.versionized)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl SettingsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build options from positional arguments; each argument is applied to
    /// the property of its type, later arguments win.
    pub fn from_args(args: &[OptionArg]) -> Self {
        let mut options = Self::default();
        for arg in args {
            options.apply(arg.clone());
        }
        options
    }

    fn apply(&mut self, arg: OptionArg) {
        match arg {
            OptionArg::Pattern(pattern) => self.set_pattern(pattern),
            OptionArg::Location(location) => self.set_location(location),
            OptionArg::Extension(extension) => self.set_extension(&extension),
            OptionArg::Versionized(versionized) => self.set_versionized(versionized),
            OptionArg::Resolver(resolver) => self.resolver = resolver,
        }
    }

    pub fn with_pattern(mut self, pattern: SettingsPattern) -> Self {
        self.set_pattern(pattern);
        self
    }

    pub fn with_location(mut self, location: StorageLocation) -> Self {
        self.set_location(location);
        self
    }

    pub fn with_extension(mut self, extension: &str) -> Self {
        self.set_extension(extension);
        self
    }

    pub fn with_versionized(mut self, versionized: bool) -> Self {
        self.set_versionized(versionized);
        self
    }

    pub fn with_resolver(mut self, resolver: StorageResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn pattern(&self) -> SettingsPattern {
        self.pattern
    }

    pub fn set_pattern(&mut self, pattern: SettingsPattern) {
        if self.pattern != pattern {
            self.pattern = pattern;
            self.notify(OptionsProperty::Pattern);
        }
    }

    pub fn location(&self) -> StorageLocation {
        self.location
    }

    pub fn set_location(&mut self, location: StorageLocation) {
        if self.location != location {
            self.location = location;
            self.notify(OptionsProperty::Location);
        }
    }

    /// Normalized extension, always starting with `.`.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn set_extension(&mut self, extension: &str) {
        let extension = normalize_extension(extension);
        if self.extension != extension {
            self.extension = extension;
            self.notify(OptionsProperty::Extension);
        }
    }

    pub fn is_versionized(&self) -> bool {
        self.versionized
    }

    pub fn set_versionized(&mut self, versionized: bool) {
        if self.versionized != versionized {
            self.versionized = versionized;
            self.notify(OptionsProperty::Versionized);
        }
    }

    pub fn resolver(&self) -> &StorageResolver {
        &self.resolver
    }

    /// Register a listener called after each effective property change.
    pub fn subscribe(&mut self, listener: impl Fn(OptionsProperty) + Send + Sync + 'static) {
        self.listeners.push(Arc::new(listener));
    }

    /// Fully qualified settings file path for these options.
    pub fn full_path(&self) -> Result<PathBuf> {
        self.resolver.resolve(self).inspect_err(|err| {
            tracing::debug!(error = %err, options = ?self, "failed to resolve settings path");
        })
    }

    /// A panicking listener is logged and skipped; the new value stays stored.
    fn notify(&self, property: OptionsProperty) {
        for listener in &self.listeners {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| listener(property)));
            if outcome.is_err() {
                tracing::warn!(?property, "options change listener panicked");
            }
        }
    }
}

/// Trim, default blanks to [`DEFAULT_EXTENSION`] and ensure a leading dot.
pub fn normalize_extension(extension: &str) -> String {
    let trimmed = extension.trim();
    if trimmed.is_empty() {
        return DEFAULT_EXTENSION.to_string();
    }
    if trimmed.starts_with('.') {
        trimmed.to_string()
    } else {
        format!(".{trimmed}")
    }
}
