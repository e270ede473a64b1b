//! Shared value types used across options, location resolution and formats.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Textual encoding of a persisted settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingsPattern {
    #[default]
    Json,
    Xml,
}

impl SettingsPattern {
    pub fn as_str(self) -> &'static str {
        match self {
            SettingsPattern::Json => "json",
            SettingsPattern::Xml => "xml",
        }
    }

    /// Map a raw discriminant to a pattern; unknown values collapse to the default.
    pub fn from_raw(value: i32) -> Self {
        match value {
            1 => SettingsPattern::Xml,
            _ => SettingsPattern::default(),
        }
    }

    /// Parse a pattern name leniently; unknown names collapse to the default.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "xml" | "xmlpattern" => SettingsPattern::Xml,
            _ => SettingsPattern::default(),
        }
    }
}

impl fmt::Display for SettingsPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Abstract choice of the filesystem root a settings file lives under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageLocation {
    /// Same as [`StorageLocation::ExecutableFolder`].
    #[default]
    Default,
    /// Folder of the running executable, if writing there is permitted.
    /// Otherwise [`StorageLocation::Fallback`] is used.
    ExecutableFolder,
    /// Same as [`StorageLocation::LocalApplicationData`].
    Fallback,
    /// Per-user local application data, e.g. `~/.local/share/<vendor>/<product>`.
    LocalApplicationData,
    /// Per-user roaming application data, e.g. `%APPDATA%\<vendor>\<product>`.
    ApplicationData,
    /// Machine-wide application data, e.g. `%ProgramData%\<vendor>\<product>`.
    CommonApplicationData,
}

impl StorageLocation {
    pub const ALL: [StorageLocation; 6] = [
        StorageLocation::Default,
        StorageLocation::ExecutableFolder,
        StorageLocation::Fallback,
        StorageLocation::LocalApplicationData,
        StorageLocation::ApplicationData,
        StorageLocation::CommonApplicationData,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StorageLocation::Default => "default",
            StorageLocation::ExecutableFolder => "executable-folder",
            StorageLocation::Fallback => "fallback",
            StorageLocation::LocalApplicationData => "local-application-data",
            StorageLocation::ApplicationData => "application-data",
            StorageLocation::CommonApplicationData => "common-application-data",
        }
    }

    /// Fold aliases onto the location they stand for.
    pub fn canonical(self) -> Self {
        match self {
            StorageLocation::Default => StorageLocation::ExecutableFolder,
            StorageLocation::Fallback => StorageLocation::LocalApplicationData,
            other => other,
        }
    }

    /// Map a raw discriminant to a location; unknown values collapse to the default.
    pub fn from_raw(value: i32) -> Self {
        usize::try_from(value)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
            .unwrap_or_default()
    }

    /// Parse a location name leniently; unknown names collapse to the default.
    pub fn from_name(name: &str) -> Self {
        let key: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "executablefolder" => StorageLocation::ExecutableFolder,
            "fallback" | "fallbacklocation" => StorageLocation::Fallback,
            "localapplicationdata" => StorageLocation::LocalApplicationData,
            "applicationdata" => StorageLocation::ApplicationData,
            "commonapplicationdata" => StorageLocation::CommonApplicationData,
            _ => StorageLocation::default(),
        }
    }

    /// The OS folder backing this location, or `None` for the executable folder.
    pub fn known_folder(self) -> Option<KnownFolder> {
        match self.canonical() {
            StorageLocation::LocalApplicationData => Some(KnownFolder::LocalApplicationData),
            StorageLocation::ApplicationData => Some(KnownFolder::ApplicationData),
            StorageLocation::CommonApplicationData => Some(KnownFolder::CommonApplicationData),
            _ => None,
        }
    }
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// OS-defined application data roots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownFolder {
    LocalApplicationData,
    ApplicationData,
    CommonApplicationData,
}

impl fmt::Display for KnownFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KnownFolder::LocalApplicationData => "local application data",
            KnownFolder::ApplicationData => "application data",
            KnownFolder::CommonApplicationData => "common application data",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_fold_to_canonical_locations() {
        assert_eq!(
            StorageLocation::Default.canonical(),
            StorageLocation::ExecutableFolder
        );
        assert_eq!(
            StorageLocation::Fallback.canonical(),
            StorageLocation::LocalApplicationData
        );
        assert_eq!(
            StorageLocation::ApplicationData.canonical(),
            StorageLocation::ApplicationData
        );
    }

    #[test]
    fn unknown_raw_values_collapse_to_defaults() {
        assert_eq!(SettingsPattern::from_raw(1), SettingsPattern::Xml);
        assert_eq!(SettingsPattern::from_raw(42), SettingsPattern::Json);
        assert_eq!(SettingsPattern::from_raw(-1), SettingsPattern::Json);
        assert_eq!(
            StorageLocation::from_raw(5),
            StorageLocation::CommonApplicationData
        );
        assert_eq!(StorageLocation::from_raw(6), StorageLocation::Default);
        assert_eq!(StorageLocation::from_raw(-3), StorageLocation::Default);
    }

    #[test]
    fn names_parse_leniently() {
        assert_eq!(SettingsPattern::from_name(" XML "), SettingsPattern::Xml);
        assert_eq!(SettingsPattern::from_name("yaml"), SettingsPattern::Json);
        assert_eq!(
            StorageLocation::from_name("local-application-data"),
            StorageLocation::LocalApplicationData
        );
        assert_eq!(
            StorageLocation::from_name("FallbackLocation"),
            StorageLocation::Fallback
        );
        assert_eq!(StorageLocation::from_name("nowhere"), StorageLocation::Default);
    }

    #[test]
    fn executable_folder_has_no_known_folder() {
        assert_eq!(StorageLocation::Default.known_folder(), None);
        assert_eq!(
            StorageLocation::Fallback.known_folder(),
            Some(KnownFolder::LocalApplicationData)
        );
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&StorageLocation::ApplicationData).unwrap();
        assert_eq!(json, "\"application-data\"");
        let pattern: SettingsPattern = serde_json::from_str("\"xml\"").unwrap();
        assert_eq!(pattern, SettingsPattern::Xml);
    }
}
