//! Format dispatch for settings documents.
//!
//! Both encodings normalize to a `serde_json::Value` tree. JSON trees carry
//! typed scalars and decode strictly; XML trees carry text scalars and decode
//! through [`text_value::TextValue`], which parses text into the requested
//! scalar types.

mod json;
pub mod text_value;
mod xml;

use std::io::{Read, Write};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Result, SettingsError};
use crate::types::SettingsPattern;

pub use json::JsonSerializer;
pub use xml::{XmlSerializer, xml_to_tree};

/// Reads and writes one textual encoding as a JSON-shaped tree.
pub trait FormatSerializer: Send + Sync {
    /// Parse a document into a tree.
    fn load(&self, reader: &mut dyn Read) -> Result<Value>;

    /// Render a tree as a document. `root_name` names the root element for
    /// encodings that need one.
    fn save(&self, writer: &mut dyn Write, tree: &Value, root_name: &str) -> Result<()>;

    /// Get the pattern this serializer handles.
    fn pattern(&self) -> SettingsPattern;
}

/// Create a serializer for the given pattern.
pub fn serializer_for_pattern(pattern: SettingsPattern) -> Box<dyn FormatSerializer> {
    match pattern {
        SettingsPattern::Json => Box::new(JsonSerializer),
        SettingsPattern::Xml => Box::new(XmlSerializer),
    }
}

/// Convert a settings value into its tree form.
pub fn encode<T: Serialize>(pattern: SettingsPattern, settings: &T) -> Result<Value> {
    serde_json::to_value(settings).map_err(|e| SettingsError::serialization(pattern, e))
}

/// Convert a tree produced by `pattern`'s serializer into a settings value.
pub fn decode<T: DeserializeOwned>(pattern: SettingsPattern, tree: Value) -> Result<T> {
    match pattern {
        SettingsPattern::Json => {
            serde_json::from_value(tree).map_err(|e| SettingsError::serialization(pattern, e))
        }
        SettingsPattern::Xml => {
            T::deserialize(text_value::TextValue::new(tree))
                .map_err(|e| SettingsError::serialization(pattern, e))
        }
    }
}

/// Root element name derived from a type: the last path segment of its
/// name, without generic arguments.
pub fn type_root_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = match full.find('<') {
        Some(index) => &full[..index],
        None => full,
    };
    base.rsplit("::").next().unwrap_or(base)
}
