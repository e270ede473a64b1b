//! JSON serializer for settings documents.

use std::io::{Read, Write};

use serde_json::Value;

use super::FormatSerializer;
use crate::error::{Result, SettingsError};
use crate::types::SettingsPattern;

/// JSON settings document serializer.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSerializer;

impl FormatSerializer for JsonSerializer {
    fn load(&self, reader: &mut dyn Read) -> Result<Value> {
        serde_json::from_reader(reader).map_err(|e| {
            if e.is_io() {
                SettingsError::Io(e.into())
            } else {
                SettingsError::serialization(SettingsPattern::Json, e)
            }
        })
    }

    fn save(&self, writer: &mut dyn Write, tree: &Value, _root_name: &str) -> Result<()> {
        serde_json::to_writer_pretty(&mut *writer, tree).map_err(|e| {
            if e.is_io() {
                SettingsError::Io(e.into())
            } else {
                SettingsError::serialization(SettingsPattern::Json, e)
            }
        })?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    fn pattern(&self) -> SettingsPattern {
        SettingsPattern::Json
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn save_is_indented() {
        let mut buffer = Vec::new();
        JsonSerializer
            .save(&mut buffer, &json!({"title": "Main", "size": [800, 600]}), "ignored")
            .expect("save");

        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("{\n  \"title\": \"Main\""));
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn roundtrip_preserves_data_and_order() {
        let original = json!({
            "zeta": "last key first",
            "number": 42,
            "array": ["a", "b", "c"],
            "nested": {"inner": {"deep": true}}
        });
        let mut buffer = Vec::new();
        JsonSerializer.save(&mut buffer, &original, "root").expect("save");

        let loaded = JsonSerializer.load(&mut buffer.as_slice()).expect("load");

        assert_eq!(original, loaded);
        let keys: Vec<_> = loaded.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["zeta", "number", "array", "nested"]);
    }

    #[test]
    fn malformed_document_is_serialization_error() {
        let err = JsonSerializer
            .load(&mut "{\"title\": ".as_bytes())
            .unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Serialization {
                pattern: SettingsPattern::Json,
                ..
            }
        ));
    }
}
