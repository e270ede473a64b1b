//! XML serializer for settings documents.
//!
//! The document is mapped onto the same JSON-shaped tree the JSON serializer
//! produces:
//! - a record becomes an element whose children are its fields
//! - a sequence field becomes repeated sibling elements
//! - a scalar becomes the text content of its element
//!
//! Scalars read back as strings; typed decoding is done by
//! [`super::text_value::TextValue`].

use std::io::{Read, Write};

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use serde_json::{Map, Value};

use super::FormatSerializer;
use crate::error::{Result, SettingsError};
use crate::types::SettingsPattern;

/// XML settings document serializer.
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlSerializer;

impl FormatSerializer for XmlSerializer {
    fn load(&self, reader: &mut dyn Read) -> Result<Value> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        let (_root, tree) = xml_to_tree(&text)?;
        Ok(tree)
    }

    fn save(&self, writer: &mut dyn Write, tree: &Value, root_name: &str) -> Result<()> {
        let mut xml = Writer::new_with_indent(&mut *writer, b' ', 2);
        xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(xml_error)?;
        if tree.is_array() {
            return Err(xml_error("a sequence cannot be the document root"));
        }
        write_element(&mut xml, &encode_name(root_name)?, tree)?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    fn pattern(&self) -> SettingsPattern {
        SettingsPattern::Xml
    }
}

fn xml_error(err: impl ToString) -> SettingsError {
    SettingsError::serialization(SettingsPattern::Xml, err)
}

fn write_element<W: Write>(xml: &mut Writer<W>, name: &str, value: &Value) -> Result<()> {
    match value {
        Value::Null => write_empty(xml, name),
        Value::Bool(b) => write_text(xml, name, &b.to_string()),
        Value::Number(n) => write_text(xml, name, &n.to_string()),
        Value::String(s) if s.is_empty() => write_empty(xml, name),
        Value::String(s) => write_text(xml, name, s),
        // Null fields are skipped, so an all-null record has no children.
        Value::Object(map) if map.values().all(Value::is_null) => write_empty(xml, name),
        Value::Object(map) => {
            xml.write_event(Event::Start(BytesStart::new(name)))
                .map_err(xml_error)?;
            for (key, field) in map {
                write_field(xml, &encode_name(key)?, field)?;
            }
            xml.write_event(Event::End(BytesEnd::new(name)))
                .map_err(xml_error)?;
            Ok(())
        }
        Value::Array(_) => Err(xml_error(format!(
            "nested sequences are not supported (element '{name}')"
        ))),
    }
}

fn write_field<W: Write>(xml: &mut Writer<W>, name: &str, value: &Value) -> Result<()> {
    match value {
        // Absent element reads back as a missing (None) field.
        Value::Null => Ok(()),
        Value::Array(items) if items.is_empty() => write_empty(xml, name),
        Value::Array(items) => {
            for item in items {
                write_element(xml, name, item)?;
            }
            Ok(())
        }
        other => write_element(xml, name, other),
    }
}

fn write_empty<W: Write>(xml: &mut Writer<W>, name: &str) -> Result<()> {
    xml.write_event(Event::Empty(BytesStart::new(name)))
        .map_err(xml_error)?;
    Ok(())
}

fn write_text<W: Write>(xml: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    xml.write_event(Event::Start(BytesStart::new(name)))
        .map_err(xml_error)?;
    xml.write_event(Event::Text(BytesText::new(text)))
        .map_err(xml_error)?;
    xml.write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml_error)?;
    Ok(())
}

#[derive(Debug)]
struct Frame {
    name: String,
    fields: Map<String, Value>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Result<Self> {
        let name = decode_name(std::str::from_utf8(start.name().as_ref()).map_err(xml_error)?);
        let mut fields = Map::new();
        for attr in start.attributes() {
            let attr = attr.map_err(xml_error)?;
            let key = std::str::from_utf8(attr.key.as_ref()).map_err(xml_error)?;
            if key == "xmlns" || key.starts_with("xmlns:") || key.starts_with("xml:") {
                continue;
            }
            let raw = std::str::from_utf8(&attr.value).map_err(xml_error)?;
            let value = unescape(raw).map_err(xml_error)?;
            insert_field(&mut fields, decode_name(key), Value::String(value.into_owned()));
        }
        Ok(Self {
            name,
            fields,
            text: String::new(),
        })
    }

    /// Elements with children or attributes are records; anything else is text.
    fn close(self) -> (String, Value) {
        let value = if self.fields.is_empty() {
            Value::String(self.text)
        } else {
            Value::Object(self.fields)
        };
        (self.name, value)
    }
}

fn insert_field(fields: &mut Map<String, Value>, key: String, value: Value) {
    match fields.get_mut(&key) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            fields.insert(key, value);
        }
    }
}

/// Parse an XML document into its root element name and JSON-shaped tree.
pub fn xml_to_tree(text: &str) -> Result<(String, Value)> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, Value)> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            xml_error(format!(
                "malformed document at byte {}: {e}",
                reader.buffer_position()
            ))
        })?;
        match event {
            Event::Start(ref start) => {
                if root.is_some() {
                    return Err(xml_error("document has more than one root element"));
                }
                stack.push(Frame::open(start)?);
            }
            Event::Empty(ref start) => {
                if root.is_some() {
                    return Err(xml_error("document has more than one root element"));
                }
                let (name, value) = Frame::open(start)?.close();
                match stack.last_mut() {
                    Some(parent) => insert_field(&mut parent.fields, name, value),
                    None => root = Some((name, value)),
                }
            }
            Event::End(_) => {
                let Some(frame) = stack.pop() else {
                    return Err(xml_error("unexpected closing tag"));
                };
                let (name, value) = frame.close();
                match stack.last_mut() {
                    Some(parent) => insert_field(&mut parent.fields, name, value),
                    None => root = Some((name, value)),
                }
            }
            Event::Text(ref text) => {
                if let Some(frame) = stack.last_mut() {
                    let raw = std::str::from_utf8(&**text).map_err(xml_error)?;
                    frame.text.push_str(&unescape(raw).map_err(xml_error)?);
                }
            }
            Event::GeneralRef(ref entity) => {
                if let Some(frame) = stack.last_mut() {
                    let name = std::str::from_utf8(&**entity).map_err(xml_error)?;
                    let reference = format!("&{name};");
                    frame.text.push_str(&unescape(&reference).map_err(xml_error)?);
                }
            }
            Event::CData(ref data) => {
                if let Some(frame) = stack.last_mut() {
                    frame
                        .text
                        .push_str(std::str::from_utf8(&**data).map_err(xml_error)?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(xml_error("unexpected end of document"));
    }
    root.ok_or_else(|| xml_error("document has no root element"))
}

fn is_name_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_numeric() || c == '-' || c == '.'
}

/// Encode a key as an XML name; offending characters become `_xHHHH_`.
fn encode_name(name: &str) -> Result<String> {
    if name.is_empty() {
        return Err(xml_error("element names cannot be empty"));
    }
    let chars: Vec<char> = name.chars().collect();
    let mut encoded = String::with_capacity(name.len());
    for (index, &c) in chars.iter().enumerate() {
        let valid = if index == 0 {
            is_name_start(c)
        } else {
            is_name_char(c)
        };
        let ambiguous = c == '_' && escape_at(&chars[index..]).is_some();
        if valid && !ambiguous {
            encoded.push(c);
        } else {
            for unit in c.encode_utf16(&mut [0; 2]) {
                encoded.push_str(&format!("_x{unit:04X}_"));
            }
        }
    }
    Ok(encoded)
}

/// Reverse of [`encode_name`].
fn decode_name(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut units: Vec<u16> = Vec::new();
    let mut decoded = String::with_capacity(name.len());
    let mut index = 0;
    while index < chars.len() {
        if let Some(unit) = escape_at(&chars[index..]) {
            units.push(unit);
            index += 7;
            continue;
        }
        decoded.push_str(&String::from_utf16_lossy(&units));
        units.clear();
        decoded.push(chars[index]);
        index += 1;
    }
    decoded.push_str(&String::from_utf16_lossy(&units));
    decoded
}

/// UTF-16 unit of an `_xHHHH_` escape at the start of `chars`.
fn escape_at(chars: &[char]) -> Option<u16> {
    if chars.len() < 7 || chars[0] != '_' || chars[1] != 'x' || chars[6] != '_' {
        return None;
    }
    let hex: String = chars[2..6].iter().collect();
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(&hex, 16).ok()
}
