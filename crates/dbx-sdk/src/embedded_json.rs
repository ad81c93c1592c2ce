//! JSON documents embedded as string fields.
//!
//! Some payloads carry a nested document as a *string* containing JSON (the
//! cluster-policy `definition`, for example). The service stores that string
//! verbatim, so it is written with a fixed layout:
//!
//! - `", "` between elements and `": "` between keys and values
//! - every non-ASCII character escaped as `\uXXXX` (UTF-16 surrogate pairs
//!   above the BMP)
//! - struct fields in declaration order, map entries in map order
//!
//! Use the module with `#[serde(with = "crate::embedded_json")]`, or
//! [`option`] for `Option<T>` fields.

use std::io;

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use serde_json::ser::Formatter;

use crate::error::{Error, Result};

/// Formatter reproducing the embedded-document layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpacedAsciiFormatter;

impl Formatter for SpacedAsciiFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let bytes = fragment.as_bytes();
        let mut start = 0;
        for (index, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(&bytes[start..index])?;
            let mut units = [0_u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = index + ch.len_utf8();
        }
        writer.write_all(&bytes[start..])
    }
}

/// Encodes `value` as an embedded JSON document.
///
/// # Errors
///
/// Returns a serialization error if `value` cannot be represented as JSON.
pub fn to_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buffer = Vec::with_capacity(128);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, SpacedAsciiFormatter);
    value.serialize(&mut serializer)?;
    // the formatter only ever emits ASCII
    String::from_utf8(buffer).map_err(|e| Error::serialization(e.to_string()))
}

/// Decodes an embedded JSON document.
///
/// # Errors
///
/// Returns a serialization error if `document` is not valid JSON for `T`.
pub fn from_str<T: DeserializeOwned>(document: &str) -> Result<T> {
    Ok(serde_json::from_str(document)?)
}

/// Serializes `value` as a string holding its JSON encoding.
///
/// # Errors
///
/// Propagates encoding failures as `S::Error`.
pub fn serialize<T, S>(value: &T, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    let document = to_string(value).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&document)
}

/// Deserializes a string holding JSON.
///
/// A plain JSON value in place of the string is accepted as well.
///
/// # Errors
///
/// Fails when the string is not valid JSON for `T`.
pub fn deserialize<'de, T, D>(deserializer: D) -> std::result::Result<T, D::Error>
where
    T: DeserializeOwned,
    D: Deserializer<'de>,
{
    decode(Value::deserialize(deserializer)?).map_err(de::Error::custom)
}

fn decode<T: DeserializeOwned>(value: Value) -> serde_json::Result<T> {
    match value {
        Value::String(document) => serde_json::from_str(&document),
        other => serde_json::from_value(other),
    }
}

/// The same encoding for `Option<T>` fields; `None` maps to `null`.
pub mod option {
    use super::{Deserialize, DeserializeOwned, Deserializer, Serialize, Serializer, Value, de};

    /// Serializes `Some(value)` as an embedded document and `None` as null.
    ///
    /// # Errors
    ///
    /// Propagates encoding failures as `S::Error`.
    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(value) => super::serialize(value, serializer),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes an optional embedded document.
    ///
    /// # Errors
    ///
    /// Fails when a present string is not valid JSON for `T`.
    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: DeserializeOwned,
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(value) => super::decode(value).map(Some).map_err(de::Error::custom),
        }
    }
}
