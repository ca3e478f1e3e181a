//! JSON object encoding for overflow attributes.
//!
//! ```text
//! {"nickname":"ally","team":"blue"}
//! ```
//!
//! Scalars other than strings are accepted on decode and converted to their
//! JSON text (`7`, `true`) so that rows written by other tools stay readable.
//! `null` members are treated as absent. Nested arrays and objects are
//! rejected: a document value is always a flat string.

use super::RowCodec;
use crate::error::{Result, StoreError};
use crate::types::Document;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    pub fn new() -> Self {
        Self
    }
}

impl RowCodec for JsonCodec {
    fn encode(&self, attributes: &Document) -> Result<String> {
        serde_json::to_string(attributes).map_err(|e| StoreError::Codec(e.to_string()))
    }

    fn decode(&self, text: &str) -> Result<Document> {
        let object: Map<String, Value> = serde_json::from_str(text)
            .map_err(|e| StoreError::Codec(format!("overflow is not a JSON object: {}", e)))?;

        let mut attributes = Document::new();
        for (key, value) in object {
            let text = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null => continue,
                Value::Array(_) | Value::Object(_) => {
                    return Err(StoreError::Codec(format!(
                        "overflow attribute '{}' is not a scalar",
                        key
                    )));
                }
            };
            attributes.insert(key, text);
        }
        Ok(attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(pairs: &[(&str, &str)]) -> Document {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn encodes_flat_object_in_key_order() {
        let codec = JsonCodec::new();
        let text = codec
            .encode(&doc(&[("team", "blue"), ("nickname", "ally")]))
            .unwrap();

        assert_eq!(text, r#"{"nickname":"ally","team":"blue"}"#);
    }

    #[test]
    fn decode_restores_encoded_document() {
        let codec = JsonCodec::new();
        let original = doc(&[("quote", "say \"hi\""), ("path", "a\\b"), ("empty", "")]);

        let decoded = codec.decode(&codec.encode(&original).unwrap()).unwrap();

        assert_eq!(decoded, original);
    }

    #[test]
    fn decode_stringifies_scalars_and_skips_null() {
        let codec = JsonCodec::new();
        let decoded = codec
            .decode(r#"{"age":7,"ratio":0.5,"admin":true,"gone":null}"#)
            .unwrap();

        assert_eq!(decoded, doc(&[("age", "7"), ("ratio", "0.5"), ("admin", "true")]));
    }

    #[test]
    fn decode_rejects_nested_values() {
        let codec = JsonCodec::new();
        let err = codec.decode(r#"{"tags":["a","b"]}"#).unwrap_err();

        assert!(matches!(err, StoreError::Codec(msg) if msg.contains("tags")));
    }

    #[test]
    fn decode_rejects_non_objects() {
        let codec = JsonCodec::new();

        assert!(codec.decode("[]").is_err());
        assert!(codec.decode("\"text\"").is_err());
        assert!(codec.decode("{unterminated").is_err());
    }
}
