//! Canonical JSON encoding for deterministic hashing.
//!
//! Rules:
//! - Object keys sorted by byte comparison, at every depth
//! - No insignificant whitespace
//! - Integers in plain decimal, floats in shortest round-trip form
//! - Strings escaped the way `serde_json` escapes them (UTF-8 passes through)
//!
//! The canonical encoding is what makes a block hash reproducible: the same
//! block fields always produce the same bytes, and thus the same digest.

use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::error::{CoreError, Result};
use crate::types::BlockHash;

/// Block field keys, in canonical (sorted) order.
mod keys {
    pub const DATA: &str = "data";
    pub const INDEX: &str = "index";
    pub const NONCE: &str = "nonce";
    pub const PREVIOUS_HASH: &str = "previous_hash";
    pub const RECORD_ID: &str = "record_id";
    pub const TIMESTAMP: &str = "timestamp";
}

/// Encode a JSON value to canonical bytes.
pub fn canonical_json(value: &Value) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_value_to(&mut buf, value);
    buf
}

/// Serialize any value through serde and encode it canonically.
pub fn to_canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let value = serde_json::to_value(value).map_err(|e| CoreError::Encoding(e.to_string()))?;
    Ok(canonical_json(&value))
}

/// The hash preimage of a block, split around the nonce.
///
/// Canonical key order puts `nonce` in the middle of the object, so mining
/// only has to re-encode the decimal nonce between a fixed prefix and suffix.
#[derive(Debug, Clone)]
pub struct BlockPreimage {
    prefix: Vec<u8>,
    suffix: Vec<u8>,
}

impl BlockPreimage {
    /// Build the preimage for the hashed block fields (everything but `hash`).
    pub fn new(
        index: u64,
        timestamp: &str,
        data: &Map<String, Value>,
        previous_hash: &BlockHash,
        record_id: Option<u64>,
    ) -> Self {
        let mut prefix = Vec::with_capacity(128);
        prefix.push(b'{');
        encode_key(&mut prefix, keys::DATA);
        encode_object(&mut prefix, data);
        prefix.push(b',');
        encode_key(&mut prefix, keys::INDEX);
        prefix.extend_from_slice(index.to_string().as_bytes());
        prefix.push(b',');
        encode_key(&mut prefix, keys::NONCE);

        let mut suffix = Vec::with_capacity(128);
        suffix.push(b',');
        encode_key(&mut suffix, keys::PREVIOUS_HASH);
        encode_text(&mut suffix, &previous_hash.to_hex());
        suffix.push(b',');
        encode_key(&mut suffix, keys::RECORD_ID);
        match record_id {
            Some(id) => suffix.extend_from_slice(id.to_string().as_bytes()),
            None => suffix.extend_from_slice(b"null"),
        }
        suffix.push(b',');
        encode_key(&mut suffix, keys::TIMESTAMP);
        encode_text(&mut suffix, timestamp);
        suffix.push(b'}');

        Self { prefix, suffix }
    }

    /// The full canonical bytes for a given nonce.
    pub fn bytes(&self, nonce: u64) -> Vec<u8> {
        let nonce = nonce.to_string();
        let mut buf = Vec::with_capacity(self.prefix.len() + nonce.len() + self.suffix.len());
        buf.extend_from_slice(&self.prefix);
        buf.extend_from_slice(nonce.as_bytes());
        buf.extend_from_slice(&self.suffix);
        buf
    }

    /// Hash the preimage for a given nonce without materializing the buffer.
    pub fn hash(&self, nonce: u64) -> BlockHash {
        let mut hasher = Sha256::new();
        hasher.update(&self.prefix);
        hasher.update(nonce.to_string().as_bytes());
        hasher.update(&self.suffix);
        BlockHash(hasher.finalize().into())
    }
}

/// Recursively encode a JSON value.
fn encode_value_to(buf: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Null => buf.extend_from_slice(b"null"),
        Value::Bool(true) => buf.extend_from_slice(b"true"),
        Value::Bool(false) => buf.extend_from_slice(b"false"),
        // serde_json's Display is its serialization form
        Value::Number(n) => buf.extend_from_slice(n.to_string().as_bytes()),
        Value::String(s) => encode_text(buf, s),
        Value::Array(arr) => {
            buf.push(b'[');
            for (i, item) in arr.iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                encode_value_to(buf, item);
            }
            buf.push(b']');
        }
        Value::Object(map) => encode_object(buf, map),
    }
}

/// Encode an object with keys sorted by byte comparison.
fn encode_object(buf: &mut Vec<u8>, map: &Map<String, Value>) {
    let mut entries: Vec<(&String, &Value)> = map.iter().collect();
    entries.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    buf.push(b'{');
    for (i, (key, value)) in entries.into_iter().enumerate() {
        if i > 0 {
            buf.push(b',');
        }
        encode_key(buf, key);
        encode_value_to(buf, value);
    }
    buf.push(b'}');
}

fn encode_key(buf: &mut Vec<u8>, key: &str) {
    encode_text(buf, key);
    buf.push(b':');
}

/// Encode a string literal.
fn encode_text(buf: &mut Vec<u8>, s: &str) {
    buf.push(b'"');
    for ch in s.chars() {
        match ch {
            '"' => buf.extend_from_slice(b"\\\""),
            '\\' => buf.extend_from_slice(b"\\\\"),
            '\u{08}' => buf.extend_from_slice(b"\\b"),
            '\u{0c}' => buf.extend_from_slice(b"\\f"),
            '\n' => buf.extend_from_slice(b"\\n"),
            '\r' => buf.extend_from_slice(b"\\r"),
            '\t' => buf.extend_from_slice(b"\\t"),
            c if (c as u32) < 0x20 => {
                buf.extend_from_slice(format!("\\u{:04x}", c as u32).as_bytes());
            }
            c => {
                let mut utf8 = [0u8; 4];
                buf.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
            }
        }
    }
    buf.push(b'"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keys_sorted_recursively() {
        let value = json!({"b": 1, "a": {"z": true, "m": null}});
        let bytes = canonical_json(&value);
        assert_eq!(bytes, br#"{"a":{"m":null,"z":true},"b":1}"#);
    }

    #[test]
    fn test_canonical_is_deterministic() {
        let v1 = json!({"bpm": 72, "category": "Normal"});
        let v2 = json!({"category": "Normal", "bpm": 72});
        assert_eq!(canonical_json(&v1), canonical_json(&v2));
    }

    #[test]
    fn test_string_escaping_matches_serde_json() {
        let s = "quote\" back\\ nl\n tab\t bell\u{07} caf\u{e9}";
        let mut buf = Vec::new();
        encode_text(&mut buf, s);
        assert_eq!(buf, serde_json::to_vec(s).unwrap());
    }

    #[test]
    fn test_numbers() {
        let value = json!([0, -5, 72, 98.6, 1.0e20]);
        let bytes = canonical_json(&value);
        assert_eq!(bytes, serde_json::to_vec(&value).unwrap());
    }

    #[test]
    fn test_preimage_matches_generic_encoding() {
        let data = json!({"message": "Genesis Block"});
        let data = data.as_object().unwrap();
        let preimage = BlockPreimage::new(
            0,
            "2026-01-14T12:00:00.000000+00:00",
            data,
            &BlockHash::ZERO,
            None,
        );

        let full = json!({
            "index": 0,
            "timestamp": "2026-01-14T12:00:00.000000+00:00",
            "data": {"message": "Genesis Block"},
            "previous_hash": "0".repeat(64),
            "nonce": 417,
            "record_id": null,
        });

        assert_eq!(preimage.bytes(417), canonical_json(&full));
        assert_eq!(preimage.hash(417), BlockHash::digest(&canonical_json(&full)));
    }

    #[test]
    fn test_record_id_changes_preimage() {
        let data = Map::new();
        let a = BlockPreimage::new(1, "t", &data, &BlockHash::ZERO, Some(1));
        let b = BlockPreimage::new(1, "t", &data, &BlockHash::ZERO, Some(2));
        assert_ne!(a.hash(0), b.hash(0));
    }

    #[test]
    fn test_to_canonical_json_struct() {
        #[derive(Serialize)]
        struct Reading {
            category: &'static str,
            bpm: u32,
        }

        let bytes = to_canonical_json(&Reading {
            category: "Normal",
            bpm: 72,
        })
        .unwrap();
        assert_eq!(bytes, br#"{"bpm":72,"category":"Normal"}"#);
    }
}
