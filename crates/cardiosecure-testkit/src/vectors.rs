//! Golden test vectors for deterministic verification.
//!
//! Every expected value here was produced by an independent implementation
//! (Python `hashlib`, `json.dumps(sort_keys=True, separators=(",", ":"),
//! ensure_ascii=False)`, and `cryptography`). A mismatch means the Rust side
//! changed its wire format.

use cardiosecure_core::{BlockHash, BlockPreimage};
use cardiosecure_crypto::{AeadCodec, KeyPair, PrivateKey, SymmetricKey};
use serde_json::{Map, Value};

/// A block-hash vector.
#[derive(Debug, Clone)]
pub struct BlockVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub index: u64,
    pub timestamp: &'static str,
    /// Block data as JSON text (key order irrelevant).
    pub data_json: &'static str,
    pub previous_hash: &'static str,
    pub record_id: Option<u64>,
    /// Expected canonical preimage at nonce 0.
    pub expected_preimage: &'static str,
    /// Expected hash at nonce 0.
    pub expected_hash: &'static str,
    /// First nonce whose hash has two leading hex zeros, and that hash.
    pub pow2_nonce: u64,
    pub pow2_hash: &'static str,
}

impl BlockVector {
    /// The parsed data map.
    pub fn data(&self) -> Map<String, Value> {
        match serde_json::from_str(self.data_json) {
            Ok(Value::Object(map)) => map,
            _ => panic!("vector '{}' has non-object data", self.name),
        }
    }

    /// The preimage for this vector's fields.
    pub fn preimage(&self) -> BlockPreimage {
        let previous = BlockHash::from_hex(self.previous_hash)
            .unwrap_or_else(|_| panic!("vector '{}' has bad previous_hash", self.name));
        BlockPreimage::new(
            self.index,
            self.timestamp,
            &self.data(),
            &previous,
            self.record_id,
        )
    }
}

/// Get all block-hash vectors.
pub fn block_vectors() -> Vec<BlockVector> {
    vec![
        BlockVector {
            name: "genesis",
            index: 0,
            timestamp: "2026-01-14T12:00:00.000000+00:00",
            data_json: r#"{"message":"Genesis Block"}"#,
            previous_hash: "0000000000000000000000000000000000000000000000000000000000000000",
            record_id: None,
            expected_preimage: r#"{"data":{"message":"Genesis Block"},"index":0,"nonce":0,"previous_hash":"0000000000000000000000000000000000000000000000000000000000000000","record_id":null,"timestamp":"2026-01-14T12:00:00.000000+00:00"}"#,
            expected_hash: "d7a3a8e8c9a93d6182060e95f182cff6c51186c3175eb26b369fd08024ac27dd",
            pow2_nonce: 693,
            pow2_hash: "00db6cff893e20f7ce7eaf8351db84e4f6354bdaa7b494989ad3c6689fcef1a8",
        },
        BlockVector {
            name: "heart rate summary",
            index: 1,
            timestamp: "2026-01-14T12:00:01.000000+00:00",
            data_json: r#"{"category":"Normal","value":72,"unit":"bpm","ciphertext_sha256":"abababababababababababababababababababababababababababababababab"}"#,
            previous_hash: "00ff00ff00ff00ff00ff00ff00ff00ff00ff00ff00ff00ff00ff00ff00ff00ff",
            record_id: Some(7),
            expected_preimage: r#"{"data":{"category":"Normal","ciphertext_sha256":"abababababababababababababababababababababababababababababababab","unit":"bpm","value":72},"index":1,"nonce":0,"previous_hash":"00ff00ff00ff00ff00ff00ff00ff00ff00ff00ff00ff00ff00ff00ff00ff00ff","record_id":7,"timestamp":"2026-01-14T12:00:01.000000+00:00"}"#,
            expected_hash: "f498a79c03e02e941bb30a84b5798066f2ee5465ee1d26bc7988deefe57738fd",
            pow2_nonce: 211,
            pow2_hash: "00f4a30b481bbd2ada621cd6e1633a97cde8b15e42eefa13b7338fd9c1cded63",
        },
        BlockVector {
            name: "escapes, floats, nesting",
            index: 2,
            timestamp: "2026-01-14T12:00:02.500000+00:00",
            data_json: r#"{"note":"café \"quoted\"\n","ratio":0.5,"nested":{"b":[1,2,{"z":null,"a":true}],"a":-3}}"#,
            previous_hash: "1111111111111111111111111111111111111111111111111111111111111111",
            record_id: None,
            expected_preimage: r#"{"data":{"nested":{"a":-3,"b":[1,2,{"a":true,"z":null}]},"note":"café \"quoted\"\n","ratio":0.5},"index":2,"nonce":0,"previous_hash":"1111111111111111111111111111111111111111111111111111111111111111","record_id":null,"timestamp":"2026-01-14T12:00:02.500000+00:00"}"#,
            expected_hash: "c39f1e94a47e44154e3ec41363726e54d68b11543ee7c30c101bccd8817ba80a",
            pow2_nonce: 274,
            pow2_hash: "005a78800084b18a3e06a8bfa49e10afcb956c0a358b537f6e6f1be66451556c",
        },
    ]
}

/// An AES-256-GCM vector with a fixed key and nonce.
#[derive(Debug, Clone)]
pub struct AeadVector {
    pub name: &'static str,
    pub key: [u8; 32],
    pub nonce: [u8; 12],
    pub plaintext: &'static [u8],
    /// `ciphertext || tag`, hex.
    pub expected_sealed: &'static str,
}

fn counting<const N: usize>() -> [u8; N] {
    let mut out = [0u8; N];
    for (i, b) in out.iter_mut().enumerate() {
        *b = i as u8;
    }
    out
}

/// Get all AEAD vectors.
pub fn aead_vectors() -> Vec<AeadVector> {
    vec![
        AeadVector {
            name: "zero key, zero nonce, bpm record",
            key: [0u8; 32],
            nonce: [0u8; 12],
            plaintext: br#"{"bpm":72}"#,
            expected_sealed: "b585224d20425159353332473cb9e371379c29f8691d7f44d5fb",
        },
        AeadVector {
            name: "counting key and nonce",
            key: counting::<32>(),
            nonce: counting::<12>(),
            plaintext: b"heart rate 72 bpm",
            expected_sealed: "2f67b769b1c5b07af924b7bc83c91a1deeee93334093c44d9ec3bd5393a02a3bda",
        },
    ]
}

/// An ECDH + HKDF vector with fixed scalars.
#[derive(Debug, Clone)]
pub struct ExchangeVector {
    pub name: &'static str,
    pub scalar_a: [u8; 32],
    pub scalar_b: [u8; 32],
    /// Uncompressed SEC1 public key of `scalar_a`, hex.
    pub expected_public_a: &'static str,
    pub expected_public_b: &'static str,
    /// HKDF-SHA256 output, hex.
    pub expected_key: &'static str,
}

/// Get all key-exchange vectors.
pub fn exchange_vectors() -> Vec<ExchangeVector> {
    vec![ExchangeVector {
        name: "repeated-byte scalars",
        scalar_a: [0x11; 32],
        scalar_b: [0x22; 32],
        expected_public_a: "040217e617f0b6443928278f96999e69a23a4f2c152bdf6d6cdf66e5b80282d4ed194a7debcb97712d2dda3ca85aa8765a56f45fc758599652f2897c65306e5794",
        expected_public_b: "04d65a93977caa3d1b081852ff57a79e465f1660577304baead505dd3a48589cf350185e895372df6221ea3a137557e473fddb6755f05bd507c3c533fce9c91285",
        expected_key: "ba3d9e8b6470828916d2b41e5ae503bbe8cd0e769c665cf6e8b7c017f6bc6fb8",
    }]
}

/// Run every vector and report `(name, matches, actual)`.
///
/// Call this to verify an implementation matches the reference.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    let mut results = Vec::new();

    for v in block_vectors() {
        let preimage = v.preimage();
        let hash = preimage.hash(0);
        let pow = preimage.hash(v.pow2_nonce);
        let matches = preimage.bytes(0) == v.expected_preimage.as_bytes()
            && hash.to_hex() == v.expected_hash
            && pow.to_hex() == v.pow2_hash;
        results.push((format!("block: {}", v.name), matches, hash.to_hex()));
    }

    for v in aead_vectors() {
        let codec = AeadCodec::new(&SymmetricKey::from_bytes(v.key));
        let actual = match codec.encrypt_with_nonce(v.nonce, v.plaintext) {
            Ok(record) => {
                let mut sealed = record.ciphertext().to_vec();
                sealed.extend_from_slice(record.tag());
                hex::encode(sealed)
            }
            Err(e) => e.to_string(),
        };
        results.push((format!("aead: {}", v.name), actual == v.expected_sealed, actual));
    }

    for v in exchange_vectors() {
        let actual = match (
            PrivateKey::from_bytes(&v.scalar_a),
            PrivateKey::from_bytes(&v.scalar_b),
        ) {
            (Ok(a), Ok(b)) => {
                let a = KeyPair::from_private(a);
                let b = KeyPair::from_private(b);
                let publics_match = a.public_key().to_hex() == v.expected_public_a
                    && b.public_key().to_hex() == v.expected_public_b;
                match a.derive_shared_key(&b.public_key()) {
                    Ok(key) if publics_match => hex::encode(key.as_bytes()),
                    Ok(_) => "public key mismatch".to_string(),
                    Err(e) => e.to_string(),
                }
            }
            _ => "invalid scalar".to_string(),
        };
        results.push((format!("exchange: {}", v.name), actual == v.expected_key, actual));
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors_match() {
        for (name, matches, actual) in verify_all_vectors() {
            assert!(matches, "vector '{name}' mismatch: got {actual}");
        }
    }

    #[test]
    fn test_pow_nonce_is_first() {
        for v in block_vectors() {
            let preimage = v.preimage();
            assert!(preimage.hash(v.pow2_nonce).meets_difficulty(2));
            for nonce in 0..v.pow2_nonce {
                assert!(
                    !preimage.hash(nonce).meets_difficulty(2),
                    "vector '{}' has an earlier nonce {nonce}",
                    v.name
                );
            }
        }
    }

    #[test]
    fn test_key_order_does_not_matter() {
        let v = &block_vectors()[1];
        let reordered: Map<String, Value> = serde_json::from_str(
            r#"{"unit":"bpm","ciphertext_sha256":"abababababababababababababababababababababababababababababababab","value":72,"category":"Normal"}"#,
        )
        .unwrap();
        let previous = BlockHash::from_hex(v.previous_hash).unwrap();
        let preimage =
            BlockPreimage::new(v.index, v.timestamp, &reordered, &previous, v.record_id);
        assert_eq!(preimage.hash(0).to_hex(), v.expected_hash);
    }

    #[test]
    fn test_decrypt_vectors() {
        for v in aead_vectors() {
            let key = SymmetricKey::from_bytes(v.key);
            let mut blob = v.nonce.to_vec();
            blob.extend_from_slice(&hex::decode(v.expected_sealed).unwrap());
            assert_eq!(
                cardiosecure_crypto::decrypt(&key, &blob).unwrap(),
                v.plaintext,
                "vector '{}'",
                v.name
            );
        }
    }
}
