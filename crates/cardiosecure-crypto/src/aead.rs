//! AEAD codec: AES-256-GCM over byte payloads.
//!
//! Wire layout of an [`EncryptedRecord`]: `nonce(12) || ciphertext || tag(16)`.
//! Decryption verifies the tag before any keystream is applied, so a
//! corrupted record never yields plaintext, partial or otherwise.

use aes_gcm::{
    aead::{AeadInPlace, KeyInit},
    Aes256Gcm, Key, Nonce, Tag,
};
use rand::{rngs::OsRng, RngCore};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::error::{CryptoError, Result};
use crate::key::SymmetricKey;

/// GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// GCM tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Shortest possible serialized record (empty plaintext).
pub const MIN_RECORD_LEN: usize = NONCE_LEN + TAG_LEN;

/// An encrypted record. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedRecord {
    nonce: [u8; NONCE_LEN],
    ciphertext: Vec<u8>,
    tag: [u8; TAG_LEN],
}

#[allow(clippy::len_without_is_empty)]
impl EncryptedRecord {
    /// The nonce used for this record.
    pub fn nonce(&self) -> &[u8; NONCE_LEN] {
        &self.nonce
    }

    /// The ciphertext without nonce or tag.
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// The authentication tag.
    pub fn tag(&self) -> &[u8; TAG_LEN] {
        &self.tag
    }

    /// Serialized length in bytes.
    pub fn len(&self) -> usize {
        NONCE_LEN + self.ciphertext.len() + TAG_LEN
    }

    /// Serialize as `nonce || ciphertext || tag`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.len());
        buf.extend_from_slice(&self.nonce);
        buf.extend_from_slice(&self.ciphertext);
        buf.extend_from_slice(&self.tag);
        buf
    }

    /// Split a serialized record. Fails fast on anything shorter than 28 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < MIN_RECORD_LEN {
            return Err(CryptoError::MalformedInput(format!(
                "encrypted record is {} bytes, minimum is {MIN_RECORD_LEN}",
                bytes.len()
            )));
        }

        let (nonce, rest) = bytes.split_at(NONCE_LEN);
        let (ciphertext, tag) = rest.split_at(rest.len() - TAG_LEN);

        let mut record = Self {
            nonce: [0u8; NONCE_LEN],
            ciphertext: ciphertext.to_vec(),
            tag: [0u8; TAG_LEN],
        };
        record.nonce.copy_from_slice(nonce);
        record.tag.copy_from_slice(tag);
        Ok(record)
    }

    /// Lowercase hex of the serialized bytes.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Parse from hex.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| CryptoError::MalformedInput(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// SHA-256 of the serialized bytes, hex. Identifies the ciphertext.
    pub fn digest_hex(&self) -> String {
        hex::encode(Sha256::digest(self.to_bytes()))
    }
}

impl Serialize for EncryptedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for EncryptedRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(de::Error::custom)
    }
}

/// AES-256-GCM bound to one key.
///
/// Stateless apart from the expanded key schedule; safe to share across threads.
#[derive(Clone)]
pub struct AeadCodec {
    cipher: Aes256Gcm,
}

impl AeadCodec {
    /// Create a codec for the given key.
    pub fn new(key: &SymmetricKey) -> Self {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
        Self { cipher }
    }

    /// Encrypt with a fresh random nonce. No associated data.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<EncryptedRecord> {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng
            .try_fill_bytes(&mut nonce)
            .map_err(|e| CryptoError::RandomnessUnavailable(e.to_string()))?;
        self.encrypt_with_nonce(nonce, plaintext)
    }

    /// Encrypt with a caller-chosen nonce.
    ///
    /// Deterministic, for known-answer tests. Reusing a nonce under the same
    /// key destroys GCM's confidentiality and authenticity; use [`Self::encrypt`].
    pub fn encrypt_with_nonce(
        &self,
        nonce: [u8; NONCE_LEN],
        plaintext: &[u8],
    ) -> Result<EncryptedRecord> {
        let mut ciphertext = plaintext.to_vec();
        let tag = self
            .cipher
            .encrypt_in_place_detached(Nonce::from_slice(&nonce), b"", &mut ciphertext)
            .map_err(|_| CryptoError::MalformedInput("plaintext exceeds GCM limits".into()))?;

        let mut tag_bytes = [0u8; TAG_LEN];
        tag_bytes.copy_from_slice(tag.as_slice());

        Ok(EncryptedRecord {
            nonce,
            ciphertext,
            tag: tag_bytes,
        })
    }

    /// Split and decrypt a serialized record.
    pub fn decrypt(&self, blob: &[u8]) -> Result<Vec<u8>> {
        let record = EncryptedRecord::from_bytes(blob)?;
        self.open(&record)
    }

    /// Verify the tag and, only if it matches, decrypt.
    pub fn open(&self, record: &EncryptedRecord) -> Result<Vec<u8>> {
        let mut buffer = record.ciphertext.clone();
        self.cipher
            .decrypt_in_place_detached(
                Nonce::from_slice(&record.nonce),
                b"",
                &mut buffer,
                Tag::from_slice(&record.tag),
            )
            .map_err(|_| CryptoError::AuthenticationFailed)?;
        Ok(buffer)
    }
}

/// Encrypt `plaintext` under `key` with a fresh nonce.
pub fn encrypt(key: &SymmetricKey, plaintext: &[u8]) -> Result<EncryptedRecord> {
    AeadCodec::new(key).encrypt(plaintext)
}

/// Decrypt a serialized `nonce || ciphertext || tag` blob.
pub fn decrypt(key: &SymmetricKey, blob: &[u8]) -> Result<Vec<u8>> {
    AeadCodec::new(key).decrypt(blob)
}
