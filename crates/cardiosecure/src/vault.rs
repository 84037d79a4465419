//! The Record Vault: seal a record, anchor it, describe its distribution.
//!
//! Sealing is a fixed pipeline:
//!
//! 1. Encode the record canonically
//! 2. Encrypt with AES-256-GCM under the caller's key
//! 3. Mine a ledger block holding the record's summary and the ciphertext digest
//! 4. Plan the shard distribution
//!
//! The vault holds no key material and no records. The only state it touches
//! is the injected [`Ledger`].

use std::sync::Arc;

use cardiosecure_core::{to_canonical_json, Block, Ledger};
use cardiosecure_crypto::{AeadCodec, CryptoError, EncryptedRecord, SymmetricKey};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::distribution::{DistributionDescriptor, StorageNode};
use crate::error::{Result, VaultError};
use crate::record::VaultRecord;

/// Ledger data key holding the hex SHA-256 of the serialized ciphertext.
pub const CIPHERTEXT_DIGEST_KEY: &str = "ciphertext_sha256";

/// Configuration for the vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultConfig {
    /// Storage nodes shards are planned across. Must not be empty.
    pub nodes: Vec<StorageNode>,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            nodes: StorageNode::defaults(),
        }
    }
}

/// Everything produced by sealing one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SealedRecord {
    pub encrypted: EncryptedRecord,
    pub block: Block,
    pub distribution: DistributionDescriptor,
}

impl SealedRecord {
    /// Encode as a single CBOR bundle.
    pub fn to_cbor(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf)
            .map_err(|e| VaultError::MalformedRecord(format!("CBOR encoding failed: {e}")))?;
        Ok(buf)
    }

    /// Decode a CBOR bundle.
    pub fn from_cbor(bytes: &[u8]) -> Result<Self> {
        ciborium::from_reader(bytes)
            .map_err(|e| VaultError::MalformedRecord(format!("CBOR decoding failed: {e}")))
    }
}

/// Coordinates encryption, anchoring, and distribution of records.
pub struct RecordVault {
    ledger: Arc<Ledger>,
    config: VaultConfig,
}

impl RecordVault {
    /// Create a vault over a shared ledger.
    pub fn new(ledger: Arc<Ledger>, config: VaultConfig) -> Result<Self> {
        if config.nodes.is_empty() {
            return Err(VaultError::InvalidConfig(
                "at least one storage node is required".into(),
            ));
        }
        Ok(Self { ledger, config })
    }

    /// Get the ledger.
    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }

    /// Get the configuration.
    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// Encrypt `record`, anchor it in the ledger, and plan its distribution.
    ///
    /// Appends exactly one block. On error nothing is appended.
    pub fn seal_record<R: VaultRecord>(
        &self,
        record: &R,
        key: &SymmetricKey,
        record_id: Option<u64>,
    ) -> Result<SealedRecord> {
        let plaintext = to_canonical_json(record)?;
        let encrypted = AeadCodec::new(key).encrypt(&plaintext)?;
        let digest = encrypted.digest_hex();

        let distribution = DistributionDescriptor::plan(&encrypted, &self.config.nodes, key)?;

        let mut data = record.ledger_summary();
        data.insert(CIPHERTEXT_DIGEST_KEY.to_string(), Value::from(digest.as_str()));
        let block = self.ledger.append(data, record_id)?;

        info!(
            record_id = ?record_id,
            block = block.index,
            ciphertext = %digest,
            key = %key.fingerprint(),
            shards = distribution.shards.len(),
            "record sealed"
        );

        Ok(SealedRecord {
            encrypted,
            block,
            distribution,
        })
    }

    /// Decrypt a record and parse it as `R`.
    ///
    /// Authentication failures are logged as security events and returned
    /// unchanged.
    pub fn open_record<R: DeserializeOwned>(
        &self,
        encrypted: &EncryptedRecord,
        key: &SymmetricKey,
    ) -> Result<R> {
        let plaintext = AeadCodec::new(key).open(encrypted).map_err(|e| {
            warn!(
                target: "audit",
                error = %e,
                ciphertext = %encrypted.digest_hex(),
                key = %key.fingerprint(),
                "record failed authentication"
            );
            VaultError::from(e)
        })?;

        serde_json::from_slice(&plaintext)
            .map_err(|e| VaultError::Crypto(CryptoError::MalformedInput(e.to_string())))
    }

    /// Whether the ledger anchors exactly this ciphertext under `record_id`.
    pub fn verify_anchor(&self, record_id: u64, encrypted: &EncryptedRecord) -> bool {
        let digest = encrypted.digest_hex();
        let anchored = self.ledger.find_by_record_id(record_id).iter().any(|block| {
            block.data.get(CIPHERTEXT_DIGEST_KEY).and_then(Value::as_str) == Some(digest.as_str())
        });

        if !anchored {
            warn!(
                target: "audit",
                record_id,
                ciphertext = %digest,
                "ciphertext has no ledger anchor"
            );
        }
        anchored
    }
}

impl std::fmt::Debug for RecordVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordVault")
            .field("ledger_len", &self.ledger.len())
            .field("nodes", &self.config.nodes.len())
            .finish()
    }
}
