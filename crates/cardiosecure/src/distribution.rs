//! Distribution descriptor: where the shards of a sealed record would live.
//!
//! The descriptor is advisory metadata. It partitions the serialized
//! [`EncryptedRecord`] into contiguous shards, assigns each to a storage node,
//! and records that the key is held in a separate custody boundary that never
//! shares a node with ciphertext. Nothing is transmitted.

use std::ops::Range;

use bytes::{Bytes, BytesMut};
use cardiosecure_crypto::{EncryptedRecord, SymmetricKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Result, VaultError};

/// Custody label for keys held outside the storage nodes.
pub const KEY_CUSTODY_BOUNDARY: &str = "kms-isolated";

/// A storage node that can hold one shard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageNode {
    pub id: String,
    pub region: String,
}

impl StorageNode {
    pub fn new(id: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            region: region.into(),
        }
    }

    /// The three simulated geo-nodes used when none are configured.
    pub fn defaults() -> Vec<StorageNode> {
        vec![
            StorageNode::new("node-eu-west-1", "eu-west"),
            StorageNode::new("node-us-east-1", "us-east"),
            StorageNode::new("node-ap-south-1", "ap-south"),
        ]
    }
}

/// One contiguous slice of the record and the node that holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardDescriptor {
    pub node_id: String,
    pub region: String,
    /// Byte offset into the serialized record.
    pub offset: usize,
    pub len: usize,
    /// SHA-256 of the shard bytes, hex.
    pub sha256: String,
}

impl ShardDescriptor {
    /// The byte range this shard covers.
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.len
    }
}

/// Where the key lives. Carries only a fingerprint, never key bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyCustody {
    pub boundary: String,
    pub key_fingerprint: String,
    /// Always false: the key is never stored next to a shard.
    pub co_located_with_shards: bool,
}

/// Advisory placement of one sealed record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionDescriptor {
    /// Length of the serialized record.
    pub total_len: usize,
    /// SHA-256 of the serialized record, hex. Matches the ledger anchor.
    pub record_sha256: String,
    pub shards: Vec<ShardDescriptor>,
    pub key_custody: KeyCustody,
}

impl DistributionDescriptor {
    /// Plan the shards of `record` across `nodes`.
    ///
    /// Shard sizes differ by at most one byte, larger shards first.
    pub fn plan(record: &EncryptedRecord, nodes: &[StorageNode], key: &SymmetricKey) -> Result<Self> {
        if nodes.is_empty() {
            return Err(VaultError::InvalidConfig(
                "at least one storage node is required".into(),
            ));
        }

        let bytes = record.to_bytes();
        let total_len = bytes.len();
        let base = total_len / nodes.len();
        let extra = total_len % nodes.len();

        let mut offset = 0;
        let shards = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| {
                let len = base + usize::from(i < extra);
                let shard = ShardDescriptor {
                    node_id: node.id.clone(),
                    region: node.region.clone(),
                    offset,
                    len,
                    sha256: hex::encode(Sha256::digest(&bytes[offset..offset + len])),
                };
                offset += len;
                shard
            })
            .collect();

        Ok(Self {
            total_len,
            record_sha256: hex::encode(Sha256::digest(&bytes)),
            shards,
            key_custody: KeyCustody {
                boundary: KEY_CUSTODY_BOUNDARY.to_string(),
                key_fingerprint: key.fingerprint(),
                co_located_with_shards: false,
            },
        })
    }

    /// Cut `record` into the planned shards.
    ///
    /// The returned slices share one buffer.
    pub fn split(&self, record: &EncryptedRecord) -> Result<Vec<Bytes>> {
        let bytes = Bytes::from(record.to_bytes());
        if bytes.len() != self.total_len {
            return Err(VaultError::ShardMismatch(format!(
                "record is {} bytes, descriptor expects {}",
                bytes.len(),
                self.total_len
            )));
        }
        Ok(self.shards.iter().map(|s| bytes.slice(s.range())).collect())
    }

    /// Verify every shard against its digest and rebuild the record.
    pub fn reassemble(&self, shards: &[Bytes]) -> Result<EncryptedRecord> {
        if shards.len() != self.shards.len() {
            return Err(VaultError::ShardMismatch(format!(
                "expected {} shards, got {}",
                self.shards.len(),
                shards.len()
            )));
        }

        let mut buf = BytesMut::with_capacity(self.total_len);
        for (i, (shard, desc)) in shards.iter().zip(&self.shards).enumerate() {
            if shard.len() != desc.len {
                return Err(VaultError::ShardMismatch(format!(
                    "shard {i} from {} is {} bytes, expected {}",
                    desc.node_id,
                    shard.len(),
                    desc.len
                )));
            }
            if hex::encode(Sha256::digest(shard)) != desc.sha256 {
                return Err(VaultError::ShardMismatch(format!(
                    "shard {i} from {} fails its digest",
                    desc.node_id
                )));
            }
            buf.extend_from_slice(shard);
        }

        if hex::encode(Sha256::digest(&buf)) != self.record_sha256 {
            return Err(VaultError::ShardMismatch(
                "reassembled record fails its digest".into(),
            ));
        }
        EncryptedRecord::from_bytes(&buf).map_err(|e| VaultError::ShardMismatch(e.to_string()))
    }
}
