//! Block: one link in the tamper-evident chain.
//!
//! A block is mined once and never edited afterwards. Its `hash` covers every
//! other field, so any later change is visible on recomputation.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::canonical::BlockPreimage;
use crate::error::{CoreError, Result};
use crate::pow::{self, MiningPolicy};
use crate::types::BlockHash;

/// Message stored in the genesis block.
pub const GENESIS_MESSAGE: &str = "Genesis Block";

/// A mined block.
///
/// Field order matches the exported JSON layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Position in the chain (genesis is 0).
    pub index: u64,

    /// ISO-8601 creation time (UTC, microsecond precision).
    pub timestamp: String,

    /// Opaque payload. Always a JSON object.
    pub data: Map<String, Value>,

    /// Hash of the preceding block (all zeros for genesis).
    pub previous_hash: BlockHash,

    /// SHA-256 of the canonical encoding of every other field.
    pub hash: BlockHash,

    /// Proof-of-work counter.
    pub nonce: u64,

    /// Record this block anchors, if any.
    #[serde(default)]
    pub record_id: Option<u64>,
}

impl Block {
    /// The canonical hash preimage of this block's stored fields.
    pub fn preimage(&self) -> BlockPreimage {
        BlockPreimage::new(
            self.index,
            &self.timestamp,
            &self.data,
            &self.previous_hash,
            self.record_id,
        )
    }

    /// Recompute the hash from the stored fields.
    pub fn compute_hash(&self) -> BlockHash {
        self.preimage().hash(self.nonce)
    }

    /// Check that the stored hash matches the stored fields.
    pub fn has_consistent_hash(&self) -> bool {
        self.compute_hash() == self.hash
    }

    /// Check the proof-of-work predicate on the stored hash.
    pub fn meets_difficulty(&self, difficulty: u8) -> bool {
        self.hash.meets_difficulty(difficulty)
    }

    /// Check if this is the genesis block.
    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }
}

/// Data map of the genesis block.
pub fn genesis_data() -> Map<String, Value> {
    let mut data = Map::new();
    data.insert("message".into(), Value::String(GENESIS_MESSAGE.into()));
    data
}

/// Current UTC time in the block timestamp format.
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Builder for candidate blocks.
///
/// A candidate only becomes a [`Block`] by being mined.
#[derive(Debug, Clone)]
pub struct BlockBuilder {
    index: u64,
    previous_hash: BlockHash,
    timestamp: Option<String>,
    data: Map<String, Value>,
    record_id: Option<u64>,
}

impl BlockBuilder {
    /// Start building the block at `index` linked to `previous_hash`.
    pub fn new(index: u64, previous_hash: BlockHash) -> Self {
        Self {
            index,
            previous_hash,
            timestamp: None,
            data: Map::new(),
            record_id: None,
        }
    }

    /// Start building the genesis block.
    pub fn genesis() -> Self {
        Self::new(0, BlockHash::ZERO).data(genesis_data())
    }

    /// Set the timestamp. Defaults to the current time when mined.
    pub fn timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Set the data map.
    pub fn data(mut self, data: Map<String, Value>) -> Self {
        self.data = data;
        self
    }

    /// Set the data from a JSON value, which must be an object.
    pub fn data_value(self, data: Value) -> Result<Self> {
        match data {
            Value::Object(map) => Ok(self.data(map)),
            _ => Err(CoreError::DataNotObject),
        }
    }

    /// Set the anchored record id.
    pub fn record_id(mut self, record_id: Option<u64>) -> Self {
        self.record_id = record_id;
        self
    }

    /// Search for a nonce satisfying the policy and produce the block.
    pub fn mine(self, policy: &MiningPolicy) -> Result<Block> {
        let timestamp = self.timestamp.unwrap_or_else(now_iso8601);
        let preimage = BlockPreimage::new(
            self.index,
            &timestamp,
            &self.data,
            &self.previous_hash,
            self.record_id,
        );

        let proof = pow::mine(&preimage, policy)?;

        Ok(Block {
            index: self.index,
            timestamp,
            data: self.data,
            previous_hash: self.previous_hash,
            hash: proof.hash,
            nonce: proof.nonce,
            record_id: self.record_id,
        })
    }
}
