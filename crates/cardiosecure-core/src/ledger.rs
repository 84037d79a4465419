//! Ledger: an ordered, append-only chain of mined blocks.
//!
//! The ledger owns its chain. Appends are serialized by a dedicated mutex and
//! mined outside the chain lock, so readers (including [`Ledger::is_valid`])
//! are never blocked by a long proof-of-work search and always observe either
//! the chain before an append or the chain after it.

use std::sync::{Mutex, PoisonError, RwLock, RwLockReadGuard};

use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::block::{Block, BlockBuilder};
use crate::error::{CoreError, Result};
use crate::pow::{check_difficulty, MiningPolicy};
use crate::validation::{validate_chain, ChainValidity};

/// Configuration for a ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Leading hex zeros required of every block hash appended without an
    /// explicit difficulty (genesis included).
    pub difficulty: u8,
    /// Per-block cap on hash attempts; exceeding it fails with `MiningTimeout`.
    pub max_attempts: Option<u64>,
}

impl LedgerConfig {
    /// Mining policy at the configured difficulty.
    pub fn policy(&self) -> MiningPolicy {
        self.policy_at(self.difficulty)
    }

    /// Mining policy at an explicit difficulty with the configured cap.
    pub fn policy_at(&self, difficulty: u8) -> MiningPolicy {
        MiningPolicy {
            difficulty,
            max_attempts: self.max_attempts,
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            difficulty: 2,
            max_attempts: Some(10_000_000),
        }
    }
}

/// The tamper-evident ledger.
///
/// Invariant: the chain always holds at least the genesis block.
pub struct Ledger {
    chain: RwLock<Vec<Block>>,
    append_lock: Mutex<()>,
    config: LedgerConfig,
}

#[allow(clippy::len_without_is_empty)]
impl Ledger {
    /// Create a ledger and mine its genesis block.
    pub fn new(config: LedgerConfig) -> Result<Self> {
        check_difficulty(config.difficulty)?;
        let genesis = BlockBuilder::genesis().mine(&config.policy())?;
        info!(hash = %genesis.hash, difficulty = config.difficulty, "genesis block mined");

        Ok(Self {
            chain: RwLock::new(vec![genesis]),
            append_lock: Mutex::new(()),
            config,
        })
    }

    /// Load a previously exported chain as-is.
    ///
    /// Nothing is repaired: call [`Ledger::is_valid`] to audit the result.
    pub fn from_blocks(blocks: Vec<Block>, config: LedgerConfig) -> Result<Self> {
        check_difficulty(config.difficulty)?;
        if blocks.is_empty() {
            return Err(CoreError::EmptyChain);
        }
        Ok(Self {
            chain: RwLock::new(blocks),
            append_lock: Mutex::new(()),
            config,
        })
    }

    /// Load a chain from the JSON produced by [`Ledger::to_json`].
    pub fn from_json(json: &str, config: LedgerConfig) -> Result<Self> {
        let blocks: Vec<Block> =
            serde_json::from_str(json).map_err(|e| CoreError::Decoding(e.to_string()))?;
        Self::from_blocks(blocks, config)
    }

    /// Export the chain as a pretty-printed JSON array of blocks.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&*self.read_chain())
            .map_err(|e| CoreError::Encoding(e.to_string()))
    }

    /// Get the configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Mine and append a block at the configured difficulty.
    pub fn append(&self, data: Map<String, Value>, record_id: Option<u64>) -> Result<Block> {
        self.append_with_difficulty(data, record_id, self.config.difficulty)
    }

    /// Mine and append a block at an explicit difficulty.
    ///
    /// Atomic: on `MiningTimeout` (or any other error) the chain is unchanged.
    pub fn append_with_difficulty(
        &self,
        data: Map<String, Value>,
        record_id: Option<u64>,
        difficulty: u8,
    ) -> Result<Block> {
        let _append = self
            .append_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // Only appenders change the head and we hold the append lock, so the
        // head read here is still the head when the mined block is pushed.
        let (index, previous_hash) = {
            let chain = self.read_chain();
            let head = chain.last().ok_or(CoreError::EmptyChain)?;
            (chain.len() as u64, head.hash)
        };

        let block = BlockBuilder::new(index, previous_hash)
            .data(data)
            .record_id(record_id)
            .mine(&self.config.policy_at(difficulty))?;

        self.chain
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(block.clone());

        info!(
            index = block.index,
            record_id = ?block.record_id,
            nonce = block.nonce,
            hash = %block.hash,
            "block appended"
        );
        Ok(block)
    }

    /// Walk the chain and report whether it is intact.
    ///
    /// Has no side effects beyond logging detected tampering.
    pub fn is_valid(&self) -> ChainValidity {
        let validity = validate_chain(&self.read_chain());
        if let ChainValidity::Tampered(t) = &validity {
            warn!(target: "audit", index = t.index, reason = %t.kind, "ledger tampering detected");
        }
        validity
    }

    /// All blocks anchoring the given record.
    pub fn find_by_record_id(&self, record_id: u64) -> Vec<Block> {
        self.read_chain()
            .iter()
            .filter(|b| b.record_id == Some(record_id))
            .cloned()
            .collect()
    }

    /// Get the block at a position.
    pub fn get(&self, index: u64) -> Option<Block> {
        let index = usize::try_from(index).ok()?;
        self.read_chain().get(index).cloned()
    }

    /// The most recent block.
    pub fn head(&self) -> Option<Block> {
        self.read_chain().last().cloned()
    }

    /// A snapshot of the whole chain.
    pub fn blocks(&self) -> Vec<Block> {
        self.read_chain().clone()
    }

    /// Number of blocks, genesis included.
    pub fn len(&self) -> usize {
        self.read_chain().len()
    }

    /// Mutate a stored block in place without re-mining it.
    ///
    /// Simulates an attacker editing history. Returns false if there is no
    /// block at `index`.
    #[cfg(any(test, feature = "tamper"))]
    pub fn tamper_with(&self, index: u64, f: impl FnOnce(&mut Block)) -> bool {
        let Ok(index) = usize::try_from(index) else {
            return false;
        };
        let mut chain = self.chain.write().unwrap_or_else(PoisonError::into_inner);
        match chain.get_mut(index) {
            Some(block) => {
                f(block);
                true
            }
            None => false,
        }
    }

    fn read_chain(&self) -> RwLockReadGuard<'_, Vec<Block>> {
        self.chain.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("len", &self.len())
            .field("config", &self.config)
            .finish()
    }
}
