//! Error types for the CardioSecure core.

use thiserror::Error;

use crate::types::BlockHash;

/// Core errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("mining gave up after {attempts} attempts at difficulty {difficulty}")]
    MiningTimeout { attempts: u64, difficulty: u8 },

    #[error("difficulty {0} exceeds the 64 hex characters of a SHA-256 digest")]
    InvalidDifficulty(u8),

    #[error("block data must be a JSON object")]
    DataNotObject,

    #[error("cannot load an empty chain")]
    EmptyChain,

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("decoding error: {0}")]
    Decoding(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// What kind of inconsistency was found while walking the chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TamperKind {
    #[error("stored hash {stored} does not match recomputed hash {computed}")]
    HashMismatch {
        stored: BlockHash,
        computed: BlockHash,
    },

    #[error("previous_hash {found} does not link to prior block hash {expected}")]
    BrokenLink { expected: BlockHash, found: BlockHash },

    #[error("block index {found} at position {expected}")]
    IndexOutOfOrder { expected: u64, found: u64 },

    #[error("genesis block does not start from the zero hash")]
    GenesisNotRooted,
}

/// The first point where a chain stops being trustworthy.
///
/// Returned inside [`crate::ChainValidity::Tampered`]. Validation is a query,
/// so this is a value describing the failure rather than a propagated error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("chain tamper detected at block {index}: {kind}")]
pub struct ChainTamperDetected {
    /// Position of the offending block.
    pub index: u64,
    /// What was inconsistent.
    pub kind: TamperKind,
}
