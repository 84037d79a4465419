//! Proof-of-work nonce search.

use tracing::debug;

use crate::canonical::BlockPreimage;
use crate::error::{CoreError, Result};
use crate::types::BlockHash;

/// A SHA-256 hex digest has 64 characters; more leading zeros is unsatisfiable.
pub const MAX_DIFFICULTY: u8 = 64;

/// Parameters of one mining run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MiningPolicy {
    /// Required number of leading hex zeros.
    pub difficulty: u8,
    /// Give up after this many hash attempts. `None` searches the whole nonce space.
    pub max_attempts: Option<u64>,
}

/// A nonce that satisfies the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Proof {
    pub nonce: u64,
    pub hash: BlockHash,
    pub attempts: u64,
}

/// Check that a difficulty is satisfiable.
pub fn check_difficulty(difficulty: u8) -> Result<()> {
    if difficulty > MAX_DIFFICULTY {
        return Err(CoreError::InvalidDifficulty(difficulty));
    }
    Ok(())
}

/// Try nonces 0, 1, 2, ... until the hash meets the difficulty.
///
/// Expected work is about 16^difficulty hashes.
pub fn mine(preimage: &BlockPreimage, policy: &MiningPolicy) -> Result<Proof> {
    check_difficulty(policy.difficulty)?;
    let limit = policy.max_attempts.unwrap_or(u64::MAX);

    let found = (0..limit)
        .map(|nonce| (nonce, preimage.hash(nonce)))
        .find(|(_, hash)| hash.meets_difficulty(policy.difficulty));

    match found {
        Some((nonce, hash)) => {
            debug!(
                difficulty = policy.difficulty,
                attempts = nonce + 1,
                hash = %hash,
                "proof of work found"
            );
            Ok(Proof {
                nonce,
                hash,
                attempts: nonce + 1,
            })
        }
        None => Err(CoreError::MiningTimeout {
            attempts: limit,
            difficulty: policy.difficulty,
        }),
    }
}
