//! Chain validation: hash recomputation and link checks.

use serde::Serialize;

use crate::block::Block;
use crate::error::{ChainTamperDetected, TamperKind};
use crate::types::BlockHash;

/// Outcome of walking a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainValidity {
    /// Every block recomputes and links correctly.
    Valid { length: usize },

    /// The first inconsistency found.
    Tampered(ChainTamperDetected),
}

impl ChainValidity {
    /// Check if the chain is trustworthy.
    pub fn is_valid(&self) -> bool {
        matches!(self, ChainValidity::Valid { .. })
    }

    /// The detected tampering, if any.
    pub fn tamper(&self) -> Option<&ChainTamperDetected> {
        match self {
            ChainValidity::Valid { .. } => None,
            ChainValidity::Tampered(t) => Some(t),
        }
    }

    /// Index of the first failing block, if any.
    pub fn failing_index(&self) -> Option<u64> {
        self.tamper().map(|t| t.index)
    }

    /// Human-readable reason, as shown next to the boolean verdict.
    pub fn reason(&self) -> String {
        match self {
            ChainValidity::Valid { length } => format!("chain of {length} blocks is valid"),
            ChainValidity::Tampered(t) => t.to_string(),
        }
    }
}

/// Serialized as `{"valid": bool, "reason": string}` for audit output.
impl Serialize for ChainValidity {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("ChainValidity", 2)?;
        s.serialize_field("valid", &self.is_valid())?;
        s.serialize_field("reason", &self.reason())?;
        s.end()
    }
}

/// Walk the chain and report the first violation.
///
/// Checks, in order:
/// - Genesis is rooted at the zero hash and recomputes
/// - For each later block: stored hash recomputes, `previous_hash` equals
///   the prior block's stored hash, and the index matches its position
///
/// Pure: never mutates or repairs anything.
pub fn validate_chain(blocks: &[Block]) -> ChainValidity {
    let Some(genesis) = blocks.first() else {
        return ChainValidity::Valid { length: 0 };
    };

    if let Err(kind) = check_genesis(genesis) {
        return tampered(0, kind);
    }

    for (position, pair) in blocks.windows(2).enumerate() {
        let (prev, block) = (&pair[0], &pair[1]);
        let position = (position + 1) as u64;

        let computed = block.compute_hash();
        if computed != block.hash {
            return tampered(
                position,
                TamperKind::HashMismatch {
                    stored: block.hash,
                    computed,
                },
            );
        }

        if block.previous_hash != prev.hash {
            return tampered(
                position,
                TamperKind::BrokenLink {
                    expected: prev.hash,
                    found: block.previous_hash,
                },
            );
        }

        if block.index != position {
            return tampered(
                position,
                TamperKind::IndexOutOfOrder {
                    expected: position,
                    found: block.index,
                },
            );
        }
    }

    ChainValidity::Valid {
        length: blocks.len(),
    }
}

fn check_genesis(genesis: &Block) -> Result<(), TamperKind> {
    if genesis.previous_hash != BlockHash::ZERO {
        return Err(TamperKind::GenesisNotRooted);
    }
    if genesis.index != 0 {
        return Err(TamperKind::IndexOutOfOrder {
            expected: 0,
            found: genesis.index,
        });
    }
    let computed = genesis.compute_hash();
    if computed != genesis.hash {
        return Err(TamperKind::HashMismatch {
            stored: genesis.hash,
            computed,
        });
    }
    Ok(())
}

fn tampered(index: u64, kind: TamperKind) -> ChainValidity {
    ChainValidity::Tampered(ChainTamperDetected { index, kind })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockBuilder;
    use crate::pow::MiningPolicy;
    use serde_json::json;

    const POLICY: MiningPolicy = MiningPolicy {
        difficulty: 1,
        max_attempts: None,
    };

    fn make_chain(n: usize) -> Vec<Block> {
        let mut chain = vec![BlockBuilder::genesis().mine(&POLICY).unwrap()];
        for i in 1..=n {
            let prev = chain.last().unwrap().hash;
            let block = BlockBuilder::new(i as u64, prev)
                .data_value(json!({"value": i}))
                .unwrap()
                .record_id(Some(i as u64))
                .mine(&POLICY)
                .unwrap();
            chain.push(block);
        }
        chain
    }

    #[test]
    fn test_honest_chain_is_valid() {
        let chain = make_chain(4);
        assert_eq!(validate_chain(&chain), ChainValidity::Valid { length: 5 });
    }

    #[test]
    fn test_empty_chain_is_trivially_valid() {
        assert!(validate_chain(&[]).is_valid());
    }

    #[test]
    fn test_data_edit_detected_at_block() {
        let mut chain = make_chain(3);
        chain[2].data.insert("value".into(), json!(999));

        let result = validate_chain(&chain);
        assert_eq!(result.failing_index(), Some(2));
        assert!(matches!(
            result.tamper().unwrap().kind,
            TamperKind::HashMismatch { .. }
        ));
    }

    #[test]
    fn test_remined_edit_detected_at_next_block() {
        let mut chain = make_chain(3);
        chain[1].data.insert("value".into(), json!(999));
        chain[1].hash = chain[1].compute_hash();

        let result = validate_chain(&chain);
        assert_eq!(result.failing_index(), Some(2));
        assert!(matches!(
            result.tamper().unwrap().kind,
            TamperKind::BrokenLink { .. }
        ));
    }

    #[test]
    fn test_reordering_detected() {
        let mut chain = make_chain(3);
        chain.swap(1, 2);
        assert!(!validate_chain(&chain).is_valid());
    }

    #[test]
    fn test_genesis_edit_detected() {
        let mut chain = make_chain(1);
        chain[0].data.insert("message".into(), json!("rewritten"));

        let result = validate_chain(&chain);
        assert_eq!(result.failing_index(), Some(0));
    }

    #[test]
    fn test_genesis_must_be_rooted() {
        let mut chain = make_chain(0);
        chain[0].previous_hash = BlockHash::from_bytes([1; 32]);
        assert_eq!(
            validate_chain(&chain).tamper().map(|t| &t.kind),
            Some(&TamperKind::GenesisNotRooted)
        );
    }

    #[test]
    fn test_verdict_serialization() {
        let json = serde_json::to_value(validate_chain(&make_chain(1))).unwrap();
        assert_eq!(json["valid"], json!(true));
        assert!(json["reason"].as_str().unwrap().contains("2 blocks"));
    }
}
