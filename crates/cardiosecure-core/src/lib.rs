//! # CardioSecure Core
//!
//! Pure primitives for the CardioSecure ledger: blocks, canonical encoding,
//! proof-of-work, and chain validation.
//!
//! This crate contains no I/O and no networking. It is computation over a
//! hash-chained sequence of blocks.
//!
//! ## Key Types
//!
//! - [`Ledger`] - The append-only chain, safe to share across threads
//! - [`Block`] - One mined link, hashed over its canonical encoding
//! - [`BlockHash`] - SHA-256 digest, hex on the wire
//! - [`ChainValidity`] - Result of walking the chain
//!
//! ## Canonicalization
//!
//! Block hashes are SHA-256 over sorted-key compact JSON. See [`canonical`].

pub mod block;
pub mod canonical;
pub mod error;
pub mod ledger;
pub mod pow;
pub mod types;
pub mod validation;

pub use block::{genesis_data, Block, BlockBuilder, GENESIS_MESSAGE};
pub use canonical::{canonical_json, to_canonical_json, BlockPreimage};
pub use error::{ChainTamperDetected, CoreError, Result, TamperKind};
pub use ledger::{Ledger, LedgerConfig};
pub use pow::{MiningPolicy, Proof, MAX_DIFFICULTY};
pub use types::BlockHash;
pub use validation::{validate_chain, ChainValidity};
