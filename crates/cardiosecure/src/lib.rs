//! # CardioSecure
//!
//! Encrypted, tamper-evident storage of small health records.
//!
//! ## Overview
//!
//! A record handed to the [`RecordVault`] is:
//!
//! - **Encrypted** with AES-256-GCM under a key the caller holds or agrees
//!   with a peer through P-256 ECDH
//! - **Anchored** in a proof-of-work hash chain by the digest of its
//!   ciphertext, next to a small non-identifying summary
//! - **Described** for distribution: shards across storage nodes, with the key
//!   in a separate custody boundary
//!
//! The caller receives a [`SealedRecord`] and persists it wherever it chooses.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use cardiosecure::{
//!     HeartRateReading, Ledger, LedgerConfig, RecordVault, SymmetricKey, VaultConfig,
//! };
//!
//! let ledger = Arc::new(Ledger::new(LedgerConfig::default()).unwrap());
//! let vault = RecordVault::new(ledger.clone(), VaultConfig::default()).unwrap();
//! let key = SymmetricKey::generate().unwrap();
//!
//! let reading = HeartRateReading::new("patient-1", 72);
//! let sealed = vault.seal_record(&reading, &key, Some(1)).unwrap();
//!
//! assert!(ledger.is_valid().is_valid());
//! assert!(vault.verify_anchor(1, &sealed.encrypted));
//!
//! let opened: HeartRateReading = vault.open_record(&sealed.encrypted, &key).unwrap();
//! assert_eq!(opened, reading);
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `cardiosecure::core` - Ledger primitives (Block, Ledger, validation)
//! - `cardiosecure::crypto` - AEAD codec and key exchange

pub mod distribution;
pub mod error;
pub mod record;
pub mod vault;

// Re-export component crates
pub use cardiosecure_core as core;
pub use cardiosecure_crypto as crypto;

// Re-export main types for convenience
pub use distribution::{
    DistributionDescriptor, KeyCustody, ShardDescriptor, StorageNode, KEY_CUSTODY_BOUNDARY,
};
pub use error::{Result, VaultError};
pub use record::{HeartRateCategory, HeartRateReading, VaultRecord, SUMMARY_ALLOW_LIST};
pub use vault::{RecordVault, SealedRecord, VaultConfig, CIPHERTEXT_DIGEST_KEY};

// Re-export commonly used component types
pub use cardiosecure_core::{Block, BlockHash, ChainValidity, Ledger, LedgerConfig};
pub use cardiosecure_crypto::{
    derive_shared_key, generate_keypair, EncryptedRecord, KeyPair, PublicKey, SymmetricKey,
};
