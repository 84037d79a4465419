//! Error types for the Record Vault.

use cardiosecure_core::CoreError;
use cardiosecure_crypto::CryptoError;
use thiserror::Error;

/// Errors that can occur during vault operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Encryption, decryption, or key error.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Ledger error.
    #[error("ledger error: {0}")]
    Core(#[from] CoreError),

    /// A sealed bundle could not be encoded or decoded.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// A shard is missing, out of range, or fails its digest.
    #[error("shard mismatch: {0}")]
    ShardMismatch(String),

    /// Vault configuration cannot be used.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl VaultError {
    /// Whether this failure must be escalated as a security event.
    pub fn is_security_event(&self) -> bool {
        match self {
            VaultError::Crypto(e) => e.is_security_event(),
            VaultError::ShardMismatch(_) => true,
            _ => false,
        }
    }
}

/// Result type for vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;
