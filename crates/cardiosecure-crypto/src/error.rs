//! Error types for the crypto module.

use thiserror::Error;

/// Errors that can occur during encryption and key establishment.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The authentication tag did not verify. No plaintext is produced.
    #[error("authentication failed: ciphertext, nonce, or tag was altered or the key is wrong")]
    AuthenticationFailed,

    /// Input that cannot be an encrypted record or a valid encoding.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The peer public key is not a valid P-256 point.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    /// The private scalar is zero or not below the curve order.
    #[error("invalid private key")]
    InvalidPrivateKey,

    /// The operating system RNG failed. Fatal; never retried.
    #[error("secure randomness unavailable: {0}")]
    RandomnessUnavailable(String),

    /// HKDF could not produce the requested output.
    #[error("key derivation failed")]
    KeyDerivation,

    /// PEM/DER export or import failed.
    #[error("key encoding error: {0}")]
    KeyEncoding(String),
}

impl CryptoError {
    /// Whether this failure must be escalated as a security event.
    pub fn is_security_event(&self) -> bool {
        matches!(
            self,
            CryptoError::AuthenticationFailed | CryptoError::InvalidPublicKey(_)
        )
    }
}

/// Result type for crypto operations.
pub type Result<T> = std::result::Result<T, CryptoError>;
