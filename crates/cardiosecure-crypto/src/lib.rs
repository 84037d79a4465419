//! # CardioSecure Crypto
//!
//! Record encryption and key establishment.
//!
//! ## Overview
//!
//! Records are sealed with AES-256-GCM under a 32-byte [`SymmetricKey`].
//! The key is either generated directly or agreed between two parties with
//! P-256 ECDH followed by HKDF-SHA256.
//!
//! ## Key Types
//!
//! - [`AeadCodec`] - Encrypts and decrypts under one key
//! - [`EncryptedRecord`] - `nonce || ciphertext || tag`
//! - [`KeyPair`] / [`PublicKey`] / [`PrivateKey`] - P-256 key material
//! - [`SymmetricKey`] - Zeroized on drop
//!
//! ## Usage
//!
//! ```rust
//! use cardiosecure_crypto::{decrypt, derive_shared_key, encrypt, generate_keypair};
//!
//! let device = generate_keypair();
//! let server = generate_keypair();
//!
//! let key = derive_shared_key(device.private_key(), &server.public_key()).unwrap();
//! let record = encrypt(&key, br#"{"bpm":72}"#).unwrap();
//!
//! let server_key = derive_shared_key(server.private_key(), &device.public_key()).unwrap();
//! assert_eq!(decrypt(&server_key, &record.to_bytes()).unwrap(), br#"{"bpm":72}"#);
//! ```

pub mod aead;
pub mod error;
pub mod exchange;
pub mod key;

pub use aead::{decrypt, encrypt, AeadCodec, EncryptedRecord, MIN_RECORD_LEN, NONCE_LEN, TAG_LEN};
pub use error::{CryptoError, Result};
pub use exchange::{
    derive_shared_key, derive_shared_key_from_sec1, generate_keypair, KeyPair, PrivateKey,
    PublicKey, HKDF_INFO,
};
pub use key::{SymmetricKey, KEY_LEN};
