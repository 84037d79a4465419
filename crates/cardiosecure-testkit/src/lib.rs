//! # CardioSecure Testkit
//!
//! Testing utilities for CardioSecure.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Block hashes, AES-256-GCM, and ECDH/HKDF outputs computed by an independent implementation
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: A device, a server, an agreed key, and a vault
//!
//! ## Golden Vectors
//!
//! ```rust
//! use cardiosecure_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, actual) in verify_all_vectors() {
//!     assert!(matches, "{name}: {actual}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use cardiosecure_testkit::generators::{preimage_from_params, BlockParams};
//!
//! proptest! {
//!     #[test]
//!     fn block_hash_is_deterministic(params: BlockParams) {
//!         let p1 = preimage_from_params(&params);
//!         let p2 = preimage_from_params(&params);
//!         prop_assert_eq!(p1.hash(0), p2.hash(0));
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use cardiosecure_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let sealed = fixture.seal(1, 72).unwrap();
//! assert!(fixture.vault.verify_anchor(1, &sealed.encrypted));
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_party_keypairs, TestFixture, FIXTURE_TIME};
pub use generators::{preimage_from_params, BlockParams};
pub use vectors::{aead_vectors, block_vectors, exchange_vectors, verify_all_vectors};
