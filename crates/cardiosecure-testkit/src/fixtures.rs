//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use cardiosecure::{
    HeartRateReading, KeyPair, Ledger, LedgerConfig, RecordVault, Result, SealedRecord,
    SymmetricKey, VaultConfig,
};
use cardiosecure_crypto::PrivateKey;

/// Measurement time used by fixture readings.
pub const FIXTURE_TIME: &str = "2026-01-14T12:00:00.000000+00:00";

/// A device and a server that have agreed a key, plus a vault over a fresh ledger.
pub struct TestFixture {
    pub device: KeyPair,
    pub server: KeyPair,
    pub key: SymmetricKey,
    pub ledger: Arc<Ledger>,
    pub vault: RecordVault,
}

impl TestFixture {
    /// Create a fixture with random key pairs at the default difficulty.
    pub fn new() -> Self {
        Self::build(KeyPair::generate(), KeyPair::generate(), LedgerConfig::default())
    }

    /// Create a fixture mining at `difficulty`.
    pub fn with_difficulty(difficulty: u8) -> Self {
        let config = LedgerConfig {
            difficulty,
            ..LedgerConfig::default()
        };
        Self::build(KeyPair::generate(), KeyPair::generate(), config)
    }

    /// Create with deterministic key pairs.
    pub fn deterministic() -> Self {
        let mut parties = multi_party_keypairs(2).into_iter();
        match (parties.next(), parties.next()) {
            (Some(device), Some(server)) => Self::build(device, server, LedgerConfig::default()),
            _ => unreachable!("two parties requested"),
        }
    }

    fn build(device: KeyPair, server: KeyPair, config: LedgerConfig) -> Self {
        let key = device
            .derive_shared_key(&server.public_key())
            .expect("fixture key agreement failed");
        let ledger = Arc::new(Ledger::new(config).expect("fixture ledger failed"));
        let vault = RecordVault::new(ledger.clone(), VaultConfig::default())
            .expect("default vault config is valid");

        Self {
            device,
            server,
            key,
            ledger,
            vault,
        }
    }

    /// The key as derived on the server side.
    pub fn server_key(&self) -> SymmetricKey {
        self.server
            .derive_shared_key(&self.device.public_key())
            .expect("fixture key agreement failed")
    }

    /// A reading for `patient-{record_id}` at [`FIXTURE_TIME`].
    pub fn reading(&self, record_id: u64, bpm: u16) -> HeartRateReading {
        HeartRateReading::at(format!("patient-{record_id}"), bpm, FIXTURE_TIME)
    }

    /// Seal a reading under the fixture key.
    pub fn seal(&self, record_id: u64, bpm: u16) -> Result<SealedRecord> {
        self.vault
            .seal_record(&self.reading(record_id, bpm), &self.key, Some(record_id))
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create deterministic key pairs for multi-party tests.
///
/// Party `i` has private scalar `i + 1`.
pub fn multi_party_keypairs(count: usize) -> Vec<KeyPair> {
    (0..count)
        .map(|i| {
            let mut scalar = [0u8; 32];
            scalar[24..].copy_from_slice(&(i as u64 + 1).to_be_bytes());
            let private = PrivateKey::from_bytes(&scalar).expect("small scalars are valid");
            KeyPair::from_private(private)
        })
        .collect()
}
