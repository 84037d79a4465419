//! End-to-end tests: key exchange, sealing, anchoring, distribution, and
//! tamper detection across the crate boundary.

use std::sync::Arc;
use std::thread;

use cardiosecure::core::{CoreError, TamperKind};
use cardiosecure::crypto::{decrypt, encrypt, CryptoError};
use cardiosecure::{
    generate_keypair, Block, BlockHash, ChainValidity, HeartRateCategory, HeartRateReading,
    Ledger, LedgerConfig, RecordVault, SealedRecord, SymmetricKey, VaultConfig, VaultError,
};
use serde_json::{json, Value};

fn vault_with(config: LedgerConfig) -> (Arc<Ledger>, RecordVault) {
    let ledger = Arc::new(Ledger::new(config).unwrap());
    let vault = RecordVault::new(ledger.clone(), VaultConfig::default()).unwrap();
    (ledger, vault)
}

fn reading(id: u64, bpm: u16) -> HeartRateReading {
    HeartRateReading::at(format!("patient-{id}"), bpm, "2026-01-14T12:00:00.000000+00:00")
}

#[test]
fn test_device_to_server_pipeline() {
    let device = generate_keypair();
    let server = generate_keypair();
    let device_key = device.derive_shared_key(&server.public_key()).unwrap();
    let server_key = server.derive_shared_key(&device.public_key()).unwrap();

    let (ledger, vault) = vault_with(LedgerConfig::default());
    let sealed = vault.seal_record(&reading(1, 72), &device_key, Some(1)).unwrap();

    // Persist and reload the bundle the way a storage collaborator would
    let bundle = sealed.to_cbor().unwrap();
    let stored = SealedRecord::from_cbor(&bundle).unwrap();

    let shards = stored.distribution.split(&stored.encrypted).unwrap();
    let rebuilt = stored.distribution.reassemble(&shards).unwrap();
    assert!(vault.verify_anchor(1, &rebuilt));

    let opened: HeartRateReading = vault.open_record(&rebuilt, &server_key).unwrap();
    assert_eq!(opened, reading(1, 72));
    assert_eq!(opened.category, HeartRateCategory::Normal);
    assert!(ledger.is_valid().is_valid());
}

#[test]
fn test_zero_key_record_and_byte_flip() {
    let key = SymmetricKey::from_bytes([0u8; 32]);
    let plaintext = br#"{"bpm":72}"#;

    let record = encrypt(&key, plaintext).unwrap();
    let mut blob = record.to_bytes();
    assert_eq!(decrypt(&key, &blob).unwrap(), plaintext);

    blob[20] ^= 0x01;
    assert!(matches!(
        decrypt(&key, &blob),
        Err(CryptoError::AuthenticationFailed)
    ));
}

#[test]
fn test_lookup_by_record_id() {
    let ledger = Ledger::new(LedgerConfig::default()).unwrap();
    for id in 1..=3u64 {
        let data = json!({"bpm": 60 + id});
        let Value::Object(map) = data else {
            unreachable!()
        };
        ledger.append(map, Some(id)).unwrap();
    }

    let found = ledger.find_by_record_id(2);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].data["bpm"], 62);
    assert!(found[0].hash.meets_difficulty(2));
    assert!(ledger.is_valid().is_valid());
}

#[test]
fn test_tampering_any_field_is_detected() {
    let mutations: [fn(&mut Block); 7] = [
        |b| {
            b.data.insert("value".into(), Value::from(180));
        },
        |b| b.timestamp = "2020-01-01T00:00:00.000000+00:00".into(),
        |b| b.index += 1,
        |b| b.nonce += 1,
        |b| b.record_id = Some(999),
        |b| b.previous_hash = BlockHash::ZERO,
        |b| b.hash = BlockHash::ZERO,
    ];

    for (i, mutate) in mutations.into_iter().enumerate() {
        let (ledger, vault) = vault_with(LedgerConfig {
            difficulty: 1,
            ..LedgerConfig::default()
        });
        let key = SymmetricKey::generate().unwrap();
        for id in 1..=3 {
            vault.seal_record(&reading(id, 70), &key, Some(id)).unwrap();
        }
        assert!(ledger.is_valid().is_valid());

        assert!(ledger.tamper_with(2, mutate));
        let validity = ledger.is_valid();
        let index = validity
            .failing_index()
            .unwrap_or_else(|| panic!("mutation {i} went undetected"));
        assert!(index == 2 || index == 3, "mutation {i} flagged at {index}");
    }
}

#[test]
fn test_tampering_with_data_is_a_hash_mismatch() {
    let (ledger, vault) = vault_with(LedgerConfig::default());
    let key = SymmetricKey::generate().unwrap();
    vault.seal_record(&reading(1, 72), &key, Some(1)).unwrap();

    ledger.tamper_with(1, |b| {
        b.data.insert("category".into(), Value::from("Tachycardia"));
    });

    match ledger.is_valid() {
        ChainValidity::Tampered(t) => {
            assert_eq!(t.index, 1);
            assert!(matches!(t.kind, TamperKind::HashMismatch { .. }));
        }
        ChainValidity::Valid { .. } => panic!("tampering went undetected"),
    }

    // Tampering is informational: appends continue
    vault.seal_record(&reading(2, 80), &key, Some(2)).unwrap();
    assert_eq!(ledger.len(), 3);
}

#[test]
fn test_export_file_roundtrip_detects_edits() {
    let (ledger, vault) = vault_with(LedgerConfig::default());
    let key = SymmetricKey::generate().unwrap();
    for id in 1..=2 {
        vault.seal_record(&reading(id, 90), &key, Some(id)).unwrap();
    }

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.json");
    std::fs::write(&path, ledger.to_json().unwrap()).unwrap();

    let json = std::fs::read_to_string(&path).unwrap();
    let restored = Ledger::from_json(&json, LedgerConfig::default()).unwrap();
    assert_eq!(restored.blocks(), ledger.blocks());
    assert!(restored.is_valid().is_valid());

    let edited = json.replacen("\"value\": 90", "\"value\": 45", 1);
    assert_ne!(edited, json);
    let forged = Ledger::from_json(&edited, LedgerConfig::default()).unwrap();
    assert_eq!(forged.is_valid().failing_index(), Some(1));
}

#[test]
fn test_import_empty_chain() {
    assert!(matches!(
        Ledger::from_json("[]", LedgerConfig::default()),
        Err(CoreError::EmptyChain)
    ));
}

#[test]
fn test_readers_see_valid_chain_during_appends() {
    let (ledger, vault) = vault_with(LedgerConfig::default());
    let vault = Arc::new(vault);
    let key = SymmetricKey::generate().unwrap();

    let writers: Vec<_> = (0..4u64)
        .map(|w| {
            let vault = vault.clone();
            let key = key.clone();
            thread::spawn(move || {
                for i in 0..3 {
                    let id = w * 10 + i;
                    vault.seal_record(&reading(id, 75), &key, Some(id)).unwrap();
                }
            })
        })
        .collect();

    let reader = {
        let ledger = ledger.clone();
        thread::spawn(move || {
            for _ in 0..50 {
                assert!(ledger.is_valid().is_valid());
            }
        })
    };

    for w in writers {
        w.join().unwrap();
    }
    reader.join().unwrap();

    assert_eq!(ledger.len(), 13);
    assert!(ledger.is_valid().is_valid());
    let indexes: Vec<u64> = ledger.blocks().iter().map(|b| b.index).collect();
    assert_eq!(indexes, (0..13).collect::<Vec<_>>());
}

#[test]
fn test_mining_timeout_surfaces_through_vault() {
    let genesis = Ledger::new(LedgerConfig::default()).unwrap().blocks();
    let ledger = Arc::new(
        Ledger::from_blocks(
            genesis,
            LedgerConfig {
                difficulty: 64,
                max_attempts: Some(50),
            },
        )
        .unwrap(),
    );
    let vault = RecordVault::new(ledger.clone(), VaultConfig::default()).unwrap();
    let key = SymmetricKey::generate().unwrap();

    let err = vault.seal_record(&reading(1, 72), &key, Some(1)).unwrap_err();
    assert!(matches!(
        err,
        VaultError::Core(CoreError::MiningTimeout { attempts: 50, .. })
    ));
    assert_eq!(ledger.len(), 1);
    assert!(ledger.is_valid().is_valid());
}

#[test]
fn test_swapped_shards_never_decrypt() {
    let (_ledger, vault) = vault_with(LedgerConfig::default());
    let key = SymmetricKey::generate().unwrap();
    let a = vault.seal_record(&reading(1, 72), &key, Some(1)).unwrap();
    let b = vault.seal_record(&reading(2, 72), &key, Some(2)).unwrap();

    // Same lengths, so only the digests catch the mix-up
    let mut shards = a.distribution.split(&a.encrypted).unwrap();
    shards[2] = b.distribution.split(&b.encrypted).unwrap()[2].clone();
    assert!(matches!(
        a.distribution.reassemble(&shards),
        Err(VaultError::ShardMismatch(_))
    ));
}
