//! Proptest generators for property-based testing.

use proptest::prelude::*;
use serde_json::{Map, Value};

use cardiosecure::{HeartRateReading, SUMMARY_ALLOW_LIST};
use cardiosecure_core::{BlockHash, BlockPreimage};
use cardiosecure_crypto::{PrivateKey, SymmetricKey};

/// Generate a random symmetric key.
pub fn symmetric_key() -> impl Strategy<Value = SymmetricKey> {
    any::<[u8; 32]>().prop_map(SymmetricKey::from_bytes)
}

/// Generate a valid P-256 private key.
pub fn private_key() -> impl Strategy<Value = PrivateKey> {
    any::<[u8; 32]>().prop_filter_map("scalar out of range", |b| PrivateKey::from_bytes(&b).ok())
}

/// Generate a random BlockHash.
pub fn block_hash() -> impl Strategy<Value = BlockHash> {
    any::<[u8; 32]>().prop_map(BlockHash)
}

/// Generate plaintext bytes of specified max length.
pub fn plaintext(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate a plausible heart rate.
pub fn bpm() -> impl Strategy<Value = u16> {
    25u16..=230
}

/// Generate a patient identifier.
pub fn patient_id() -> impl Strategy<Value = String> {
    "patient-[0-9]{3,6}".prop_map(String::from)
}

/// Generate an ISO-8601 UTC timestamp in the block format.
pub fn timestamp() -> impl Strategy<Value = String> {
    (2020u32..=2030, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60, 0u32..60, 0u32..1_000_000)
        .prop_map(|(y, mo, d, h, mi, s, us)| {
            format!("{y:04}-{mo:02}-{d:02}T{h:02}:{mi:02}:{s:02}.{us:06}+00:00")
        })
}

/// Generate a heart-rate reading.
pub fn reading() -> impl Strategy<Value = HeartRateReading> {
    (patient_id(), bpm(), timestamp())
        .prop_map(|(patient, bpm, at)| HeartRateReading::at(patient, bpm, at))
}

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        (-1.0e6f64..1.0e6).prop_map(Value::from),
        "\\PC{0,16}".prop_map(Value::from),
    ]
}

/// Generate an arbitrary JSON value of bounded depth.
pub fn json_value() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z_]{1,8}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Generate a free-form JSON record mixing allow-listed and private keys.
pub fn json_record() -> impl Strategy<Value = Map<String, Value>> {
    let key = prop_oneof![
        prop::sample::select(SUMMARY_ALLOW_LIST.to_vec()).prop_map(String::from),
        "(name|address|note|ssn)_[a-z]{0,4}".prop_map(String::from),
    ];
    prop::collection::btree_map(key, leaf(), 0..8).prop_map(|m| m.into_iter().collect())
}

/// Parameters for the hashed fields of a block.
#[derive(Debug, Clone)]
pub struct BlockParams {
    pub index: u64,
    pub timestamp: String,
    pub data: Map<String, Value>,
    pub previous_hash: BlockHash,
    pub record_id: Option<u64>,
}

impl Arbitrary for BlockParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            0u64..=1_000_000,
            timestamp(),
            prop::collection::btree_map("[a-z_]{1,8}", json_value(), 0..5),
            block_hash(),
            any::<Option<u64>>(),
        )
            .prop_map(|(index, timestamp, data, previous_hash, record_id)| BlockParams {
                index,
                timestamp,
                data: data.into_iter().collect(),
                previous_hash,
                record_id,
            })
            .boxed()
    }
}

/// Build the preimage for a set of block parameters.
pub fn preimage_from_params(params: &BlockParams) -> BlockPreimage {
    BlockPreimage::new(
        params.index,
        &params.timestamp,
        &params.data,
        &params.previous_hash,
        params.record_id,
    )
}
