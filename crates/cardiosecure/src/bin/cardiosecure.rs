//! CardioSecure demo - seal heart-rate readings end to end
//!
//! Agrees a key between a device and a server, seals a batch of readings,
//! audits the ledger, and shows that an edited export is detected.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cardiosecure::core::Block;
use cardiosecure::{
    generate_keypair, ChainValidity, HeartRateReading, Ledger, LedgerConfig, RecordVault,
    StorageNode, VaultConfig,
};

/// CardioSecure demo - encrypt, anchor, and distribute heart-rate readings
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Leading hex zeros required of every block hash
    #[arg(short, long, default_value = "2")]
    difficulty: u8,

    /// Give up mining a block after this many attempts
    #[arg(long)]
    max_attempts: Option<u64>,

    /// Number of readings to seal
    #[arg(short, long, default_value = "3")]
    records: u64,

    /// Number of simulated storage nodes
    #[arg(short, long, default_value = "3")]
    nodes: usize,

    /// Write the ledger as JSON to this path
    #[arg(long)]
    export: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level: tracing::Level = args.log_level.parse().unwrap_or(tracing::Level::INFO);
    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(env_filter)
        .init();

    let mut ledger_config = LedgerConfig {
        difficulty: args.difficulty,
        ..LedgerConfig::default()
    };
    if args.max_attempts.is_some() {
        ledger_config.max_attempts = args.max_attempts;
    }

    let vault_config = VaultConfig {
        nodes: storage_nodes(args.nodes),
    };

    // Key exchange: each side derives the key from its own private key
    let device = generate_keypair();
    let server = generate_keypair();
    let device_key = device.derive_shared_key(&server.public_key())?;
    let server_key = server.derive_shared_key(&device.public_key())?;
    if device_key.as_bytes() != server_key.as_bytes() {
        bail!("key agreement produced different keys");
    }
    info!(
        device = ?device.public_key(),
        server = ?server.public_key(),
        key = %device_key.fingerprint(),
        "shared key established"
    );

    let ledger = Arc::new(Ledger::new(ledger_config)?);
    let vault = RecordVault::new(ledger.clone(), vault_config)?;

    let mut sealed = Vec::new();
    for record_id in 1..=args.records {
        let reading = HeartRateReading::new(format!("patient-{record_id:03}"), sample_bpm(record_id));
        let record = vault.seal_record(&reading, &device_key, Some(record_id))?;
        info!(
            record_id,
            bpm = reading.bpm,
            category = %reading.category,
            block = record.block.index,
            hash = %record.block.hash,
            "reading sealed"
        );
        sealed.push((reading, record));
    }

    // The server opens with its own copy of the key
    for (reading, record) in &sealed {
        let shards = record.distribution.split(&record.encrypted)?;
        let rebuilt = record.distribution.reassemble(&shards)?;
        let opened: HeartRateReading = vault.open_record(&rebuilt, &server_key)?;
        if &opened != reading {
            bail!("reading {} did not round-trip", reading.patient_id);
        }
    }
    info!(records = sealed.len(), "all readings reassembled and opened");

    report(&ledger.is_valid());
    if args.records >= 2 {
        let anchors = ledger.find_by_record_id(2);
        info!(blocks = anchors.len(), "lookup of record 2");
    }

    let json = ledger.to_json()?;
    if let Some(path) = &args.export {
        std::fs::write(path, &json)
            .with_context(|| format!("failed to write ledger to {}", path.display()))?;
        info!(path = %path.display(), blocks = ledger.len(), "ledger exported");
    }

    // Edit a copy of the export the way an attacker with file access would
    let mut blocks: Vec<Block> = serde_json::from_str(&json)?;
    if let Some(block) = blocks.get_mut(1) {
        block.data.insert("value".into(), Value::from(180));
        let edited = Ledger::from_blocks(blocks, ledger_config)?;
        report(&edited.is_valid());
    }

    Ok(())
}

fn storage_nodes(count: usize) -> Vec<StorageNode> {
    let mut nodes = StorageNode::defaults();
    nodes.truncate(count);
    for i in nodes.len()..count {
        nodes.push(StorageNode::new(format!("node-sim-{}", i + 1), "simulated"));
    }
    nodes
}

fn sample_bpm(record_id: u64) -> u16 {
    // Cycles through all three categories
    const SAMPLES: [u16; 6] = [72, 58, 88, 104, 65, 96];
    SAMPLES[(record_id - 1) as usize % SAMPLES.len()]
}

fn report(validity: &ChainValidity) {
    match validity {
        ChainValidity::Valid { length } => info!(length, "ledger valid"),
        ChainValidity::Tampered(t) => warn!(index = t.index, reason = %t.kind, "ledger invalid"),
    }
}
