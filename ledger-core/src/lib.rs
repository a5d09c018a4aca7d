//! FundChain Ledger Core
//!
//! Embedded append-only ledger for the crowdfunding platform: a chain of
//! blocks sealed by proof-of-work, holding hashed transfer records, with
//! whole-chain integrity verification. The surrounding web/UI surface is an
//! external collaborator and lives outside this crate.
//!
//! # Architecture
//!
//! - **Append-only chain**: blocks are never modified or deleted once appended
//! - **Proof-of-work sealing**: the only expensive operation, making history
//!   rewriting costly while verification stays cheap
//! - **Explicit ownership**: no ambient singleton; tests instantiate isolated
//!   ledgers
//! - **Actor facade**: a single Tokio task serializes writes for async callers
//!
//! # Invariants
//!
//! - Hash linkage: every block's `previous_hash` equals its predecessor's hash
//! - Content hashes: records and blocks recompute to their stored hashes
//! - Reward issuance: every sealed block carries exactly one reward record,
//!   last in inclusion order

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod actor;
pub mod config;
pub mod crypto;
pub mod error;
pub mod ledger;
pub mod metrics;
pub mod types;

// Re-exports
pub use actor::{spawn_ledger_actor, LedgerHandle};
pub use config::{Config, MiningConfig};
pub use error::{Error, Result};
pub use ledger::{validate_chain, Ledger, GENESIS_PREVIOUS_HASH, GENESIS_TIMESTAMP_MS};
pub use metrics::Metrics;
pub use types::{Address, Block, SealedBlockSummary, TransferKind, TransferRecord};
