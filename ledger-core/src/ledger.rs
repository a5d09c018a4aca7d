//! The chain itself: pending queue, sealing policy, and read paths
//!
//! The [`Ledger`] owns an append-only chain of blocks plus a pending-record
//! queue. Callers construct [`TransferRecord`]s, submit them to the queue,
//! then request sealing, which packages the queue into a new block, runs
//! proof-of-work, and appends it. Read paths scan the chain directly; no
//! index is maintained (correctness over performance at demonstration scale).
//!
//! # Example
//!
//! ```
//! use ledger_core::{Address, Config, Ledger, TransferKind, TransferRecord};
//! use rust_decimal::Decimal;
//!
//! fn main() -> ledger_core::Result<()> {
//!     let ledger = Ledger::new(&Config::default());
//!
//!     let record = TransferRecord::new(
//!         Some(Address::new("alice")),
//!         Address::new("bob"),
//!         Decimal::from(5),
//!         TransferKind::Funding,
//!         Some("campaign-1".to_string()),
//!     )?;
//!     ledger.submit(record)?;
//!     ledger.seal(Address::new("miner"))?;
//!
//!     assert_eq!(ledger.balance_of(&Address::new("bob")), Decimal::from(5));
//!     assert!(ledger.is_valid());
//!     Ok(())
//! }
//! ```

use crate::types::{Address, Block, SealedBlockSummary, TransferRecord};
use crate::{Config, Error, Metrics, Result};
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use rust_decimal::Decimal;
use std::time::Instant;

/// Previous-hash sentinel carried by the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// Fixed genesis timestamp: 2024-01-01T00:00:00Z, in milliseconds.
pub const GENESIS_TIMESTAMP_MS: i64 = 1_704_067_200_000;

/// In-memory append-only chain with a pending-record queue
///
/// Explicitly constructed and explicitly owned; no ambient singleton state.
/// Share it behind an `Arc` (all operations take `&self`) or hand it to the
/// actor facade in [`crate::actor`].
pub struct Ledger {
    /// The chain, index 0 = genesis, append-only
    chain: RwLock<Vec<Block>>,

    /// Records awaiting inclusion in the next sealed block (FIFO)
    pending: Mutex<Vec<TransferRecord>>,

    /// Critical section for drain -> build -> proof-of-work -> append
    seal_gate: Mutex<()>,

    /// Leading-zero-hex count the proof-of-work search must reach
    difficulty: usize,

    /// Fixed reward issued to the sealing recipient
    reward: Decimal,

    /// Optional metrics collectors
    metrics: Option<Metrics>,
}

impl Ledger {
    /// Create a ledger holding only the genesis block.
    pub fn new(config: &Config) -> Self {
        let genesis = Block::new(
            GENESIS_TIMESTAMP_MS,
            Vec::new(),
            GENESIS_PREVIOUS_HASH.to_string(),
        );

        Self {
            chain: RwLock::new(vec![genesis]),
            pending: Mutex::new(Vec::new()),
            seal_gate: Mutex::new(()),
            difficulty: config.mining.difficulty,
            reward: config.mining.reward,
            metrics: None,
        }
    }

    /// Attach metrics collectors.
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Queue a record for inclusion in the next sealed block.
    ///
    /// Fails with [`Error::MissingParty`] when sender or receiver is absent
    /// for a non-reward kind (checked first), or [`Error::InvalidTransaction`]
    /// when the record fails its own validity predicate. A rejected
    /// submission leaves the queue untouched.
    pub fn submit(&self, record: TransferRecord) -> Result<()> {
        if !record.kind().is_reward() && record.sender().is_none() {
            self.record_rejected();
            return Err(Error::MissingParty(format!(
                "{} record requires a sender",
                record.kind()
            )));
        }
        if record.receiver().is_empty() {
            self.record_rejected();
            return Err(Error::MissingParty(format!(
                "{} record requires a receiver",
                record.kind()
            )));
        }
        if !record.is_valid() {
            self.record_rejected();
            return Err(Error::InvalidTransaction(format!(
                "record {} failed validation",
                record.hash()
            )));
        }

        tracing::debug!(
            kind = %record.kind(),
            amount = %record.amount(),
            hash = %record.hash(),
            "record queued"
        );

        self.pending.lock().push(record);
        if let Some(ref metrics) = self.metrics {
            metrics.record_submitted();
        }
        Ok(())
    }

    /// Seal the pending queue into a new block and append it.
    ///
    /// Appends a system-issued reward record (always present exactly once,
    /// last in inclusion order), drains the queue, links the block to the
    /// current tip, runs the proof-of-work search, and appends. The whole
    /// sequence is a critical section: a second concurrent call fails with
    /// [`Error::SealInProgress`] rather than silently branching off the same
    /// tip. Submissions may interleave and land in whichever seal comes next.
    ///
    /// Blocking and CPU-bound while the search runs; callers needing
    /// responsiveness run it off the request path.
    pub fn seal(&self, reward_recipient: Address) -> Result<SealedBlockSummary> {
        let _gate = self.seal_gate.try_lock().ok_or(Error::SealInProgress)?;

        let reward = TransferRecord::reward(reward_recipient, self.reward)?;
        let records = {
            let mut pending = self.pending.lock();
            pending.push(reward);
            pending.drain(..).collect::<Vec<_>>()
        };

        let mut block = Block::new(
            Utc::now().timestamp_millis(),
            records,
            self.tip_hash(),
        );

        let started = Instant::now();
        let attempts = block.seal(self.difficulty);
        let elapsed = started.elapsed();

        tracing::info!(
            hash = %block.hash(),
            nonce = block.nonce(),
            attempts,
            records = block.records().len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "block sealed"
        );

        let summary = SealedBlockSummary::from(&block);
        self.chain.write().push(block);

        if let Some(ref metrics) = self.metrics {
            metrics.record_block_sealed(attempts, elapsed.as_secs_f64());
            metrics.set_chain_length(self.chain_len() as i64);
        }

        Ok(summary)
    }

    /// Net signed balance of an address: amounts received minus amounts sent.
    ///
    /// Folds over every record in every block; O(total records), no caching.
    pub fn balance_of(&self, address: &Address) -> Decimal {
        let chain = self.chain.read();
        let mut balance = Decimal::ZERO;

        for block in chain.iter() {
            for record in block.records() {
                if record.sender().is_some_and(|s| s == address) {
                    balance -= record.amount();
                }
                if record.receiver() == address {
                    balance += record.amount();
                }
            }
        }

        balance
    }

    /// Every record where the address is sender or receiver, in chain order.
    pub fn history_of(&self, address: &Address) -> Vec<TransferRecord> {
        let chain = self.chain.read();
        chain
            .iter()
            .flat_map(Block::records)
            .filter(|record| {
                record.sender().is_some_and(|s| s == address) || record.receiver() == address
            })
            .cloned()
            .collect()
    }

    /// Verify whole-chain integrity.
    ///
    /// Tamper detection is advisory: the ledger reports a broken chain but
    /// never attempts to repair it.
    pub fn is_valid(&self) -> bool {
        validate_chain(&self.chain.read())
    }

    /// Read-only export of the chain (e.g. for a status endpoint).
    pub fn snapshot(&self) -> Vec<Block> {
        self.chain.read().clone()
    }

    /// Number of blocks in the chain, genesis included.
    pub fn chain_len(&self) -> usize {
        self.chain.read().len()
    }

    /// Number of records awaiting the next seal.
    pub fn pending_len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Configured proof-of-work difficulty.
    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    /// Configured sealing reward.
    pub fn reward(&self) -> Decimal {
        self.reward
    }

    fn tip_hash(&self) -> String {
        self.chain
            .read()
            .last()
            .map(|block| block.hash().to_owned())
            .unwrap_or_else(|| GENESIS_PREVIOUS_HASH.to_owned())
    }

    fn record_rejected(&self) {
        if let Some(ref metrics) = self.metrics {
            metrics.record_rejected();
        }
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("chain_len", &self.chain_len())
            .field("pending_len", &self.pending_len())
            .field("difficulty", &self.difficulty)
            .field("reward", &self.reward)
            .finish()
    }
}

/// Verify an exported chain: for every block after genesis, its records must
/// pass their own validity predicates, its stored hash must equal its
/// recomputed hash, and its previous-hash must equal the predecessor's hash.
///
/// Pure read-only scan, O(total records). Used by [`Ledger::is_valid`] and
/// directly on snapshots read back from external collaborators.
pub fn validate_chain(blocks: &[Block]) -> bool {
    for pair in blocks.windows(2) {
        let (previous, current) = (&pair[0], &pair[1]);

        if !current.has_valid_records() {
            return false;
        }
        if current.hash() != current.compute_hash() {
            return false;
        }
        if current.previous_hash() != previous.hash() {
            return false;
        }
    }
    true
}
