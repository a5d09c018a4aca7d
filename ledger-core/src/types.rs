//! Core types for the ledger
//!
//! All types are designed for:
//! - Deterministic serialization (fixed field order, `serde_json`)
//! - Exact arithmetic (Decimal for money)
//! - Immutability after construction (content hashes are computed once)
//!
//! Deserialization deliberately performs no validation: a snapshot read back
//! from an external collaborator is untrusted until it passes
//! [`TransferRecord::is_valid`] / chain verification.

use crate::crypto::{meets_difficulty, FieldHasher};
use crate::{Error, Result};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wallet or platform address
///
/// Opaque string identifier; emptiness is the only structural check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Create new address
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the address carries no identifier at all
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of value movement recorded on the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransferKind {
    /// Plain transfer between two parties
    Transfer,
    /// Contribution to a campaign
    Funding,
    /// Manual refund of a contribution
    Refund,
    /// Refund issued automatically for a failed campaign
    AutoRefund,
    /// Creator withdrawal of raised funds
    Withdrawal,
    /// System-issued reward for sealing a block
    MiningReward,
}

impl TransferKind {
    /// Stable wire label (kebab-case)
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferKind::Transfer => "transfer",
            TransferKind::Funding => "funding",
            TransferKind::Refund => "refund",
            TransferKind::AutoRefund => "auto-refund",
            TransferKind::Withdrawal => "withdrawal",
            TransferKind::MiningReward => "mining-reward",
        }
    }

    /// True for system-issued reward records, which carry no sender
    pub fn is_reward(&self) -> bool {
        matches!(self, TransferKind::MiningReward)
    }
}

impl fmt::Display for TransferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One immutable unit of value movement
///
/// The content hash is computed once at construction and never recomputed to
/// match a later mutation; there are no mutators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRecord {
    /// Sending party (None = system-issued reward or platform-originated)
    sender: Option<Address>,

    /// Receiving party
    receiver: Address,

    /// Amount moved (exact decimal, strictly positive)
    amount: Decimal,

    /// Kind of movement
    kind: TransferKind,

    /// Optional correlation identifier (e.g. a campaign reference)
    correlation: Option<String>,

    /// Creation timestamp (milliseconds since Unix epoch)
    timestamp_ms: i64,

    /// Content hash (lowercase hex SHA-256)
    hash: String,
}

impl TransferRecord {
    /// Create a record stamped with the current time.
    ///
    /// Fails with [`Error::InvalidRecord`] when the receiver is empty or the
    /// amount is not strictly positive. Sender presence for non-reward kinds
    /// is an admission rule and is enforced by [`crate::Ledger::submit`],
    /// not here.
    pub fn new(
        sender: Option<Address>,
        receiver: Address,
        amount: Decimal,
        kind: TransferKind,
        correlation: Option<String>,
    ) -> Result<Self> {
        if receiver.is_empty() {
            return Err(Error::InvalidRecord("receiver must not be empty".into()));
        }
        if amount <= Decimal::ZERO {
            return Err(Error::InvalidRecord(format!(
                "amount must be positive, got {amount}"
            )));
        }

        let timestamp_ms = Utc::now().timestamp_millis();
        let hash = Self::hash_fields(
            sender.as_ref(),
            &receiver,
            &amount,
            kind,
            correlation.as_deref(),
            timestamp_ms,
        );

        Ok(Self {
            sender,
            receiver,
            amount,
            kind,
            correlation,
            timestamp_ms,
            hash,
        })
    }

    /// Create a system-issued sealing reward (no sender).
    pub fn reward(receiver: Address, amount: Decimal) -> Result<Self> {
        Self::new(None, receiver, amount, TransferKind::MiningReward, None)
    }

    /// Recompute the content hash over the current fields and compare with
    /// the stored hash; also re-check receiver presence and amount sign.
    /// Pure, no side effects.
    pub fn is_valid(&self) -> bool {
        if self.receiver.is_empty() {
            return false;
        }
        if self.amount <= Decimal::ZERO {
            return false;
        }
        self.hash == self.compute_hash()
    }

    /// Recompute the content hash from the current fields.
    pub fn compute_hash(&self) -> String {
        Self::hash_fields(
            self.sender.as_ref(),
            &self.receiver,
            &self.amount,
            self.kind,
            self.correlation.as_deref(),
            self.timestamp_ms,
        )
    }

    // Field order is fixed and must never change: the hash has to be
    // reproducible across implementations.
    fn hash_fields(
        sender: Option<&Address>,
        receiver: &Address,
        amount: &Decimal,
        kind: TransferKind,
        correlation: Option<&str>,
        timestamp_ms: i64,
    ) -> String {
        FieldHasher::new()
            .optional_field(sender.map(Address::as_str))
            .field(receiver.as_str())
            .field(&amount.normalize().to_string())
            .field(kind.as_str())
            .optional_field(correlation)
            .bytes(&timestamp_ms.to_be_bytes())
            .finish()
    }

    /// Sending party, if any
    pub fn sender(&self) -> Option<&Address> {
        self.sender.as_ref()
    }

    /// Receiving party
    pub fn receiver(&self) -> &Address {
        &self.receiver
    }

    /// Amount moved
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Kind of movement
    pub fn kind(&self) -> TransferKind {
        self.kind
    }

    /// Correlation identifier, if any
    pub fn correlation(&self) -> Option<&str> {
        self.correlation.as_deref()
    }

    /// Creation timestamp (milliseconds since Unix epoch)
    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp_ms
    }

    /// Content hash (lowercase hex)
    pub fn hash(&self) -> &str {
        &self.hash
    }
}

/// An ordered batch of transfer records sealed by proof-of-work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Block creation timestamp (milliseconds since Unix epoch)
    timestamp_ms: i64,

    /// Included records, in inclusion order
    records: Vec<TransferRecord>,

    /// Hash of the predecessor block (`"0"` sentinel for genesis)
    previous_hash: String,

    /// Proof-of-work counter; mutated only while sealing
    nonce: u64,

    /// Block hash (lowercase hex SHA-256)
    hash: String,
}

impl Block {
    /// Construct a block with nonce 0 and the hash computed immediately.
    ///
    /// The fresh hash normally does not meet any difficulty yet; call
    /// [`Block::seal`] before appending the block to a chain.
    pub fn new(timestamp_ms: i64, records: Vec<TransferRecord>, previous_hash: String) -> Self {
        let mut block = Self {
            timestamp_ms,
            records,
            previous_hash,
            nonce: 0,
            hash: String::new(),
        };
        block.hash = block.compute_hash();
        block
    }

    /// Deterministic hash over `timestamp ‖ records ‖ previous_hash ‖ nonce`.
    ///
    /// Records are canonicalized as JSON with the struct's fixed field order.
    pub fn compute_hash(&self) -> String {
        let records_json =
            serde_json::to_vec(&self.records).expect("record serialization cannot fail");

        let mut preimage = Vec::with_capacity(records_json.len() + 80);
        preimage.extend_from_slice(&self.timestamp_ms.to_be_bytes());
        preimage.extend_from_slice(&records_json);
        preimage.extend_from_slice(self.previous_hash.as_bytes());
        preimage.extend_from_slice(&self.nonce.to_be_bytes());
        crate::crypto::sha256_hex(&preimage)
    }

    /// Proof-of-work search: increment the nonce and recompute the hash until
    /// it has at least `difficulty` leading '0' hex characters.
    ///
    /// Blocking and CPU-bound, expected O(16^difficulty) attempts, no upper
    /// bound and no preemption point. Returns the number of attempts.
    pub fn seal(&mut self, difficulty: usize) -> u64 {
        let mut attempts = 0u64;
        while !self.meets_difficulty(difficulty) {
            self.nonce += 1;
            attempts += 1;
            self.hash = self.compute_hash();
        }
        attempts
    }

    /// True when the stored hash satisfies the difficulty target.
    pub fn meets_difficulty(&self, difficulty: usize) -> bool {
        meets_difficulty(&self.hash, difficulty)
    }

    /// True iff every contained record passes its own validity predicate.
    ///
    /// Used during whole-chain verification, not during sealing.
    pub fn has_valid_records(&self) -> bool {
        self.records.iter().all(TransferRecord::is_valid)
    }

    /// Block creation timestamp (milliseconds since Unix epoch)
    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp_ms
    }

    /// Included records, in inclusion order
    pub fn records(&self) -> &[TransferRecord] {
        &self.records
    }

    /// Hash of the predecessor block
    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    /// Proof-of-work counter
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Block hash (lowercase hex)
    pub fn hash(&self) -> &str {
        &self.hash
    }
}

/// Summary of a freshly sealed block, returned to the caller of
/// [`crate::Ledger::seal`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SealedBlockSummary {
    /// Sealed block hash
    pub hash: String,
    /// Predecessor hash the block links to
    pub previous_hash: String,
    /// Winning nonce
    pub nonce: u64,
    /// Block timestamp (milliseconds since Unix epoch)
    pub timestamp_ms: i64,
    /// Number of records in the block, reward included
    pub record_count: usize,
}

impl From<&Block> for SealedBlockSummary {
    fn from(block: &Block) -> Self {
        Self {
            hash: block.hash().to_owned(),
            previous_hash: block.previous_hash().to_owned(),
            nonce: block.nonce(),
            timestamp_ms: block.timestamp_ms(),
            record_count: block.records().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn funding(sender: &str, receiver: &str, amount: i64) -> TransferRecord {
        TransferRecord::new(
            Some(Address::new(sender)),
            Address::new(receiver),
            Decimal::from(amount),
            TransferKind::Funding,
            Some("campaign-1".to_string()),
        )
        .unwrap()
    }

    #[test]
    fn test_record_hash_is_stamped_and_valid() {
        let record = funding("alice", "bob", 5);
        assert_eq!(record.hash().len(), 64);
        assert_eq!(record.hash(), record.compute_hash());
        assert!(record.is_valid());
    }

    #[test]
    fn test_record_rejects_empty_receiver() {
        let result = TransferRecord::new(
            Some(Address::new("alice")),
            Address::new(""),
            Decimal::from(5),
            TransferKind::Transfer,
            None,
        );
        assert!(matches!(result, Err(Error::InvalidRecord(_))));
    }

    #[test]
    fn test_record_rejects_non_positive_amount() {
        for amount in [Decimal::ZERO, Decimal::from(-1)] {
            let result = TransferRecord::new(
                Some(Address::new("alice")),
                Address::new("bob"),
                amount,
                TransferKind::Transfer,
                None,
            );
            assert!(matches!(result, Err(Error::InvalidRecord(_))));
        }
    }

    #[test]
    fn test_reward_record_has_no_sender() {
        let reward = TransferRecord::reward(Address::new("miner"), Decimal::from(10)).unwrap();
        assert!(reward.sender().is_none());
        assert_eq!(reward.kind(), TransferKind::MiningReward);
        assert!(reward.kind().is_reward());
        assert!(reward.is_valid());
    }

    #[test]
    fn test_tampered_record_fails_validation() {
        let record = funding("alice", "bob", 5);

        // Simulate external tampering through the serialization boundary;
        // the API itself offers no mutators.
        let mut value = serde_json::to_value(&record).unwrap();
        value["amount"] = serde_json::Value::String("500".to_string());
        let tampered: TransferRecord = serde_json::from_value(value).unwrap();

        assert!(!tampered.is_valid());
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(TransferKind::AutoRefund.as_str(), "auto-refund");
        assert_eq!(TransferKind::MiningReward.as_str(), "mining-reward");
        assert_eq!(
            serde_json::to_string(&TransferKind::AutoRefund).unwrap(),
            "\"auto-refund\""
        );
    }

    #[test]
    fn test_block_hash_covers_all_fields() {
        let block = Block::new(1_000, vec![funding("alice", "bob", 5)], "0".to_string());
        assert_eq!(block.nonce(), 0);
        assert_eq!(block.hash(), block.compute_hash());

        let other_time = Block::new(1_001, vec![funding("alice", "bob", 5)], "0".to_string());
        assert_ne!(block.hash(), other_time.hash());

        let other_link = Block::new(1_000, vec![funding("alice", "bob", 5)], "1".to_string());
        assert_ne!(block.hash(), other_link.hash());
    }

    #[test]
    fn test_seal_meets_difficulty_and_recomputes() {
        let mut block = Block::new(1_000, vec![funding("alice", "bob", 5)], "0".to_string());
        block.seal(2);

        assert!(block.meets_difficulty(2));
        assert!(block.hash().starts_with("00"));
        assert_eq!(block.hash(), block.compute_hash());
    }

    #[test]
    fn test_has_valid_records() {
        let block = Block::new(1_000, vec![funding("alice", "bob", 5)], "0".to_string());
        assert!(block.has_valid_records());

        let mut value = serde_json::to_value(&block).unwrap();
        value["records"][0]["amount"] = serde_json::Value::String("999".to_string());
        let tampered: Block = serde_json::from_value(value).unwrap();
        assert!(!tampered.has_valid_records());
    }

    #[test]
    fn test_summary_mirrors_block() {
        let mut block = Block::new(1_000, vec![funding("alice", "bob", 5)], "0".to_string());
        block.seal(1);

        let summary = SealedBlockSummary::from(&block);
        assert_eq!(summary.hash, block.hash());
        assert_eq!(summary.previous_hash, "0");
        assert_eq!(summary.nonce, block.nonce());
        assert_eq!(summary.record_count, 1);
    }
}
