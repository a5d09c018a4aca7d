//! Error types for the ledger

use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
///
/// Every variant is local and recoverable: a rejected submission leaves the
/// pending queue untouched and the caller may retry with corrected input.
#[derive(Error, Debug)]
pub enum Error {
    /// Record construction rejected (empty receiver, non-positive amount)
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Submitted record fails its own validity predicate
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    /// Required sender/receiver absent for the record's kind
    #[error("Missing party: {0}")]
    MissingParty(String),

    /// A second seal was attempted while one is active
    #[error("A seal is already in progress")]
    SealInProgress,

    /// Concurrency error (actor mailbox closed, etc.)
    #[error("Concurrency error: {0}")]
    Concurrency(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
