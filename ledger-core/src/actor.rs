//! Actor-based concurrency for the ledger
//!
//! This module implements the single-writer pattern using Tokio actors. The
//! web layer holds a cloneable [`LedgerHandle`] and the actor owns the shared
//! [`Ledger`]; because the actor processes one message at a time, seals are
//! naturally serialized here. The [`crate::Error::SealInProgress`] path in
//! [`Ledger::seal`] covers direct multi-threaded use without the actor.
//!
//! Sealing is CPU-bound and runs inline in the actor task; at the configured
//! demonstration difficulties it completes near-instantly. Callers needing
//! responsiveness keep it off their request path.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │              Web layer (out of scope)                 │
//! └─────────────────────┬────────────────────────────────┘
//!                       │
//!                       │ async calls
//!                       ▼
//! ┌──────────────────────────────────────────────────────┐
//! │               LedgerHandle (Clone)                    │
//! │         Sends messages to actor mailbox              │
//! └─────────────────────┬────────────────────────────────┘
//!                       │
//!                       │ mpsc::channel (bounded)
//!                       ▼
//! ┌──────────────────────────────────────────────────────┐
//! │              LedgerActor (Single Task)                │
//! │        submit / seal / reads against Ledger          │
//! └──────────────────────────────────────────────────────┘
//! ```

use crate::types::{Address, Block, SealedBlockSummary, TransferRecord};
use crate::{Error, Ledger, Result};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// Message sent to the ledger actor
pub enum LedgerMessage {
    /// Queue a record for the next seal
    Submit {
        /// Record to queue
        record: TransferRecord,
        /// Reply channel
        response: oneshot::Sender<Result<()>>,
    },

    /// Seal the pending queue into a new block
    Seal {
        /// Recipient of the sealing reward
        reward_recipient: Address,
        /// Reply channel
        response: oneshot::Sender<Result<SealedBlockSummary>>,
    },

    /// Net signed balance of an address
    BalanceOf {
        /// Address to fold over
        address: Address,
        /// Reply channel
        response: oneshot::Sender<Decimal>,
    },

    /// Chain-order history of an address
    HistoryOf {
        /// Address to filter by
        address: Address,
        /// Reply channel
        response: oneshot::Sender<Vec<TransferRecord>>,
    },

    /// Whole-chain integrity verification
    Validate {
        /// Reply channel
        response: oneshot::Sender<bool>,
    },

    /// Read-only export of the chain
    Snapshot {
        /// Reply channel
        response: oneshot::Sender<Vec<Block>>,
    },

    /// Shutdown actor
    Shutdown,
}

impl std::fmt::Debug for LedgerMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LedgerMessage::Submit { .. } => "Submit",
            LedgerMessage::Seal { .. } => "Seal",
            LedgerMessage::BalanceOf { .. } => "BalanceOf",
            LedgerMessage::HistoryOf { .. } => "HistoryOf",
            LedgerMessage::Validate { .. } => "Validate",
            LedgerMessage::Snapshot { .. } => "Snapshot",
            LedgerMessage::Shutdown => "Shutdown",
        };
        f.write_str(name)
    }
}

/// Actor that processes ledger messages
#[derive(Debug)]
pub struct LedgerActor {
    /// Shared ledger instance
    ledger: Arc<Ledger>,

    /// Mailbox for incoming messages
    mailbox: mpsc::Receiver<LedgerMessage>,
}

impl LedgerActor {
    /// Create new actor
    pub fn new(ledger: Arc<Ledger>, mailbox: mpsc::Receiver<LedgerMessage>) -> Self {
        Self { ledger, mailbox }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        while let Some(msg) = self.mailbox.recv().await {
            match msg {
                LedgerMessage::Shutdown => break,
                other => self.handle_message(other),
            }
        }
        tracing::debug!("ledger actor stopped");
    }

    fn handle_message(&mut self, msg: LedgerMessage) {
        match msg {
            LedgerMessage::Submit { record, response } => {
                let _ = response.send(self.ledger.submit(record));
            }

            LedgerMessage::Seal {
                reward_recipient,
                response,
            } => {
                let _ = response.send(self.ledger.seal(reward_recipient));
            }

            LedgerMessage::BalanceOf { address, response } => {
                let _ = response.send(self.ledger.balance_of(&address));
            }

            LedgerMessage::HistoryOf { address, response } => {
                let _ = response.send(self.ledger.history_of(&address));
            }

            LedgerMessage::Validate { response } => {
                let _ = response.send(self.ledger.is_valid());
            }

            LedgerMessage::Snapshot { response } => {
                let _ = response.send(self.ledger.snapshot());
            }

            LedgerMessage::Shutdown => {
                // Handled in main loop
            }
        }
    }
}

/// Handle for sending messages to the actor
#[derive(Clone)]
pub struct LedgerHandle {
    sender: mpsc::Sender<LedgerMessage>,
}

impl LedgerHandle {
    /// Create new handle
    pub fn new(sender: mpsc::Sender<LedgerMessage>) -> Self {
        Self { sender }
    }

    /// Queue a record for the next seal
    pub async fn submit(&self, record: TransferRecord) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.send(LedgerMessage::Submit {
            record,
            response: tx,
        })
        .await?;
        self.recv(rx).await?
    }

    /// Seal the pending queue into a new block
    pub async fn seal(&self, reward_recipient: Address) -> Result<SealedBlockSummary> {
        let (tx, rx) = oneshot::channel();
        self.send(LedgerMessage::Seal {
            reward_recipient,
            response: tx,
        })
        .await?;
        self.recv(rx).await?
    }

    /// Net signed balance of an address
    pub async fn balance_of(&self, address: Address) -> Result<Decimal> {
        let (tx, rx) = oneshot::channel();
        self.send(LedgerMessage::BalanceOf {
            address,
            response: tx,
        })
        .await?;
        self.recv(rx).await
    }

    /// Chain-order history of an address
    pub async fn history_of(&self, address: Address) -> Result<Vec<TransferRecord>> {
        let (tx, rx) = oneshot::channel();
        self.send(LedgerMessage::HistoryOf {
            address,
            response: tx,
        })
        .await?;
        self.recv(rx).await
    }

    /// Whole-chain integrity verification
    pub async fn validate(&self) -> Result<bool> {
        let (tx, rx) = oneshot::channel();
        self.send(LedgerMessage::Validate { response: tx }).await?;
        self.recv(rx).await
    }

    /// Read-only export of the chain
    pub async fn snapshot(&self) -> Result<Vec<Block>> {
        let (tx, rx) = oneshot::channel();
        self.send(LedgerMessage::Snapshot { response: tx }).await?;
        self.recv(rx).await
    }

    /// Shutdown actor
    pub async fn shutdown(&self) -> Result<()> {
        self.send(LedgerMessage::Shutdown).await
    }

    async fn send(&self, msg: LedgerMessage) -> Result<()> {
        self.sender
            .send(msg)
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))
    }

    async fn recv<T>(&self, rx: oneshot::Receiver<T>) -> Result<T> {
        rx.await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))
    }
}

impl std::fmt::Debug for LedgerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerHandle").finish_non_exhaustive()
    }
}

/// Spawn the ledger actor
pub fn spawn_ledger_actor(ledger: Arc<Ledger>) -> LedgerHandle {
    let (tx, rx) = mpsc::channel(256); // Bounded channel for backpressure
    let actor = LedgerActor::new(ledger, rx);

    tokio::spawn(async move {
        actor.run().await;
    });

    LedgerHandle::new(tx)
}
