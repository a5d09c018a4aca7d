//! Metrics collection for observability
//!
//! This module provides Prometheus metrics for monitoring the ledger.
//!
//! # Metrics
//!
//! - `ledger_records_submitted_total` - Records accepted into the pending queue
//! - `ledger_records_rejected_total` - Submissions rejected at admission
//! - `ledger_blocks_sealed_total` - Blocks sealed and appended
//! - `ledger_seal_duration_seconds` - Histogram of seal durations
//! - `ledger_pow_attempts` - Histogram of proof-of-work attempt counts
//! - `ledger_chain_length` - Current chain length, genesis included

use prometheus::{Histogram, HistogramOpts, IntCounter, IntGauge, Opts, Registry};
use std::sync::Arc;

/// Metrics collector
///
/// Collectors live on a per-instance registry so isolated ledgers (and tests)
/// never collide.
#[derive(Clone)]
pub struct Metrics {
    /// Records accepted into the pending queue
    pub records_submitted: IntCounter,

    /// Submissions rejected at admission
    pub records_rejected: IntCounter,

    /// Blocks sealed and appended
    pub blocks_sealed: IntCounter,

    /// Seal duration histogram
    pub seal_duration: Histogram,

    /// Proof-of-work attempt histogram
    pub pow_attempts: Histogram,

    /// Current chain length
    pub chain_length: IntGauge,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let records_submitted = IntCounter::with_opts(Opts::new(
            "ledger_records_submitted_total",
            "Records accepted into the pending queue",
        ))?;
        registry.register(Box::new(records_submitted.clone()))?;

        let records_rejected = IntCounter::with_opts(Opts::new(
            "ledger_records_rejected_total",
            "Submissions rejected at admission",
        ))?;
        registry.register(Box::new(records_rejected.clone()))?;

        let blocks_sealed = IntCounter::with_opts(Opts::new(
            "ledger_blocks_sealed_total",
            "Blocks sealed and appended",
        ))?;
        registry.register(Box::new(blocks_sealed.clone()))?;

        let seal_duration = Histogram::with_opts(
            HistogramOpts::new(
                "ledger_seal_duration_seconds",
                "Histogram of seal durations",
            )
            .buckets(vec![0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0]),
        )?;
        registry.register(Box::new(seal_duration.clone()))?;

        let pow_attempts = Histogram::with_opts(
            HistogramOpts::new(
                "ledger_pow_attempts",
                "Histogram of proof-of-work attempt counts",
            )
            .buckets(vec![16.0, 64.0, 256.0, 1024.0, 4096.0, 16384.0, 65536.0]),
        )?;
        registry.register(Box::new(pow_attempts.clone()))?;

        let chain_length = IntGauge::with_opts(Opts::new(
            "ledger_chain_length",
            "Current chain length, genesis included",
        ))?;
        registry.register(Box::new(chain_length.clone()))?;

        Ok(Self {
            records_submitted,
            records_rejected,
            blocks_sealed,
            seal_duration,
            pow_attempts,
            chain_length,
            registry,
        })
    }

    /// Record an accepted submission
    pub fn record_submitted(&self) {
        self.records_submitted.inc();
    }

    /// Record a rejected submission
    pub fn record_rejected(&self) {
        self.records_rejected.inc();
    }

    /// Record a sealed block with its proof-of-work cost
    pub fn record_block_sealed(&self, attempts: u64, duration_seconds: f64) {
        self.blocks_sealed.inc();
        self.pow_attempts.observe(attempts as f64);
        self.seal_duration.observe(duration_seconds);
    }

    /// Update the chain length gauge
    pub fn set_chain_length(&self, length: i64) {
        self.chain_length.set(length);
    }

    /// Get metrics registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics")
            .field("records_submitted", &self.records_submitted.get())
            .field("records_rejected", &self.records_rejected.get())
            .field("blocks_sealed", &self.blocks_sealed.get())
            .finish()
    }
}
