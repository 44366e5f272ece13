//! Parallel evaluation of independent pricing jobs.
//!
//! This module provides the `BatchPricer` struct, which prices many contracts
//! against one market data snapshot on scoped worker threads and routes each
//! outcome back through a channel.

use super::contract::OptionContract;
use super::diagnostics::SharedSink;
use super::error::PricingError;
use super::greeks::Greeks;
use super::implied_volatility::SolverConfig;
use super::market_data::MarketDataSnapshot;
use super::pricer::BsmPricer;
use chrono::NaiveDate;
use std::sync::mpsc;
use std::thread;
use tracing::{debug, error, info};

/// A contract to price on a valuation date.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingJob {
    /// Contract to price.
    pub contract: OptionContract,
    /// Valuation date.
    pub as_of: NaiveDate,
}

impl PricingJob {
    /// Creates a new job.
    pub fn new(contract: OptionContract, as_of: NaiveDate) -> Self {
        Self { contract, as_of }
    }
}

/// Outcome of one job: Greeks or the error that stopped its pricer.
pub type BatchOutcome = Result<Greeks, PricingError>;

/// Prices independent jobs in parallel against a shared snapshot.
pub struct BatchPricer {
    /// Market data shared by every job
    market_data: MarketDataSnapshot,
    /// Solver settings used when a job calibrates
    config: SolverConfig,
    /// Sink handed to every pricer
    sink: SharedSink,
    /// Number of worker threads
    workers: usize,
}

impl BatchPricer {
    /// Create a batch pricer using one worker per available core.
    pub fn new(market_data: MarketDataSnapshot, sink: SharedSink) -> Self {
        let workers = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        Self {
            market_data,
            config: SolverConfig::default(),
            sink,
            workers,
        }
    }

    /// Use `config` for implied volatility calibration.
    #[must_use]
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Use `workers` threads (at least one).
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Number of worker threads.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Price a single job on the calling thread.
    pub fn price_one(&self, job: &PricingJob) -> BatchOutcome {
        BsmPricer::with_config(
            job.contract.clone(),
            job.as_of,
            &self.market_data,
            self.sink.clone(),
            &self.config,
        )
        .map(|pricer| pricer.greeks())
    }

    /// Price every job, returning outcomes in submission order.
    ///
    /// A failing job does not affect the others.
    pub fn price_all(&self, jobs: &[PricingJob]) -> Vec<BatchOutcome> {
        if jobs.is_empty() {
            return Vec::new();
        }

        let workers = self.workers.min(jobs.len());
        info!("Pricing {} job(s) on {} worker(s)", jobs.len(), workers);

        let (sender, receiver) = mpsc::channel::<(usize, BatchOutcome)>();

        thread::scope(|scope| {
            for worker in 0..workers {
                let sender = sender.clone();
                scope.spawn(move || {
                    for (index, job) in jobs.iter().enumerate().skip(worker).step_by(workers) {
                        let outcome = self.price_one(job);
                        if let Err(e) = &outcome {
                            debug!("Job {} ({}) failed: {}", index, job.contract, e);
                        }
                        if let Err(e) = sender.send((index, outcome)) {
                            error!("Failed to send outcome for job {}: {}", index, e);
                        }
                    }
                });
            }
        });
        drop(sender);

        let mut outcomes: Vec<(usize, BatchOutcome)> = receiver.iter().collect();
        outcomes.sort_by_key(|(index, _)| *index);

        let failed = outcomes.iter().filter(|(_, outcome)| outcome.is_err()).count();
        info!(
            "Batch complete: {} priced, {} failed",
            outcomes.len() - failed,
            failed
        );

        outcomes.into_iter().map(|(_, outcome)| outcome).collect()
    }
}
