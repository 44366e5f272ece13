//! Diagnostic sinks for the pricer.
//!
//! The pricer reports what it resolved and how it calibrated through an
//! injected [`DiagnosticSink`]. Sinks only observe: swapping one for another
//! never changes a result.

use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Verbosity of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticLevel {
    /// Per-iteration detail.
    Debug,
    /// Resolved inputs and results.
    Info,
}

/// Receiver of leveled diagnostic messages.
pub trait DiagnosticSink: Send + Sync {
    /// Whether messages at `level` are recorded. Lets callers skip formatting.
    fn is_enabled(&self, level: DiagnosticLevel) -> bool;

    /// Records a message.
    fn record(&self, level: DiagnosticLevel, message: &str);

    /// Records an info message.
    fn info(&self, message: &str) {
        self.record(DiagnosticLevel::Info, message);
    }

    /// Records a debug message.
    fn debug(&self, message: &str) {
        self.record(DiagnosticLevel::Debug, message);
    }
}

/// Shared handle to a sink.
pub type SharedSink = Arc<dyn DiagnosticSink>;

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl NoopSink {
    /// Shared no-op sink.
    #[must_use]
    pub fn shared() -> SharedSink {
        Arc::new(NoopSink)
    }
}

impl DiagnosticSink for NoopSink {
    fn is_enabled(&self, _level: DiagnosticLevel) -> bool {
        false
    }

    fn record(&self, _level: DiagnosticLevel, _message: &str) {}
}

/// Sink forwarding to `tracing` under the `bsm_pricer::pricer` target,
/// filtered by a minimum level.
#[derive(Debug, Clone, Copy)]
pub struct TracingSink {
    min_level: DiagnosticLevel,
}

impl TracingSink {
    /// Creates a sink recording `min_level` and above.
    #[must_use]
    pub fn new(min_level: DiagnosticLevel) -> Self {
        Self { min_level }
    }

    /// Shared sink recording `min_level` and above.
    #[must_use]
    pub fn shared(min_level: DiagnosticLevel) -> SharedSink {
        Arc::new(Self::new(min_level))
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new(DiagnosticLevel::Info)
    }
}

impl DiagnosticSink for TracingSink {
    fn is_enabled(&self, level: DiagnosticLevel) -> bool {
        level >= self.min_level
    }

    fn record(&self, level: DiagnosticLevel, message: &str) {
        if !self.is_enabled(level) {
            return;
        }
        match level {
            DiagnosticLevel::Info => info!(target: "bsm_pricer::pricer", "{}", message),
            DiagnosticLevel::Debug => debug!(target: "bsm_pricer::pricer", "{}", message),
        }
    }
}

/// Sink keeping every message in memory, in order.
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<(DiagnosticLevel, String)>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded messages.
    #[must_use]
    pub fn messages(&self) -> Vec<(DiagnosticLevel, String)> {
        match self.messages.lock() {
            Ok(messages) => messages.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl DiagnosticSink for MemorySink {
    fn is_enabled(&self, _level: DiagnosticLevel) -> bool {
        true
    }

    fn record(&self, level: DiagnosticLevel, message: &str) {
        let mut messages = match self.messages.lock() {
            Ok(messages) => messages,
            Err(poisoned) => poisoned.into_inner(),
        };
        messages.push((level, message.to_string()));
    }
}
