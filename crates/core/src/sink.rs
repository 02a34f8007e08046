use std::{collections::VecDeque, sync::Mutex};

use alloy::primitives::Address;

use crate::dispatcher::Outcome;

/// Maximum entries retained by [`EventLog`] before the oldest is evicted.
pub const DEFAULT_LOG_CAPACITY: usize = 1000;

/// Consumes the stream of per-account outcomes produced by each tick.
/// Called from the controller's single post-join collection point, never
/// concurrently from completing submissions.
pub trait OutcomeSink: Send + Sync {
    fn record(&self, outcome: &Outcome);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Success,
    Error,
}

/// One operator-facing log line: the shortened sender address plus either
/// a transaction hash or a failure summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub kind: LogKind,
    pub message: String,
}

impl LogEntry {
    pub fn from_outcome(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Success { address, tx_hash } => Self {
                kind: LogKind::Success,
                message: format!("{} {tx_hash}", short_address(address)),
            },
            Outcome::Failure { address, error } => Self {
                kind: LogKind::Error,
                message: format!("{} {error}", short_address(address)),
            },
        }
    }
}

/// Shortens an address for log lines, e.g. `0x65cC...65aA`.
pub fn short_address(address: &Address) -> String {
    let full = address.to_string();
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

/// Bounded ring of log entries, newest first. Appending at capacity
/// evicts the oldest entry.
#[derive(Debug)]
pub struct EventLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, entry: LogEntry) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_back();
        }
        self.entries.push_front(entry);
    }

    /// Entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// In-memory sink backed by the bounded ring log. Suitable for embedding
/// under a UI layer or asserting against in tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    log: Mutex<EventLog>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_entry(&self, entry: LogEntry) {
        self.log.lock().expect("event log lock poisoned").push(entry);
    }

    /// Snapshot of the log, newest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.log
            .lock()
            .expect("event log lock poisoned")
            .iter()
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.log.lock().expect("event log lock poisoned").clear();
    }
}

impl OutcomeSink for MemorySink {
    fn record(&self, outcome: &Outcome) {
        self.push_entry(LogEntry::from_outcome(outcome));
    }
}
