use inscriber_core::{
    dispatcher::Outcome,
    sink::{LogEntry, LogKind, MemorySink, OutcomeSink},
};
use tracing::{error, info};

/// Logs each outcome as it settles and retains the bounded in-memory log
/// for the life of the process.
#[derive(Debug, Default)]
pub struct ConsoleSink {
    log: MemorySink,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OutcomeSink for ConsoleSink {
    fn record(&self, outcome: &Outcome) {
        let entry = LogEntry::from_outcome(outcome);
        match entry.kind {
            LogKind::Success => info!("{}", entry.message),
            LogKind::Error => error!("{}", entry.message),
        }
        self.log.push_entry(entry);
    }
}
