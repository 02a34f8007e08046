use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex,
};

use tokio::{task::JoinHandle, time::Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    account::AccountSet,
    client::SubmissionClient,
    config::RunConfig,
    dispatcher::BatchDispatcher,
    error::{Error, ValidationError},
    sink::OutcomeSink,
    Result,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunStatus {
    #[default]
    Idle,
    Running,
    /// Stop requested; collapses to Idle once the in-flight tick settles.
    Stopping,
}

/// Shared telemetry for the active run. Counters are bumped only at the
/// controller's post-join collection point, so concurrent submissions
/// within a tick can never race an update.
#[derive(Debug, Default)]
pub struct RunState {
    status: Mutex<RunStatus>,
    tick_count: AtomicU64,
    success_count: AtomicU64,
}

impl RunState {
    pub fn status(&self) -> RunStatus {
        *self.status.lock().expect("run state lock poisoned")
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::SeqCst)
    }

    pub fn success_count(&self) -> u64 {
        self.success_count.load(Ordering::SeqCst)
    }

    fn set_status(&self, status: RunStatus) {
        *self.status.lock().expect("run state lock poisoned") = status;
    }
}

/// Final counts handed back when a run stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub successes: u64,
}

struct ActiveRun {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Drives the dispatcher on a fixed cadence while a run is active.
///
/// Ticks are serialized: tick k+1 is scheduled `tick_interval` after tick
/// k started, but never while tick k is still outstanding. Stopping is
/// cooperative; the in-flight tick settles and records its outcomes, and
/// no further tick fires. The controller is reusable across runs.
#[derive(Default)]
pub struct RunController {
    state: Arc<RunState>,
    active: Mutex<Option<ActiveRun>>,
}

impl RunController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Arc<RunState> {
        self.state.clone()
    }

    /// Starts a run. Rejected with a [`ValidationError`] before the first
    /// tick if there is nothing to send from; never fails mid-run.
    pub fn start<C, K>(
        &self,
        config: RunConfig,
        accounts: AccountSet,
        client: C,
        sink: K,
    ) -> Result<()>
    where
        C: SubmissionClient + 'static,
        K: OutcomeSink + 'static,
    {
        let mut active = self.active.lock().expect("controller lock poisoned");
        if active.is_some() {
            return Err(Error::AlreadyRunning);
        }
        if accounts.is_empty() {
            return Err(ValidationError::NoAccounts.into());
        }

        self.state.tick_count.store(0, Ordering::SeqCst);
        self.state.success_count.store(0, Ordering::SeqCst);
        self.state.set_status(RunStatus::Running);

        let cancel = CancellationToken::new();
        let dispatcher = BatchDispatcher::new(client);
        info!(
            accounts = accounts.len(),
            interval_ms = config.tick_interval.as_millis() as u64,
            "run started"
        );
        let task = tokio::task::spawn(run_loop(
            dispatcher,
            accounts,
            config,
            sink,
            self.state.clone(),
            cancel.clone(),
        ));
        *active = Some(ActiveRun { cancel, task });
        Ok(())
    }

    /// Requests a stop and waits for the in-flight tick to settle, then
    /// resets the run state to idle. Returns the run's final counts.
    /// Stopping an idle controller is a no-op returning zeroed counts.
    pub async fn stop(&self) -> RunSummary {
        let active = self
            .active
            .lock()
            .expect("controller lock poisoned")
            .take();
        if let Some(active) = active {
            self.state.set_status(RunStatus::Stopping);
            active.cancel.cancel();
            if let Err(e) = active.task.await {
                warn!("run loop task failed: {e}");
            }
        }
        let summary = RunSummary {
            ticks: self.state.tick_count.swap(0, Ordering::SeqCst),
            successes: self.state.success_count.swap(0, Ordering::SeqCst),
        };
        self.state.set_status(RunStatus::Idle);
        summary
    }
}

async fn run_loop<C, K>(
    dispatcher: BatchDispatcher<C>,
    accounts: AccountSet,
    config: RunConfig,
    sink: K,
    state: Arc<RunState>,
    cancel: CancellationToken,
) where
    C: SubmissionClient + 'static,
    K: OutcomeSink + 'static,
{
    let interval = config.tick_interval;
    loop {
        if cancel.is_cancelled() {
            break;
        }
        let tick_started = Instant::now();
        let outcomes = dispatcher.run_one_tick(&accounts, &config).await;

        // single collection point: the join above already happened, so
        // these updates never race concurrent submissions
        let successes = outcomes.iter().filter(|o| o.is_success()).count() as u64;
        state.tick_count.fetch_add(1, Ordering::SeqCst);
        state.success_count.fetch_add(successes, Ordering::SeqCst);
        for outcome in &outcomes {
            sink.record(outcome);
        }
        debug!(
            successes,
            failures = outcomes.len() as u64 - successes,
            "tick settled"
        );

        // minimum spacing is measured from tick start, but a slow tick is
        // never overlapped by the next one
        let wait = interval.saturating_sub(tick_started.elapsed());
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(wait) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test::{test_accounts, test_config, CollectingSink, StubClient};
    use crate::sink::MemorySink;
    use std::time::Duration;

    #[tokio::test]
    async fn rejects_starting_with_no_accounts() {
        let controller = RunController::new();
        let result = controller.start(
            test_config(),
            AccountSet::default(),
            StubClient::new(),
            MemorySink::new(),
        );
        assert!(matches!(
            result,
            Err(Error::Validation(ValidationError::NoAccounts))
        ));
        assert_eq!(controller.state().status(), RunStatus::Idle);
    }

    #[tokio::test]
    async fn success_count_accumulates_across_ticks() {
        let controller = RunController::new();
        let accounts = test_accounts();
        let sink = CollectingSink::new();
        let outcomes = sink.handle();
        controller
            .start(test_config(), accounts.clone(), StubClient::new(), sink)
            .unwrap();
        tokio::time::sleep(Duration::from_millis(55)).await;
        let summary = controller.stop().await;

        assert!(summary.ticks >= 1);
        // all stub submissions succeed, so successes track ticks exactly
        assert_eq!(summary.successes, summary.ticks * accounts.len() as u64);
        assert_eq!(
            outcomes.lock().unwrap().len() as u64,
            summary.ticks * accounts.len() as u64
        );
    }

    #[tokio::test]
    async fn stop_lets_the_inflight_tick_settle_and_blocks_further_ticks() {
        let controller = RunController::new();
        let accounts = test_accounts();
        let mut client = StubClient::new();
        for address in accounts.addresses() {
            client = client.delay_for(address, Duration::from_millis(100));
        }
        let submissions = client.submission_counter();

        let mut config = test_config();
        config.tick_interval = Duration::from_millis(10);
        controller
            .start(config, accounts.clone(), client, CollectingSink::new())
            .unwrap();

        // stop while tick 1 is still in flight
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(controller.state().status(), RunStatus::Running);
        let summary = controller.stop().await;

        // the in-flight tick settled and was recorded; nothing fired after
        assert_eq!(summary.ticks, 1);
        assert_eq!(summary.successes, accounts.len() as u64);
        let settled = submissions.load(Ordering::SeqCst);
        assert_eq!(settled, accounts.len());
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(submissions.load(Ordering::SeqCst), settled);
        assert_eq!(controller.state().status(), RunStatus::Idle);
    }

    #[tokio::test]
    async fn a_failing_account_never_stops_the_loop() {
        let controller = RunController::new();
        let accounts = test_accounts();
        let client = StubClient::new().failing_for(accounts.addresses()[2]);
        let sink = CollectingSink::new();
        let outcomes = sink.handle();
        controller
            .start(test_config(), accounts.clone(), client, sink)
            .unwrap();
        tokio::time::sleep(Duration::from_millis(35)).await;
        let summary = controller.stop().await;

        assert!(summary.ticks >= 2, "failures must not stall future ticks");
        assert_eq!(
            summary.successes,
            summary.ticks * (accounts.len() as u64 - 1)
        );
        let recorded = outcomes.lock().unwrap();
        assert_eq!(recorded.len() as u64, summary.ticks * accounts.len() as u64);
    }

    #[tokio::test]
    async fn the_controller_is_reusable_across_runs() {
        let controller = RunController::new();
        let accounts = test_accounts();
        controller
            .start(
                test_config(),
                accounts.clone(),
                StubClient::new(),
                MemorySink::new(),
            )
            .unwrap();
        assert!(matches!(
            controller.start(
                test_config(),
                accounts.clone(),
                StubClient::new(),
                MemorySink::new()
            ),
            Err(Error::AlreadyRunning)
        ));
        controller.stop().await;

        // counters were reset; a fresh run starts cleanly
        assert_eq!(controller.state().tick_count(), 0);
        controller
            .start(test_config(), accounts, StubClient::new(), MemorySink::new())
            .unwrap();
        tokio::time::sleep(Duration::from_millis(15)).await;
        let summary = controller.stop().await;
        assert!(summary.ticks >= 1);
    }
}
