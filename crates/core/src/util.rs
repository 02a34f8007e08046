#[cfg(test)]
pub mod test {
    use std::{
        collections::HashMap,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc, Mutex,
        },
        time::Duration,
    };

    use alloy::{
        primitives::{Address, TxHash, U256},
        rpc::types::TransactionRequest,
    };
    use async_trait::async_trait;

    use crate::{
        account::AccountSet,
        client::SubmissionClient,
        config::{DestinationMode, FeePolicy, RunConfig},
        dispatcher::Outcome,
        error::{ClassifiedError, ErrorKind},
        sink::OutcomeSink,
    };

    /// Well-known dev-node keys; safe to hard-code.
    pub const TEST_KEYS: [&str; 3] = [
        "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
        "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d",
        "0x5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a",
    ];

    pub fn test_accounts() -> AccountSet {
        AccountSet::from_raw_keys(TEST_KEYS)
    }

    pub fn test_config() -> RunConfig {
        RunConfig {
            endpoint: "http://localhost:8545".parse().expect("static url"),
            destination: DestinationMode::SelfTransfer,
            payload: None,
            value: U256::ZERO,
            fee: FeePolicy::default(),
            tick_interval: Duration::from_millis(10),
        }
    }

    /// Stub transport with per-address delays and failures; counts every
    /// submission it receives.
    #[derive(Default)]
    pub struct StubClient {
        delays: HashMap<Address, Duration>,
        failing: Vec<Address>,
        submissions: Arc<AtomicUsize>,
    }

    impl StubClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn delay_for(mut self, address: Address, delay: Duration) -> Self {
            self.delays.insert(address, delay);
            self
        }

        pub fn failing_for(mut self, address: Address) -> Self {
            self.failing.push(address);
            self
        }

        /// Handle to the submission counter, usable after the client has
        /// been moved into a dispatcher.
        pub fn submission_counter(&self) -> Arc<AtomicUsize> {
            self.submissions.clone()
        }
    }

    #[async_trait]
    impl SubmissionClient for StubClient {
        async fn submit(
            &self,
            request: TransactionRequest,
        ) -> std::result::Result<TxHash, ClassifiedError> {
            self.submissions.fetch_add(1, Ordering::SeqCst);
            let from = request.from.unwrap_or_default();
            if let Some(delay) = self.delays.get(&from) {
                tokio::time::sleep(*delay).await;
            }
            if self.failing.contains(&from) {
                return Err(ClassifiedError::new(
                    ErrorKind::Execution,
                    "stub transport rejected the transaction",
                ));
            }
            Ok(TxHash::with_last_byte(42))
        }
    }

    /// Sink that shares every recorded outcome with the test body.
    #[derive(Default)]
    pub struct CollectingSink {
        outcomes: Arc<Mutex<Vec<Outcome>>>,
    }

    impl CollectingSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn handle(&self) -> Arc<Mutex<Vec<Outcome>>> {
            self.outcomes.clone()
        }
    }

    impl OutcomeSink for CollectingSink {
        fn record(&self, outcome: &Outcome) {
            self.outcomes
                .lock()
                .expect("sink lock poisoned")
                .push(outcome.clone());
        }
    }
}
