use std::sync::Arc;

use alloy::primitives::{Address, TxHash};
use futures::future::join_all;
use tracing::debug;

use crate::{
    account::AccountSet,
    builder::build_request,
    client::SubmissionClient,
    config::RunConfig,
    error::{ClassifiedError, ErrorKind},
};

/// The per-account, per-tick result of a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success { address: Address, tx_hash: TxHash },
    Failure { address: Address, error: ClassifiedError },
}

impl Outcome {
    pub fn address(&self) -> Address {
        match self {
            Self::Success { address, .. } | Self::Failure { address, .. } => *address,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Fans one tick out across all accounts and joins the results.
pub struct BatchDispatcher<C> {
    client: Arc<C>,
}

impl<C> BatchDispatcher<C>
where
    C: SubmissionClient + 'static,
{
    pub fn new(client: C) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Runs one tick: builds a request per account, submits all of them
    /// concurrently as spawned tasks, and waits for every submission to
    /// settle. One outcome per account, in input order regardless of
    /// completion order; a failing account never cancels or blocks its
    /// siblings.
    pub async fn run_one_tick(&self, accounts: &AccountSet, config: &RunConfig) -> Vec<Outcome> {
        let mut addresses = Vec::with_capacity(accounts.len());
        let mut tasks = Vec::with_capacity(accounts.len());
        for account in accounts.iter() {
            let request = build_request(account, config);
            let client = self.client.clone();
            addresses.push(account.address());
            tasks.push(tokio::task::spawn(
                async move { client.submit(request).await },
            ));
        }

        debug!(in_flight = tasks.len(), "submissions dispatched");
        let settled = join_all(tasks).await;

        addresses
            .into_iter()
            .zip(settled)
            .map(|(address, result)| match result {
                Ok(Ok(tx_hash)) => Outcome::Success { address, tx_hash },
                Ok(Err(error)) => Outcome::Failure { address, error },
                // a panicked submission task still settles into an outcome
                Err(e) => Outcome::Failure {
                    address,
                    error: ClassifiedError::new(
                        ErrorKind::Unclassified,
                        format!("submission task failed: {e}"),
                    ),
                },
            })
            .collect()
    }
}
