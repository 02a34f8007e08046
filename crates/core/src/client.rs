use alloy::{
    network::EthereumWallet,
    primitives::TxHash,
    providers::{DynProvider, Provider, ProviderBuilder, WsConnect},
    rpc::types::TransactionRequest,
};
use async_trait::async_trait;
use tracing::debug;

use crate::{config::Url, error::ClassifiedError, Result};

/// Transport boundary for one submission. Implementations must support
/// concurrent calls; the dispatcher fires one per account with nothing
/// shared between them but the client handle.
#[async_trait]
pub trait SubmissionClient: Send + Sync {
    async fn submit(&self, request: TransactionRequest)
        -> std::result::Result<TxHash, ClassifiedError>;
}

/// Chain RPC client backed by a single long-lived alloy provider,
/// constructed once at run start and torn down at stop. The URL scheme
/// selects the transport: `ws://`/`wss://` for a persistent socket,
/// anything else for HTTP.
pub struct RpcSubmissionClient {
    provider: DynProvider,
}

impl RpcSubmissionClient {
    pub async fn connect(endpoint: &Url, wallet: EthereumWallet) -> Result<Self> {
        let provider = if endpoint.scheme().starts_with("ws") {
            debug!("connecting websocket transport: {endpoint}");
            ProviderBuilder::new()
                .wallet(wallet)
                .connect_ws(WsConnect::new(endpoint.as_str()))
                .await?
                .erased()
        } else {
            debug!("connecting http transport: {endpoint}");
            ProviderBuilder::new()
                .wallet(wallet)
                .connect_http(endpoint.to_owned())
                .erased()
        };
        Ok(Self { provider })
    }
}

#[async_trait]
impl SubmissionClient for RpcSubmissionClient {
    async fn submit(
        &self,
        request: TransactionRequest,
    ) -> std::result::Result<TxHash, ClassifiedError> {
        // returns as soon as the node acknowledges the hash; inclusion is
        // not awaited, the next tick is this system's only retry
        let pending = self
            .provider
            .send_transaction(request)
            .await
            .map_err(ClassifiedError::from)?;
        Ok(*pending.tx_hash())
    }
}
