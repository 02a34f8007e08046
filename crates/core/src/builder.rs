use alloy::{
    primitives::TxKind,
    rpc::types::{TransactionInput, TransactionRequest},
};

use crate::{
    account::Account,
    config::{DestinationMode, FeePolicy, RunConfig},
};

/// Builds one fully-specified transaction request for an account.
///
/// Pure function of `(account, config)`: no I/O, no failure path. A
/// malformed config is a precondition violation caught at the input
/// boundary before dispatch begins.
pub fn build_request(account: &Account, config: &RunConfig) -> TransactionRequest {
    let to = match config.destination {
        DestinationMode::SelfTransfer => account.address(),
        DestinationMode::FixedRecipient(recipient) => recipient,
    };

    let mut tx = TransactionRequest {
        from: Some(account.address()),
        to: Some(TxKind::Call(to)),
        value: Some(config.value),
        ..Default::default()
    };

    if let Some(payload) = &config.payload {
        tx.input = TransactionInput::new(payload.clone());
    }

    match config.fee {
        FeePolicy::Estimate => {}
        FeePolicy::GasPrice(wei) => tx.gas_price = Some(wei),
        FeePolicy::PriorityFee(wei) => tx.max_priority_fee_per_gas = Some(wei),
    }

    tx
}
