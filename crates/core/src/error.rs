use alloy::transports::{RpcError, TransportErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid signing key; expected a 32-byte hex secret")]
    InvalidKeyFormat,

    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("rpc error")]
    Rpc(#[from] RpcError<TransportErrorKind>),

    #[error("a run is already active; stop it before starting another")]
    AlreadyRunning,
}

/// Rejections surfaced before a run starts. These never occur mid-run;
/// anything that fails after the first tick is classified per-submission
/// instead (see [`ClassifiedError`]).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no accounts to send from; provide at least one signing key")]
    NoAccounts,

    #[error("fixed-recipient mode requires a recipient address")]
    RecipientMissing,

    #[error("invalid recipient address: {0}")]
    RecipientInvalid(String),

    #[error("invalid amount: {0}")]
    AmountInvalid(String),

    #[error("invalid endpoint URL: {0}")]
    EndpointInvalid(String),
}

/// Stable failure categories reported to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Execution,
    Unclassified,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use ErrorKind::*;
        match self {
            Validation => write!(f, "validation error"),
            Execution => write!(f, "execution error"),
            Unclassified => write!(f, "unclassified error"),
        }
    }
}

/// A per-submission failure, classified into one of the stable
/// [`ErrorKind`] categories with the transport's message as detail.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind}: {detail}")]
pub struct ClassifiedError {
    pub kind: ErrorKind,
    pub detail: String,
}

impl ClassifiedError {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

impl From<RpcError<TransportErrorKind>> for ClassifiedError {
    fn from(err: RpcError<TransportErrorKind>) -> Self {
        match &err {
            // the node accepted the request but rejected the transaction
            // (nonce/fee/balance issues land here)
            RpcError::ErrorResp(payload) => Self::new(
                ErrorKind::Execution,
                format!("node rejected transaction: {}", payload.message),
            ),
            // connectivity failures are still execution failures for the
            // account that hit them
            RpcError::Transport(kind) => Self::new(ErrorKind::Execution, kind.to_string()),
            _ => Self::new(ErrorKind::Unclassified, err.to_string()),
        }
    }
}
