//! CLI argument definitions and their conversion into a validated run
//! configuration.

use std::{path::PathBuf, time::Duration};

use alloy::primitives::{Address, Bytes};
use clap::{Parser, ValueEnum};
use inscriber_core::{
    config::{
        parse_ether_amount, parse_gwei_amount, DestinationMode, FeePolicy, RunConfig, Url,
    },
    error::ValidationError,
};

use crate::{error::CliError, runfile::RunFile};

#[derive(Parser, Debug)]
#[command(
    name = "inscriber",
    version,
    about = "Recurring batch transaction broadcaster for EVM networks"
)]
pub struct InscriberCli {
    /// Load the whole run configuration from a TOML file instead of flags.
    #[arg(
        long,
        conflicts_with_all = [
            "rpc_url", "private_keys", "keys_file", "mode", "to",
            "value", "data", "fee", "fee_mode", "interval", "duration",
        ]
    )]
    pub testfile: Option<PathBuf>,

    /// RPC URL to send transactions to. A `ws://` or `wss://` scheme
    /// selects the websocket transport; anything else uses HTTP.
    #[arg(
        short,
        long,
        env = "INSCRIBER_RPC_URL",
        default_value = "http://localhost:8545"
    )]
    pub rpc_url: String,

    /// Signing key, 64 hex chars with or without a `0x` prefix.
    /// Flag may be specified multiple times.
    #[arg(short = 'k', long = "priv-key", env = "INSCRIBER_PRIVATE_KEY")]
    pub private_keys: Vec<String>,

    /// File containing one signing key per line.
    #[arg(long)]
    pub keys_file: Option<PathBuf>,

    /// Where each account's transaction is sent.
    #[arg(long, value_enum, default_value_t = SendMode::SelfTransfer)]
    pub mode: SendMode,

    /// Recipient address; required with `--mode fixed-recipient`.
    #[arg(long)]
    pub to: Option<String>,

    /// Value to send with each transaction, in ether. Zero is valid for
    /// data-only transactions.
    #[arg(long, default_value = "0")]
    pub value: String,

    /// Calldata attached to each transaction, e.g. an inscription like
    /// `data:,{"p":"prc-520","op":"mint","tick":"lego","amt":"10000"}`.
    #[arg(short, long)]
    pub data: Option<String>,

    /// Fee override amount in gwei; 0 leaves fees to network estimation.
    #[arg(long, default_value = "0")]
    pub fee: String,

    /// How the fee amount is applied.
    #[arg(long, value_enum, default_value_t = FeeMode::PriorityFee)]
    pub fee_mode: FeeMode,

    /// Milliseconds between batch starts. A slow batch is never overlapped
    /// by the next one.
    #[arg(short, long, default_value_t = 1000)]
    pub interval: u64,

    /// Stop automatically after this many seconds.
    #[arg(long)]
    pub duration: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SendMode {
    /// Each account sends to its own address.
    SelfTransfer,
    /// Every account sends to the address given with `--to`.
    FixedRecipient,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FeeMode {
    /// Flat legacy gas price.
    GasPrice,
    /// Priority fee only; base fee stays estimated.
    PriorityFee,
}

/// Run settings common to the flag and run-file input paths, before
/// amount parsing and address validation.
#[derive(Debug)]
pub struct RunInputs {
    pub rpc_url: String,
    pub keys: Vec<String>,
    pub fixed_recipient: bool,
    pub to: Option<String>,
    pub value: String,
    pub data: Option<String>,
    pub fee: String,
    pub fee_mode: FeeMode,
    pub interval_ms: u64,
    pub duration_secs: Option<u64>,
}

/// Fully-validated settings handed to the engine.
#[derive(Debug)]
pub struct RunSettings {
    pub config: RunConfig,
    pub raw_keys: Vec<String>,
    pub duration: Option<Duration>,
}

impl InscriberCli {
    pub fn resolve(mut self) -> Result<RunSettings, CliError> {
        let inputs = match self.testfile.take() {
            Some(path) => RunFile::load(&path)?.into_inputs(),
            None => self.into_inputs()?,
        };
        inputs.into_settings()
    }

    fn into_inputs(self) -> Result<RunInputs, CliError> {
        let mut keys = self.private_keys;
        if let Some(path) = self.keys_file {
            let contents = std::fs::read_to_string(path)?;
            keys.extend(
                contents
                    .lines()
                    .map(|line| line.trim().to_owned())
                    .filter(|line| !line.is_empty()),
            );
        }
        Ok(RunInputs {
            rpc_url: self.rpc_url,
            keys,
            fixed_recipient: self.mode == SendMode::FixedRecipient,
            to: self.to,
            value: self.value,
            data: self.data,
            fee: self.fee,
            fee_mode: self.fee_mode,
            interval_ms: self.interval,
            duration_secs: self.duration,
        })
    }
}

impl RunInputs {
    pub fn into_settings(self) -> Result<RunSettings, CliError> {
        let endpoint = self
            .rpc_url
            .parse::<Url>()
            .map_err(|_| ValidationError::EndpointInvalid(self.rpc_url.clone()))?;

        let destination = if self.fixed_recipient {
            let to = self.to.ok_or(ValidationError::RecipientMissing)?;
            let recipient = to
                .parse::<Address>()
                .map_err(|_| ValidationError::RecipientInvalid(to.clone()))?;
            DestinationMode::FixedRecipient(recipient)
        } else {
            DestinationMode::SelfTransfer
        };

        let value = parse_ether_amount(&self.value)?;
        let fee_wei = parse_gwei_amount(&self.fee)?;
        let fee = match self.fee_mode {
            FeeMode::GasPrice => FeePolicy::gas_price(fee_wei),
            FeeMode::PriorityFee => FeePolicy::priority_fee(fee_wei),
        };

        let payload = self
            .data
            .filter(|data| !data.trim().is_empty())
            .map(|data| Bytes::from(data.into_bytes()));

        Ok(RunSettings {
            config: RunConfig {
                endpoint,
                destination,
                payload,
                value,
                fee,
                tick_interval: Duration::from_millis(self.interval_ms),
            },
            raw_keys: self.keys,
            duration: self.duration_secs.map(Duration::from_secs),
        })
    }
}
