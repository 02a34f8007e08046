//! TOML run files: the same settings the flags carry, in file form.

use std::path::Path;

use serde::Deserialize;

use crate::{
    args::{FeeMode, RunInputs},
    error::CliError,
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunFile {
    pub rpc_url: String,
    #[serde(default)]
    pub private_keys: Vec<String>,
    #[serde(default)]
    pub mode: FileSendMode,
    pub to: Option<String>,
    /// Ether, decimal string.
    #[serde(default = "default_amount")]
    pub value: String,
    pub data: Option<String>,
    /// Gwei, decimal string; "0" disables the override.
    #[serde(default = "default_amount")]
    pub fee: String,
    #[serde(default)]
    pub fee_mode: FileFeeMode,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    pub duration_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FileSendMode {
    #[default]
    SelfTransfer,
    FixedRecipient,
}

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FileFeeMode {
    GasPrice,
    #[default]
    PriorityFee,
}

fn default_amount() -> String {
    "0".to_owned()
}

fn default_interval_ms() -> u64 {
    1000
}

impl RunFile {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        Ok(toml::from_str(&std::fs::read_to_string(path)?)?)
    }

    pub fn into_inputs(self) -> RunInputs {
        RunInputs {
            rpc_url: self.rpc_url,
            keys: self.private_keys,
            fixed_recipient: self.mode == FileSendMode::FixedRecipient,
            to: self.to,
            value: self.value,
            data: self.data,
            fee: self.fee,
            fee_mode: match self.fee_mode {
                FileFeeMode::GasPrice => FeeMode::GasPrice,
                FileFeeMode::PriorityFee => FeeMode::PriorityFee,
            },
            interval_ms: self.interval_ms,
            duration_secs: self.duration_secs,
        }
    }
}
