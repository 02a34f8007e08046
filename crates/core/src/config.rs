use std::time::Duration;

use alloy::primitives::{
    utils::{parse_ether, parse_units},
    Address, Bytes, U256,
};

use crate::error::ValidationError;

pub use alloy::transports::http::reqwest::Url;

/// Where each account's transaction is sent.
///
/// The recipient rides inside the variant, so a fixed-recipient run without
/// an address is unrepresentable; bad input is rejected while parsing the
/// configuration, before a run starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DestinationMode {
    /// Each account sends to its own address.
    SelfTransfer,
    /// Every account sends to the same recipient.
    FixedRecipient(Address),
}

/// How the user-specified fee amount is applied. One tagged value: the two
/// override modes cannot be set at the same time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FeePolicy {
    /// No override; the transport's fee estimation applies.
    #[default]
    Estimate,
    /// Flat legacy gas price, in wei.
    GasPrice(u128),
    /// Priority-fee component only, in wei; base fee is left to estimation.
    PriorityFee(u128),
}

impl FeePolicy {
    /// A zero amount means "no override", matching the input convention
    /// where fee fields are optional.
    pub fn gas_price(wei: u128) -> Self {
        if wei == 0 {
            Self::Estimate
        } else {
            Self::GasPrice(wei)
        }
    }

    pub fn priority_fee(wei: u128) -> Self {
        if wei == 0 {
            Self::Estimate
        } else {
            Self::PriorityFee(wei)
        }
    }
}

/// Immutable snapshot of one run's settings, consumed per tick.
/// Amounts are already converted to base units (wei) at this boundary.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub endpoint: Url,
    pub destination: DestinationMode,
    /// Raw bytes attached as transaction data; `None` for a plain transfer.
    pub payload: Option<Bytes>,
    /// Value sent with each transaction, in wei. Zero is valid (data-only).
    pub value: U256,
    pub fee: FeePolicy,
    pub tick_interval: Duration,
}

/// Parses a decimal ether amount (e.g. "0.52") into wei.
pub fn parse_ether_amount(amount: &str) -> Result<U256, ValidationError> {
    parse_ether(amount.trim())
        .map_err(|e| ValidationError::AmountInvalid(format!("{amount}: {e}")))
}

/// Parses a decimal gwei amount (e.g. "30.5") into wei.
pub fn parse_gwei_amount(amount: &str) -> Result<u128, ValidationError> {
    let amount = amount.trim();
    if amount.starts_with('-') {
        return Err(ValidationError::AmountInvalid(format!(
            "{amount}: must be non-negative"
        )));
    }
    let wei = parse_units(amount, "gwei")
        .map_err(|e| ValidationError::AmountInvalid(format!("{amount}: {e}")))?
        .get_absolute();
    u128::try_from(wei)
        .map_err(|_| ValidationError::AmountInvalid(format!("{amount}: too large")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_ether_into_wei() {
        assert_eq!(
            parse_ether_amount("0.52").unwrap(),
            U256::from(520_000_000_000_000_000u128)
        );
        assert_eq!(parse_ether_amount("0").unwrap(), U256::ZERO);
    }

    #[test]
    fn parses_decimal_gwei_into_wei() {
        assert_eq!(parse_gwei_amount("5").unwrap(), 5_000_000_000);
        assert_eq!(parse_gwei_amount("30.5").unwrap(), 30_500_000_000);
        assert_eq!(parse_gwei_amount("0").unwrap(), 0);
    }

    #[test]
    fn rejects_garbage_and_negative_amounts() {
        assert!(parse_ether_amount("lots").is_err());
        assert!(parse_gwei_amount("-5").is_err());
    }

    #[test]
    fn zero_fee_amounts_collapse_to_estimate() {
        assert_eq!(FeePolicy::gas_price(0), FeePolicy::Estimate);
        assert_eq!(FeePolicy::priority_fee(0), FeePolicy::Estimate);
        assert_eq!(FeePolicy::gas_price(7), FeePolicy::GasPrice(7));
        assert_eq!(FeePolicy::priority_fee(7), FeePolicy::PriorityFee(7));
    }
}
