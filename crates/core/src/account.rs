use std::fmt;

use alloy::{network::EthereumWallet, primitives::Address, signers::local::PrivateKeySigner};
use tracing::warn;

use crate::{error::Error, Result};

/// A signing identity derived from one secret key.
///
/// The secret never appears in logs; `Debug` prints the derived address only.
#[derive(Clone)]
pub struct Account {
    signer: PrivateKeySigner,
    address: Address,
}

impl Account {
    /// Parses a raw signing key into an account. Accepts a 64-hex-character
    /// secret with or without a `0x` prefix; both forms yield the same
    /// canonical account.
    pub fn from_raw_key(raw: &str) -> Result<Self> {
        let key = canonicalize_key(raw).ok_or(Error::InvalidKeyFormat)?;
        let signer = key
            .parse::<PrivateKeySigner>()
            .map_err(|_| Error::InvalidKeyFormat)?;
        let address = signer.address();
        Ok(Self { signer, address })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub(crate) fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// The ordered set of accounts a run sends from.
#[derive(Clone, Debug, Default)]
pub struct AccountSet {
    accounts: Vec<Account>,
}

impl AccountSet {
    /// Derives one account per raw key, preserving input order without
    /// deduplication. Raw keys are re-validated defensively: malformed
    /// entries (wrong length, non-hex) are skipped with a warning rather
    /// than failing the whole set. Callers that want per-key errors use
    /// [`Account::from_raw_key`] directly.
    pub fn from_raw_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let accounts = keys
            .into_iter()
            .filter_map(|raw| match Account::from_raw_key(raw.as_ref()) {
                Ok(account) => Some(account),
                Err(_) => {
                    warn!("skipping malformed signing key");
                    None
                }
            })
            .collect();
        Self { accounts }
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter()
    }

    pub fn addresses(&self) -> Vec<Address> {
        self.accounts.iter().map(|a| a.address()).collect()
    }

    /// Builds the run's wallet, registering every account's signer.
    /// Returns `None` when the set is empty.
    pub fn wallet(&self) -> Option<EthereumWallet> {
        let mut accounts = self.accounts.iter();
        let mut wallet = EthereumWallet::new(accounts.next()?.signer().clone());
        for account in accounts {
            wallet.register_signer(account.signer().clone());
        }
        Some(wallet)
    }
}

fn canonicalize_key(raw: &str) -> Option<String> {
    let key = raw.trim();
    let key = key.strip_prefix("0x").unwrap_or(key);
    if key.len() != 64 || !key.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(format!("0x{}", key.to_lowercase()))
}
