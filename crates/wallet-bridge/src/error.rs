use chain_eth::error::EthError;
use thiserror::Error;

use crate::provider::ProviderError;

/// Failures of a bridge operation.
///
/// `Display` is the bare underlying message: it is what the parent receives
/// in `wallet_error.error`.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("provider not installed")]
    ProviderMissing,

    #[error("{0}")]
    Provider(#[from] ProviderError),

    #[error("provider returned no accounts")]
    NoAccounts,

    #[error("{0}")]
    Chain(#[from] EthError),
}

impl BridgeError {
    /// The user declined a wallet prompt.
    pub fn is_user_rejected(&self) -> bool {
        matches!(self, BridgeError::Provider(err) if err.is_user_rejected())
    }
}

/// Invalid bridge configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid target origin '{0}': {1}")]
    InvalidOrigin(String, &'static str),
}
