//! The injected wallet provider as seen by the bridge (EIP-1193).

use alloy_primitives::U256;
use async_trait::async_trait;
use chain_eth::chains::AddChainParams;
use futures::future::LocalBoxFuture;
use thiserror::Error;

/// Error returned by a provider request.
///
/// Mirrors the EIP-1193 `ProviderRpcError` shape: an optional numeric code
/// plus the human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProviderError {
    pub code: Option<i64>,
    pub message: String,
}

impl ProviderError {
    /// The user rejected the request (EIP-1193).
    pub const USER_REJECTED: i64 = 4001;
    /// `wallet_switchEthereumChain` target is unknown to the wallet (EIP-3326).
    pub const UNRECOGNIZED_CHAIN: i64 = 4902;

    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
        }
    }

    /// An error without a code, e.g. a thrown JS value or a decode failure.
    pub fn other(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn is_unrecognized_chain(&self) -> bool {
        self.code == Some(Self::UNRECOGNIZED_CHAIN)
    }

    pub fn is_user_rejected(&self) -> bool {
        self.code == Some(Self::USER_REJECTED)
    }
}

/// Provider events the bridge listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    AccountsChanged,
    ChainChanged,
}

impl EventKind {
    /// Event name passed to `provider.on`.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::AccountsChanged => "accountsChanged",
            EventKind::ChainChanged => "chainChanged",
        }
    }
}

/// A provider event with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// New account list; empty when the wallet disconnected or locked.
    AccountsChanged(Vec<String>),
    /// New chain ID as reported by the provider (usually 0x-prefixed hex).
    ChainChanged(String),
}

impl ProviderEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ProviderEvent::AccountsChanged(_) => EventKind::AccountsChanged,
            ProviderEvent::ChainChanged(_) => EventKind::ChainChanged,
        }
    }
}

/// Listener installed on the provider. The provider drives the returned
/// future to completion; it never fails.
pub type EventHandler = Box<dyn Fn(ProviderEvent) -> LocalBoxFuture<'static, ()>>;

/// Capabilities of an injected wallet.
///
/// Futures are not `Send`: browser providers live on the single JS thread.
#[async_trait(?Send)]
pub trait WalletProvider {
    /// `eth_requestAccounts`: prompts the user if needed.
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError>;

    /// `eth_accounts`: accounts already exposed to the page, no prompt.
    async fn accounts(&self) -> Result<Vec<String>, ProviderError>;

    /// `eth_chainId`.
    async fn chain_id(&self) -> Result<u64, ProviderError>;

    /// `wallet_switchEthereumChain`.
    async fn switch_chain(&self, chain_id: u64) -> Result<(), ProviderError>;

    /// `wallet_addEthereumChain`.
    async fn add_chain(&self, params: &AddChainParams) -> Result<(), ProviderError>;

    /// `eth_getBalance` at the latest block, in smallest units.
    async fn get_balance(&self, address: &str) -> Result<U256, ProviderError>;

    /// Installs a listener for `kind`. Listeners stay installed for the
    /// lifetime of the page.
    fn subscribe(&self, kind: EventKind, handler: EventHandler) -> Result<(), ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_chain_code() {
        assert!(ProviderError::new(4902, "Unrecognized chain ID").is_unrecognized_chain());
        assert!(!ProviderError::new(4001, "User rejected").is_unrecognized_chain());
        assert!(!ProviderError::other("boom").is_unrecognized_chain());
    }

    #[test]
    fn user_rejected_code() {
        assert!(ProviderError::new(4001, "User rejected").is_user_rejected());
        assert!(!ProviderError::other("User rejected").is_user_rejected());
    }

    #[test]
    fn display_is_message() {
        assert_eq!(ProviderError::new(-32603, "Internal error").to_string(), "Internal error");
        assert_eq!(ProviderError::other("boom").to_string(), "boom");
    }

    #[test]
    fn error_trait_is_implemented() {
        let err: Box<dyn std::error::Error> = Box::new(ProviderError::new(4001, "User rejected"));
        assert_eq!(err.to_string(), "User rejected");
    }

    #[test]
    fn event_names() {
        assert_eq!(EventKind::AccountsChanged.as_str(), "accountsChanged");
        assert_eq!(EventKind::ChainChanged.as_str(), "chainChanged");
        assert_eq!(
            ProviderEvent::ChainChanged("0x1".into()).kind(),
            EventKind::ChainChanged
        );
        assert_eq!(
            ProviderEvent::AccountsChanged(vec![]).kind(),
            EventKind::AccountsChanged
        );
    }
}
