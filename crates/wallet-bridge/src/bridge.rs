use std::cell::Cell;
use std::rc::Rc;

use chain_eth::address::normalize_address;
use chain_eth::units::format_units;
use futures::FutureExt;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::message::{MessageChannel, OutboundMessage};
use crate::provider::{EventHandler, EventKind, ProviderError, ProviderEvent, WalletProvider};

/// Balance reported when no balance could be read.
pub const ZERO_BALANCE: &str = "0";

/// Account and balance of a successful connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionResult {
    /// Lowercase 0x-prefixed address.
    pub address: String,
    /// Whole-token decimal string.
    pub balance: String,
}

/// What [`WalletBridge::ensure_chain`] did to get onto the target network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainSwitch {
    /// The wallet was already on the target chain.
    AlreadyActive,
    /// `wallet_switchEthereumChain` succeeded.
    Switched,
    /// The chain was unknown and `wallet_addEthereumChain` succeeded. The
    /// switch is not retried.
    Added,
    /// The chain was unknown and adding it failed.
    AddFailed(ProviderError),
    /// Switching failed for another reason and was ignored.
    Absorbed(ProviderError),
}

/// Adapter between an injected wallet and the parent context.
///
/// Cloning is cheap and every clone shares the provider, channel and
/// listener state.
pub struct WalletBridge<P, C> {
    provider: Option<Rc<P>>,
    channel: Rc<C>,
    config: Rc<BridgeConfig>,
    listening: Rc<Cell<bool>>,
}

impl<P, C> Clone for WalletBridge<P, C> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            channel: Rc::clone(&self.channel),
            config: Rc::clone(&self.config),
            listening: Rc::clone(&self.listening),
        }
    }
}

impl<P, C> WalletBridge<P, C>
where
    P: WalletProvider + 'static,
    C: MessageChannel + 'static,
{
    /// `provider` is `None` when the host has no injected wallet.
    pub fn new(provider: Option<P>, channel: C, config: BridgeConfig) -> Self {
        if config.target_origin.is_wildcard() {
            warn!("posting wallet data to any parent origin");
        }
        Self {
            provider: provider.map(Rc::new),
            channel: Rc::new(channel),
            config: Rc::new(config),
            listening: Rc::new(Cell::new(false)),
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Whether the account and chain listeners are installed.
    pub fn is_listening(&self) -> bool {
        self.listening.get()
    }

    fn provider(&self) -> Result<&P, BridgeError> {
        self.provider.as_deref().ok_or(BridgeError::ProviderMissing)
    }

    /// Connects the wallet and reports the outcome to the parent.
    ///
    /// Posts exactly one `wallet_connected` or `wallet_error` and returns
    /// the connected address, or `None` on failure. On success the account
    /// and chain listeners are installed once per bridge.
    pub async fn connect(&self) -> Option<String> {
        match self.try_connect().await {
            Ok(ConnectionResult { address, balance }) => {
                self.post(OutboundMessage::WalletConnected {
                    address: address.clone(),
                    balance,
                });
                self.install_listeners();
                Some(address)
            }
            Err(err) => {
                if err.is_user_rejected() {
                    info!(%err, "user declined wallet connection");
                } else {
                    warn!(%err, "wallet connection failed");
                }
                self.post(OutboundMessage::WalletError {
                    error: err.to_string(),
                });
                None
            }
        }
    }

    /// The connect flow without messages or listeners: request accounts,
    /// move to the target chain (best effort), read the first account's
    /// balance.
    pub async fn try_connect(&self) -> Result<ConnectionResult, BridgeError> {
        let provider = self.provider()?;

        let accounts = provider.request_accounts().await?;
        let account = accounts.first().ok_or(BridgeError::NoAccounts)?;
        debug!(account = %account, "account access granted");

        let switch = self.ensure_chain().await?;
        debug!(?switch, "chain check complete");

        self.account_state(account).await
    }

    /// Moves the wallet onto the configured chain if it is elsewhere.
    ///
    /// Only the `eth_chainId` query can fail. Switch and add failures are
    /// reported in the returned [`ChainSwitch`]; a wrong chain afterwards is
    /// surfaced through the chain listener.
    pub async fn ensure_chain(&self) -> Result<ChainSwitch, BridgeError> {
        let provider = self.provider()?;
        let target = self.config.chain;

        let current = provider.chain_id().await?;
        if current == target.chain_id {
            return Ok(ChainSwitch::AlreadyActive);
        }

        debug!(current, target = target.chain_id, "switching chain");
        match provider.switch_chain(target.chain_id).await {
            Ok(()) => Ok(ChainSwitch::Switched),
            Err(err) if err.is_unrecognized_chain() => {
                debug!(chain = target.display_name, "chain unknown to wallet, adding it");
                match provider.add_chain(&target.add_chain_params()).await {
                    Ok(()) => Ok(ChainSwitch::Added),
                    Err(add_err) => {
                        warn!(err = %add_err, "adding chain failed");
                        Ok(ChainSwitch::AddFailed(add_err))
                    }
                }
            }
            Err(err) => {
                if err.is_user_rejected() {
                    info!(%err, "user declined chain switch, continuing");
                } else {
                    warn!(%err, "chain switch failed, continuing");
                }
                Ok(ChainSwitch::Absorbed(err))
            }
        }
    }

    /// Balance of `address` in whole tokens, or [`ZERO_BALANCE`] if there
    /// is no provider or the query fails. Never posts a message.
    pub async fn get_balance(&self, address: &str) -> String {
        match self.balance_of(address).await {
            Ok(balance) => balance,
            Err(err) => {
                debug!(%err, address, "balance query failed");
                ZERO_BALANCE.to_string()
            }
        }
    }

    /// Balance of `address` in whole tokens, with the failure reason.
    pub async fn balance_of(&self, address: &str) -> Result<String, BridgeError> {
        Ok(self.account_state(address).await?.balance)
    }

    async fn account_state(&self, account: &str) -> Result<ConnectionResult, BridgeError> {
        let provider = self.provider()?;
        let address = normalize_address(account)?;
        let wei = provider.get_balance(&address).await?;
        Ok(ConnectionResult {
            balance: format_units(wei, self.config.chain.native_currency.decimals),
            address,
        })
    }

    fn install_listeners(&self) {
        let Some(provider) = self.provider.as_deref() else {
            return;
        };
        if self.listening.replace(true) {
            debug!("listeners already installed");
            return;
        }

        let mut installed = 0;
        for kind in [EventKind::AccountsChanged, EventKind::ChainChanged] {
            let bridge = self.clone();
            let handler: EventHandler = Box::new(move |event: ProviderEvent| {
                let bridge = bridge.clone();
                async move { bridge.handle_event(event).await }.boxed_local()
            });
            match provider.subscribe(kind, handler) {
                Ok(()) => installed += 1,
                Err(err) => warn!(event = kind.as_str(), %err, "failed to subscribe"),
            }
        }

        if installed == 0 {
            self.listening.set(false);
        }
    }

    /// Reacts to a provider event, posting at most one message.
    pub async fn handle_event(&self, event: ProviderEvent) {
        debug!(event = event.kind().as_str(), "provider event");
        if let Some(message) = self.event_message(event).await {
            self.post(message);
        }
    }

    async fn event_message(&self, event: ProviderEvent) -> Option<OutboundMessage> {
        match event {
            ProviderEvent::AccountsChanged(accounts) => match accounts.first() {
                None => Some(OutboundMessage::WalletDisconnected),
                Some(account) => Some(self.changed_message(account).await),
            },
            ProviderEvent::ChainChanged(chain_id) => {
                let chain = self.config.chain;
                if !chain.matches(&chain_id) {
                    return Some(OutboundMessage::WrongNetwork {
                        message: chain.wrong_network_message(),
                    });
                }

                let provider = self.provider.as_deref()?;
                match provider.accounts().await {
                    Ok(accounts) => match accounts.first() {
                        Some(account) => Some(self.changed_message(account).await),
                        None => None,
                    },
                    Err(err) => Some(OutboundMessage::WalletError {
                        error: err.to_string(),
                    }),
                }
            }
        }
    }

    async fn changed_message(&self, account: &str) -> OutboundMessage {
        match self.account_state(account).await {
            Ok(ConnectionResult { address, balance }) => {
                OutboundMessage::WalletChanged { address, balance }
            }
            Err(err) => {
                warn!(%err, "balance refresh failed");
                OutboundMessage::WalletError {
                    error: err.to_string(),
                }
            }
        }
    }

    fn post(&self, message: OutboundMessage) {
        if let Err(err) = self.channel.post(&message, &self.config.target_origin) {
            warn!(%err, kind = message.kind(), "message not delivered");
        }
    }
}
