//! Messages posted to the parent context.

use serde::Serialize;
use thiserror::Error;

use crate::config::TargetOrigin;

/// Status update for the embedding page.
///
/// Serialises as a flat object tagged by `type`, e.g.
/// `{"type":"wallet_connected","address":"0x..","balance":"1.5"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    WalletConnected { address: String, balance: String },
    WalletChanged { address: String, balance: String },
    WalletDisconnected,
    WrongNetwork { message: String },
    WalletError { error: String },
}

impl OutboundMessage {
    /// The `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            OutboundMessage::WalletConnected { .. } => "wallet_connected",
            OutboundMessage::WalletChanged { .. } => "wallet_changed",
            OutboundMessage::WalletDisconnected => "wallet_disconnected",
            OutboundMessage::WrongNetwork { .. } => "wrong_network",
            OutboundMessage::WalletError { .. } => "wallet_error",
        }
    }
}

#[derive(Debug, Error)]
#[error("failed to post message: {0}")]
pub struct ChannelError(pub String);

/// Cross-document sink towards the parent context. Delivery is
/// fire-and-forget; nothing is acknowledged.
pub trait MessageChannel {
    fn post(&self, message: &OutboundMessage, target_origin: &TargetOrigin)
        -> Result<(), ChannelError>;
}
