//! Connects an injected EIP-1193 wallet to an embedding page.
//!
//! [`WalletBridge`] requests account access, moves the wallet onto the target
//! network, reads balances and relays every outcome and provider event to the
//! parent context as an [`OutboundMessage`]. The provider and the parent
//! channel are traits so the bridge runs the same in the browser and in tests.

pub mod bridge;
pub mod config;
pub mod error;
pub mod message;
pub mod provider;

pub use bridge::{ChainSwitch, ConnectionResult, WalletBridge};
pub use config::{BridgeConfig, TargetOrigin};
pub use error::{BridgeError, ConfigError};
pub use message::{ChannelError, MessageChannel, OutboundMessage};
pub use provider::{EventHandler, EventKind, ProviderError, ProviderEvent, WalletProvider};
