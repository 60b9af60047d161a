use wallet_bridge::{ChannelError, MessageChannel, OutboundMessage, TargetOrigin};

use crate::eip1193::to_js;

/// `window.parent.postMessage` as a [`MessageChannel`].
#[derive(Debug, Clone)]
pub struct ParentWindow {
    parent: Option<web_sys::Window>,
}

impl ParentWindow {
    /// The embedding document's window. A top-level page is its own parent.
    pub fn detect() -> Self {
        let parent = web_sys::window().and_then(|window| window.parent().ok().flatten());
        Self { parent }
    }
}

impl MessageChannel for ParentWindow {
    fn post(
        &self,
        message: &OutboundMessage,
        target_origin: &TargetOrigin,
    ) -> Result<(), ChannelError> {
        if let OutboundMessage::WalletError { error } = message {
            crate::console_error(error);
        }

        let parent = self
            .parent
            .as_ref()
            .ok_or_else(|| ChannelError("no parent window".into()))?;
        let value = to_js(message).map_err(|e| ChannelError(e.to_string()))?;
        parent
            .post_message(&value, target_origin.as_str())
            .map_err(|e| ChannelError(format!("{e:?}")))
    }
}
