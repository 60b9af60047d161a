//! Browser entry points for the wallet bridge.
//!
//! Loaded inside an embedded frame, the module exposes:
//!
//! ```javascript
//! import init, { connectWallet, getBalance } from 'bridge_wasm';
//!
//! await init();
//! const address = await connectWallet('https://app.example.com'); // string or null
//! const balance = await getBalance(address); // "1.5", or "0" on failure
//! ```
//!
//! `connectWallet` takes the parent's origin; without one, messages are
//! posted to `"*"`. Results and wallet events reach the parent through
//! `postMessage` as `{type: "wallet_connected" | "wallet_changed" |
//! "wallet_disconnected" | "wrong_network" | "wallet_error", ...}`.

mod eip1193;
mod logging;
mod parent;

pub use eip1193::{Eip1193Provider, Ethereum};
pub use parent::ParentWindow;

use std::cell::RefCell;

use wallet_bridge::bridge::ZERO_BALANCE;
use wallet_bridge::{BridgeConfig, TargetOrigin, WalletBridge};
use wasm_bindgen::prelude::*;

type Bridge = WalletBridge<Eip1193Provider, ParentWindow>;

thread_local! {
    static BRIDGE: RefCell<Option<Bridge>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    logging::init();
}

pub(crate) fn console_warn(s: &str) {
    web_sys::console::warn_1(&JsValue::from_str(s));
}

pub(crate) fn console_error(s: &str) {
    web_sys::console::error_1(&JsValue::from_str(s));
}

fn build(config: BridgeConfig) -> Bridge {
    WalletBridge::new(Eip1193Provider::detect(), ParentWindow::detect(), config)
}

/// The page's bridge, posting to `target_origin` when one is given.
///
/// The bridge is rebuilt while no wallet has been injected yet, so a
/// late-loading extension is picked up by the next call. Once listeners are
/// installed the origin is fixed: they would keep posting to the old one.
fn bridge_for(target_origin: Option<TargetOrigin>) -> Result<Bridge, JsError> {
    BRIDGE.with(|cell| {
        let mut slot = cell.borrow_mut();
        let existing = slot.take();

        let keeps_origin = match (&existing, &target_origin) {
            (Some(bridge), Some(origin)) => bridge.config().target_origin == *origin,
            _ => true,
        };
        if !keeps_origin && existing.as_ref().is_some_and(|b| b.is_listening()) {
            *slot = existing;
            return Err(JsError::new("bridge already posts to another origin"));
        }

        let bridge = match existing {
            Some(bridge) if keeps_origin && bridge.has_provider() => bridge,
            existing => {
                let config = match (target_origin, existing) {
                    (Some(origin), _) => BridgeConfig::new(origin),
                    (None, Some(bridge)) => bridge.config().clone(),
                    (None, None) => BridgeConfig::default(),
                };
                build(config)
            }
        };
        *slot = Some(bridge.clone());
        Ok(bridge)
    })
}

/// Connects the wallet; resolves to the address or `null`.
///
/// Rejects only for an invalid `targetOrigin`, or one that differs from the
/// origin of an earlier successful connection.
#[wasm_bindgen(js_name = connectWallet)]
pub async fn connect_wallet(target_origin: Option<String>) -> Result<JsValue, JsError> {
    let origin = target_origin
        .as_deref()
        .map(TargetOrigin::parse)
        .transpose()?;
    let bridge = bridge_for(origin)?;

    Ok(match bridge.connect().await {
        Some(address) => JsValue::from_str(&address),
        None => JsValue::NULL,
    })
}

/// Balance of `address` in whole tokens; `"0"` when it cannot be read.
#[wasm_bindgen(js_name = getBalance)]
pub async fn get_balance(address: String) -> JsValue {
    let balance = match bridge_for(None) {
        Ok(bridge) => bridge.get_balance(&address).await,
        Err(_) => ZERO_BALANCE.to_string(),
    };
    JsValue::from_str(&balance)
}
