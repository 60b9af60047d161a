//! `window.ethereum` as a [`WalletProvider`].

use alloy_primitives::U256;
use async_trait::async_trait;
use chain_eth::chains::{chain_id_hex, parse_chain_id, AddChainParams};
use chain_eth::units::parse_quantity;
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use wallet_bridge::{EventHandler, EventKind, ProviderError, ProviderEvent, WalletProvider};

#[wasm_bindgen]
extern "C" {
    /// Provider object injected by the wallet extension.
    #[derive(Debug, Clone)]
    pub type Ethereum;

    #[wasm_bindgen(method, catch)]
    fn request(this: &Ethereum, args: &JsValue) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn on(this: &Ethereum, event: &str, listener: &js_sys::Function) -> Result<(), JsValue>;
}

const NO_PARAMS: [u8; 0] = [];

/// EIP-1193 `RequestArguments`.
#[derive(Debug, Serialize)]
struct RequestArguments<'a, P> {
    method: &'a str,
    params: P,
}

/// EIP-3326 `SwitchEthereumChainParameter`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SwitchChainParams {
    chain_id: String,
}

pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, serde_wasm_bindgen::Error> {
    value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
}

fn js_field(value: &JsValue, key: &str) -> Option<JsValue> {
    if !value.is_object() {
        return None;
    }
    js_sys::Reflect::get(value, &JsValue::from_str(key))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

fn js_code(value: &JsValue) -> Option<i64> {
    js_field(value, "code")
        .and_then(|c| c.as_f64())
        .map(|c| c as i64)
}

/// Converts a rejected request into a [`ProviderError`].
///
/// Some mobile wallets wrap 4902 in `data.originalError` under a generic
/// -32603, so the nested code wins when present.
fn provider_error(value: JsValue) -> ProviderError {
    let nested = js_field(&value, "data")
        .and_then(|data| js_field(&data, "originalError"))
        .and_then(|original| js_code(&original));
    let code = nested.or_else(|| js_code(&value));

    let message = js_field(&value, "message")
        .and_then(|m| m.as_string())
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{value:?}"));

    ProviderError { code, message }
}

fn decode_event(kind: EventKind, payload: JsValue) -> Result<ProviderEvent, serde_wasm_bindgen::Error> {
    Ok(match kind {
        EventKind::AccountsChanged => {
            ProviderEvent::AccountsChanged(serde_wasm_bindgen::from_value(payload)?)
        }
        EventKind::ChainChanged => ProviderEvent::ChainChanged(serde_wasm_bindgen::from_value(payload)?),
    })
}

#[derive(Debug, Clone)]
pub struct Eip1193Provider {
    ethereum: Ethereum,
}

impl Eip1193Provider {
    /// Returns the injected provider, or `None` if no wallet is installed.
    pub fn detect() -> Option<Self> {
        let window = web_sys::window()?;
        let value = js_sys::Reflect::get(&window, &JsValue::from_str("ethereum")).ok()?;
        if value.is_undefined() || value.is_null() {
            return None;
        }
        Some(Self::from_js(value))
    }

    /// Wraps any object exposing EIP-1193 `request` and `on`.
    pub fn from_js(value: JsValue) -> Self {
        Self {
            ethereum: value.unchecked_into(),
        }
    }

    async fn request_raw<P: Serialize>(&self, method: &str, params: P) -> Result<JsValue, ProviderError> {
        let args = to_js(&RequestArguments { method, params })
            .map_err(|e| ProviderError::other(format!("{method}: {e}")))?;
        let promise = self.ethereum.request(&args).map_err(provider_error)?;
        JsFuture::from(promise).await.map_err(provider_error)
    }

    async fn call<P: Serialize, R: DeserializeOwned>(&self, method: &str, params: P) -> Result<R, ProviderError> {
        let value = self.request_raw(method, params).await?;
        serde_wasm_bindgen::from_value(value)
            .map_err(|e| ProviderError::other(format!("{method}: unexpected response: {e}")))
    }
}

#[async_trait(?Send)]
impl WalletProvider for Eip1193Provider {
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
        self.call("eth_requestAccounts", NO_PARAMS).await
    }

    async fn accounts(&self) -> Result<Vec<String>, ProviderError> {
        self.call("eth_accounts", NO_PARAMS).await
    }

    async fn chain_id(&self) -> Result<u64, ProviderError> {
        let chain_id: String = self.call("eth_chainId", NO_PARAMS).await?;
        parse_chain_id(&chain_id).map_err(|e| ProviderError::other(e.to_string()))
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), ProviderError> {
        let params = [SwitchChainParams {
            chain_id: chain_id_hex(chain_id),
        }];
        self.request_raw("wallet_switchEthereumChain", params).await?;
        Ok(())
    }

    async fn add_chain(&self, params: &AddChainParams) -> Result<(), ProviderError> {
        self.request_raw("wallet_addEthereumChain", [params]).await?;
        Ok(())
    }

    async fn get_balance(&self, address: &str) -> Result<U256, ProviderError> {
        let quantity: String = self.call("eth_getBalance", (address, "latest")).await?;
        parse_quantity(&quantity).map_err(|e| ProviderError::other(e.to_string()))
    }

    fn subscribe(&self, kind: EventKind, handler: EventHandler) -> Result<(), ProviderError> {
        let listener = Closure::<dyn FnMut(JsValue)>::new(move |payload: JsValue| {
            match decode_event(kind, payload) {
                Ok(event) => spawn_local(handler(event)),
                Err(err) => crate::console_warn(&format!("ignoring malformed {} event: {err}", kind.as_str())),
            }
        });

        self.ethereum
            .on(kind.as_str(), listener.as_ref().unchecked_ref())
            .map_err(provider_error)?;
        // The provider owns the listener for the rest of the page's life.
        listener.forget();
        Ok(())
    }
}
