//! In-memory provider and channel shared by the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use alloy_primitives::U256;
use async_trait::async_trait;
use chain_eth::chains::AddChainParams;
use wallet_bridge::{
    BridgeConfig, ChannelError, EventHandler, EventKind, MessageChannel, OutboundMessage,
    ProviderError, ProviderEvent, TargetOrigin, WalletBridge, WalletProvider,
};

pub const ALICE: &str = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed";
pub const BOB: &str = "0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359";
pub const MEGA_CHAIN_ID: u64 = 6342;
pub const ONE_AND_A_HALF: u128 = 1_500_000_000_000_000_000;

pub struct MockState {
    pub request_accounts: Result<Vec<String>, ProviderError>,
    pub exposed_accounts: Result<Vec<String>, ProviderError>,
    pub chain_id: Result<u64, ProviderError>,
    pub switch_result: Result<(), ProviderError>,
    pub add_result: Result<(), ProviderError>,
    pub balances: HashMap<String, U256>,
    pub balance_error: Option<ProviderError>,
    pub subscribe_error: Option<ProviderError>,
    pub calls: Vec<&'static str>,
    pub added_chains: Vec<AddChainParams>,
    pub handlers: Vec<(EventKind, Rc<EventHandler>)>,
}

/// Wallet on the target chain with ALICE unlocked holding 1.5 tokens.
impl Default for MockState {
    fn default() -> Self {
        let mut balances = HashMap::new();
        balances.insert(ALICE.to_string(), U256::from(ONE_AND_A_HALF));
        Self {
            request_accounts: Ok(vec![ALICE.to_string()]),
            exposed_accounts: Ok(vec![ALICE.to_string()]),
            chain_id: Ok(MEGA_CHAIN_ID),
            switch_result: Ok(()),
            add_result: Ok(()),
            balances,
            balance_error: None,
            subscribe_error: None,
            calls: Vec::new(),
            added_chains: Vec::new(),
            handlers: Vec::new(),
        }
    }
}

#[derive(Clone, Default)]
pub struct MockProvider {
    pub state: Rc<RefCell<MockState>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn configure(&self, f: impl FnOnce(&mut MockState)) {
        f(&mut self.state.borrow_mut());
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.borrow().calls.clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.state.borrow().calls.iter().filter(|c| **c == method).count()
    }

    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.state.borrow().handlers.iter().filter(|(k, _)| *k == kind).count()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Runs every listener registered for the event to completion.
    pub async fn emit(&self, event: ProviderEvent) {
        let handlers: Vec<Rc<EventHandler>> = self
            .state
            .borrow()
            .handlers
            .iter()
            .filter(|(kind, _)| *kind == event.kind())
            .map(|(_, handler)| Rc::clone(handler))
            .collect();

        for handler in handlers {
            (**handler)(event.clone()).await;
        }
    }

    fn record(&self, method: &'static str) {
        self.state.borrow_mut().calls.push(method);
    }
}

#[async_trait(?Send)]
impl WalletProvider for MockProvider {
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
        self.record("eth_requestAccounts");
        self.state.borrow().request_accounts.clone()
    }

    async fn accounts(&self) -> Result<Vec<String>, ProviderError> {
        self.record("eth_accounts");
        self.state.borrow().exposed_accounts.clone()
    }

    async fn chain_id(&self) -> Result<u64, ProviderError> {
        self.record("eth_chainId");
        self.state.borrow().chain_id.clone()
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), ProviderError> {
        self.record("wallet_switchEthereumChain");
        let mut state = self.state.borrow_mut();
        let result = state.switch_result.clone();
        if result.is_ok() {
            state.chain_id = Ok(chain_id);
        }
        result
    }

    async fn add_chain(&self, params: &AddChainParams) -> Result<(), ProviderError> {
        self.record("wallet_addEthereumChain");
        let mut state = self.state.borrow_mut();
        state.added_chains.push(params.clone());
        state.add_result.clone()
    }

    async fn get_balance(&self, address: &str) -> Result<U256, ProviderError> {
        self.record("eth_getBalance");
        let state = self.state.borrow();
        if let Some(err) = &state.balance_error {
            return Err(err.clone());
        }
        Ok(state.balances.get(address).copied().unwrap_or(U256::ZERO))
    }

    fn subscribe(&self, kind: EventKind, handler: EventHandler) -> Result<(), ProviderError> {
        let mut state = self.state.borrow_mut();
        if let Some(err) = &state.subscribe_error {
            return Err(err.clone());
        }
        state.handlers.push((kind, Rc::new(handler)));
        Ok(())
    }
}

/// Records every posted message with the origin it was posted to.
#[derive(Clone, Default)]
pub struct RecordingChannel {
    pub posted: Rc<RefCell<Vec<(OutboundMessage, String)>>>,
}

impl RecordingChannel {
    pub fn messages(&self) -> Vec<OutboundMessage> {
        self.posted.borrow().iter().map(|(m, _)| m.clone()).collect()
    }

    pub fn origins(&self) -> Vec<String> {
        self.posted.borrow().iter().map(|(_, o)| o.clone()).collect()
    }

    pub fn clear(&self) {
        self.posted.borrow_mut().clear();
    }
}

impl MessageChannel for RecordingChannel {
    fn post(
        &self,
        message: &OutboundMessage,
        target_origin: &TargetOrigin,
    ) -> Result<(), ChannelError> {
        self.posted
            .borrow_mut()
            .push((message.clone(), target_origin.to_string()));
        Ok(())
    }
}

pub fn bridge_with(
    provider: &MockProvider,
    channel: &RecordingChannel,
) -> WalletBridge<MockProvider, RecordingChannel> {
    WalletBridge::new(
        Some(provider.clone()),
        channel.clone(),
        BridgeConfig::default(),
    )
}

pub fn connected(address: &str, balance: &str) -> OutboundMessage {
    OutboundMessage::WalletConnected {
        address: address.to_string(),
        balance: balance.to_string(),
    }
}

pub fn changed(address: &str, balance: &str) -> OutboundMessage {
    OutboundMessage::WalletChanged {
        address: address.to_string(),
        balance: balance.to_string(),
    }
}

pub fn wallet_error(error: &str) -> OutboundMessage {
    OutboundMessage::WalletError {
        error: error.to_string(),
    }
}
