use serde::Serialize;

use crate::error::EthError;

/// Native currency of an EVM network, as wallets display it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NativeCurrency {
    pub name: &'static str,
    pub symbol: &'static str,
    pub decimals: u8,
}

/// Definition of an EVM-compatible blockchain network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainDescriptor {
    pub chain_id: u64,
    pub display_name: &'static str,
    pub native_currency: NativeCurrency,
    /// RPC endpoints in order of preference.
    pub rpc_urls: &'static [&'static str],
    /// Block explorer base URLs in order of preference.
    pub explorer_urls: &'static [&'static str],
    pub is_testnet: bool,
}

/// Mega Testnet (chain ID 6342).
pub const MEGA_TESTNET: ChainDescriptor = ChainDescriptor {
    chain_id: 6342,
    display_name: "Mega Testnet",
    native_currency: NativeCurrency {
        name: "MegaETH",
        symbol: "MegaETH",
        decimals: 18,
    },
    rpc_urls: &["https://carrot.megaeth.com/rpc"],
    explorer_urls: &["https://megaexplorer.xyz"],
    is_testnet: true,
};

impl ChainDescriptor {
    /// Chain ID as the 0x-prefixed hex string EIP-1193 methods expect.
    pub fn chain_id_hex(&self) -> String {
        chain_id_hex(self.chain_id)
    }

    /// Returns true if `chain_id` (hex or decimal) names this chain.
    pub fn matches(&self, chain_id: &str) -> bool {
        parse_chain_id(chain_id).is_ok_and(|id| id == self.chain_id)
    }

    /// Text shown to the user when the wallet sits on another network.
    pub fn wrong_network_message(&self) -> String {
        format!("Please switch to {}", self.display_name)
    }

    /// Explorer page for an account, using the first explorer URL.
    pub fn explorer_address_url(&self, address: &str) -> Option<String> {
        self.explorer_urls
            .first()
            .map(|base| format!("{}/address/{address}", base.trim_end_matches('/')))
    }

    /// Explorer page for a transaction, using the first explorer URL.
    pub fn explorer_tx_url(&self, tx_hash: &str) -> Option<String> {
        self.explorer_urls
            .first()
            .map(|base| format!("{}/tx/{tx_hash}", base.trim_end_matches('/')))
    }

    /// Parameters for `wallet_addEthereumChain` (EIP-3085).
    pub fn add_chain_params(&self) -> AddChainParams {
        AddChainParams {
            chain_id: self.chain_id_hex(),
            chain_name: self.display_name.to_string(),
            native_currency: self.native_currency,
            rpc_urls: self.rpc_urls.iter().map(|u| u.to_string()).collect(),
            block_explorer_urls: self.explorer_urls.iter().map(|u| u.to_string()).collect(),
        }
    }
}

/// EIP-3085 `AddEthereumChainParameter`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddChainParams {
    pub chain_id: String,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

/// Formats a chain ID as a lowercase 0x-prefixed hex string.
pub fn chain_id_hex(chain_id: u64) -> String {
    format!("{chain_id:#x}")
}

/// Parses a chain ID given either as 0x-prefixed hex (any case) or as decimal.
pub fn parse_chain_id(value: &str) -> Result<u64, EthError> {
    let value = value.trim();
    let parsed = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex_part) => u64::from_str_radix(hex_part, 16),
        None => value.parse::<u64>(),
    };
    parsed.map_err(|_| EthError::InvalidChainId(value.to_string()))
}
