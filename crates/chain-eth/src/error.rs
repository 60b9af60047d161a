use thiserror::Error;

/// EVM primitive errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EthError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("invalid chain id: {0}")]
    InvalidChainId(String),

    #[error("amount overflows 256 bits")]
    Overflow,
}
