//! EVM chain primitives for the wallet bridge.
//!
//! This crate provides:
//! - The target network definition and its EIP-3085 `wallet_addEthereumChain` form
//! - Chain-id formatting and parsing for EIP-1193 requests and events
//! - Address validation and normalisation (EIP-55 aware)
//! - Conversion between smallest units (wei) and whole-token decimal strings

pub mod address;
pub mod chains;
pub mod error;
pub mod units;
