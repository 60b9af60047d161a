use std::fmt;
use std::str::FromStr;

use chain_eth::chains::{ChainDescriptor, MEGA_TESTNET};

use crate::error::ConfigError;

/// Origin the parent context must have for a posted message to be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetOrigin {
    /// `"*"`: any parent receives wallet data.
    Any,
    /// An exact `scheme://host[:port]` origin.
    Exact(String),
}

impl TargetOrigin {
    /// Parses `"*"` or an `http(s)://host[:port]` origin.
    pub fn parse(origin: &str) -> Result<Self, ConfigError> {
        let origin = origin.trim();
        if origin == "*" {
            return Ok(TargetOrigin::Any);
        }

        let invalid = |reason| ConfigError::InvalidOrigin(origin.to_string(), reason);

        let (scheme, rest) = origin
            .split_once("://")
            .ok_or_else(|| invalid("missing scheme"))?;
        if scheme != "http" && scheme != "https" {
            return Err(invalid("scheme must be http or https"));
        }
        if rest.contains(['/', '?', '#', '@']) {
            return Err(invalid("origin must not carry a path, query, fragment or credentials"));
        }

        let (host, port) = match rest.strip_prefix('[') {
            Some(bracketed) => {
                let (address, tail) = bracketed
                    .split_once(']')
                    .ok_or_else(|| invalid("unterminated IPv6 address"))?;
                if !address.chars().all(|c| c.is_ascii_hexdigit() || c == ':' || c == '.') {
                    return Err(invalid("malformed IPv6 address"));
                }
                let port = match tail {
                    "" => None,
                    tail => Some(
                        tail.strip_prefix(':')
                            .ok_or_else(|| invalid("unexpected text after IPv6 address"))?,
                    ),
                };
                (address, port)
            }
            None => match rest.rsplit_once(':') {
                Some((host, port)) => (host, Some(port)),
                None => (rest, None),
            },
        };

        if host.is_empty() {
            return Err(invalid("missing host"));
        }
        if !rest.starts_with('[') && host.contains(':') {
            return Err(invalid("IPv6 hosts must be bracketed"));
        }
        if let Some(port) = port {
            let numeric = !port.is_empty() && port.chars().all(|c| c.is_ascii_digit());
            if !numeric || port.parse::<u16>().is_err() {
                return Err(invalid("port must be a number from 0 to 65535"));
            }
        }

        Ok(TargetOrigin::Exact(origin.to_string()))
    }

    /// Value handed to `postMessage`.
    pub fn as_str(&self) -> &str {
        match self {
            TargetOrigin::Any => "*",
            TargetOrigin::Exact(origin) => origin,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, TargetOrigin::Any)
    }
}

impl FromStr for TargetOrigin {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TargetOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bridge settings. There are no files or environment variables; the host
/// page supplies the origin and the network is a compile-time constant.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub chain: &'static ChainDescriptor,
    pub target_origin: TargetOrigin,
}

impl BridgeConfig {
    pub fn new(target_origin: TargetOrigin) -> Self {
        Self {
            chain: &MEGA_TESTNET,
            target_origin,
        }
    }

    pub fn with_chain(mut self, chain: &'static ChainDescriptor) -> Self {
        self.chain = chain;
        self
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::new(TargetOrigin::Any)
    }
}
