// src/wallet.rs
use crate::error::{Result, StakingError};
use crate::rpc::EthRpcClient;
use crate::signing::TransactionSigner;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// 20-byte account or contract address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl FromStr for Address {
    type Err = StakingError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let body = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if body.len() != 40 {
            return Err(StakingError::InvalidAddress(format!(
                "expected 40 hex characters, got {}",
                body.len()
            )));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(body, &mut bytes)
            .map_err(|e| StakingError::InvalidAddress(format!("{}: {}", trimmed, e)))?;
        Ok(Address(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Shortened form for headers: `0x1234…abcd`
pub fn short_address(address: &Address) -> String {
    let full = address.to_string();
    format!("{}…{}", &full[..6], &full[full.len() - 4..])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
}

/// Connection status, address, read provider and write signer.
///
/// Built by the application wiring and handed to the panel through context;
/// the panel never creates or mutates one.
#[derive(Clone)]
pub struct WalletContext {
    pub status: ConnectionStatus,
    pub address: Option<Address>,
    pub provider: EthRpcClient,
    pub signer: Option<Arc<dyn TransactionSigner>>,
}

impl WalletContext {
    pub fn disconnected(provider: EthRpcClient) -> Self {
        Self {
            status: ConnectionStatus::Disconnected,
            address: None,
            provider,
            signer: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected && self.address.is_some()
    }

    /// Ask the signer for its account and return a connected context
    pub async fn connect(provider: EthRpcClient, signer: Arc<dyn TransactionSigner>) -> Result<Self> {
        if !signer.is_available().await {
            return Err(StakingError::WalletNotConnected);
        }
        let address = signer.get_address().await?;
        log::info!("Wallet connected via {}: {}", signer.get_name(), address);
        Ok(Self {
            status: ConnectionStatus::Connected,
            address: Some(address),
            provider,
            signer: Some(signer),
        })
    }
}

impl PartialEq for WalletContext {
    fn eq(&self, other: &Self) -> bool {
        self.status == other.status
            && self.address == other.address
            && self.provider == other.provider
            && self.signer.is_some() == other.signer.is_some()
    }
}

impl fmt::Debug for WalletContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletContext")
            .field("status", &self.status)
            .field("address", &self.address)
            .field("provider", &self.provider)
            .field("signer", &self.signer.as_ref().map(|s| s.get_name()))
            .finish()
    }
}
