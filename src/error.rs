// src/error.rs
use thiserror::Error;

/// Everything that can go wrong between the panel and its collaborators
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StakingError {
    #[error("network error: {0}")]
    Network(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("transaction {0} reverted")]
    Reverted(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("No open positions to unstake")]
    NoOpenPosition,

    #[error("position {0} is already closed")]
    PositionClosed(u64),

    #[error("wallet not connected")]
    WalletNotConnected,

    #[error("timed out waiting for transaction {0}")]
    Timeout(String),

    #[error("another transaction is already in progress")]
    Busy,
}

impl From<reqwest::Error> for StakingError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            StakingError::Decode(e.to_string())
        } else {
            StakingError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for StakingError {
    fn from(e: serde_json::Error) -> Self {
        StakingError::Decode(e.to_string())
    }
}

impl From<hex::FromHexError> for StakingError {
    fn from(e: hex::FromHexError) -> Self {
        StakingError::Decode(format!("bad hex: {}", e))
    }
}

pub type Result<T> = std::result::Result<T, StakingError>;
