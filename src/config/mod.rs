pub mod tiers;

use crate::transaction::ConfirmationPolicy;
use crate::wallet::Address;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";
pub const DEFAULT_WALLET_RPC_URL: &str = "http://127.0.0.1:1248";
pub const DEFAULT_BALANCE_SERVICE_URL: &str = "https://ethereum-staking-dapp-backend.onrender.com";
pub const DEFAULT_CLOSE_GAS_LIMIT: u64 = 300_000;
pub const DEFAULT_RECEIPT_POLL_MS: u64 = 2_000;
/// Floor for the receipt poll interval
pub const MIN_RECEIPT_POLL_MS: u64 = 250;

/// Endpoints and knobs for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Deployed staking contract
    pub contract_address: String,
    /// Read provider for `eth_call` and receipts
    pub rpc_url: String,
    /// Wallet endpoint that signs and sends
    pub wallet_rpc_url: String,
    /// Origin of the balance lookup service
    pub balance_service_url: String,
    /// Gas limit override for `closePosition`
    pub close_gas_limit: u64,
    pub receipt_poll_ms: u64,
    /// Unset waits for confirmation indefinitely
    pub confirmation_timeout_secs: Option<u64>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            contract_address: DEFAULT_CONTRACT_ADDRESS.to_string(),
            rpc_url: DEFAULT_RPC_URL.to_string(),
            wallet_rpc_url: DEFAULT_WALLET_RPC_URL.to_string(),
            balance_service_url: DEFAULT_BALANCE_SERVICE_URL.to_string(),
            close_gas_limit: DEFAULT_CLOSE_GAS_LIMIT,
            receipt_poll_ms: DEFAULT_RECEIPT_POLL_MS,
            confirmation_timeout_secs: None,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            contract_address: lookup("STAKING_CONTRACT_ADDRESS").unwrap_or(defaults.contract_address),
            rpc_url: lookup("STAKING_RPC_URL").unwrap_or(defaults.rpc_url),
            wallet_rpc_url: lookup("STAKING_WALLET_RPC_URL").unwrap_or(defaults.wallet_rpc_url),
            balance_service_url: lookup("STAKING_BALANCE_SERVICE_URL").unwrap_or(defaults.balance_service_url),
            close_gas_limit: lookup("STAKING_CLOSE_GAS_LIMIT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.close_gas_limit),
            receipt_poll_ms: lookup("STAKING_RECEIPT_POLL_MS")
                .and_then(|v| v.parse::<u64>().ok())
                .map(|ms| ms.max(MIN_RECEIPT_POLL_MS))
                .unwrap_or(defaults.receipt_poll_ms),
            confirmation_timeout_secs: lookup("STAKING_CONFIRMATION_TIMEOUT_SECS").and_then(|v| v.parse().ok()),
        }
    }

    pub fn contract_address(&self) -> Option<Address> {
        Address::from_str(&self.contract_address).ok()
    }

    /// Check the contract address parses
    pub fn is_valid(&self) -> bool {
        self.contract_address().is_some()
    }

    pub fn confirmation_policy(&self) -> ConfirmationPolicy {
        ConfirmationPolicy {
            poll_interval: Duration::from_millis(self.receipt_poll_ms.max(MIN_RECEIPT_POLL_MS)),
            timeout: self.confirmation_timeout_secs.map(Duration::from_secs),
        }
    }
}
