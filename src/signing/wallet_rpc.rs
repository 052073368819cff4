// src/signing/wallet_rpc.rs
use crate::error::{Result, StakingError};
use crate::rpc::EthRpcClient;
use crate::signing::TransactionSigner;
use crate::transaction::{TransactionRequest, TxHash};
use crate::wallet::Address;
use async_trait::async_trait;

/// Signer backed by a wallet's JSON-RPC endpoint (Frame, Clef, a dev node).
/// Keys never leave the wallet; we only ask it to send.
#[derive(Debug, Clone)]
pub struct WalletRpcSigner {
    client: EthRpcClient,
}

impl WalletRpcSigner {
    pub fn new(url: &str) -> Self {
        Self {
            client: EthRpcClient::new(url),
        }
    }
}

#[async_trait]
impl TransactionSigner for WalletRpcSigner {
    async fn get_address(&self) -> Result<Address> {
        let mut accounts = self.client.accounts().await?;
        if accounts.is_empty() {
            log::info!("No accounts exposed yet, requesting access from wallet");
            accounts = self.client.request_accounts().await?;
        }
        accounts.into_iter().next().ok_or(StakingError::WalletNotConnected)
    }

    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<TxHash> {
        log::info!("Submitting transaction from {} to {}", tx.from, tx.to);
        let hash = self.client.send_transaction(tx).await?;
        log::info!("Transaction submitted: {}", hash);
        Ok(hash)
    }

    fn get_name(&self) -> String {
        format!("Wallet RPC: {}", self.client.url())
    }

    async fn is_available(&self) -> bool {
        match self.client.chain_id().await {
            Ok(chain_id) => {
                log::info!("Wallet endpoint reachable, chain id {}", chain_id);
                true
            }
            Err(e) => {
                log::warn!("Wallet endpoint {} unavailable: {}", self.client.url(), e);
                false
            }
        }
    }
}
