// src/signing/mod.rs
use crate::error::Result;
use crate::transaction::{TransactionRequest, TxHash};
use crate::wallet::Address;
use async_trait::async_trait;

pub mod wallet_rpc;

pub use wallet_rpc::WalletRpcSigner;

/// Something that can sign and broadcast transactions for one account
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    /// Account the signer sends from
    async fn get_address(&self) -> Result<Address>;

    /// Sign and broadcast, returning the transaction hash
    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<TxHash>;

    /// Get a display name for the signing method
    fn get_name(&self) -> String;

    /// Check if the signer is available/connected
    async fn is_available(&self) -> bool;
}
