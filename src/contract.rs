// src/contract.rs
use crate::abi::{encode_call, Decoder, Token};
use crate::error::{Result, StakingError};
use crate::position::{Position, PositionId};
use crate::rpc::EthRpcClient;
use crate::signing::TransactionSigner;
use crate::transaction::{
    wait_for_confirmation, ConfirmationPolicy, TransactionReceipt, TransactionRequest, TxHash,
};
use crate::units::{to_quantity, EtherAmount};
use crate::wallet::{Address, WalletContext};
use async_trait::async_trait;
use std::sync::Arc;

const GET_POSITION_IDS: &str = "getPositionIdsForAddress(address)";
const GET_POSITION_BY_ID: &str = "getPositionById(uint256)";
const STAKE_ETHER: &str = "stakeEther(uint256)";
const CLOSE_POSITION: &str = "closePosition(uint256)";

/// The fixed method set the dashboard uses on the staking contract
#[async_trait]
pub trait StakingContract: Send + Sync {
    async fn position_ids_for_address(&self, owner: &Address) -> Result<Vec<PositionId>>;

    async fn position_by_id(&self, position_id: PositionId) -> Result<Position>;

    /// Payable; `staking_length` selects the contract's interest tier
    async fn stake_ether(&self, staking_length: u64, value: EtherAmount) -> Result<TxHash>;

    async fn close_position(&self, position_id: PositionId, gas_limit: u64) -> Result<TxHash>;

    /// Resolve once the transaction is mined successfully
    async fn wait(&self, tx: &TxHash) -> Result<TransactionReceipt>;
}

/// JSON-RPC backed contract: reads go to the provider, writes to the signer
pub struct RpcStakingContract {
    address: Address,
    provider: EthRpcClient,
    signer: Option<Arc<dyn TransactionSigner>>,
    from: Option<Address>,
    confirmation: ConfirmationPolicy,
}

impl RpcStakingContract {
    pub fn new(address: Address, wallet: &WalletContext, confirmation: ConfirmationPolicy) -> Self {
        Self {
            address,
            provider: wallet.provider.clone(),
            signer: wallet.signer.clone(),
            from: wallet.address,
            confirmation,
        }
    }

    fn write_request(&self, data: Vec<u8>, value: Option<u128>, gas: Option<u64>) -> Result<TransactionRequest> {
        let from = self.from.ok_or(StakingError::WalletNotConnected)?;
        Ok(TransactionRequest {
            from,
            to: self.address,
            data: format!("0x{}", hex::encode(data)),
            value: value.map(to_quantity),
            gas: gas.map(|g| to_quantity(g as u128)),
        })
    }

    async fn submit(&self, tx: TransactionRequest) -> Result<TxHash> {
        let signer = self.signer.as_ref().ok_or(StakingError::WalletNotConnected)?;
        signer.send_transaction(&tx).await
    }
}

#[async_trait]
impl StakingContract for RpcStakingContract {
    async fn position_ids_for_address(&self, owner: &Address) -> Result<Vec<PositionId>> {
        let data = encode_call(GET_POSITION_IDS, &[Token::Address(*owner)]);
        let raw = self.provider.call(&self.address, &data).await?;
        Decoder::new(&raw)
            .uint_array(0)?
            .into_iter()
            .map(|id| {
                PositionId::try_from(id)
                    .map_err(|_| StakingError::Decode(format!("position id {} out of range", id)))
            })
            .collect()
    }

    async fn position_by_id(&self, position_id: PositionId) -> Result<Position> {
        let data = encode_call(GET_POSITION_BY_ID, &[Token::Uint(position_id as u128)]);
        let raw = self.provider.call(&self.address, &data).await?;
        Position::decode(&raw)
    }

    async fn stake_ether(&self, staking_length: u64, value: EtherAmount) -> Result<TxHash> {
        let data = encode_call(STAKE_ETHER, &[Token::Uint(staking_length as u128)]);
        let tx = self.write_request(data, Some(value.wei()), None)?;
        log::info!("stakeEther({}) with {}", staking_length, value);
        self.submit(tx).await
    }

    async fn close_position(&self, position_id: PositionId, gas_limit: u64) -> Result<TxHash> {
        let data = encode_call(CLOSE_POSITION, &[Token::Uint(position_id as u128)]);
        let tx = self.write_request(data, None, Some(gas_limit))?;
        log::info!("closePosition({}) with gas limit {}", position_id, gas_limit);
        self.submit(tx).await
    }

    async fn wait(&self, tx: &TxHash) -> Result<TransactionReceipt> {
        wait_for_confirmation(&self.provider, tx, &self.confirmation).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::EthRpcClient;
    use std::str::FromStr;
    use std::sync::Mutex;

    struct RecordingSigner {
        sent: Mutex<Vec<TransactionRequest>>,
    }

    #[async_trait]
    impl TransactionSigner for RecordingSigner {
        async fn get_address(&self) -> Result<Address> {
            Ok(Address([0x11; 20]))
        }

        async fn send_transaction(&self, tx: &TransactionRequest) -> Result<TxHash> {
            self.sent.lock().unwrap().push(tx.clone());
            Ok(TxHash::new("0xfeed"))
        }

        fn get_name(&self) -> String {
            "recording".to_string()
        }

        async fn is_available(&self) -> bool {
            true
        }
    }

    fn contract_with(signer: Arc<RecordingSigner>) -> RpcStakingContract {
        let wallet = WalletContext {
            status: crate::wallet::ConnectionStatus::Connected,
            address: Some(Address([0x11; 20])),
            provider: EthRpcClient::new("http://127.0.0.1:8545"),
            signer: Some(signer),
        };
        let address = Address::from_str("0x5fbdb2315678afecb367f032d93f642f64180aa3").unwrap();
        RpcStakingContract::new(address, &wallet, ConfirmationPolicy::default())
    }

    #[tokio::test]
    async fn test_stake_carries_exact_value_and_tier() {
        let signer = Arc::new(RecordingSigner { sent: Mutex::new(Vec::new()) });
        let contract = contract_with(signer.clone());

        let amount = EtherAmount::parse("2.5").unwrap();
        let hash = contract.stake_ether(0, amount).await.unwrap();
        assert_eq!(hash.as_str(), "0xfeed");

        let sent = signer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].value.as_deref(), Some("0x22b1c8c1227a0000"));
        assert_eq!(sent[0].gas, None);
        assert!(sent[0].data.starts_with(&format!("0x{}", hex::encode(crate::abi::selector(STAKE_ETHER)))));
        assert_eq!(sent[0].data.len(), 2 + 2 * (4 + 32));
    }

    #[tokio::test]
    async fn test_close_position_sets_gas_limit() {
        let signer = Arc::new(RecordingSigner { sent: Mutex::new(Vec::new()) });
        let contract = contract_with(signer.clone());

        contract.close_position(5, 300_000).await.unwrap();

        let sent = signer.sent.lock().unwrap();
        assert_eq!(sent[0].gas.as_deref(), Some("0x493e0"));
        assert_eq!(sent[0].value, None);
        assert!(sent[0].data.ends_with("05"));
    }

    #[tokio::test]
    async fn test_writes_need_a_wallet() {
        let wallet = WalletContext::disconnected(EthRpcClient::new("http://127.0.0.1:8545"));
        let contract = RpcStakingContract::new(Address::default(), &wallet, ConfirmationPolicy::default());
        let err = contract.close_position(1, 300_000).await.unwrap_err();
        assert_eq!(err, StakingError::WalletNotConnected);
    }
}
