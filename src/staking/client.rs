// src/staking/client.rs
use crate::balance::{BalanceClient, BalanceSource};
use crate::config::tiers::StakingTier;
use crate::config::DashboardConfig;
use crate::contract::{RpcStakingContract, StakingContract};
use crate::error::{Result, StakingError};
use crate::position::{PositionId, PositionView};
use crate::transaction::TransactionReceipt;
use crate::units::EtherAmount;
use crate::wallet::{Address, WalletContext};
use futures_util::future::try_join_all;
use std::sync::Arc;

/// Talks to the contract and the balance service on behalf of the panel
#[derive(Clone)]
pub struct StakingService {
    contract: Arc<dyn StakingContract>,
    balances: Arc<dyn BalanceSource>,
    close_gas_limit: u64,
}

impl StakingService {
    pub fn new(
        contract: Arc<dyn StakingContract>,
        balances: Arc<dyn BalanceSource>,
        close_gas_limit: u64,
    ) -> Self {
        Self {
            contract,
            balances,
            close_gas_limit,
        }
    }

    /// Wire the JSON-RPC contract and the HTTP balance client for a wallet
    pub fn from_config(config: &DashboardConfig, wallet: &WalletContext) -> Result<Self> {
        let address = config.contract_address().ok_or_else(|| {
            StakingError::InvalidAddress(format!("contract address '{}'", config.contract_address))
        })?;
        let contract = RpcStakingContract::new(address, wallet, config.confirmation_policy());
        let balances = BalanceClient::new(&config.balance_service_url);
        Ok(Self::new(Arc::new(contract), Arc::new(balances), config.close_gas_limit))
    }

    pub async fn wallet_balance(&self, address: &Address) -> Result<u128> {
        let wei = self.balances.wallet_balance(address).await?;
        log::info!("Wallet {} balance: {} wei", address, wei);
        Ok(wei)
    }

    /// Fetch the owner's position ids, then every position concurrently
    pub async fn load_positions(&self, owner: &Address, now: i64) -> Result<Vec<PositionView>> {
        let ids = self.contract.position_ids_for_address(owner).await?;
        log::info!("Loading {} positions for {}", ids.len(), owner);

        let positions = try_join_all(ids.iter().map(|id| self.contract.position_by_id(*id))).await?;
        Ok(positions.iter().map(|p| p.view(now)).collect())
    }

    /// Submit `stakeEther` and wait for it to be mined
    pub async fn stake(&self, amount: EtherAmount, tier: &StakingTier) -> Result<TransactionReceipt> {
        log::info!("Staking {} ({})", amount, tier.label);
        let tx = self.contract.stake_ether(tier.staking_length, amount).await?;
        self.contract.wait(&tx).await
    }

    /// Re-read the position, then close it and wait for it to be mined
    pub async fn unstake(&self, position_id: PositionId) -> Result<TransactionReceipt> {
        let position = self.contract.position_by_id(position_id).await?;
        log::info!("Unstaking position {:?}", position);
        if !position.open {
            return Err(StakingError::PositionClosed(position_id));
        }

        let tx = self
            .contract
            .close_position(position_id, self.close_gas_limit)
            .await?;
        self.contract.wait(&tx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;
    use crate::rpc::EthRpcClient;
    use crate::transaction::TxHash;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::Barrier;

    /// Every position read waits until all of them are in flight
    struct BarrierContract {
        ids: Vec<PositionId>,
        barrier: Barrier,
    }

    impl BarrierContract {
        fn new(ids: Vec<PositionId>) -> Self {
            let barrier = Barrier::new(ids.len());
            Self { ids, barrier }
        }
    }

    #[async_trait]
    impl StakingContract for BarrierContract {
        async fn position_ids_for_address(&self, _owner: &Address) -> Result<Vec<PositionId>> {
            Ok(self.ids.clone())
        }

        async fn position_by_id(&self, position_id: PositionId) -> Result<Position> {
            self.barrier.wait().await;
            Ok(Position {
                position_id,
                wallet_address: Address::default(),
                created_date: 0,
                unlock_date: 0,
                percent_interest: 700,
                wei_staked: 1_000_000_000_000_000_000,
                wei_interest: 0,
                open: true,
            })
        }

        async fn stake_ether(&self, _staking_length: u64, _value: EtherAmount) -> Result<TxHash> {
            Err(StakingError::WalletNotConnected)
        }

        async fn close_position(&self, _position_id: PositionId, _gas_limit: u64) -> Result<TxHash> {
            Err(StakingError::WalletNotConnected)
        }

        async fn wait(&self, tx: &TxHash) -> Result<TransactionReceipt> {
            Err(StakingError::Reverted(tx.to_string()))
        }
    }

    struct NoBalance;

    #[async_trait]
    impl BalanceSource for NoBalance {
        async fn wallet_balance(&self, _address: &Address) -> Result<u128> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn test_positions_are_fetched_concurrently() {
        let contract = Arc::new(BarrierContract::new(vec![4, 7, 9]));
        let service = StakingService::new(contract, Arc::new(NoBalance), 300_000);

        let loaded = tokio::time::timeout(
            Duration::from_secs(5),
            service.load_positions(&Address::default(), 0),
        )
        .await
        .expect("position reads ran one at a time")
        .unwrap();

        let ids: Vec<PositionId> = loaded.iter().map(|p| p.position_id).collect();
        assert_eq!(ids, vec![4, 7, 9]);
    }

    #[test]
    fn test_from_config_rejects_bad_contract_address() {
        let config = DashboardConfig {
            contract_address: "0x123".to_string(),
            ..Default::default()
        };
        let wallet = WalletContext::disconnected(EthRpcClient::new(&config.rpc_url));
        let err = StakingService::from_config(&config, &wallet).err().unwrap();
        assert!(matches!(err, StakingError::InvalidAddress(_)));
    }

    #[test]
    fn test_from_config_defaults() {
        let config = DashboardConfig::default();
        let wallet = WalletContext::disconnected(EthRpcClient::new(&config.rpc_url));
        let service = StakingService::from_config(&config, &wallet).unwrap();
        assert_eq!(service.close_gas_limit, 300_000);
    }
}
