// src/staking/actions.rs
//! The panel's user-facing actions. Each one catches its own failure and turns
//! it into the panel's error message; nothing propagates past the panel.

use crate::config::tiers::FLEXIBLE_TIER;
use crate::error::StakingError;
use crate::staking::client::StakingService;
use crate::staking::types::{PanelState, Tab};
use crate::units::EtherAmount;
use crate::wallet::WalletContext;
use dioxus::prelude::*;

pub const BALANCE_ERROR: &str = "Failed to fetch wallet balance";

/// Somewhere the panel state lives: a Dioxus signal in the app, a plain value in tests
pub trait PanelCell {
    fn update<R>(&mut self, f: impl FnOnce(&mut PanelState) -> R) -> R;
    fn inspect<R>(&self, f: impl FnOnce(&PanelState) -> R) -> R;
}

impl PanelCell for PanelState {
    fn update<R>(&mut self, f: impl FnOnce(&mut PanelState) -> R) -> R {
        f(self)
    }

    fn inspect<R>(&self, f: impl FnOnce(&PanelState) -> R) -> R {
        f(self)
    }
}

impl PanelCell for Signal<PanelState> {
    fn update<R>(&mut self, f: impl FnOnce(&mut PanelState) -> R) -> R {
        let mut state = self.write();
        f(&mut *state)
    }

    fn inspect<R>(&self, f: impl FnOnce(&PanelState) -> R) -> R {
        let state = self.read();
        f(&*state)
    }
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Fetch the connected wallet's balance; on failure keep the previous one
pub async fn fetch_balance(service: &StakingService, wallet: &WalletContext, cell: &mut impl PanelCell) {
    let Some(address) = wallet.address.filter(|_| wallet.is_connected()) else {
        return;
    };

    match service.wallet_balance(&address).await {
        Ok(wei) => cell.update(|s| s.set_balance(wei)),
        Err(e) => {
            log::error!("Error fetching wallet balance: {}", e);
            cell.update(|s| s.set_error(BALANCE_ERROR));
        }
    }
}

/// Reload the position list; only the newest of overlapping loads is kept
pub async fn refresh_positions(service: &StakingService, wallet: &WalletContext, cell: &mut impl PanelCell) {
    let Some(owner) = wallet.address.filter(|_| wallet.is_connected()) else {
        log::info!("No wallet connected, skipping position refresh");
        return;
    };

    let generation = cell.update(|s| s.begin_position_load());
    match service.load_positions(&owner, now()).await {
        Ok(positions) => {
            cell.update(|s| s.apply_positions(generation, positions));
        }
        Err(e) => {
            cell.update(|s| s.fail_position_load(generation, format!("Failed to load positions: {}", e)));
        }
    }
}

/// Switch tabs; a real transition refreshes the positions
pub async fn switch_tab(
    service: &StakingService,
    wallet: &WalletContext,
    cell: &mut impl PanelCell,
    tab: Tab,
) -> bool {
    if !cell.update(|s| s.switch_tab(tab)) {
        return false;
    }
    refresh_positions(service, wallet, cell).await;
    true
}

pub async fn stake(service: &StakingService, wallet: &WalletContext, cell: &mut impl PanelCell) {
    if let Err(e) = cell.update(|s| s.begin_transaction()) {
        log::warn!("Stake ignored: {}", e);
        return;
    }

    let input = cell.inspect(|s| s.stake_input.clone());
    let result = async {
        if !wallet.is_connected() {
            return Err(StakingError::WalletNotConnected);
        }
        let amount = EtherAmount::parse(&input)?;
        service.stake(amount, &FLEXIBLE_TIER).await
    }
    .await;

    match result {
        Ok(receipt) => {
            log::info!("Stake confirmed: {}", receipt.transaction_hash);
            refresh_positions(service, wallet, cell).await;
            cell.update(|s| s.finish_transaction(Ok(())));
        }
        Err(e) => {
            log::error!("Staking error: {}", e);
            cell.update(|s| s.finish_transaction(Err(format!("Failed to stake: {}", e))));
        }
    }
}

pub async fn unstake(service: &StakingService, wallet: &WalletContext, cell: &mut impl PanelCell) {
    let position_id = match cell.inspect(|s| s.unstake_target()) {
        Ok(id) => id,
        Err(e) => {
            cell.update(|s| s.set_error(e.to_string()));
            return;
        }
    };

    if let Err(e) = cell.update(|s| s.begin_transaction()) {
        log::warn!("Unstake ignored: {}", e);
        return;
    }

    let result = async {
        if !wallet.is_connected() {
            return Err(StakingError::WalletNotConnected);
        }
        service.unstake(position_id).await
    }
    .await;

    match result {
        Ok(receipt) => {
            log::info!("Position {} closed in {}", position_id, receipt.transaction_hash);
            refresh_positions(service, wallet, cell).await;
            cell.update(|s| s.finish_transaction(Ok(())));
        }
        Err(e) => {
            log::error!("Unstaking error: {}", e);
            cell.update(|s| s.finish_transaction(Err(format!("Failed to unstake: {}", e))));
        }
    }
}
