// src/staking/types.rs
//! Panel state and its transitions. Everything here is synchronous; the async
//! side lives in `actions`.

use crate::config::tiers::UNSTAKE_RETURN_MULTIPLIER;
use crate::error::{Result, StakingError};
use crate::position::{PositionId, PositionView};
use crate::units::format_balance;
use rust_decimal::Decimal;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    Stake,
    Unstake,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RequestState {
    Idle,
    Loading,
    Error(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct PanelState {
    pub tab: Tab,
    pub request: RequestState,
    pub stake_input: String,
    pub unstake_input: String,
    /// Contract order, replaced wholesale on each load
    pub positions: Vec<PositionView>,
    pub selected_position: Option<PositionId>,
    pub wallet_balance: Option<u128>,
    load_generation: u64,
    /// Error raised by a background fetch while a transaction held `Loading`
    deferred_error: Option<String>,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            tab: Tab::Stake,
            request: RequestState::Idle,
            stake_input: String::new(),
            unstake_input: String::new(),
            positions: Vec::new(),
            selected_position: None,
            wallet_balance: None,
            load_generation: 0,
            deferred_error: None,
        }
    }
}

impl PanelState {
    /// Returns `true` only on a real transition
    pub fn switch_tab(&mut self, tab: Tab) -> bool {
        if self.tab == tab {
            return false;
        }
        log::info!("Switching tab {:?} -> {:?}", self.tab, tab);
        self.tab = tab;
        true
    }

    pub fn is_loading(&self) -> bool {
        self.request == RequestState::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.request {
            RequestState::Error(msg) => Some(msg.as_str()),
            _ => None,
        }
    }

    /// Last error wins. A transaction in flight keeps `Loading`; the error shows once it ends.
    pub fn set_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::error!("{}", message);
        if self.is_loading() {
            self.deferred_error = Some(message);
        } else {
            self.request = RequestState::Error(message);
        }
    }

    /// Enter `Loading` for a transaction; refuses while one is already running
    pub fn begin_transaction(&mut self) -> Result<()> {
        if self.is_loading() {
            return Err(StakingError::Busy);
        }
        self.request = RequestState::Loading;
        self.deferred_error = None;
        Ok(())
    }

    /// Always leaves `Loading`, whatever the outcome
    pub fn finish_transaction(&mut self, outcome: std::result::Result<(), String>) {
        self.request = match (outcome, self.deferred_error.take()) {
            (Err(message), _) => {
                log::error!("{}", message);
                RequestState::Error(message)
            }
            (Ok(()), Some(deferred)) => RequestState::Error(deferred),
            (Ok(()), None) => RequestState::Idle,
        };
    }

    /// Start a load cycle; only the newest cycle may apply its result
    pub fn begin_position_load(&mut self) -> u64 {
        self.load_generation += 1;
        self.load_generation
    }

    /// Replace the list if `generation` is still current
    pub fn apply_positions(&mut self, generation: u64, positions: Vec<PositionView>) -> bool {
        if generation != self.load_generation {
            log::info!(
                "Dropping stale position load {} (current {})",
                generation,
                self.load_generation
            );
            return false;
        }
        self.positions = positions;
        if let Some(selected) = self.selected_position {
            if !self.is_open_position(selected) {
                self.selected_position = None;
            }
        }
        true
    }

    /// Report a failed load; a superseded load is dropped like a stale result
    pub fn fail_position_load(&mut self, generation: u64, message: impl Into<String>) -> bool {
        if generation != self.load_generation {
            log::info!(
                "Dropping stale position load failure {} (current {})",
                generation,
                self.load_generation
            );
            return false;
        }
        self.set_error(message);
        true
    }

    fn is_open_position(&self, position_id: PositionId) -> bool {
        self.positions
            .iter()
            .any(|p| p.position_id == position_id && p.open)
    }

    /// Select an open, loaded position as the unstake target
    pub fn select_position(&mut self, position_id: PositionId) -> bool {
        if self.is_open_position(position_id) {
            self.selected_position = Some(position_id);
            true
        } else {
            false
        }
    }

    /// The explicit selection, else the first open position in list order
    pub fn unstake_target(&self) -> Result<PositionId> {
        if let Some(selected) = self.selected_position {
            if self.is_open_position(selected) {
                return Ok(selected);
            }
        }
        self.open_positions()
            .next()
            .map(|p| p.position_id)
            .ok_or(StakingError::NoOpenPosition)
    }

    pub fn open_positions(&self) -> impl Iterator<Item = &PositionView> {
        self.positions.iter().filter(|p| p.open)
    }

    pub fn set_balance(&mut self, wei: u128) {
        self.wallet_balance = Some(wei);
    }

    pub fn balance_display(&self) -> String {
        format_balance(self.wallet_balance.unwrap_or(0))
    }

    /// "You Receive" on the unstake tab; `None` for empty, zero or malformed input
    pub fn receive_estimate(&self) -> Option<Decimal> {
        let value = Decimal::from_str(self.unstake_input.trim()).ok()?;
        if value.is_zero() {
            return None;
        }
        let (num, scale) = UNSTAKE_RETURN_MULTIPLIER;
        value.checked_mul(Decimal::new(num, scale)).map(|v| v.normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(position_id: PositionId, open: bool) -> PositionView {
        PositionView {
            position_id,
            percent_interest: Decimal::new(7, 0),
            days_remaining: 10,
            ether_interest: "0.1".to_string(),
            ether_staked: "1.0".to_string(),
            open,
        }
    }

    #[test]
    fn test_tab_toggle() {
        let mut state = PanelState::default();
        assert_eq!(state.tab, Tab::Stake);
        assert!(!state.switch_tab(Tab::Stake));
        assert!(state.switch_tab(Tab::Unstake));
        assert_eq!(state.tab, Tab::Unstake);
        assert!(state.switch_tab(Tab::Stake));
        assert_eq!(state.tab, Tab::Stake);
    }

    #[test]
    fn test_unstake_targets_first_open() {
        let mut state = PanelState::default();
        let generation = state.begin_position_load();
        state.apply_positions(generation, vec![view(5, true), view(6, false)]);
        assert_eq!(state.unstake_target(), Ok(5));

        let generation = state.begin_position_load();
        state.apply_positions(generation, vec![view(6, false)]);
        assert_eq!(state.unstake_target(), Err(StakingError::NoOpenPosition));
    }

    #[test]
    fn test_explicit_selection_wins_and_is_dropped_when_closed() {
        let mut state = PanelState::default();
        let generation = state.begin_position_load();
        state.apply_positions(generation, vec![view(3, true), view(4, false), view(8, true)]);

        assert!(!state.select_position(4));
        assert!(!state.select_position(99));
        assert!(state.select_position(8));
        assert_eq!(state.unstake_target(), Ok(8));

        let generation = state.begin_position_load();
        state.apply_positions(generation, vec![view(3, true), view(8, false)]);
        assert_eq!(state.selected_position, None);
        assert_eq!(state.unstake_target(), Ok(3));
    }

    #[test]
    fn test_stale_load_is_discarded() {
        let mut state = PanelState::default();
        let first = state.begin_position_load();
        let second = state.begin_position_load();

        assert!(state.apply_positions(second, vec![view(2, true)]));
        assert!(!state.apply_positions(first, vec![view(1, true), view(1, true)]));
        assert_eq!(state.positions, vec![view(2, true)]);
    }

    #[test]
    fn test_stale_load_failure_is_discarded() {
        let mut state = PanelState::default();
        let first = state.begin_position_load();
        let second = state.begin_position_load();

        assert!(state.apply_positions(second, vec![view(2, true)]));
        assert!(!state.fail_position_load(first, "Failed to load positions: boom"));
        assert_eq!(state.error(), None);
        assert_eq!(state.positions, vec![view(2, true)]);

        assert!(state.fail_position_load(second, "Failed to load positions: boom"));
        assert_eq!(state.error(), Some("Failed to load positions: boom"));
    }

    #[test]
    fn test_loads_replace_instead_of_append() {
        let mut state = PanelState::default();
        for _ in 0..3 {
            let generation = state.begin_position_load();
            state.apply_positions(generation, vec![view(1, true), view(2, true)]);
        }
        assert_eq!(state.positions.len(), 2);
    }

    #[test]
    fn test_transaction_lifecycle() {
        let mut state = PanelState::default();
        state.set_error("old");
        state.begin_transaction().unwrap();
        assert!(state.is_loading());
        assert_eq!(state.begin_transaction(), Err(StakingError::Busy));

        state.finish_transaction(Err("Failed to stake: boom".to_string()));
        assert_eq!(state.error(), Some("Failed to stake: boom"));

        state.begin_transaction().unwrap();
        state.finish_transaction(Ok(()));
        assert_eq!(state.request, RequestState::Idle);
    }

    #[test]
    fn test_background_error_during_transaction_is_deferred() {
        let mut state = PanelState::default();
        state.begin_transaction().unwrap();
        state.set_error("Failed to fetch wallet balance");
        assert!(state.is_loading());

        state.finish_transaction(Ok(()));
        assert_eq!(state.error(), Some("Failed to fetch wallet balance"));
    }

    #[test]
    fn test_receive_estimate() {
        let mut state = PanelState::default();
        assert_eq!(state.receive_estimate(), None);
        state.unstake_input = "0".to_string();
        assert_eq!(state.receive_estimate(), None);
        state.unstake_input = "junk".to_string();
        assert_eq!(state.receive_estimate(), None);
        state.unstake_input = "2".to_string();
        assert_eq!(state.receive_estimate(), Some(Decimal::from_str("2.14").unwrap()));
    }

    #[test]
    fn test_balance_display() {
        let mut state = PanelState::default();
        assert_eq!(state.balance_display(), "0");
        state.set_balance(1_000_000_000_000_000_000);
        assert_eq!(state.balance_display(), "1");
    }
}
