// src/position.rs
use crate::abi::Decoder;
use crate::error::Result;
use crate::units::format_ether;
use crate::wallet::Address;
use rust_decimal::Decimal;

pub type PositionId = u64;

const SECONDS_PER_DAY: i64 = 86_400;

/// A staking position as stored by the contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub position_id: PositionId,
    pub wallet_address: Address,
    pub created_date: i64,
    pub unlock_date: i64,
    /// Interest scaled by 100 (700 = 7%)
    pub percent_interest: u64,
    pub wei_staked: u128,
    pub wei_interest: u128,
    pub open: bool,
}

impl Position {
    /// Decode the static tuple returned by `getPositionById`
    pub fn decode(data: &[u8]) -> Result<Self> {
        let d = Decoder::new(data);
        Ok(Self {
            position_id: d.uint64(0)?,
            wallet_address: d.address(1)?,
            created_date: d.int64(2)?,
            unlock_date: d.int64(3)?,
            percent_interest: d.uint64(4)?,
            wei_staked: d.uint(5)?,
            wei_interest: d.uint(6)?,
            open: d.boolean(7)?,
        })
    }

    pub fn view(&self, now: i64) -> PositionView {
        PositionView {
            position_id: self.position_id,
            percent_interest: Decimal::from(self.percent_interest) / Decimal::ONE_HUNDRED,
            days_remaining: days_remaining(self.unlock_date, now),
            ether_interest: format_ether(self.wei_interest),
            ether_staked: format_ether(self.wei_staked),
            open: self.open,
        }
    }
}

/// Display-ready snapshot of a position
#[derive(Debug, Clone, PartialEq)]
pub struct PositionView {
    pub position_id: PositionId,
    pub percent_interest: Decimal,
    pub days_remaining: i64,
    pub ether_interest: String,
    pub ether_staked: String,
    pub open: bool,
}

/// Whole days until `unlock_date`, rounded to nearest and never negative
pub fn days_remaining(unlock_date: i64, now: i64) -> i64 {
    let seconds = unlock_date.saturating_sub(now);
    if seconds <= 0 {
        return 0;
    }
    // round half up on a positive quotient
    seconds.saturating_add(SECONDS_PER_DAY / 2) / SECONDS_PER_DAY
}
