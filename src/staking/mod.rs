// src/staking/mod.rs
//! Staking panel core: state machine, contract/balance service and actions

pub mod actions;
mod client;
mod types;

pub use client::StakingService;
pub use types::*;
