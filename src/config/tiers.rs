/// A staking product shown on the dashboard
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StakingTier {
    pub label: &'static str,
    /// Argument passed to `stakeEther`
    pub staking_length: u64,
    pub apy_label: &'static str,
}

/// What the Stake button submits
pub const FLEXIBLE_TIER: StakingTier = StakingTier {
    label: "Flexible",
    staking_length: 0,
    apy_label: "7% APY",
};

pub const EXCHANGE_RATE_LABEL: &str = "1.03582967";

/// Multiplier behind the "You Receive" estimate on the unstake tab
pub const UNSTAKE_RETURN_MULTIPLIER: (i64, u32) = (107, 2);

/// Locked terms, display only
pub const LOCKED_TIERS: [StakingTier; 3] = [
    StakingTier { label: "Locked 30 days", staking_length: 30, apy_label: "8% APY" },
    StakingTier { label: "Locked 60 days", staking_length: 60, apy_label: "9% APY" },
    StakingTier { label: "Locked 90 days", staking_length: 90, apy_label: "12% APY" },
];
