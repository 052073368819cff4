pub mod dashboard;
pub mod locked_staking;
pub mod position_list;
pub mod staking_panel;
pub mod stats_panel;

pub use dashboard::Dashboard;
pub use locked_staking::LockedStaking;
pub use position_list::PositionList;
pub use staking_panel::StakingPanel;
pub use stats_panel::StatsPanel;
