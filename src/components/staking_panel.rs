use dioxus::prelude::*;
use std::sync::Arc;
use crate::components::PositionList;
use crate::config::tiers::{EXCHANGE_RATE_LABEL, FLEXIBLE_TIER};
use crate::config::DashboardConfig;
use crate::staking::actions;
use crate::staking::{PanelState, StakingService, Tab};
use crate::wallet::WalletContext;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Action {
    SwitchTab(Tab),
    Stake,
    Unstake,
}

/// Build a service against the current wallet snapshot and run one action on it
fn run_action(
    config: Arc<DashboardConfig>,
    wallet: Signal<WalletContext>,
    mut state: Signal<PanelState>,
    action: Action,
) {
    spawn(async move {
        let context = wallet.peek().clone();
        let service = match StakingService::from_config(&config, &context) {
            Ok(service) => service,
            Err(e) => {
                log::error!("Cannot run {:?}: {}", action, e);
                let mut panel = state.write();
                if let Action::SwitchTab(tab) = action {
                    panel.switch_tab(tab);
                }
                panel.set_error(e.to_string());
                return;
            }
        };

        match action {
            Action::SwitchTab(tab) => {
                actions::switch_tab(&service, &context, &mut state, tab).await;
            }
            Action::Stake => actions::stake(&service, &context, &mut state).await,
            Action::Unstake => actions::unstake(&service, &context, &mut state).await,
        }
    });
}

#[component]
pub fn StakingPanel() -> Element {
    let config = use_context::<Arc<DashboardConfig>>();
    let wallet = use_context::<Signal<WalletContext>>();
    let mut state = use_signal(PanelState::default);

    // Balance follows the wallet: refetch whenever the connection changes
    let balance_config = config.clone();
    use_effect(move || {
        let context = wallet();
        if !context.is_connected() {
            return;
        }
        let config = balance_config.clone();
        spawn(async move {
            match StakingService::from_config(&config, &context) {
                Ok(service) => actions::fetch_balance(&service, &context, &mut state).await,
                Err(e) => state.write().set_error(e.to_string()),
            }
        });
    });

    let panel = state();
    let loading = panel.is_loading();
    let receive = panel
        .receive_estimate()
        .map(|value| value.to_string())
        .unwrap_or_default();

    let stake_config = config.clone();
    let unstake_config = config.clone();
    let tab_config = config.clone();
    let tab_config_unstake = config.clone();

    rsx! {
        section {
            class: "staking-info-section",
            section {
                class: "staking-info",
                div {
                    class: "tabs",
                    button {
                        class: if panel.tab == Tab::Stake { "tab active" } else { "tab" },
                        onclick: move |_| run_action(tab_config.clone(), wallet, state, Action::SwitchTab(Tab::Stake)),
                        "Stake"
                    }
                    button {
                        class: if panel.tab == Tab::Unstake { "tab active" } else { "tab" },
                        onclick: move |_| run_action(tab_config_unstake.clone(), wallet, state, Action::SwitchTab(Tab::Unstake)),
                        "Unstake"
                    }
                }

                if panel.tab == Tab::Stake {
                    div {
                        class: "staking-box",
                        div {
                            class: "staking-box-header",
                            span { "Flexible Staking" }
                            span { class: "apy-label", "{FLEXIBLE_TIER.apy_label}" }
                        }
                        input {
                            class: "input-field",
                            r#type: "number",
                            placeholder: "0.0",
                            value: "{panel.stake_input}",
                            disabled: loading,
                            oninput: move |evt| state.write().stake_input = evt.value(),
                        }
                        div { class: "staking-detail", "Balance: {panel.balance_display()}" }
                        div { class: "staking-detail", "Exchange Rate: {EXCHANGE_RATE_LABEL}" }
                        button {
                            class: "stake-btn",
                            disabled: loading,
                            onclick: move |_| run_action(stake_config.clone(), wallet, state, Action::Stake),
                            if loading { "Staking..." } else { "STAKE" }
                        }
                    }
                } else {
                    div {
                        class: "staking-box",
                        input {
                            class: "input-field",
                            r#type: "number",
                            placeholder: "0.0",
                            value: "{panel.unstake_input}",
                            disabled: loading,
                            oninput: move |evt| state.write().unstake_input = evt.value(),
                        }
                        div {
                            class: "staking-detail",
                            "Staked: "
                            for position in panel.open_positions() {
                                span {
                                    key: "{position.position_id}",
                                    class: "staked-amount",
                                    "{position.ether_staked} ETH"
                                }
                            }
                        }
                        div { class: "staking-detail", "You Receive: {receive}" }
                        button {
                            class: "stake-btn",
                            disabled: loading,
                            onclick: move |_| run_action(unstake_config.clone(), wallet, state, Action::Unstake),
                            if loading { "Unstaking..." } else { "UNSTAKE" }
                        }
                    }
                }

                PositionList {
                    positions: panel.positions.clone(),
                    selected: panel.selected_position,
                    onselect: move |id| {
                        state.write().select_position(id);
                    },
                }

                if loading {
                    p { class: "loading-notice", "Transaction in progress..." }
                }
                if let Some(error) = panel.error() {
                    p { class: "error-message", "{error}" }
                }
            }
        }
    }
}
