use dioxus::prelude::*;
use std::sync::Arc;
use crate::components::{LockedStaking, StakingPanel, StatsPanel};
use crate::config::DashboardConfig;
use crate::rpc::EthRpcClient;
use crate::signing::{TransactionSigner, WalletRpcSigner};
use crate::wallet::{short_address, ConnectionStatus, WalletContext};

/// Top-level page: owns the config and the wallet connection, and hands both
/// to the panels through context.
#[component]
pub fn Dashboard() -> Element {
    let config = use_context_provider(|| Arc::new(DashboardConfig::from_env()));
    let provider_url = config.rpc_url.clone();
    let mut wallet = use_context_provider(move || {
        Signal::new(WalletContext::disconnected(EthRpcClient::new(&provider_url)))
    });
    let mut connect_error = use_signal(|| None as Option<String>);

    let connect_config = config.clone();
    use_effect(move || {
        let config = connect_config.clone();
        spawn(async move {
            wallet.write().status = ConnectionStatus::Connecting;

            let provider = EthRpcClient::new(&config.rpc_url);
            let signer: Arc<dyn TransactionSigner> = Arc::new(WalletRpcSigner::new(&config.wallet_rpc_url));
            match WalletContext::connect(provider, signer).await {
                Ok(connected) => {
                    connect_error.set(None);
                    wallet.set(connected);
                }
                Err(e) => {
                    log::error!("Failed to connect wallet at {}: {}", config.wallet_rpc_url, e);
                    wallet.write().status = ConnectionStatus::Disconnected;
                    connect_error.set(Some(format!("Failed to connect wallet: {}", e)));
                }
            }
        });
    });

    let context = wallet();
    let status_line = match (context.status, context.address) {
        (ConnectionStatus::Connected, Some(address)) => format!("Connected: {}", short_address(&address)),
        (ConnectionStatus::Connecting, _) => "Connecting wallet...".to_string(),
        _ => "Wallet not connected".to_string(),
    };

    rsx! {
        div {
            class: "dashboard",
            header {
                class: "dashboard-header",
                h1 { "Ethereum Staking" }
                span { class: "wallet-status", "{status_line}" }
            }

            if !config.is_valid() {
                p {
                    class: "error-message",
                    "Invalid staking contract address: {config.contract_address}"
                }
            }

            if let Some(error) = connect_error() {
                p { class: "error-message", "{error}" }
            }

            StatsPanel {}
            section {
                class: "staking-columns",
                StakingPanel {}
                LockedStaking {}
            }
        }
    }
}
