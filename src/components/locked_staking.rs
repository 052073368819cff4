use dioxus::prelude::*;
use crate::config::tiers::LOCKED_TIERS;

/// Locked-term offers. Display only: the inputs are not submitted anywhere.
#[component]
pub fn LockedStaking() -> Element {
    rsx! {
        section {
            class: "staking-info-section",
            section {
                class: "staking-info",
                h2 { "Locked Staking" }
                for tier in LOCKED_TIERS {
                    section {
                        key: "{tier.staking_length}",
                        class: "locked-staking",
                        span { "{tier.label}" }
                        span { class: "locked-staking-apy", "{tier.apy_label}" }
                        input {
                            class: "input-field",
                            r#type: "number",
                            placeholder: "Enter Amount",
                        }
                    }
                }
            }
            button {
                class: "stake-btn",
                disabled: true,
                title: "Locked staking is not open yet",
                "STAKE"
            }
        }
    }
}
