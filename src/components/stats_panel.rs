use dioxus::prelude::*;

const STATS: [(&str, &str); 3] = [
    ("Total Staked Tokens", "$9,237,907"),
    ("Total Renewal Paid", "$1,632,651"),
    ("Stakers", "92,783"),
];

#[component]
pub fn StatsPanel() -> Element {
    rsx! {
        section {
            class: "staking-data-container",
            for (label, value) in STATS {
                section {
                    key: "{label}",
                    class: "staking-data",
                    span { "{label}" }
                    span { class: "staking-data-value", "{value}" }
                }
            }
        }
    }
}
