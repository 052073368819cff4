use dioxus::prelude::*;
use crate::position::{PositionId, PositionView};

fn row_class(position: &PositionView, selected: Option<PositionId>) -> &'static str {
    if selected == Some(position.position_id) {
        "position-row selected"
    } else if position.open {
        "position-row"
    } else {
        "position-row closed"
    }
}

/// Loaded positions; clicking an open one makes it the unstake target
#[component]
pub fn PositionList(
    positions: Vec<PositionView>,
    selected: Option<PositionId>,
    onselect: EventHandler<PositionId>,
) -> Element {
    if positions.is_empty() {
        return rsx! {
            div { class: "positions-empty", "No staking positions yet" }
        };
    }

    rsx! {
        div {
            class: "position-list",
            for position in positions {
                div {
                    key: "{position.position_id}",
                    class: row_class(&position, selected),
                    onclick: move |_| {
                        if position.open {
                            onselect.call(position.position_id);
                        }
                    },
                    span { class: "position-id", "#{position.position_id}" }
                    span { "{position.ether_staked} ETH" }
                    span { "{position.percent_interest}%" }
                    span { "+{position.ether_interest} ETH" }
                    if position.open {
                        span { "{position.days_remaining} days left" }
                    } else {
                        span { class: "position-closed", "Closed" }
                    }
                }
            }
        }
    }
}
