use dioxus::prelude::*;

mod abi;
mod balance;
mod components;
mod config;
mod contract;
mod error;
mod position;
mod rpc;
mod signing;
mod staking;
mod transaction;
mod units;
mod wallet;

use components::*;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Dashboard {},
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        Router::<Route> {}
    }
}
