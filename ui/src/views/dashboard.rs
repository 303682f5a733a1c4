use dioxus::prelude::*;

use crate::analyses::dashboard::AnalysesDashboard;
use crate::analyses::AnalysesState;

#[component]
pub fn Dashboard() -> Element {
    let mut state = use_resource(|| AnalysesState::load(None));

    let body = match &*state.read() {
        None => rsx! {
            p { class: "page__loading", "Loading the dashboard…" }
        },
        Some(loaded) => {
            if let Some(err) = &loaded.error {
                let message = err.clone();
                rsx! {
                    div { class: "page__error",
                        p { "{message}" }
                        button {
                            r#type: "button",
                            class: "button button--ghost",
                            onclick: move |_| state.restart(),
                            "Try again"
                        }
                    }
                }
            } else {
                rsx! {
                    AnalysesDashboard { records: loaded.records.clone() }
                }
            }
        }
    };

    rsx! {
        section { class: "page page-dashboard",
            h1 { "Dashboard" }
            p { "How the noise landscape looks across every analysis on record." }
            {body}
        }
    }
}
