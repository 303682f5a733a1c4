use dioxus::prelude::*;

use crate::analyses::list::AnalysesList;
use crate::analyses::AnalysesState;

#[component]
pub fn Analyses() -> Element {
    let mut state = use_resource(|| AnalysesState::load(None));

    let body = match &*state.read() {
        None => rsx! {
            p { class: "page__loading", "Loading analyses…" }
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
                    AnalysesList { records: loaded.records.clone() }
                }
            }
        }
    };

    rsx! {
        section { class: "page page-analyses",
            h1 { "Analyses" }
            p { "Every classified recording, searchable and paged." }
            {body}
        }
    }
}
