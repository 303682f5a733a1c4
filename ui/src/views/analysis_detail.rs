use dioxus::prelude::*;

use crate::analyses::detail::AnalysisDetailPanel;

#[component]
pub fn AnalysisDetail(id: String) -> Element {
    rsx! {
        section { class: "page page-analysis-detail",
            h1 { "Analysis detail" }
            AnalysisDetailPanel { id }
        }
    }
}
