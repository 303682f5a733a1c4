use dioxus::prelude::*;

use crate::upload::view::UploadIntake;

#[component]
pub fn Upload() -> Element {
    rsx! {
        section { class: "page page-upload",
            h1 { "Analyze audio" }
            p { "Send a WAV sample to the classifier and review the verdict right away." }
            UploadIntake {}
        }
    }
}
