use dioxus::prelude::*;

use crate::analyses::stats::AggregateStats;
use crate::analyses::AnalysesState;
use crate::components::app_navbar::{detail_link, nav_link, NavTarget};
use crate::core::format::{format_seconds, format_wire_date};

const RECENT_LIMIT: usize = 5;

struct RecentRow {
    id: String,
    name: String,
    category: String,
    date: String,
    response: String,
}

#[component]
pub fn Home() -> Element {
    let mut recent = use_resource(|| AnalysesState::load(Some(RECENT_LIMIT)));

    let body = match &*recent.read() {
        None => rsx! {
            p { class: "page__loading", "Loading recent analyses…" }
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
                            onclick: move |_| recent.restart(),
                            "Try again"
                        }
                    }
                }
            } else if loaded.records.is_empty() {
                rsx! {
                    p { class: "page-home__empty",
                        "No analyses yet. The dashboard fills up as recordings come in."
                    }
                }
            } else {
                let stats = AggregateStats::from_records(&loaded.records);
                let shown = stats.total.to_string();
                let mean = format_seconds(stats.mean_response_s);
                let categories: Vec<String> = stats
                    .category_counts
                    .iter()
                    .map(|(category, count)| format!("{} ×{count}", category.display_label()))
                    .collect();

                let rows: Vec<RecentRow> = loaded
                    .records
                    .iter()
                    .map(|record| RecentRow {
                        id: record.id.clone(),
                        name: record.name.clone(),
                        category: record.category.display_label(),
                        date: format_wire_date(&record.identified_date),
                        response: format_seconds(record.response_time_s),
                    })
                    .collect();

                rsx! {
                    div { class: "page-home__stats",
                        span { class: "page-home__stat", "{shown} recent analyses" }
                        span { class: "page-home__stat", "mean response {mean}" }
                        for chip in categories {
                            span { key: "{chip}", class: "page-home__stat page-home__stat--chip", "{chip}" }
                        }
                    }

                    table { class: "data-table page-home__recent",
                        thead {
                            tr {
                                th { "Audio" }
                                th { "Category" }
                                th { "Date" }
                                th { "Response" }
                                th { "" }
                            }
                        }
                        tbody {
                            for row in rows {
                                tr { key: "{row.id}",
                                    td { "{row.name}" }
                                    td { "{row.category}" }
                                    td { "{row.date}" }
                                    td { "{row.response}" }
                                    td { {detail_link(&row.id, "Open")} }
                                }
                            }
                        }
                    }

                    p { class: "page-home__cta",
                        {nav_link(NavTarget::Analyses, "View all analyses")}
                    }
                }
            }
        }
    };

    rsx! {
        section { class: "page page-home",
            h1 { "Calm Wave" }
            p { class: "page-home__tagline",
                "Urban noise, classified the moment a recording lands."
            }
            p {
                "Upload WAV samples and watch the classifier label them. The dashboard follows categories and response times across the day."
            }

            div { class: "page-home__actions",
                {nav_link(NavTarget::Analyses, "Browse analyses")}
                {nav_link(NavTarget::Dashboard, "Open the dashboard")}
                {nav_link(NavTarget::Upload, "Analyze a recording")}
            }

            section { class: "page-home__latest",
                h2 { "Latest activity" }
                {body}
            }
        }
    }
}
