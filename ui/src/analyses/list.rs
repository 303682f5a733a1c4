//! The paged listing: search box, category select and date bounds over
//! the record cards.

use dioxus::prelude::*;

use crate::analyses::filter::{self, CategoryFilter, FilterCriteria};
use crate::components::app_navbar::detail_link;
use crate::core::format::{format_seconds, format_wire_date, format_wire_time};
use crate::core::model::{parse_wire_date, AnalysisRecord, NoiseCategory};

const KNOWN_CATEGORIES: [NoiseCategory; 4] = [
    NoiseCategory::Ambulance,
    NoiseCategory::Dog,
    NoiseCategory::Firetruck,
    NoiseCategory::Traffic,
];

#[component]
pub fn AnalysesList(records: Vec<AnalysisRecord>) -> Element {
    let mut query = use_signal(String::new);
    let mut category_choice = use_signal(CategoryFilter::default);
    let mut start_input = use_signal(String::new);
    let mut end_input = use_signal(String::new);
    let mut page = use_signal(|| 1usize);

    let criteria = FilterCriteria {
        query: query(),
        category: category_choice(),
        start_date: parse_wire_date(&start_input()),
        end_date: parse_wire_date(&end_input()),
    };

    let matching = filter::apply(&records, &criteria);
    let total_pages = filter::page_count(matching.len());
    let current = page().min(total_pages.max(1));
    let visible: Vec<AnalysisRecord> = filter::page_slice(&matching, current).to_vec();

    let category_value = category_choice().select_value();
    let category_options: Vec<(String, String)> = KNOWN_CATEGORIES
        .iter()
        .map(|category| (category.wire_label().to_string(), category.display_label()))
        .collect();

    rsx! {
        div { class: "analyses",
            section { class: "analyses__filters",
                input {
                    class: "analyses__search",
                    r#type: "search",
                    placeholder: "Search by name or category",
                    value: "{query}",
                    oninput: move |evt| {
                        query.set(evt.value());
                        page.set(1);
                    },
                }

                select {
                    class: "analyses__select",
                    value: "{category_value}",
                    onchange: move |evt| {
                        category_choice.set(CategoryFilter::from_select_value(&evt.value()));
                        page.set(1);
                    },
                    option { value: "all", "All categories" }
                    for (value, label) in category_options {
                        option { key: "{value}", value: "{value}", "{label}" }
                    }
                }

                label { class: "analyses__date",
                    span { "From" }
                    input {
                        r#type: "date",
                        value: "{start_input}",
                        oninput: move |evt| {
                            start_input.set(evt.value());
                            page.set(1);
                        },
                    }
                }

                label { class: "analyses__date",
                    span { "Until" }
                    input {
                        r#type: "date",
                        value: "{end_input}",
                        oninput: move |evt| {
                            end_input.set(evt.value());
                            page.set(1);
                        },
                    }
                }
            }

            if records.is_empty() {
                p { class: "analyses__empty", "No analyses yet." }
            } else if visible.is_empty() {
                p { class: "analyses__empty", "No analyses match the current filters." }
            } else {
                div { class: "analyses__grid",
                    for record in visible {
                        AnalysisCard { key: "{record.id}", record: record.clone() }
                    }
                }

                if total_pages > 1 {
                    nav { class: "analyses__pagination",
                        button {
                            r#type: "button",
                            class: "button button--ghost",
                            disabled: current <= 1,
                            onclick: move |_| page.set(current.saturating_sub(1).max(1)),
                            "Previous"
                        }
                        span { class: "analyses__page-label", "Page {current} of {total_pages}" }
                        button {
                            r#type: "button",
                            class: "button button--ghost",
                            disabled: current >= total_pages,
                            onclick: move |_| page.set(current + 1),
                            "Next"
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn AnalysisCard(record: AnalysisRecord) -> Element {
    let category = record.category.display_label();
    let when = format!(
        "{} at {}",
        format_wire_date(&record.identified_date),
        format_wire_time(&record.identified_time)
    );
    let response = format_seconds(record.response_time_s);

    rsx! {
        article { class: "analysis-card",
            header { class: "analysis-card__header",
                h3 { class: "analysis-card__name", "{record.name}" }
                span { class: "analysis-card__badge", "{category}" }
            }
            dl { class: "analysis-card__facts",
                div { class: "analysis-card__fact",
                    dt { "Identified" }
                    dd { "{when}" }
                }
                div { class: "analysis-card__fact",
                    dt { "Response" }
                    dd { "{response}" }
                }
            }
            footer { class: "analysis-card__footer",
                {detail_link(&record.id, "View details")}
            }
        }
    }
}
