//! Dashboard assembly: metric cards, chart panels, the two capture
//! regions for the PDF report and the spreadsheet scope picker.

use dioxus::prelude::*;

use crate::analyses::charts::{distribution_series, mean_response_series, CategoryPieChart, ResponseBarChart};
use crate::analyses::export::{
    DashboardExportPanel, SpreadsheetScope, CHARTS_REGION_ID, METRICS_REGION_ID,
};
use crate::analyses::stats::{
    fastest_responses, mean_response_by_category, AggregateStats, DayPeriod,
};
use crate::core::format::{format_per_day, format_seconds, format_seconds_precise};
use crate::core::model::{AnalysisRecord, NoiseCategory};

pub(crate) const RANKING_SIZE: usize = 5;

pub(crate) struct MetricCard {
    pub label: &'static str,
    pub value: String,
    pub hint: &'static str,
}

/// The six headline cards, in reading order.
pub(crate) fn metric_cards(stats: &AggregateStats) -> Vec<MetricCard> {
    vec![
        MetricCard {
            label: "Total analyses",
            value: stats.total.to_string(),
            hint: "audio samples processed",
        },
        MetricCard {
            label: "Mean response",
            value: format_seconds(stats.mean_response_s),
            hint: "across all analyses",
        },
        MetricCard {
            label: "Analyses today",
            value: stats.analyses_today.to_string(),
            hint: "UTC calendar day",
        },
        MetricCard {
            label: "Categories",
            value: stats.distinct_categories.to_string(),
            hint: "distinct noise types",
        },
        MetricCard {
            label: "Mean per day",
            value: format_per_day(stats.mean_per_day),
            hint: "analyses per active day",
        },
        MetricCard {
            label: "Active days",
            value: stats.daily_counts.len().to_string(),
            hint: "dates on record",
        },
    ]
}

fn coverage_note(scope: &Option<SpreadsheetScope>, records: &[AnalysisRecord]) -> String {
    match scope {
        Some(SpreadsheetScope::Complete) => {
            format!("The spreadsheet will cover all {} analyses.", records.len())
        }
        Some(SpreadsheetScope::Category(category)) => {
            let count = records
                .iter()
                .filter(|record| record.category == *category)
                .count();
            format!(
                "The spreadsheet will cover {count} {} analyses.",
                category.display_label()
            )
        }
        None => "No spreadsheet view selected.".to_string(),
    }
}

#[component]
pub fn AnalysesDashboard(records: Vec<AnalysisRecord>) -> Element {
    let scope = use_signal(|| Some(SpreadsheetScope::Complete));

    if records.is_empty() {
        return rsx! {
            section { class: "dashboard dashboard--empty",
                p { class: "dashboard__placeholder",
                    "No analyses yet. Submit an audio file to populate the dashboard."
                }
            }
        };
    }

    let stats = AggregateStats::from_records(&records);
    let means = mean_response_by_category(&records);
    let ranking = fastest_responses(&records, RANKING_SIZE);

    rsx! {
        div { class: "dashboard",
            DashboardMetrics { stats: stats.clone() }
            DashboardCharts { stats, means, ranking }
            DashboardScopePicker { records: records.clone(), scope }
            DashboardExportPanel { records, scope: scope() }
        }
    }
}

#[component]
fn DashboardMetrics(stats: AggregateStats) -> Element {
    let cards = metric_cards(&stats);

    rsx! {
        section { id: METRICS_REGION_ID, class: "dashboard-metrics",
            for card in cards {
                div { key: "{card.label}", class: "metric-card",
                    span { class: "metric-card__label", "{card.label}" }
                    strong { class: "metric-card__value", "{card.value}" }
                    span { class: "metric-card__hint", "{card.hint}" }
                }
            }
        }
    }
}

struct RankingRow {
    position: String,
    name: String,
    category: String,
    response: String,
}

struct PeriodCard {
    label: &'static str,
    hours: &'static str,
    count: String,
    meter_style: String,
}

#[component]
fn DashboardCharts(
    stats: AggregateStats,
    means: Vec<(NoiseCategory, f64)>,
    ranking: Vec<AnalysisRecord>,
) -> Element {
    let distribution = distribution_series(&stats.category_counts);
    let response = mean_response_series(&means);

    let ranking_rows: Vec<RankingRow> = ranking
        .iter()
        .enumerate()
        .map(|(index, record)| RankingRow {
            position: format!("#{}", index + 1),
            name: record.name.clone(),
            category: record.category.display_label(),
            response: format_seconds_precise(record.response_time_s),
        })
        .collect();

    let period_total: u32 = stats.period_counts.iter().sum();
    let periods: Vec<PeriodCard> = DayPeriod::ALL
        .into_iter()
        .map(|period| {
            let count = stats.period_counts[period.index()];
            let share = if period_total > 0 {
                f64::from(count) * 100.0 / f64::from(period_total)
            } else {
                0.0
            };
            PeriodCard {
                label: period.label(),
                hours: period.hours_label(),
                count: count.to_string(),
                meter_style: format!("width: {share:.0}%"),
            }
        })
        .collect();

    let daily_rows: Vec<(String, String)> = stats
        .daily_counts
        .iter()
        .map(|(date, count)| (date.clone(), count.to_string()))
        .collect();

    rsx! {
        section { id: CHARTS_REGION_ID, class: "dashboard-charts",
            div { class: "chart-card",
                h3 { "Noise distribution" }
                CategoryPieChart { series: distribution }
            }

            div { class: "chart-card",
                h3 { "Mean response time by category (s)" }
                ResponseBarChart { series: response }
            }

            div { class: "chart-card",
                h3 { "Response time ranking" }
                if ranking_rows.is_empty() {
                    p { class: "chart-card__placeholder", "No analyses yet." }
                } else {
                    table { class: "data-table",
                        thead {
                            tr {
                                th { "#" }
                                th { "Audio" }
                                th { "Category" }
                                th { "Response" }
                            }
                        }
                        tbody {
                            for row in ranking_rows {
                                tr { key: "{row.position}",
                                    td { "{row.position}" }
                                    td { "{row.name}" }
                                    td { "{row.category}" }
                                    td { "{row.response}" }
                                }
                            }
                        }
                    }
                }
            }

            div { class: "chart-card",
                h3 { "Analyses by period" }
                div { class: "period-grid",
                    for period in periods {
                        div { key: "{period.label}", class: "period-card",
                            span { class: "period-card__label", "{period.label}" }
                            strong { class: "period-card__count", "{period.count}" }
                            div { class: "period-card__meter",
                                span {
                                    class: "period-card__meter-fill",
                                    style: "{period.meter_style}",
                                }
                            }
                            span { class: "period-card__hours", "{period.hours}" }
                        }
                    }
                }
            }

            div { class: "chart-card",
                h3 { "Analyses by day" }
                if daily_rows.is_empty() {
                    p { class: "chart-card__placeholder", "No analyses yet." }
                } else {
                    table { class: "data-table",
                        thead {
                            tr {
                                th { "Date" }
                                th { "Analyses" }
                            }
                        }
                        tbody {
                            for (date, count) in daily_rows {
                                tr { key: "{date}",
                                    td { "{date}" }
                                    td { "{count}" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn DashboardScopePicker(
    records: Vec<AnalysisRecord>,
    mut scope: Signal<Option<SpreadsheetScope>>,
) -> Element {
    let current = scope();
    let complete_class = if matches!(&current, Some(SpreadsheetScope::Complete)) {
        "chip chip--active"
    } else {
        "chip"
    };

    let mut categories: Vec<NoiseCategory> = Vec::new();
    for record in &records {
        if !categories.contains(&record.category) {
            categories.push(record.category.clone());
        }
    }

    let chips: Vec<(NoiseCategory, String, bool)> = categories
        .into_iter()
        .map(|category| {
            let count = records
                .iter()
                .filter(|record| record.category == category)
                .count();
            let label = format!("{} ({count})", category.display_label());
            let active =
                matches!(&current, Some(SpreadsheetScope::Category(c)) if *c == category);
            (category, label, active)
        })
        .collect();

    let note = coverage_note(&current, &records);

    rsx! {
        section { class: "dashboard-scope",
            h2 { "Spreadsheet view" }
            div { class: "dashboard-scope__chips",
                button {
                    r#type: "button",
                    class: complete_class,
                    onclick: move |_| scope.set(Some(SpreadsheetScope::Complete)),
                    "Complete view"
                }
                for (category, label, active) in chips {
                    button {
                        key: "{label}",
                        r#type: "button",
                        class: if active { "chip chip--active" } else { "chip" },
                        onclick: move |_| {
                            let next = if active {
                                None
                            } else {
                                Some(SpreadsheetScope::Category(category.clone()))
                            };
                            scope.set(next);
                        },
                        "{label}"
                    }
                }
            }
            p { class: "dashboard-scope__meta", "{note}" }
        }
    }
}
