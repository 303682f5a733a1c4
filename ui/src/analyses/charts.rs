//! Chart adapters and the SVG charts themselves.
//!
//! The dashboard draws its own SVG instead of pulling in a charting crate.
//! The slices and bars are simple enough that a few path computations keep
//! the bundle lean, and the same series feed the exported document.

use dioxus::prelude::*;

use crate::core::model::NoiseCategory;

/// Fixed palette cycled over series entries, matching the exported
/// documents.
pub const PALETTE: [&str; 5] = ["#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF"];

/// Color for series entry `index`, cycling when entries outnumber the
/// palette.
pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Labels, values and colors for one categorical chart, index-aligned.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoricalSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<&'static str>,
}

impl CategoricalSeries {
    fn from_pairs(pairs: impl IntoIterator<Item = (String, f64)>) -> Self {
        let mut series = CategoricalSeries::default();
        for (index, (label, value)) in pairs.into_iter().enumerate() {
            series.labels.push(label);
            series.values.push(value);
            series.colors.push(palette_color(index));
        }
        series
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }
}

/// Pie input: how many analyses landed in each category.
pub fn distribution_series(counts: &[(NoiseCategory, u32)]) -> CategoricalSeries {
    CategoricalSeries::from_pairs(
        counts
            .iter()
            .map(|(category, count)| (category.display_label(), f64::from(*count))),
    )
}

/// Bar input: mean response time per category, rounded to two decimals.
pub fn mean_response_series(means: &[(NoiseCategory, f64)]) -> CategoricalSeries {
    CategoricalSeries::from_pairs(
        means
            .iter()
            .map(|(category, mean)| (category.display_label(), round2(*mean))),
    )
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `d` attribute for a pie slice covering `[start, end)` as fractions of
/// the full turn, measured clockwise from 12 o'clock. A slice spanning the
/// whole turn is drawn as two half-arcs; a single arc would collapse.
pub fn pie_slice_path(cx: f64, cy: f64, radius: f64, start: f64, end: f64) -> String {
    let sweep = end - start;
    if sweep >= 1.0 {
        return format!(
            "M {:.2} {:.2} A {:.2} {:.2} 0 1 1 {:.2} {:.2} A {:.2} {:.2} 0 1 1 {:.2} {:.2} Z",
            cx,
            cy - radius,
            radius,
            radius,
            cx,
            cy + radius,
            radius,
            radius,
            cx,
            cy - radius
        );
    }
    let (x0, y0) = point_on_circle(cx, cy, radius, start);
    let (x1, y1) = point_on_circle(cx, cy, radius, end);
    let large_arc = if sweep > 0.5 { 1 } else { 0 };
    format!(
        "M {cx:.2} {cy:.2} L {x0:.2} {y0:.2} A {radius:.2} {radius:.2} 0 {large_arc} 1 {x1:.2} {y1:.2} Z"
    )
}

fn point_on_circle(cx: f64, cy: f64, radius: f64, fraction: f64) -> (f64, f64) {
    let angle = fraction * std::f64::consts::TAU - std::f64::consts::FRAC_PI_2;
    (cx + radius * angle.cos(), cy + radius * angle.sin())
}

/// Pie of the category distribution with a legend alongside.
#[component]
pub fn CategoryPieChart(series: CategoricalSeries) -> Element {
    if series.is_empty() || series.total() <= 0.0 {
        return rsx! {
            p { class: "chart-card__placeholder", "No analyses yet." }
        };
    }

    let total = series.total();
    let mut cursor = 0.0;
    let slices: Vec<(String, &'static str)> = series
        .values
        .iter()
        .zip(&series.colors)
        .map(|(value, color)| {
            let start = cursor;
            cursor += value / total;
            (pie_slice_path(60.0, 60.0, 54.0, start, cursor), *color)
        })
        .collect();

    let legend: Vec<(String, String, String)> = series
        .labels
        .iter()
        .enumerate()
        .map(|(index, label)| {
            (
                label.clone(),
                format!("background: {}", series.colors[index]),
                format!("{:.0}", series.values[index]),
            )
        })
        .collect();

    rsx! {
        div { class: "chart-card__body chart-card__body--pie",
            svg { class: "pie-chart", view_box: "0 0 120 120", role: "img",
                for (index, (path, color)) in slices.into_iter().enumerate() {
                    path { key: "{index}", d: "{path}", fill: "{color}" }
                }
            }
            ul { class: "chart-legend",
                for (label, swatch, value) in legend {
                    li { key: "{label}", class: "chart-legend__item",
                        span { class: "chart-legend__swatch", style: "{swatch}" }
                        span { class: "chart-legend__label", "{label}" }
                        span { class: "chart-legend__value", "{value}" }
                    }
                }
            }
        }
    }
}

struct BarShape {
    x: String,
    y: String,
    width: String,
    height: String,
    color: &'static str,
    label: String,
    value_text: String,
    center: String,
}

/// Vertical bars of the per-category means, value labels on top.
#[component]
pub fn ResponseBarChart(series: CategoricalSeries) -> Element {
    if series.is_empty() {
        return rsx! {
            p { class: "chart-card__placeholder", "No analyses yet." }
        };
    }

    let plot_left = 16.0;
    let plot_right = 304.0;
    let baseline = 168.0;
    let plot_top = 28.0;
    let span = plot_right - plot_left;
    let count = series.len() as f64;
    let slot = span / count;
    let bar_width = (slot * 0.6).min(72.0);
    let scale_max = if series.max_value() > 0.0 {
        series.max_value()
    } else {
        1.0
    };

    let bars: Vec<BarShape> = series
        .labels
        .iter()
        .enumerate()
        .map(|(index, label)| {
            let value = series.values[index];
            let height = (value / scale_max) * (baseline - plot_top);
            let x = plot_left + slot * index as f64 + (slot - bar_width) / 2.0;
            let y = baseline - height;
            BarShape {
                x: format!("{x:.1}"),
                y: format!("{y:.1}"),
                width: format!("{bar_width:.1}"),
                height: format!("{height:.1}"),
                color: series.colors[index],
                label: label.clone(),
                value_text: format!("{value:.2}"),
                center: format!("{:.1}", x + bar_width / 2.0),
            }
        })
        .collect();

    rsx! {
        div { class: "chart-card__body",
            svg { class: "bar-chart", view_box: "0 0 320 200", role: "img",
                line {
                    class: "bar-chart__axis",
                    x1: "16",
                    y1: "168",
                    x2: "304",
                    y2: "168",
                }
                for bar in bars {
                    g { key: "{bar.label}",
                        rect {
                            x: "{bar.x}",
                            y: "{bar.y}",
                            width: "{bar.width}",
                            height: "{bar.height}",
                            rx: "2",
                            fill: "{bar.color}",
                        }
                        text {
                            class: "bar-chart__value",
                            x: "{bar.center}",
                            y: "{bar.y}",
                            dy: "-4",
                            text_anchor: "middle",
                            "{bar.value_text}"
                        }
                        text {
                            class: "bar-chart__label",
                            x: "{bar.center}",
                            y: "184",
                            text_anchor: "middle",
                            "{bar.label}"
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_cycles_past_its_length() {
        assert_eq!(palette_color(0), PALETTE[0]);
        assert_eq!(palette_color(4), PALETTE[4]);
        assert_eq!(palette_color(5), PALETTE[0]);
        assert_eq!(palette_color(12), PALETTE[2]);
    }

    #[test]
    fn series_stay_index_aligned() {
        let counts = vec![
            (NoiseCategory::Dog, 3),
            (NoiseCategory::Traffic, 1),
            (NoiseCategory::Ambulance, 2),
        ];
        let series = distribution_series(&counts);
        assert_eq!(series.labels, vec!["Dog", "Traffic", "Ambulance"]);
        assert_eq!(series.values, vec![3.0, 1.0, 2.0]);
        assert_eq!(series.colors, vec![PALETTE[0], PALETTE[1], PALETTE[2]]);
        assert_eq!(series.len(), 3);
        assert_eq!(series.total(), 6.0);
    }

    #[test]
    fn mean_series_round_to_two_decimals() {
        let means = vec![(NoiseCategory::Dog, 1.0 / 3.0)];
        let series = mean_response_series(&means);
        assert_eq!(series.values, vec![0.33]);
    }

    #[test]
    fn slice_paths_are_wedges_from_the_center() {
        let path = pie_slice_path(60.0, 60.0, 54.0, 0.0, 0.25);
        assert!(path.starts_with("M 60.00 60.00 L "));
        assert!(path.ends_with('Z'));
        assert!(path.contains(" A 54.00 54.00 0 0 1 "));
    }

    #[test]
    fn majority_slices_use_the_large_arc_flag() {
        let path = pie_slice_path(60.0, 60.0, 54.0, 0.0, 0.75);
        assert!(path.contains(" A 54.00 54.00 0 1 1 "));
    }

    #[test]
    fn a_single_category_draws_the_full_circle() {
        let path = pie_slice_path(60.0, 60.0, 54.0, 0.0, 1.0);
        assert!(path.starts_with("M 60.00 6.00"));
        assert_eq!(path.matches(" A ").count(), 2);
    }

    #[test]
    fn max_value_of_an_empty_series_is_zero() {
        assert_eq!(CategoricalSeries::default().max_value(), 0.0);
    }
}
