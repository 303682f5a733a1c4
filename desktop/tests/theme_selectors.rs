#![cfg(test)]
/*!
Theme selector lint for the desktop build.

Purpose:
- Ensure that critical CSS selectors required by the desktop UI (especially the
  dashboard experience and the export panel) remain present in the unified
  shared theme: ui/assets/theme/main.css
- Fail fast if a refactor accidentally drops or renames core classes, preventing a
  silent styling regression in packaged (embedded) desktop builds.

How it works:
- We compile-time embed the unified theme using `include_str!` pointing to the shared
  `ui/` location (mirrors the constant in `desktop/src/main.rs`).
- We assert presence of a curated set of selectors / tokens.
- If you intentionally rename or remove a selector:
    1. Update the Dioxus component markup.
    2. Adjust this test's REQUIRED_SELECTORS accordingly.

Why not parse CSS properly?
- A lightweight substring presence check is sufficient as an early warning.
- Keeping zero extra dependencies avoids increasing compile times.

Extending:
- Add new selectors to REQUIRED_SELECTORS when introducing structural CSS relied
  upon by Rust components (especially for charts, the analyses list, and the
  export/status surfaces).
*/

const THEME_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

/// Core selectors / tokens that must exist in the shared theme for desktop.
const REQUIRED_SELECTORS: &[&str] = &[
    // Global / layout
    ":root",
    "body {",
    ".page {",
    ".page__error",
    // Buttons & shared UI
    ".button {",
    ".button--primary",
    ".button--ghost",
    ".data-table {",
    // Dashboard metrics
    ".dashboard-metrics",
    ".metric-card {",
    ".metric-card__value",
    // Charts
    ".dashboard-charts",
    ".chart-card {",
    ".chart-card__placeholder",
    ".chart-card__body--pie",
    ".chart-legend__swatch",
    ".bar-chart__axis",
    ".bar-chart__label",
    // Time-of-day cards
    ".period-grid",
    ".period-card__count",
    ".period-card__meter-fill",
    // Scope picker & export panel
    ".dashboard-scope__chips",
    ".chip--active",
    ".dashboard-export__actions",
    ".dashboard-export__meta--success",
    ".dashboard-export__meta--error",
    // Analyses list
    ".analyses__filters",
    ".analyses__grid",
    ".analyses__pagination",
    ".analysis-card {",
    ".analysis-card__badge",
    // Analysis detail
    ".detail__facts",
    ".detail__player",
    ".detail__image",
    ".detail__actions",
    // Upload
    ".upload-intake__picker",
    ".upload-outcome__facts",
    // Support & auth
    ".support-form__field",
    ".auth-panel__field",
    // Media query token (sanity check responsive block exists)
    "@media (max-width: 860px)",
];

#[test]
fn unified_theme_contains_required_selectors() {
    let mut missing = Vec::new();
    for sel in REQUIRED_SELECTORS {
        if !THEME_CSS.contains(sel) {
            missing.push(*sel);
        }
    }

    if !missing.is_empty() {
        panic!(
            "Missing {} required CSS selectors/tokens in unified theme:\n{}",
            missing.len(),
            missing.join("\n")
        );
    }
}

#[test]
fn unified_theme_not_trivially_empty() {
    let non_ws_len = THEME_CSS.chars().filter(|c| !c.is_whitespace()).count();
    assert!(
        non_ws_len > 4_000,
        "Embedded theme appears unexpectedly small ({} non-whitespace chars); \
         did the file get truncated or the path change?",
        non_ws_len
    );
}

#[test]
fn status_meta_modifier_consistency() {
    // Every surface that reports action status needs both outcome modifiers.
    for family in [
        "dashboard-export__meta",
        "detail__meta",
        "upload-intake__meta",
        "support-form__meta",
        "auth-panel__meta",
    ] {
        let success = THEME_CSS.contains(&format!(".{family}--success"));
        let error = THEME_CSS.contains(&format!(".{family}--error"));
        assert!(
            success && error,
            "Status styling incomplete for `{family}` (success: {success}, error: {error})"
        );
    }
}
