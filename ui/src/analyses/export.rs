//! Dashboard exports: the xlsx spreadsheet and the two-page PDF report.
//!
//! The report redraws the metrics and charts panels as standalone SVG
//! regions, rasterizes them at 2x, and lays one region per A4 page. The
//! web bundle rasterizes through a canvas, the desktop shell through
//! resvg, and the PDF composition is shared.

use dioxus::prelude::*;
use rust_xlsxwriter::{Format, Workbook};
use thiserror::Error;

use crate::analyses::charts::{distribution_series, mean_response_series, pie_slice_path};
use crate::analyses::dashboard::{metric_cards, RANKING_SIZE};
use crate::analyses::stats::{
    fastest_responses, mean_response_by_category, AggregateStats, DayPeriod,
};
use crate::core::format::format_seconds_precise;
use crate::core::model::{AnalysisRecord, NoiseCategory};
use crate::core::platform;
use crate::core::status::{begin_if_idle, ActionStatus};

pub(crate) const METRICS_REGION_ID: &str = "dashboard-metrics";
pub(crate) const CHARTS_REGION_ID: &str = "dashboard-charts";

const METRICS_REGION_SIZE: (u32, u32) = (1120, 320);
const CHARTS_REGION_SIZE: (u32, u32) = (1120, 1400);
const RENDER_SCALE: f64 = 2.0;

const REPORT_FILENAME: &str = "dashboard-analise-ruidos.pdf";

const PAGE_WIDTH_MM: f64 = 210.0;
const PAGE_HEIGHT_MM: f64 = 297.0;
const MARGIN_MM: f64 = 10.0;

/// Spreadsheet columns, in wire spelling so the file round-trips with the
/// backend's own tooling.
const SPREADSHEET_COLUMNS: [&str; 9] = [
    "id",
    "nome_audio",
    "tipo_ruido",
    "data_identificacao",
    "horario_identificacao",
    "tempo_resposta",
    "audio",
    "espectrograma",
    "forma_de_onda",
];

/// What the spreadsheet covers: everything, or one category.
#[derive(Debug, Clone, PartialEq)]
pub enum SpreadsheetScope {
    Complete,
    Category(NoiseCategory),
}

impl SpreadsheetScope {
    pub fn filename(&self) -> String {
        match self {
            SpreadsheetScope::Complete => "dados_completos.xlsx".to_string(),
            SpreadsheetScope::Category(category) => {
                format!("dados_{}.xlsx", category.wire_label())
            }
        }
    }

    pub fn subset(&self, records: &[AnalysisRecord]) -> Vec<AnalysisRecord> {
        match self {
            SpreadsheetScope::Complete => records.to_vec(),
            SpreadsheetScope::Category(category) => records
                .iter()
                .filter(|record| record.category == *category)
                .cloned()
                .collect(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("the {0} panel is not on screen")]
    RegionUnavailable(&'static str),
    #[error("couldn't capture the dashboard: {0}")]
    Capture(String),
    #[error("couldn't compose the report: {0}")]
    Compose(String),
    #[error("couldn't build the spreadsheet: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
    #[error("couldn't deliver the file: {0}")]
    Delivery(String),
}

#[component]
pub fn DashboardExportPanel(
    records: Vec<AnalysisRecord>,
    scope: Option<SpreadsheetScope>,
) -> Element {
    let status = use_signal(ActionStatus::default);
    let busy = use_signal(|| false);

    let feedback = match &status() {
        ActionStatus::Idle => None,
        ActionStatus::Working(label) => {
            Some(("dashboard-export__meta".to_string(), format!("{label}…")))
        }
        ActionStatus::Done(message) => Some((
            "dashboard-export__meta dashboard-export__meta--success".to_string(),
            format!("✅ {message}"),
        )),
        ActionStatus::Error(err) => Some((
            "dashboard-export__meta dashboard-export__meta--error".to_string(),
            format!("⚠️ {err}"),
        )),
    };

    let spreadsheet_ready = scope.is_some();

    let spreadsheet_handler = {
        let records = records.clone();
        let scope = scope.clone();
        let mut status_signal = status;
        let mut busy_signal = busy;
        move |_| {
            let Some(scope) = scope.clone() else {
                return;
            };
            if !busy_signal.with_mut(begin_if_idle) {
                return;
            }
            status_signal.set(ActionStatus::Working("Preparing the spreadsheet"));
            let rows = scope.subset(&records);

            #[cfg(target_arch = "wasm32")]
            {
                let mut status_signal = status_signal;
                let mut busy_signal = busy_signal;
                platform::spawn_future(async move {
                    let outcome = perform_spreadsheet_export(scope, rows).await;
                    match outcome {
                        Ok(message) => status_signal.set(ActionStatus::Done(message)),
                        Err(err) => {
                            log::warn!("spreadsheet export failed: {err}");
                            status_signal.set(ActionStatus::Error(err.to_string()));
                        }
                    }
                    busy_signal.set(false);
                });
            }

            #[cfg(not(target_arch = "wasm32"))]
            {
                let outcome = futures::executor::block_on(perform_spreadsheet_export(scope, rows));
                match outcome {
                    Ok(message) => status_signal.set(ActionStatus::Done(message)),
                    Err(err) => {
                        log::warn!("spreadsheet export failed: {err}");
                        status_signal.set(ActionStatus::Error(err.to_string()));
                    }
                }
                busy_signal.set(false);
            }
        }
    };

    let report_handler = {
        let records = records.clone();
        let mut status_signal = status;
        let mut busy_signal = busy;
        move |_| {
            if !busy_signal.with_mut(begin_if_idle) {
                return;
            }
            status_signal.set(ActionStatus::Working("Preparing the report"));
            let records = records.clone();

            #[cfg(target_arch = "wasm32")]
            {
                let mut status_signal = status_signal;
                let mut busy_signal = busy_signal;
                platform::spawn_future(async move {
                    let outcome = perform_report_export(records).await;
                    match outcome {
                        Ok(message) => status_signal.set(ActionStatus::Done(message)),
                        Err(err) => {
                            log::warn!("report export failed: {err}");
                            status_signal.set(ActionStatus::Error(err.to_string()));
                        }
                    }
                    busy_signal.set(false);
                });
            }

            #[cfg(not(target_arch = "wasm32"))]
            {
                let outcome = futures::executor::block_on(perform_report_export(records));
                match outcome {
                    Ok(message) => status_signal.set(ActionStatus::Done(message)),
                    Err(err) => {
                        log::warn!("report export failed: {err}");
                        status_signal.set(ActionStatus::Error(err.to_string()));
                    }
                }
                busy_signal.set(false);
            }
        }
    };

    rsx! {
        section { class: "dashboard-export",
            div { class: "dashboard-export__header",
                h2 { "Export" }
            }

            if records.is_empty() {
                p { class: "dashboard-export__placeholder",
                    "Exports unlock once analyses are on record."
                }
            } else {
                p { "Download the raw data as a spreadsheet, or capture the dashboard as a two-page report." }

                div { class: "dashboard-export__actions",
                    button {
                        r#type: "button",
                        class: "button button--primary",
                        disabled: busy() || !spreadsheet_ready,
                        onclick: spreadsheet_handler,
                        "Export spreadsheet"
                    }
                    button {
                        r#type: "button",
                        class: "button button--ghost",
                        disabled: busy(),
                        onclick: report_handler,
                        "Export PDF report"
                    }
                }

                if !spreadsheet_ready {
                    p { class: "dashboard-export__meta",
                        "Pick a category or switch to the complete view to enable the spreadsheet."
                    }
                }

                if let Some((class_name, message)) = feedback {
                    p { class: "{class_name}", "{message}" }
                }
            }
        }
    }
}

async fn perform_spreadsheet_export(
    scope: SpreadsheetScope,
    rows: Vec<AnalysisRecord>,
) -> Result<String, ExportError> {
    let bytes = build_workbook(&rows)?;
    let filename = scope.filename();
    let delivery = download_bytes(
        &filename,
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        bytes,
    )
    .await
    .map_err(ExportError::Delivery)?;
    Ok(match delivery {
        Some(path) => format!("Spreadsheet saved to {path}"),
        None => format!("Spreadsheet download started ({filename})"),
    })
}

async fn perform_report_export(records: Vec<AnalysisRecord>) -> Result<String, ExportError> {
    #[cfg(target_arch = "wasm32")]
    {
        expect_region(METRICS_REGION_ID, "metrics")?;
        expect_region(CHARTS_REGION_ID, "charts")?;
        // Lets the busy state paint before the canvas work stalls the frame.
        crate::core::timing::sleep_ms(300).await;
    }

    let stats = AggregateStats::from_records(&records);
    let means = mean_response_by_category(&records);
    let ranking = fastest_responses(&records, RANKING_SIZE);

    let metrics_svg = metrics_region_svg(&stats);
    let charts_svg = charts_region_svg(&stats, &means, &ranking);

    #[cfg(target_arch = "wasm32")]
    let regions = vec![
        rasterize_region(&metrics_svg, METRICS_REGION_SIZE.0, METRICS_REGION_SIZE.1).await?,
        rasterize_region(&charts_svg, CHARTS_REGION_SIZE.0, CHARTS_REGION_SIZE.1).await?,
    ];

    #[cfg(not(target_arch = "wasm32"))]
    let regions = vec![
        rasterize_region(&metrics_svg, METRICS_REGION_SIZE.0, METRICS_REGION_SIZE.1)?,
        rasterize_region(&charts_svg, CHARTS_REGION_SIZE.0, CHARTS_REGION_SIZE.1)?,
    ];

    let bytes = compose_document(&regions)?;
    let delivery = download_bytes(REPORT_FILENAME, "application/pdf", bytes)
        .await
        .map_err(ExportError::Delivery)?;
    Ok(match delivery {
        Some(path) => format!("Report saved to {path}"),
        None => "Report download started".to_string(),
    })
}

fn build_workbook(records: &[AnalysisRecord]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Dados")?;

    let header = Format::new().set_bold();
    for (column, title) in SPREADSHEET_COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, column as u16, *title, &header)?;
    }

    for (index, record) in records.iter().enumerate() {
        let row = index as u32 + 1;
        worksheet.write_string(row, 0, record.id.as_str())?;
        worksheet.write_string(row, 1, record.name.as_str())?;
        worksheet.write_string(row, 2, record.category.wire_label())?;
        worksheet.write_string(row, 3, record.identified_date.as_str())?;
        worksheet.write_string(row, 4, record.identified_time.as_str())?;
        worksheet.write_number(row, 5, record.response_time_s)?;
        worksheet.write_string(row, 6, record.audio.as_deref().unwrap_or_default())?;
        worksheet.write_string(row, 7, record.spectrogram.as_deref().unwrap_or_default())?;
        worksheet.write_string(row, 8, record.waveform.as_deref().unwrap_or_default())?;
    }

    workbook.save_to_buffer().map_err(ExportError::from)
}

fn svg_open(width: u32, height: u32) -> String {
    let mut svg = format!(
        "<svg xmlns='http://www.w3.org/2000/svg' width='{width}' height='{height}' viewBox='0 0 {width} {height}' font-family='Inter, sans-serif'>"
    );
    svg.push_str(&format!(
        "<rect width='{width}' height='{height}' fill='#0f1116'/>"
    ));
    svg
}

fn section_title(x: u32, y: u32, title: &str) -> String {
    format!(
        "<text x='{x}' y='{y}' fill='#f5f7fb' font-size='26' font-weight='600'>{}</text>",
        escape_text(title)
    )
}

fn placeholder_text(x: u32, y: u32) -> String {
    format!("<text x='{x}' y='{y}' fill='rgba(245,247,251,0.55)' font-size='18'>No analyses yet.</text>")
}

/// First report page: heading plus the six metric cards.
fn metrics_region_svg(stats: &AggregateStats) -> String {
    use time::{macros::format_description, OffsetDateTime};

    let (width, height) = METRICS_REGION_SIZE;
    let generated = OffsetDateTime::now_utc()
        .format(&format_description!("[day]/[month]/[year]"))
        .unwrap_or_else(|_| "today".into());

    let mut svg = svg_open(width, height);
    svg.push_str(
        "<text x='40' y='76' fill='#f5f7fb' font-size='40' font-weight='700'>Calm Wave dashboard</text>",
    );
    svg.push_str(&format!(
        "<text x='40' y='108' fill='rgba(245,247,251,0.72)' font-size='18'>Generated on {generated}</text>"
    ));

    for (index, card) in metric_cards(stats).into_iter().enumerate() {
        let x = 40 + index * 180;
        let text_x = x + 14;
        svg.push_str(&format!(
            "<rect x='{x}' y='150' width='164' height='130' rx='12' fill='#151923'/>"
        ));
        svg.push_str(&format!(
            "<text x='{text_x}' y='186' fill='rgba(245,247,251,0.72)' font-size='13'>{}</text>",
            escape_text(card.label)
        ));
        svg.push_str(&format!(
            "<text x='{text_x}' y='228' fill='#f5f7fb' font-size='26' font-weight='700'>{}</text>",
            escape_text(&card.value)
        ));
        svg.push_str(&format!(
            "<text x='{text_x}' y='258' fill='rgba(245,247,251,0.55)' font-size='11'>{}</text>",
            escape_text(card.hint)
        ));
    }

    svg.push_str("</svg>");
    svg
}

/// Second report page: pie, bars, ranking table and period cards.
fn charts_region_svg(
    stats: &AggregateStats,
    means: &[(NoiseCategory, f64)],
    ranking: &[AnalysisRecord],
) -> String {
    let (width, height) = CHARTS_REGION_SIZE;
    let mut svg = svg_open(width, height);

    svg.push_str(&section_title(40, 70, "Noise distribution"));
    let distribution = distribution_series(&stats.category_counts);
    if distribution.is_empty() || distribution.total() <= 0.0 {
        svg.push_str(&placeholder_text(40, 120));
    } else {
        let total = distribution.total();
        let mut cursor = 0.0;
        for (index, value) in distribution.values.iter().enumerate() {
            let start = cursor;
            cursor += value / total;
            svg.push_str(&format!(
                "<path d='{}' fill='{}' stroke='#0f1116' stroke-width='2'/>",
                pie_slice_path(230.0, 300.0, 150.0, start, cursor),
                distribution.colors[index]
            ));
        }
        for (index, label) in distribution.labels.iter().enumerate().take(9) {
            let y = 200 + index * 40;
            let swatch_y = y - 14;
            svg.push_str(&format!(
                "<rect x='440' y='{swatch_y}' width='18' height='18' rx='4' fill='{}'/>",
                distribution.colors[index]
            ));
            svg.push_str(&format!(
                "<text x='470' y='{y}' fill='#f5f7fb' font-size='18'>{} ({:.0})</text>",
                escape_text(label),
                distribution.values[index]
            ));
        }
    }

    svg.push_str(&section_title(40, 570, "Mean response time by category (s)"));
    let response = mean_response_series(means);
    if response.is_empty() {
        svg.push_str(&placeholder_text(40, 620));
    } else {
        let plot_left = 60.0;
        let plot_right = 1080.0;
        let plot_top = 610.0;
        let baseline = 860.0;
        let span = plot_right - plot_left;
        let slot = span / response.len() as f64;
        let bar_width = (slot * 0.6).min(120.0);
        let scale_max = if response.max_value() > 0.0 {
            response.max_value()
        } else {
            1.0
        };

        svg.push_str(
            "<line x1='60' y1='860' x2='1080' y2='860' stroke='rgba(245,247,251,0.35)' stroke-width='2'/>",
        );

        for (index, label) in response.labels.iter().enumerate() {
            let value = response.values[index];
            let bar_height = (value / scale_max) * (baseline - plot_top);
            let x = plot_left + slot * index as f64 + (slot - bar_width) / 2.0;
            let y = baseline - bar_height;
            let center = x + bar_width / 2.0;
            svg.push_str(&format!(
                "<rect x='{x:.1}' y='{y:.1}' width='{bar_width:.1}' height='{bar_height:.1}' rx='4' fill='{}'/>",
                response.colors[index]
            ));
            svg.push_str(&format!(
                "<text x='{center:.1}' y='{:.1}' fill='#f5f7fb' font-size='16' text-anchor='middle'>{value:.2}</text>",
                y - 10.0
            ));
            svg.push_str(&format!(
                "<text x='{center:.1}' y='892' fill='rgba(245,247,251,0.72)' font-size='16' text-anchor='middle'>{}</text>",
                escape_text(&clip_text(label, 16))
            ));
        }
    }

    svg.push_str(&section_title(40, 970, "Response time ranking"));
    if ranking.is_empty() {
        svg.push_str(&placeholder_text(40, 1020));
    } else {
        for (x, heading) in [(60, "#"), (120, "Audio"), (640, "Category"), (900, "Response")] {
            svg.push_str(&format!(
                "<text x='{x}' y='1012' fill='rgba(245,247,251,0.72)' font-size='15'>{heading}</text>"
            ));
        }
        for (index, record) in ranking.iter().enumerate() {
            let y = 1048 + index * 38;
            svg.push_str(&format!(
                "<text x='60' y='{y}' fill='#f5f7fb' font-size='16'>#{}</text>",
                index + 1
            ));
            svg.push_str(&format!(
                "<text x='120' y='{y}' fill='#f5f7fb' font-size='16'>{}</text>",
                escape_text(&clip_text(&record.name, 48))
            ));
            svg.push_str(&format!(
                "<text x='640' y='{y}' fill='#f5f7fb' font-size='16'>{}</text>",
                escape_text(&record.category.display_label())
            ));
            svg.push_str(&format!(
                "<text x='900' y='{y}' fill='#f5f7fb' font-size='16'>{}</text>",
                format_seconds_precise(record.response_time_s)
            ));
        }
    }

    svg.push_str(&section_title(40, 1270, "Analyses by period"));
    for (index, period) in DayPeriod::ALL.into_iter().enumerate() {
        let x = 40 + index * 265;
        let text_x = x + 16;
        let count = stats.period_counts[period.index()];
        svg.push_str(&format!(
            "<rect x='{x}' y='1290' width='245' height='100' rx='12' fill='#151923'/>"
        ));
        svg.push_str(&format!(
            "<text x='{text_x}' y='1322' fill='#f5f7fb' font-size='18' font-weight='600'>{}</text>",
            period.label()
        ));
        svg.push_str(&format!(
            "<text x='{text_x}' y='1356' fill='#9966FF' font-size='26' font-weight='700'>{count}</text>"
        ));
        svg.push_str(&format!(
            "<text x='{text_x}' y='1378' fill='rgba(245,247,251,0.55)' font-size='12'>{}</text>",
            period.hours_label()
        ));
    }

    svg.push_str("</svg>");
    svg
}

struct RegionBitmap {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
}

#[cfg(target_arch = "wasm32")]
fn expect_region(id: &str, panel: &'static str) -> Result<(), ExportError> {
    let mounted = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(id))
        .is_some();
    if mounted {
        Ok(())
    } else {
        Err(ExportError::RegionUnavailable(panel))
    }
}

#[cfg(target_arch = "wasm32")]
async fn rasterize_region(
    svg_markup: &str,
    width: u32,
    height: u32,
) -> Result<RegionBitmap, ExportError> {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{
        Blob, BlobPropertyBag, CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, Url,
    };

    let capture = |detail: &str| ExportError::Capture(detail.to_string());

    let parts = js_sys::Array::new();
    parts.push(&JsValue::from_str(svg_markup));
    let opts = BlobPropertyBag::new();
    opts.set_type("image/svg+xml;charset=utf-8");
    let blob = Blob::new_with_str_sequence_and_options(&parts, &opts)
        .map_err(|_| capture("unable to build the SVG blob"))?;
    let url = Url::create_object_url_with_blob(&blob)
        .map_err(|_| capture("unable to create an object URL"))?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| capture("document unavailable"))?;

    let scaled_width = (f64::from(width) * RENDER_SCALE) as u32;
    let scaled_height = (f64::from(height) * RENDER_SCALE) as u32;

    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|_| capture("unable to create a canvas"))?
        .dyn_into()
        .map_err(|_| capture("canvas cast failed"))?;
    canvas.set_width(scaled_width);
    canvas.set_height(scaled_height);

    let context: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(|_| capture("canvas context unavailable"))?
        .ok_or_else(|| capture("canvas context missing"))?
        .dyn_into()
        .map_err(|_| capture("context cast failed"))?;

    let image = HtmlImageElement::new().map_err(|_| capture("unable to create an image"))?;
    image.set_src(&url);
    JsFuture::from(image.decode())
        .await
        .map_err(|_| capture("SVG decode failed"))?;

    context
        .draw_image_with_html_image_element_and_dw_and_dh(
            &image,
            0.0,
            0.0,
            f64::from(scaled_width),
            f64::from(scaled_height),
        )
        .map_err(|_| capture("unable to draw the capture"))?;
    Url::revoke_object_url(&url).ok();

    let image_data = context
        .get_image_data(0.0, 0.0, f64::from(scaled_width), f64::from(scaled_height))
        .map_err(|_| capture("unable to read pixels back"))?;
    let rgba = image_data.data().0;

    Ok(RegionBitmap {
        width: scaled_width,
        height: scaled_height,
        rgb: flatten_rgba(&rgba),
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn rasterize_region(
    svg_markup: &str,
    width: u32,
    height: u32,
) -> Result<RegionBitmap, ExportError> {
    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();
    let tree = usvg::Tree::from_str(svg_markup, &options)
        .map_err(|err| ExportError::Capture(err.to_string()))?;

    let scaled_width = (f64::from(width) * RENDER_SCALE) as u32;
    let scaled_height = (f64::from(height) * RENDER_SCALE) as u32;
    let mut pixmap = tiny_skia::Pixmap::new(scaled_width, scaled_height)
        .ok_or_else(|| ExportError::Capture("unable to allocate the capture buffer".to_string()))?;
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(RENDER_SCALE as f32, RENDER_SCALE as f32),
        &mut pixmap.as_mut(),
    );

    // The regions draw an opaque background, so dropping alpha is lossless.
    Ok(RegionBitmap {
        width: scaled_width,
        height: scaled_height,
        rgb: flatten_rgba(pixmap.data()),
    })
}

/// One region per A4 page, margined, shrunk when taller than the page.
fn compose_document(regions: &[RegionBitmap]) -> Result<Vec<u8>, ExportError> {
    use printpdf::{Mm, PdfDocument};

    let (first, rest) = regions
        .split_first()
        .ok_or_else(|| ExportError::Compose("nothing to lay out".to_string()))?;

    let (document, first_page, first_layer) = PdfDocument::new(
        "Calm Wave dashboard",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );

    place_region(&document.get_page(first_page).get_layer(first_layer), first)?;
    for region in rest {
        let (page, layer) = document.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        place_region(&document.get_page(page).get_layer(layer), region)?;
    }

    document
        .save_to_bytes()
        .map_err(|err| ExportError::Compose(err.to_string()))
}

fn place_region(
    layer: &printpdf::PdfLayerReference,
    region: &RegionBitmap,
) -> Result<(), ExportError> {
    use printpdf::image_crate::{DynamicImage, RgbImage};
    use printpdf::{Image, ImageTransform, Mm};

    let pixels = RgbImage::from_raw(region.width, region.height, region.rgb.clone())
        .ok_or_else(|| ExportError::Compose("capture buffer size mismatch".to_string()))?;

    let content_width = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
    let content_height = PAGE_HEIGHT_MM - 2.0 * MARGIN_MM;
    let natural_height = content_width * f64::from(region.height) / f64::from(region.width);
    let scale = (content_height / natural_height).min(1.0);
    let width_mm = content_width * scale;
    let height_mm = natural_height * scale;
    let dpi = f64::from(region.width) * 25.4 / width_mm;

    let image = Image::from_dynamic_image(&DynamicImage::ImageRgb8(pixels));
    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(MARGIN_MM + (content_width - width_mm) / 2.0)),
            translate_y: Some(Mm(PAGE_HEIGHT_MM - MARGIN_MM - height_mm)),
            dpi: Some(dpi),
            ..ImageTransform::default()
        },
    );
    Ok(())
}

/// Hands `bytes` to the user: a browser download on the web, a file under
/// the app data directory on desktop. Returns the written path on desktop.
pub(crate) async fn download_bytes(
    filename: &str,
    mime: &str,
    bytes: Vec<u8>,
) -> Result<Option<String>, String> {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;
        use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

        let array = js_sys::Uint8Array::from(bytes.as_slice());
        let parts = js_sys::Array::new();
        parts.push(&array.buffer());

        let opts = BlobPropertyBag::new();
        opts.set_type(mime);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &opts)
            .map_err(|_| "Failed to create blob".to_string())?;
        let url = Url::create_object_url_with_blob(&blob)
            .map_err(|_| "Unable to create download".to_string())?;

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("Document unavailable")?;
        let anchor: HtmlAnchorElement = document
            .create_element("a")
            .map_err(|_| "Unable to create anchor")?
            .dyn_into()
            .map_err(|_| "Anchor cast failed")?;
        anchor.set_href(&url);
        anchor.set_download(filename);
        anchor.style().set_property("display", "none").ok();

        document
            .body()
            .ok_or("Missing body")?
            .append_child(&anchor)
            .ok();
        anchor.click();
        anchor.remove();
        Url::revoke_object_url(&url).ok();

        Ok(None)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::fs;
        use std::io::Write;

        let _ = mime;
        let dir = platform::data_dir()
            .ok_or("Unable to determine the export directory")?
            .join("exports");
        fs::create_dir_all(&dir).map_err(|err| err.to_string())?;
        let path = dir.join(filename);
        let mut file = fs::File::create(&path).map_err(|err| err.to_string())?;
        file.write_all(&bytes).map_err(|err| err.to_string())?;
        Ok(Some(path.to_string_lossy().to_string()))
    }
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\'', "&apos;")
}

fn clip_text(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let clipped: String = value.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{clipped}…")
}

fn flatten_rgba(rgba: &[u8]) -> Vec<u8> {
    rgba.chunks_exact(4)
        .flat_map(|pixel| [pixel[0], pixel[1], pixel[2]])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, category: &str, response: f64) -> AnalysisRecord {
        AnalysisRecord {
            id: format!("id-{name}"),
            name: name.to_string(),
            category: NoiseCategory::from(category.to_string()),
            identified_date: "2024-05-01".to_string(),
            identified_time: "09:15:00".to_string(),
            response_time_s: response,
            audio: Some(format!("audio/{name}")),
            spectrogram: None,
            waveform: None,
        }
    }

    #[test]
    fn spreadsheet_bytes_carry_the_zip_magic() {
        let rows = vec![record("a.wav", "dog", 1.2), record("b.wav", "traffic", 0.8)];
        let bytes = build_workbook(&rows).unwrap();
        assert!(bytes.starts_with(b"PK\x03\x04"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn an_empty_spreadsheet_still_has_its_header_row() {
        let bytes = build_workbook(&[]).unwrap();
        assert!(bytes.starts_with(b"PK\x03\x04"));
    }

    #[test]
    fn scope_filenames_follow_the_view() {
        assert_eq!(
            SpreadsheetScope::Complete.filename(),
            "dados_completos.xlsx"
        );
        assert_eq!(
            SpreadsheetScope::Category(NoiseCategory::Dog).filename(),
            "dados_dog.xlsx"
        );
    }

    #[test]
    fn category_scope_keeps_only_matching_rows() {
        let rows = vec![
            record("a.wav", "dog", 1.2),
            record("b.wav", "traffic", 0.8),
            record("c.wav", "dog", 2.0),
        ];
        let subset = SpreadsheetScope::Category(NoiseCategory::Dog).subset(&rows);
        assert_eq!(subset.len(), 2);
        assert!(subset.iter().all(|r| r.category == NoiseCategory::Dog));
        assert_eq!(SpreadsheetScope::Complete.subset(&rows).len(), 3);
    }

    #[test]
    fn report_bytes_carry_the_pdf_magic() {
        let wide = RegionBitmap {
            width: 8,
            height: 4,
            rgb: vec![200; 8 * 4 * 3],
        };
        let tall = RegionBitmap {
            width: 8,
            height: 64,
            rgb: vec![10; 8 * 64 * 3],
        };
        let bytes = compose_document(&[wide, tall]).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn composing_without_regions_is_an_error() {
        assert!(matches!(
            compose_document(&[]),
            Err(ExportError::Compose(_))
        ));
    }

    #[test]
    fn a_short_capture_buffer_is_rejected() {
        let broken = RegionBitmap {
            width: 8,
            height: 4,
            rgb: vec![0; 5],
        };
        assert!(matches!(
            compose_document(&[broken]),
            Err(ExportError::Compose(_))
        ));
    }

    #[test]
    fn metrics_region_is_a_complete_svg() {
        let svg = metrics_region_svg(&AggregateStats::default());
        assert!(svg.starts_with("<svg "));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("Calm Wave dashboard"));
    }

    #[test]
    fn charts_region_covers_every_panel() {
        let records = vec![
            record("a.wav", "dog", 1.2),
            record("b.wav", "traffic", 0.8),
            record("c.wav", "dog", 2.0),
        ];
        let stats = AggregateStats::from_records(&records);
        let means = mean_response_by_category(&records);
        let ranking = fastest_responses(&records, RANKING_SIZE);
        let svg = charts_region_svg(&stats, &means, &ranking);

        assert!(svg.contains("Noise distribution"));
        assert!(svg.contains("Mean response time by category (s)"));
        assert!(svg.contains("Response time ranking"));
        assert!(svg.contains("Analyses by period"));
        assert_eq!(svg.matches("<path ").count(), 2);
        assert!(svg.contains("#1<"));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn empty_charts_fall_back_to_placeholders() {
        let svg = charts_region_svg(&AggregateStats::default(), &[], &[]);
        assert_eq!(svg.matches("No analyses yet.").count(), 3);
    }

    #[test]
    fn text_escapes_for_svg_embedding() {
        assert_eq!(
            escape_text("a<b>&'c'"),
            "a&lt;b&gt;&amp;&apos;c&apos;"
        );
    }

    #[test]
    fn clipping_keeps_short_names_verbatim() {
        assert_eq!(clip_text("dog.wav", 16), "dog.wav");
        let clipped = clip_text("a_very_long_recording_name.wav", 10);
        assert_eq!(clipped.chars().count(), 10);
        assert!(clipped.ends_with('…'));
    }

    #[test]
    fn rgba_flattens_to_rgb() {
        let rgba = [1, 2, 3, 255, 4, 5, 6, 0];
        assert_eq!(flatten_rgba(&rgba), vec![1, 2, 3, 4, 5, 6]);
    }
}
