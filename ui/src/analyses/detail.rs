//! Single-record view: facts, artifact players and the download and
//! share actions.

use dioxus::prelude::*;

use crate::analyses::export::download_bytes;
use crate::core::api::{ApiClient, ApiError};
use crate::core::config::AppConfig;
use crate::core::format::{format_seconds_precise, format_wire_date, format_wire_time};
use crate::core::model::AnalysisRecord;
use crate::core::platform;
use crate::core::status::{begin_if_idle, ActionStatus};

#[component]
pub fn AnalysisDetailPanel(id: String) -> Element {
    let mut resource = use_resource(use_reactive((&id,), move |(id,)| async move {
        ApiClient::from_env().fetch_analysis(&id).await
    }));

    match &*resource.read() {
        None => rsx! {
            section { class: "detail detail--loading",
                p { "Loading the analysis…" }
            }
        },
        Some(Err(err)) => {
            let message = match err {
                ApiError::Status { status: 404, .. } => {
                    "This analysis isn't on record anymore.".to_string()
                }
                other => format!("Couldn't load the analysis: {other}"),
            };
            rsx! {
                section { class: "detail detail--error",
                    p { class: "detail__error", "{message}" }
                    button {
                        r#type: "button",
                        class: "button button--ghost",
                        onclick: move |_| resource.restart(),
                        "Try again"
                    }
                }
            }
        }
        Some(Ok(record)) => rsx! {
            AnalysisDetailBody { record: record.clone() }
        },
    }
}

#[component]
fn AnalysisDetailBody(record: AnalysisRecord) -> Element {
    let status = use_signal(ActionStatus::default);
    let busy = use_signal(|| false);

    let category = record.category.display_label();
    let response = format_seconds_precise(record.response_time_s);
    let when = format!(
        "{} at {}",
        format_wire_date(&record.identified_date),
        format_wire_time(&record.identified_time)
    );

    let config = AppConfig::from_env();
    let audio_path = record.audio_path().map(str::to_string);
    let audio_url = record.audio_path().map(|path| config.artifact_url(path));
    let spectrogram_url = record.spectrogram_path().map(|path| config.artifact_url(path));
    let waveform_url = record.waveform_path().map(|path| config.artifact_url(path));

    let feedback = match &status() {
        ActionStatus::Idle => None,
        ActionStatus::Working(label) => {
            Some(("detail__meta".to_string(), format!("{label}…")))
        }
        ActionStatus::Done(message) => Some((
            "detail__meta detail__meta--success".to_string(),
            format!("✅ {message}"),
        )),
        ActionStatus::Error(err) => Some((
            "detail__meta detail__meta--error".to_string(),
            format!("⚠️ {err}"),
        )),
    };

    let download_handler = {
        let path = audio_path.clone();
        let name = record.name.clone();
        let mut status_signal = status;
        let mut busy_signal = busy;
        move |_| {
            let Some(path) = path.clone() else {
                return;
            };
            if !busy_signal.with_mut(begin_if_idle) {
                return;
            }
            status_signal.set(ActionStatus::Working("Fetching the audio"));
            let filename = audio_filename(&name);
            let mut status_signal = status_signal;
            let mut busy_signal = busy_signal;
            platform::spawn_future(async move {
                let outcome = perform_audio_download(path, filename).await;
                match outcome {
                    Ok(message) => status_signal.set(ActionStatus::Done(message)),
                    Err(err) => status_signal.set(ActionStatus::Error(err)),
                }
                busy_signal.set(false);
            });
        }
    };

    let share_handler = {
        let id = record.id.clone();
        let mut status_signal = status;
        let mut busy_signal = busy;
        move |_| {
            if !busy_signal.with_mut(begin_if_idle) {
                return;
            }
            status_signal.set(ActionStatus::Working("Copying the link"));
            let link = share_link(&id);
            let mut status_signal = status_signal;
            let mut busy_signal = busy_signal;
            platform::spawn_future(async move {
                match platform::copy_to_clipboard(link).await {
                    Ok(()) => status_signal.set(ActionStatus::Done(
                        "Link copied to the clipboard".to_string(),
                    )),
                    Err(err) => status_signal.set(ActionStatus::Error(err)),
                }
                busy_signal.set(false);
            });
        }
    };

    rsx! {
        article { class: "detail",
            header { class: "detail__header",
                h2 { class: "detail__name", "{record.name}" }
                span { class: "detail__badge", "{category}" }
            }

            dl { class: "detail__facts",
                div { class: "detail__fact",
                    dt { "Identified" }
                    dd { "{when}" }
                }
                div { class: "detail__fact",
                    dt { "Response time" }
                    dd { "{response}" }
                }
            }

            if let Some(url) = audio_url {
                section { class: "detail__section",
                    h3 { "Audio" }
                    audio { class: "detail__player", controls: true, src: "{url}" }
                }
            }

            if let Some(url) = spectrogram_url {
                section { class: "detail__section",
                    h3 { "Spectrogram" }
                    img { class: "detail__image", src: "{url}", alt: "Spectrogram for {record.name}" }
                }
            }

            if let Some(url) = waveform_url {
                section { class: "detail__section",
                    h3 { "Waveform" }
                    img { class: "detail__image", src: "{url}", alt: "Waveform for {record.name}" }
                }
            }

            section { class: "detail__actions",
                if audio_path.is_some() {
                    button {
                        r#type: "button",
                        class: "button button--primary",
                        disabled: busy(),
                        onclick: download_handler,
                        "Download audio"
                    }
                }
                button {
                    r#type: "button",
                    class: "button button--ghost",
                    disabled: busy(),
                    onclick: share_handler,
                    "Copy share link"
                }
            }

            if let Some((class_name, message)) = feedback {
                p { class: "{class_name}", "{message}" }
            }
        }
    }
}

async fn perform_audio_download(path: String, filename: String) -> Result<String, String> {
    let client = ApiClient::from_env();
    let bytes = client
        .fetch_artifact(&path)
        .await
        .map_err(|err| err.to_string())?;
    let delivery = download_bytes(&filename, "audio/wav", bytes).await?;
    Ok(match delivery {
        Some(target) => format!("Audio saved to {target}"),
        None => format!("Audio download started ({filename})"),
    })
}

/// Keeps the stored name when it already looks like a WAV file, otherwise
/// normalizes it so the saved file opens in a player.
fn audio_filename(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return "analysis.wav".to_string();
    }
    if trimmed.to_ascii_lowercase().ends_with(".wav") {
        trimmed.to_string()
    } else {
        format!("{trimmed}.wav")
    }
}

fn share_link(id: &str) -> String {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            if let Ok(href) = window.location().href() {
                return href;
            }
        }
    }
    AppConfig::from_env().api_url(&format!("ia/data/{id}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_wav_names_pass_through() {
        assert_eq!(audio_filename("siren.wav"), "siren.wav");
        assert_eq!(audio_filename("SIREN.WAV"), "SIREN.WAV");
    }

    #[test]
    fn other_names_gain_the_wav_suffix() {
        assert_eq!(audio_filename("siren"), "siren.wav");
        assert_eq!(audio_filename("  siren  "), "siren.wav");
    }

    #[test]
    fn a_blank_name_falls_back_to_a_generic_one() {
        assert_eq!(audio_filename("   "), "analysis.wav");
    }

    #[test]
    fn share_links_point_at_the_record() {
        assert!(share_link("abc123").ends_with("/ia/data/abc123"));
    }
}
