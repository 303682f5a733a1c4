//! The intake form: pick a WAV, ship it to the classifier, show the
//! verdict and the generated artifacts.

use dioxus::prelude::*;
use futures_util::StreamExt;

use crate::core::api::ApiClient;
use crate::core::config::AppConfig;
use crate::core::format::format_seconds;
use crate::core::model::{NoiseCategory, UploadAnalysis, UploadReport};
use crate::core::status::ActionStatus;
use crate::upload::is_wav_filename;

pub enum UploadCommand {
    Submit { filename: String, bytes: Vec<u8> },
}

#[component]
pub fn UploadIntake() -> Element {
    let mut status = use_signal(ActionStatus::default);
    let mut report = use_signal(|| Option::<UploadReport>::None);
    let mut picked = use_signal(|| Option::<(String, Vec<u8>)>::None);

    let submitter = use_coroutine(move |mut rx: UnboundedReceiver<UploadCommand>| {
        let mut status = status;
        let mut report = report;
        async move {
            while let Some(UploadCommand::Submit { filename, bytes }) = rx.next().await {
                status.set(ActionStatus::Working("Analyzing the audio"));
                report.set(None);
                match ApiClient::from_env().submit_audio(&filename, bytes).await {
                    Ok(outcome) => {
                        let note = if outcome.message.trim().is_empty() {
                            "Analysis complete".to_string()
                        } else {
                            outcome.message.trim().to_string()
                        };
                        report.set(Some(outcome));
                        status.set(ActionStatus::Done(note));
                    }
                    Err(err) => status.set(ActionStatus::Error(err.to_string())),
                }
            }
        }
    });

    let working = status().is_working();
    let picked_name = picked().map(|(name, _)| name);

    let feedback = match &status() {
        ActionStatus::Idle => None,
        ActionStatus::Working(label) => {
            Some(("upload-intake__meta".to_string(), format!("{label}…")))
        }
        ActionStatus::Done(message) => Some((
            "upload-intake__meta upload-intake__meta--success".to_string(),
            format!("✅ {message}"),
        )),
        ActionStatus::Error(err) => Some((
            "upload-intake__meta upload-intake__meta--error".to_string(),
            format!("⚠️ {err}"),
        )),
    };

    rsx! {
        div { class: "upload",
            section { class: "upload-intake",
                h2 { "Analyze an audio file" }
                p { "Pick a WAV recording and send it to the classifier." }

                label { class: "upload-intake__picker",
                    input {
                        r#type: "file",
                        accept: ".wav,audio/wav",
                        disabled: working,
                        onchange: move |evt: FormEvent| async move {
                            if status().is_working() {
                                return;
                            }
                            let Some(engine) = evt.files() else {
                                return;
                            };
                            let Some(name) = engine.files().into_iter().next() else {
                                return;
                            };
                            if !is_wav_filename(&name) {
                                picked.set(None);
                                status.set(ActionStatus::Error(
                                    "Select a .wav audio file.".to_string(),
                                ));
                                return;
                            }
                            match engine.read_file(&name).await {
                                Some(bytes) => {
                                    status.set(ActionStatus::Idle);
                                    picked.set(Some((name, bytes)));
                                }
                                None => {
                                    picked.set(None);
                                    status.set(ActionStatus::Error(
                                        "Couldn't read the selected file.".to_string(),
                                    ));
                                }
                            }
                        },
                    }
                    span { class: "upload-intake__picker-label",
                        if let Some(name) = &picked_name {
                            "{name}"
                        } else {
                            "No file selected"
                        }
                    }
                }

                button {
                    r#type: "button",
                    class: "button button--primary",
                    disabled: working || picked_name.is_none(),
                    onclick: move |_| {
                        if status().is_working() {
                            return;
                        }
                        let Some((filename, bytes)) = picked() else {
                            return;
                        };
                        submitter.send(UploadCommand::Submit { filename, bytes });
                    },
                    if working {
                        "Analyzing…"
                    } else {
                        "Analyze"
                    }
                }

                if let Some((class_name, message)) = feedback {
                    p { class: "{class_name}", "{message}" }
                }
            }

            if let Some(outcome) = report() {
                UploadOutcome { report: outcome }
            }
        }
    }
}

#[component]
fn UploadOutcome(report: UploadReport) -> Element {
    let predicted = predicted_display(&report.analysis);
    let record_id = outcome_identity(&report);
    let response = format_seconds(report.analysis.response_time_s);

    let config = AppConfig::from_env();
    let audio_url = report.analysis.audio_path().map(|p| config.artifact_url(p));
    let spectrogram_url = report
        .analysis
        .spectrogram_path()
        .map(|p| config.artifact_url(p));
    let waveform_url = report
        .analysis
        .waveform_path()
        .map(|p| config.artifact_url(p));

    rsx! {
        section { class: "upload-outcome",
            h3 { "Analysis result" }
            dl { class: "upload-outcome__facts",
                div { class: "upload-outcome__fact",
                    dt { "Predicted class" }
                    dd { "{predicted}" }
                }
                div { class: "upload-outcome__fact",
                    dt { "Record id" }
                    dd { "{record_id}" }
                }
                div { class: "upload-outcome__fact",
                    dt { "Response time" }
                    dd { "{response}" }
                }
            }

            if let Some(url) = spectrogram_url {
                section { class: "upload-outcome__section",
                    h4 { "Spectrogram" }
                    img { class: "upload-outcome__image", src: "{url}", alt: "Spectrogram" }
                }
            }

            if let Some(url) = waveform_url {
                section { class: "upload-outcome__section",
                    h4 { "Waveform" }
                    img { class: "upload-outcome__image", src: "{url}", alt: "Waveform" }
                }
            }

            if let Some(url) = audio_url {
                section { class: "upload-outcome__section",
                    h4 { "Audio" }
                    audio { class: "upload-outcome__player", controls: true, src: "{url}" }
                }
            }
        }
    }
}

fn predicted_display(analysis: &UploadAnalysis) -> String {
    match analysis.predicted_label() {
        Some(label) => NoiseCategory::from(label.to_string()).display_label(),
        None => "Not identified".to_string(),
    }
}

/// The record id the server settled on, whichever envelope field carried it.
fn outcome_identity(report: &UploadReport) -> String {
    let id = report.id.trim();
    if !id.is_empty() {
        return id.to_string();
    }
    let saved = report.analysis.saved_id.trim();
    if !saved.is_empty() {
        return saved.to_string();
    }
    "Not available".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_predictions_render_their_display_label() {
        let analysis = UploadAnalysis {
            predicted_class: "dog".to_string(),
            ..UploadAnalysis::default()
        };
        assert_eq!(predicted_display(&analysis), "Dog");
    }

    #[test]
    fn a_silent_model_reads_as_not_identified() {
        assert_eq!(predicted_display(&UploadAnalysis::default()), "Not identified");
    }

    #[test]
    fn the_envelope_id_wins_over_the_saved_id() {
        let report = UploadReport {
            analysis: UploadAnalysis {
                saved_id: "inner".to_string(),
                ..UploadAnalysis::default()
            },
            id: "outer".to_string(),
            message: String::new(),
        };
        assert_eq!(outcome_identity(&report), "outer");

        let fallback = UploadReport {
            analysis: UploadAnalysis {
                saved_id: "inner".to_string(),
                ..UploadAnalysis::default()
            },
            id: "  ".to_string(),
            message: String::new(),
        };
        assert_eq!(outcome_identity(&fallback), "inner");
    }

    #[test]
    fn a_bare_envelope_has_no_identity() {
        let report = UploadReport {
            analysis: UploadAnalysis::default(),
            id: String::new(),
            message: String::new(),
        };
        assert_eq!(outcome_identity(&report), "Not available");
    }
}
