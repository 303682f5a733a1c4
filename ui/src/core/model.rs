//! Wire model for the analysis API.
//!
//! The backend speaks Portuguese field names (`nome_audio`, `tipo_ruido`,
//! `tempo_resposta`). Everything above this module works with English
//! identifiers; serde renames keep the payloads intact.

use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{Date, PrimitiveDateTime, Time};

/// Classification labels the noise model can emit.
///
/// The label set grows with the model, so anything unrecognized is kept
/// verbatim in [`NoiseCategory::Other`] instead of being dropped or lumped
/// into a catch-all string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NoiseCategory {
    Ambulance,
    Dog,
    Firetruck,
    Traffic,
    Other(String),
}

impl NoiseCategory {
    /// Canonical wire spelling, lowercase as the classifier emits it.
    pub fn wire_label(&self) -> &str {
        match self {
            NoiseCategory::Ambulance => "ambulance",
            NoiseCategory::Dog => "dog",
            NoiseCategory::Firetruck => "firetruck",
            NoiseCategory::Traffic => "traffic",
            NoiseCategory::Other(label) => label,
        }
    }

    /// Capitalized label for cards and table cells.
    pub fn display_label(&self) -> String {
        capitalize(self.wire_label())
    }
}

impl From<String> for NoiseCategory {
    fn from(raw: String) -> Self {
        let label = raw.trim();
        for known in [
            NoiseCategory::Ambulance,
            NoiseCategory::Dog,
            NoiseCategory::Firetruck,
            NoiseCategory::Traffic,
        ] {
            if label.eq_ignore_ascii_case(known.wire_label()) {
                return known;
            }
        }
        NoiseCategory::Other(label.to_string())
    }
}

impl From<NoiseCategory> for String {
    fn from(category: NoiseCategory) -> Self {
        match category {
            NoiseCategory::Other(label) => label,
            known => known.wire_label().to_string(),
        }
    }
}

fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// One analysed audio sample as returned by `/ia/datas` and `/ia/data/{id}`.
///
/// Artifact fields carry server paths relative to the uploads directory; an
/// empty or missing path means the artifact was never produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "nome_audio", default)]
    pub name: String,
    #[serde(rename = "tipo_ruido")]
    pub category: NoiseCategory,
    #[serde(rename = "data_identificacao", default)]
    pub identified_date: String,
    #[serde(rename = "horario_identificacao", default)]
    pub identified_time: String,
    #[serde(rename = "tempo_resposta", default)]
    pub response_time_s: f64,
    #[serde(default)]
    pub audio: Option<String>,
    #[serde(rename = "espectrograma", default)]
    pub spectrogram: Option<String>,
    #[serde(rename = "forma_de_onda", default)]
    pub waveform: Option<String>,
}

impl AnalysisRecord {
    pub fn audio_path(&self) -> Option<&str> {
        present(&self.audio)
    }

    pub fn spectrogram_path(&self) -> Option<&str> {
        present(&self.spectrogram)
    }

    pub fn waveform_path(&self) -> Option<&str> {
        present(&self.waveform)
    }

    /// Calendar day the sample was classified, when the wire date parses.
    pub fn identified_on(&self) -> Option<Date> {
        parse_wire_date(&self.identified_date)
    }

    /// Clock time the sample was classified, when the wire time parses.
    pub fn identified_clock(&self) -> Option<Time> {
        parse_wire_time(&self.identified_time)
    }

    /// Combined timestamp used for ordering. A record without a parseable
    /// date yields `None`; a parseable date with a broken clock time keeps
    /// its day and falls back to midnight.
    pub fn identified_at(&self) -> Option<PrimitiveDateTime> {
        let date = self.identified_on()?;
        let clock = self.identified_clock().unwrap_or(Time::MIDNIGHT);
        Some(PrimitiveDateTime::new(date, clock))
    }
}

fn present(path: &Option<String>) -> Option<&str> {
    path.as_deref().map(str::trim).filter(|p| !p.is_empty())
}

/// Parses the wire date, `YYYY-MM-DD` with an optional time tail.
pub fn parse_wire_date(raw: &str) -> Option<Date> {
    let head = raw.trim().split(['T', ' ']).next()?;
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(head, &format).ok()
}

/// Parses the wire clock time, `HH:MM:SS` with tolerance for ISO tails
/// (fractional seconds, `Z`, offsets) and a leading date part.
pub fn parse_wire_time(raw: &str) -> Option<Time> {
    let tail = raw.trim().rsplit(['T', ' ']).next()?;
    let head = tail.trim_end_matches('Z');
    let head = head.split(['.', '+', '-']).next()?;
    let format = format_description!("[hour]:[minute]:[second]");
    Time::parse(head, &format).ok()
}

/// Envelope returned by `POST /ia/insert_audio`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadReport {
    #[serde(rename = "analysis_results", default)]
    pub analysis: UploadAnalysis,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub message: String,
}

/// Classifier output for a freshly uploaded sample.
///
/// The `_base64` suffixes are historical; the fields carry server paths
/// just like [`AnalysisRecord`] artifacts.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct UploadAnalysis {
    #[serde(default)]
    pub predicted_class: String,
    #[serde(rename = "tempo_resposta", default)]
    pub response_time_s: f64,
    #[serde(default)]
    pub saved_id: String,
    #[serde(rename = "spectrogram_base64", default)]
    pub spectrogram: Option<String>,
    #[serde(rename = "waveform_base64", default)]
    pub waveform: Option<String>,
    #[serde(rename = "audio_vector", default)]
    pub audio: Option<String>,
}

impl UploadAnalysis {
    /// The predicted class, or `None` when the model returned nothing.
    pub fn predicted_label(&self) -> Option<&str> {
        let label = self.predicted_class.trim();
        (!label.is_empty()).then_some(label)
    }

    pub fn audio_path(&self) -> Option<&str> {
        present(&self.audio)
    }

    pub fn spectrogram_path(&self) -> Option<&str> {
        present(&self.spectrogram)
    }

    pub fn waveform_path(&self) -> Option<&str> {
        present(&self.waveform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_parse_case_insensitively() {
        assert_eq!(NoiseCategory::from("dog".to_string()), NoiseCategory::Dog);
        assert_eq!(NoiseCategory::from(" DOG ".to_string()), NoiseCategory::Dog);
        assert_eq!(
            NoiseCategory::from("Firetruck".to_string()),
            NoiseCategory::Firetruck
        );
    }

    #[test]
    fn unknown_categories_keep_their_label() {
        let category = NoiseCategory::from("chainsaw".to_string());
        assert_eq!(category, NoiseCategory::Other("chainsaw".to_string()));
        assert_eq!(category.wire_label(), "chainsaw");
        assert_eq!(category.display_label(), "Chainsaw");
    }

    #[test]
    fn category_round_trips_through_the_wire() {
        for label in ["ambulance", "dog", "firetruck", "traffic", "lawnmower"] {
            let category = NoiseCategory::from(label.to_string());
            assert_eq!(String::from(category), label);
        }
    }

    #[test]
    fn records_deserialize_from_wire_names() {
        let record: AnalysisRecord = serde_json::from_str(
            r#"{
                "id": "abc123",
                "nome_audio": "sirene_manha.wav",
                "tipo_ruido": "ambulance",
                "data_identificacao": "2024-05-01",
                "horario_identificacao": "09:15:00",
                "tempo_resposta": 1.84,
                "audio": "audio/sirene_manha.wav",
                "espectrograma": "spectrograms/sirene_manha.png",
                "forma_de_onda": ""
            }"#,
        )
        .unwrap();

        assert_eq!(record.name, "sirene_manha.wav");
        assert_eq!(record.category, NoiseCategory::Ambulance);
        assert_eq!(record.response_time_s, 1.84);
        assert_eq!(record.audio_path(), Some("audio/sirene_manha.wav"));
        assert_eq!(
            record.spectrogram_path(),
            Some("spectrograms/sirene_manha.png")
        );
        assert_eq!(record.waveform_path(), None);
    }

    #[test]
    fn missing_optional_fields_default() {
        let record: AnalysisRecord =
            serde_json::from_str(r#"{"tipo_ruido": "traffic"}"#).unwrap();
        assert_eq!(record.id, "");
        assert_eq!(record.response_time_s, 0.0);
        assert_eq!(record.audio_path(), None);
        assert_eq!(record.identified_at(), None);
    }

    #[test]
    fn wire_dates_parse_with_and_without_time_tails() {
        let expected = Date::from_calendar_date(2024, time::Month::May, 1).unwrap();
        assert_eq!(parse_wire_date("2024-05-01"), Some(expected));
        assert_eq!(parse_wire_date("2024-05-01T09:15:00Z"), Some(expected));
        assert_eq!(parse_wire_date(" 2024-05-01 09:15:00"), Some(expected));
        assert_eq!(parse_wire_date("01/05/2024"), None);
        assert_eq!(parse_wire_date(""), None);
    }

    #[test]
    fn wire_times_parse_with_iso_tails() {
        let expected = Time::from_hms(9, 15, 0).unwrap();
        assert_eq!(parse_wire_time("09:15:00"), Some(expected));
        assert_eq!(parse_wire_time("2024-05-01T09:15:00.123Z"), Some(expected));
        assert_eq!(parse_wire_time("09:15:00+03:00"), Some(expected));
        assert_eq!(parse_wire_time("9:15"), None);
        assert_eq!(parse_wire_time("soon"), None);
    }

    #[test]
    fn identified_at_falls_back_to_midnight_without_a_clock() {
        let record: AnalysisRecord = serde_json::from_str(
            r#"{"tipo_ruido": "dog", "data_identificacao": "2024-05-01", "horario_identificacao": "???"}"#,
        )
        .unwrap();
        let stamp = record.identified_at().unwrap();
        assert_eq!(stamp.time(), Time::MIDNIGHT);
    }

    #[test]
    fn upload_reports_unwrap_the_results_envelope() {
        let report: UploadReport = serde_json::from_str(
            r#"{
                "analysis_results": {
                    "predicted_class": "dog",
                    "tempo_resposta": 0.92,
                    "saved_id": "abc123",
                    "spectrogram_base64": "spectrograms/latido.png",
                    "waveform_base64": "",
                    "audio_vector": "audio/latido.wav"
                },
                "id": "abc123",
                "message": "ok"
            }"#,
        )
        .unwrap();

        assert_eq!(report.analysis.predicted_label(), Some("dog"));
        assert_eq!(report.analysis.response_time_s, 0.92);
        assert_eq!(
            report.analysis.spectrogram_path(),
            Some("spectrograms/latido.png")
        );
        assert_eq!(report.analysis.waveform_path(), None);
        assert_eq!(report.analysis.audio_path(), Some("audio/latido.wav"));
    }

    #[test]
    fn blank_predictions_read_as_unidentified() {
        let analysis = UploadAnalysis {
            predicted_class: "   ".to_string(),
            ..UploadAnalysis::default()
        };
        assert_eq!(analysis.predicted_label(), None);
    }
}
