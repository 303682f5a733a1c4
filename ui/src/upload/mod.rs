//! WAV intake and the fresh-analysis result panel.

pub mod view;

/// The classifier only scores WAV audio, so anything else is rejected
/// before a byte leaves the machine.
pub fn is_wav_filename(name: &str) -> bool {
    let lowered = name.trim().to_ascii_lowercase();
    lowered.ends_with(".wav") && lowered.len() > 4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wav_names_are_accepted_case_insensitively() {
        assert!(is_wav_filename("siren.wav"));
        assert!(is_wav_filename("SIREN.WAV"));
        assert!(is_wav_filename("  siren.wav  "));
    }

    #[test]
    fn other_extensions_are_rejected() {
        assert!(!is_wav_filename("siren.mp3"));
        assert!(!is_wav_filename("siren.wav.ogg"));
        assert!(!is_wav_filename("siren"));
    }

    #[test]
    fn an_extension_without_a_stem_is_rejected() {
        assert!(!is_wav_filename(".wav"));
        assert!(!is_wav_filename(""));
    }
}
