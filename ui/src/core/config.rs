//! Endpoint configuration for the Calm Wave services.
//!
//! The front-end talks to two HTTP services: the analysis API that owns the
//! audio records and the classifier, and the account service that issues
//! session tokens and receives support tickets. Both bases can be overridden
//! with `CALMWAVE_API_URL` / `CALMWAVE_AUTH_URL`, read from the process
//! environment on desktop and baked in at build time for web bundles.

const DEFAULT_API_BASE: &str = "http://localhost:5000";
const DEFAULT_AUTH_BASE: &str = "http://localhost:3001";

/// Base URLs for the two Calm Wave backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base: String,
    pub auth_base: String,
}

impl AppConfig {
    /// Resolves both bases from the environment, falling back to the local
    /// development defaults.
    pub fn from_env() -> Self {
        Self {
            api_base: resolve(
                "CALMWAVE_API_URL",
                option_env!("CALMWAVE_API_URL"),
                DEFAULT_API_BASE,
            ),
            auth_base: resolve(
                "CALMWAVE_AUTH_URL",
                option_env!("CALMWAVE_AUTH_URL"),
                DEFAULT_AUTH_BASE,
            ),
        }
    }

    /// Joins `path` onto the analysis API base.
    pub fn api_url(&self, path: &str) -> String {
        join(&self.api_base, path)
    }

    /// Joins `path` onto the account service base.
    pub fn auth_url(&self, path: &str) -> String {
        join(&self.auth_base, path)
    }

    /// Public URL of a stored artifact (audio, spectrogram or waveform).
    ///
    /// The analysis API reports artifacts as paths relative to its uploads
    /// directory.
    pub fn artifact_url(&self, path: &str) -> String {
        join(
            &self.api_base,
            &format!("/uploads/{}", path.trim_start_matches('/')),
        )
    }
}

fn resolve(var: &str, baked: Option<&str>, fallback: &str) -> String {
    let value = std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| baked.map(str::to_string))
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string());
    normalize(&value)
}

/// Trims whitespace and trailing slashes so joins stay predictable.
fn normalize(base: &str) -> String {
    base.trim().trim_end_matches('/').to_string()
}

fn join(base: &str, path: &str) -> String {
    format!("{}/{}", base, path.trim_start_matches('/'))
}
