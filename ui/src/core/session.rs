//! Session token lifecycle.
//!
//! Web builds keep the token in `localStorage`, in the same `token` slot
//! the classic front-end used, so an existing browser session carries over.
//! Desktop builds keep a small file under the per-user data directory. The
//! active [`Session`] is shared through context as `Signal<Session>`; the
//! shells provide it and gate the protected routes on it.

use dioxus::prelude::*;

use crate::core::auth::AuthClient;
use crate::core::platform;

#[cfg(target_arch = "wasm32")]
const STORAGE_SLOT: &str = "token";

/// Authentication state shared by every view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    /// Restores the previously stored token, if any.
    pub fn restore() -> Self {
        let token = load_token();
        if token.is_some() {
            log::info!("restored stored session ({})", platform::platform_label());
        }
        Self { token }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Starts a session with a freshly issued token and persists it.
    pub fn begin(&mut self, token: String) {
        store_token(&token);
        self.token = Some(token);
        log::info!("session started");
    }

    /// Ends the session and clears the stored token.
    pub fn end(&mut self) {
        clear_token();
        self.token = None;
        log::info!("session ended");
    }
}

/// Re-checks a restored token against the account service, ending the
/// session when the service rejects it. Transport failures leave the
/// session alone so a flaky network cannot sign the user out.
pub async fn revalidate(mut session: Signal<Session>) {
    let Some(token) = session.peek().token().map(str::to_string) else {
        return;
    };
    match AuthClient::from_env().validate_token(&token).await {
        Ok(true) => {}
        Ok(false) => {
            log::info!("stored session token rejected, signing out");
            session.write().end();
        }
        Err(err) => log::warn!("token validation unavailable: {err}"),
    }
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

#[cfg(target_arch = "wasm32")]
fn load_token() -> Option<String> {
    let storage = local_storage()?;
    storage
        .get_item(STORAGE_SLOT)
        .ok()
        .flatten()
        .filter(|token| !token.trim().is_empty())
}

#[cfg(target_arch = "wasm32")]
fn store_token(token: &str) {
    if let Some(storage) = local_storage() {
        if storage.set_item(STORAGE_SLOT, token).is_err() {
            log::warn!("couldn't persist the session token");
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn clear_token() {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(STORAGE_SLOT);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn token_path() -> Option<std::path::PathBuf> {
    platform::data_dir().map(|dir| dir.join("session_token"))
}

#[cfg(not(target_arch = "wasm32"))]
fn load_token() -> Option<String> {
    read_token_file(&token_path()?)
}

#[cfg(not(target_arch = "wasm32"))]
fn store_token(token: &str) {
    let Some(path) = token_path() else {
        log::warn!("no data directory for the session token");
        return;
    };
    if let Err(err) = write_token_file(&path, token) {
        log::warn!("couldn't persist the session token: {err}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn clear_token() {
    if let Some(path) = token_path() {
        let _ = std::fs::remove_file(path);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn read_token_file(path: &std::path::Path) -> Option<String> {
    let raw = std::fs::read_to_string(path).ok()?;
    let token = raw.trim().to_string();
    (!token.is_empty()).then_some(token)
}

#[cfg(not(target_arch = "wasm32"))]
fn write_token_file(path: &std::path::Path, token: &str) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| err.to_string())?;
    }
    std::fs::write(path, token).map_err(|err| err.to_string())
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn token_files_round_trip() {
        let dir = std::env::temp_dir().join("calmwave-session-round-trip");
        let path = dir.join("session_token");
        write_token_file(&path, "abc123").unwrap();
        assert_eq!(read_token_file(&path), Some("abc123".to_string()));
        std::fs::remove_file(&path).unwrap();
        assert_eq!(read_token_file(&path), None);
        let _ = std::fs::remove_dir(&dir);
    }

    #[test]
    fn blank_token_files_read_as_none() {
        let dir = std::env::temp_dir().join("calmwave-session-blank");
        let path = dir.join("session_token");
        write_token_file(&path, "  \n").unwrap();
        assert_eq!(read_token_file(&path), None);
        let _ = std::fs::remove_file(&path);
        let _ = std::fs::remove_dir(&dir);
    }

    #[test]
    fn fresh_sessions_are_signed_out() {
        let session = Session::default();
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
    }
}
