//! Platform glue that differs between the web bundle and the desktop shell.

use std::future::Future;

/// Spawns a fire-and-forget future on the browser task queue.
#[cfg(target_arch = "wasm32")]
pub fn spawn_future<F>(future: F)
where
    F: Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(future);
}

/// Spawns a fire-and-forget future on the Dioxus runtime. Must be called
/// from inside a component or one of its handlers.
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn_future<F>(future: F)
where
    F: Future<Output = ()> + 'static,
{
    dioxus::prelude::spawn(future);
}

/// Short platform tag used in log lines.
pub fn platform_label() -> &'static str {
    if cfg!(target_arch = "wasm32") {
        "web"
    } else {
        "desktop"
    }
}

/// Per-user data directory for the desktop shell. Session tokens and
/// exported files live under here.
#[cfg(not(target_arch = "wasm32"))]
pub fn data_dir() -> Option<std::path::PathBuf> {
    directories::ProjectDirs::from("com", "CalmWave", "CalmWave")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

/// Puts `payload` on the system clipboard.
pub async fn copy_to_clipboard(payload: String) -> Result<(), String> {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;

        let window = web_sys::window().ok_or("window unavailable")?;
        let document = window.document().ok_or("document unavailable")?;
        let body = document.body().ok_or("missing body")?;

        let textarea = document
            .create_element("textarea")
            .map_err(|_| "Unable to create textarea")?
            .dyn_into::<web_sys::HtmlTextAreaElement>()
            .map_err(|_| "Textarea cast failed")?;
        textarea.set_value(&payload);
        let style = textarea.style();
        style.set_property("position", "fixed").ok();
        style.set_property("top", "0").ok();
        style.set_property("left", "0").ok();
        style.set_property("opacity", "0").ok();

        body.append_child(&textarea).ok();
        textarea.select();
        if !document.exec_command("copy").unwrap_or(false) {
            textarea.remove();
            return Err("Clipboard copy blocked".into());
        }
        textarea.remove();
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        use arboard::Clipboard;

        let mut clipboard = Clipboard::new().map_err(|err| err.to_string())?;
        clipboard.set_text(payload).map_err(|err| err.to_string())
    }
}
