#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

#[cfg(feature = "desktop")]
use std::path::PathBuf;

#[cfg(feature = "desktop")]
use dioxus::desktop::{tao::window::WindowBuilder, Config};
use dioxus::prelude::*;

use ui::components::app_navbar::{register_nav, NavBuilder};
use ui::components::AppNavbar;
use ui::core::session::{self, Session};

use ui::views::{Analyses, AnalysisDetail, Dashboard, Home, Login, Support, Upload};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(DesktopShell)]
    #[route("/")]
    Home {},
    #[route("/login")]
    Login {},
    #[route("/analyses")]
    Analyses {},
    #[route("/analyses/:id")]
    AnalysisDetail { id: String },
    #[route("/dashboard")]
    Dashboard {},
    #[route("/upload")]
    Upload {},
    #[route("/support")]
    Support {},
}

const MAIN_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
)); // Embedded shared theme (ui/assets/theme/main.css); no separate desktop /assets needed.

#[cfg(feature = "desktop")]
fn main() {
    env_logger::init();

    let resource_dir = resolve_resource_dir();

    // Maximize window on launch (dioxus-desktop 0.6.x: pass a WindowBuilder value)
    LaunchBuilder::desktop()
        .with_cfg(
            Config::new()
                .with_window(
                    WindowBuilder::new()
                        .with_title(format!("Calm Wave – v{}", env!("CARGO_PKG_VERSION")))
                        .with_maximized(true),
                )
                .with_resource_directory(resource_dir),
        )
        .launch(App);
}

#[cfg(all(feature = "server", not(feature = "desktop")))]
fn main() {
    env_logger::init();

    LaunchBuilder::server().launch(App);
}

fn nav_home(label: &str) -> Element {
    rsx!(Link { class: "navbar__link", to: Route::Home {}, "{label}" })
}
fn nav_analyses(label: &str) -> Element {
    rsx!(Link { class: "navbar__link", to: Route::Analyses {}, "{label}" })
}
fn nav_dashboard(label: &str) -> Element {
    rsx!(Link { class: "navbar__link", to: Route::Dashboard {}, "{label}" })
}
fn nav_upload(label: &str) -> Element {
    rsx!(Link { class: "navbar__link", to: Route::Upload {}, "{label}" })
}
fn nav_support(label: &str) -> Element {
    rsx!(Link { class: "navbar__link", to: Route::Support {}, "{label}" })
}
fn nav_login(label: &str) -> Element {
    rsx!(Link { class: "navbar__link", to: Route::Login {}, "{label}" })
}
fn nav_detail(id: &str, label: &str) -> Element {
    rsx!(Link { class: "navbar__link", to: Route::AnalysisDetail { id: id.to_string() }, "{label}" })
}

#[component]
fn App() -> Element {
    let session = use_context_provider(|| Signal::new(Session::restore()));
    use_future(move || session::revalidate(session));

    // Register routed link builders for the shared navbar (desktop).
    register_nav(NavBuilder {
        home: nav_home,
        analyses: nav_analyses,
        dashboard: nav_dashboard,
        upload: nav_upload,
        support: nav_support,
        login: nav_login,
        detail: nav_detail,
    });

    // Runtime maximize fallback (in case initial builder maximize is ignored by WM)
    #[cfg(feature = "desktop")]
    {
        let win = dioxus::desktop::use_window();
        use_effect(move || {
            win.set_maximized(true);
        });
    }

    rsx! {
        // Global app resources
        // Always inline embedded CSS (no external file dependency for desktop builds)
        document::Style { "{MAIN_CSS_INLINE}" }

        Router::<Route> { }
    }
}

#[cfg(feature = "desktop")]
fn resolve_resource_dir() -> PathBuf {
    #[cfg(debug_assertions)]
    {
        // During `cargo run` / `dx serve` load straight from the shared ui crate.
        PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../ui/assets"))
    }

    #[cfg(not(debug_assertions))]
    {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join("assets")))
            .unwrap_or_else(|| PathBuf::from("assets"))
    }
}

/// A desktop-specific Router around the shared `AppNavbar` component
/// which allows us to use the desktop-specific `Route` enum. The same
/// session gate as the web shell keeps signed-out users on the public
/// pages.
#[component]
fn DesktopShell() -> Element {
    let session = use_context::<Signal<Session>>();
    let route = use_route::<Route>();

    let authed = session.read().is_authenticated();
    let public = matches!(route, Route::Home {} | Route::Login {});

    if !authed && !public {
        navigator().replace(Route::Login {});
        return rsx! {
            section { class: "page",
                p { class: "page__loading", "Redirecting to sign in…" }
            }
        };
    }
    if authed && matches!(route, Route::Login {}) {
        navigator().replace(Route::Home {});
        return rsx! {
            section { class: "page",
                p { class: "page__loading", "Redirecting…" }
            }
        };
    }

    rsx! {
        AppNavbar { }

        Outlet::<Route> {}
    }
}
