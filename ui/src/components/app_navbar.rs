use dioxus::prelude::*;
use once_cell::sync::OnceCell;

use crate::core::session::Session;

const NAVBAR_CSS: Asset = asset!("/assets/styling/navbar.css");
const NAVBAR_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/styling/navbar.css"
));

/// Platforms register a `NavBuilder` providing fully constructed `Link`
/// elements, so `ui` never needs to know each platform's `Route` enum.
///
/// Each closure receives the label to render inside the link; `detail`
/// additionally receives the record id to route to.
///
/// Wiring a platform crate (web/desktop):
/// 1. Define a function returning `NavBuilder` where each closure builds a
///    `Link { to: Route::..., class: "navbar__link", ... }`.
/// 2. Call `ui::components::app_navbar::register_nav(builder)` at the top
///    of `App()`, before the first render.
pub struct NavBuilder {
    pub home: fn(label: &str) -> Element,
    pub analyses: fn(label: &str) -> Element,
    pub dashboard: fn(label: &str) -> Element,
    pub upload: fn(label: &str) -> Element,
    pub support: fn(label: &str) -> Element,
    pub login: fn(label: &str) -> Element,
    pub detail: fn(id: &str, label: &str) -> Element,
}

static NAV_BUILDER: OnceCell<NavBuilder> = OnceCell::new();

pub fn register_nav(builder: NavBuilder) {
    let _ = NAV_BUILDER.set(builder);
}

/// Top-level places the navbar (and the views) can link to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTarget {
    Home,
    Analyses,
    Dashboard,
    Upload,
    Support,
    Login,
}

/// A routed link when a builder is registered, an inert span otherwise so
/// the shared views stay renderable in isolation.
pub fn nav_link(target: NavTarget, label: &str) -> Element {
    match NAV_BUILDER.get() {
        Some(builder) => {
            let build = match target {
                NavTarget::Home => builder.home,
                NavTarget::Analyses => builder.analyses,
                NavTarget::Dashboard => builder.dashboard,
                NavTarget::Upload => builder.upload,
                NavTarget::Support => builder.support,
                NavTarget::Login => builder.login,
            };
            build(label)
        }
        None => rsx! {
            span { class: "navbar__link navbar__link--inert", "{label}" }
        },
    }
}

/// Link to one record's detail view.
pub fn detail_link(id: &str, label: &str) -> Element {
    match NAV_BUILDER.get() {
        Some(builder) => (builder.detail)(id, label),
        None => rsx! {
            span { class: "navbar__link navbar__link--inert", "{label}" }
        },
    }
}

#[component]
pub fn AppNavbar() -> Element {
    // The shells provide the session as a context signal; reading it here
    // keeps the link set in step with sign-in state.
    let session_ctx: Option<Signal<Session>> = try_use_context::<Signal<Session>>();
    let authenticated = session_ctx
        .as_ref()
        .map(|session| session().is_authenticated())
        .unwrap_or(false);

    let links: Vec<(NavTarget, &'static str)> = if authenticated {
        vec![
            (NavTarget::Analyses, "Analyses"),
            (NavTarget::Dashboard, "Dashboard"),
            (NavTarget::Upload, "Analyze audio"),
            (NavTarget::Support, "Support"),
        ]
    } else {
        vec![(NavTarget::Home, "Home"), (NavTarget::Login, "Sign in")]
    };

    // Ending the session is enough; the shell's route guard takes over and
    // steers the next render to the login view.
    let sign_out = move |_| {
        if let Some(mut session) = session_ctx {
            session.write().end();
        }
    };

    rsx! {
        document::Link { rel: "stylesheet", href: NAVBAR_CSS }
        if cfg!(all(not(debug_assertions), not(target_arch = "wasm32"))) {
            document::Style { "{NAVBAR_CSS_INLINE}" }
        }

        header {
            id: "navbar",
            class: "navbar",
            div { class: "navbar__inner",
                div { class: "navbar__brand",
                    span { class: "navbar__brand-link",
                        span { class: "navbar__brand-spark", aria_hidden: "true" }
                        span { class: "navbar__brand-mark", "Calm Wave" }
                    }
                    span { class: "navbar__brand-subtitle", "listening for calmer cities" }
                }

                nav { class: "navbar__links",
                    {links.into_iter().map(|(target, label)| nav_link(target, label))}
                    if authenticated {
                        button {
                            r#type: "button",
                            class: "navbar__link navbar__logout",
                            onclick: sign_out,
                            "Sign out"
                        }
                    }
                }
            }
        }
    }
}
