use dioxus::prelude::*;

use ui::components::app_navbar::{register_nav, NavBuilder};
use ui::components::AppNavbar;
use ui::core::session::{self, Session};
use ui::views::{Analyses, AnalysisDetail, Dashboard, Home, Login, Support, Upload};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(WebShell)]
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

const MAIN_CSS_INLINE: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../ui/assets/theme/main.css"));

fn nav_home(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::Home {},
        "{label}"
    })
}
fn nav_analyses(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::Analyses {},
        "{label}"
    })
}
fn nav_dashboard(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::Dashboard {},
        "{label}"
    })
}
fn nav_upload(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::Upload {},
        "{label}"
    })
}
fn nav_support(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::Support {},
        "{label}"
    })
}
fn nav_login(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::Login {},
        "{label}"
    })
}
fn nav_detail(id: &str, label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::AnalysisDetail { id: id.to_string() },
        "{label}"
    })
}

fn main() {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
    }

    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    let session = use_context_provider(|| Signal::new(Session::restore()));
    use_future(move || session::revalidate(session));

    // Register routed link builders for the shared navbar.
    register_nav(NavBuilder {
        home: nav_home,
        analyses: nav_analyses,
        dashboard: nav_dashboard,
        upload: nav_upload,
        support: nav_support,
        login: nav_login,
        detail: nav_detail,
    });

    rsx! {
        // Global app resources
        document::Style { {MAIN_CSS_INLINE} }

        Router::<Route> {}
    }
}

/// A web-specific frame around the shared `AppNavbar` component
/// which allows us to use the web-specific `Route` enum. It also
/// gates the signed-in routes behind the session.
#[component]
fn WebShell() -> Element {
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
