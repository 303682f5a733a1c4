//! Shared UI crate for Calm Wave. Cross-platform views, the analysis
//! data layer and the account plumbing live here.

pub mod analyses;
pub mod core;
pub mod upload;
pub mod views;

pub mod components {
    // Session-aware application navbar (components/app_navbar.rs)
    pub mod app_navbar;
    pub use app_navbar::register_nav;
    pub use app_navbar::AppNavbar;
    pub use app_navbar::NavBuilder;
}
