//! Platform-neutral plumbing shared by every view.

pub mod api;
pub mod auth;
pub mod config;
pub mod format;
pub mod grouping;
pub mod model;
pub mod platform;
pub mod session;
pub mod status;
pub mod timing;
