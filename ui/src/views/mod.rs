//! Route-level views shared by the web and desktop shells.

mod analyses;
mod analysis_detail;
mod dashboard;
mod home;
mod login;
mod support;
mod upload;

pub use analyses::Analyses;
pub use analysis_detail::AnalysisDetail;
pub use dashboard::Dashboard;
pub use home::Home;
pub use login::Login;
pub use support::Support;
pub use upload::Upload;
