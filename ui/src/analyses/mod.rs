//! Everything downstream of the record list: filtering, aggregation,
//! charts, the dashboard and the exports.

pub mod charts;
pub mod dashboard;
pub mod detail;
pub mod export;
pub mod filter;
pub mod list;
pub mod stats;

use crate::core::api::ApiClient;
use crate::core::model::AnalysisRecord;

/// What a view holds once a listing fetch settles.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysesState {
    pub records: Vec<AnalysisRecord>,
    pub error: Option<String>,
}

impl AnalysesState {
    /// Fetches up to `limit` records and orders them newest first. A
    /// failure lands in `error` so the view keeps its shell and can offer
    /// a retry.
    pub async fn load(limit: Option<usize>) -> Self {
        match ApiClient::from_env().fetch_analyses(limit).await {
            Ok(mut records) => {
                filter::sort_newest_first(&mut records);
                AnalysesState {
                    records,
                    error: None,
                }
            }
            Err(err) => {
                log::warn!("analysis listing fetch failed: {err}");
                AnalysesState {
                    records: Vec::new(),
                    error: Some(format!("Couldn't load analyses: {err}")),
                }
            }
        }
    }
}
