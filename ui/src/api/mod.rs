//! Client for the remote stylization service.

mod client;
pub mod types;

pub use client::{prediction_status, submit_outfit, ClientError};

/// Default deployment of the stylization service.
pub const DEFAULT_BASE_URL: &str = "https://outfitdesignserver-production.up.railway.app/api";

/// Path segment used by the status endpoint. Alternate deployments expose the
/// same body under `prediction-status`, so the segment is configuration
/// rather than a hardcoded contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusRoute {
    #[default]
    Status,
    PredictionStatus,
}

impl StatusRoute {
    fn segment(self) -> &'static str {
        match self {
            StatusRoute::Status => "status",
            StatusRoute::PredictionStatus => "prediction-status",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub status_route: StatusRoute,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            status_route: StatusRoute::default(),
        }
    }
}

impl ApiConfig {
    pub fn stylize_url(&self) -> String {
        format!("{}/stylize", self.base_url.trim_end_matches('/'))
    }

    pub fn status_url(&self, prediction_id: &str) -> String {
        format!(
            "{}/{}/{prediction_id}",
            self.base_url.trim_end_matches('/'),
            self.status_route.segment()
        )
    }
}
