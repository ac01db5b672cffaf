//! Wire types for the stylization service JSON bodies.

use serde::{Deserialize, Serialize};

use crate::core::occasion::Occasion;

/// Lifecycle of one stylization job. `Succeeded` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStatus {
    Pending,
    Succeeded,
    Failed,
}

impl PredictionStatus {
    /// The service reports job phases as free-form strings; anything that is
    /// not an explicit terminal state keeps the job pending.
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "succeeded" => PredictionStatus::Succeeded,
            "failed" => PredictionStatus::Failed,
            _ => PredictionStatus::Pending,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PredictionStatus::Succeeded | PredictionStatus::Failed)
    }
}

/// `POST /stylize` success body.
#[derive(Debug, Clone, Deserialize)]
pub struct StylizeResponse {
    pub predictions: Vec<PredictionPayload>,
}

/// One job handle inside a stylize response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionPayload {
    pub prediction_id: String,
    pub occasion: Occasion,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// `GET <status route>/{predictionId}` success body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl StatusResponse {
    pub fn status(&self) -> PredictionStatus {
        self.status
            .as_deref()
            .map(PredictionStatus::parse)
            .unwrap_or(PredictionStatus::Pending)
    }
}

/// Structured failure body the service sends with non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Picks the user-facing message for a failed request: the server's
/// structured error when the body carries one, else the given fallback.
pub fn error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|parsed| parsed.error)
        .unwrap_or_else(|_| fallback.to_string())
}
