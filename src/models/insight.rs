use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// An AI-generated suggestion derived from current tasks and events.
/// Transient: regenerated on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightErrorCode {
    QuotaExceeded,
    Generic,
}

/// User-facing insight failure, kept distinct from the insight itself so
/// the dashboard can offer a retry with quota-specific messaging.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightError {
    pub code: InsightErrorCode,
    pub message: String,
}

impl From<&CoreError> for InsightError {
    fn from(error: &CoreError) -> Self {
        match error {
            CoreError::QuotaExceeded(message) => InsightError {
                code: InsightErrorCode::QuotaExceeded,
                message: message.clone(),
            },
            other => InsightError {
                code: InsightErrorCode::Generic,
                message: other.to_string(),
            },
        }
    }
}
