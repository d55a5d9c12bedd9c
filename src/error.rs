/// The closed set of failure kinds the core can surface. Downstream code
/// switches on these variants instead of inspecting response shapes.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Retryable transport-level failure; no state was changed.
    #[error("{0}")]
    Transient(String),

    /// Likely-expired credential; the user must re-authenticate.
    #[error("{0}")]
    Permission(String),

    /// Backend-imposed rate limit; retry after a user-chosen delay.
    #[error("{0}")]
    QuotaExceeded(String),

    /// A response was missing an expected field.
    #[error("{0}")]
    MalformedResponse(String),

    /// No session id could be obtained; message sending is blocked.
    #[error("{0}")]
    SessionInit(String),
}

impl CoreError {
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::Transient(_) => "transient",
            CoreError::Permission(_) => "permission",
            CoreError::QuotaExceeded(_) => "quota_exceeded",
            CoreError::MalformedResponse(_) => "malformed_response",
            CoreError::SessionInit(_) => "session_init",
        }
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(error: reqwest::Error) -> Self {
        CoreError::Transient(error.to_string())
    }
}
