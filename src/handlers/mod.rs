pub mod auth_handler;
pub mod chat_handler;
pub mod dashboard_handler;

use actix_web::HttpResponse;
use serde_json::json;

use crate::error::CoreError;

/// Maps a core error to its HTTP surface. Read-path degradation never
/// reaches this; only mutation, insight, session and chat failures do.
pub fn error_response(error: &CoreError) -> HttpResponse {
    let body = json!({ "error": error.to_string(), "kind": error.kind() });
    match error {
        CoreError::Permission(_) => HttpResponse::Forbidden().json(body),
        CoreError::QuotaExceeded(_) => HttpResponse::TooManyRequests().json(body),
        CoreError::SessionInit(_) => HttpResponse::Conflict().json(body),
        CoreError::Transient(_) | CoreError::MalformedResponse(_) => {
            HttpResponse::BadGateway().json(body)
        }
    }
}

pub fn not_authenticated() -> HttpResponse {
    HttpResponse::Unauthorized().json(json!({ "error": "not authenticated" }))
}
