use actix_web::{web, HttpResponse};
use log::error;
use serde_json::json;

use crate::handlers::error_response;
use crate::routes::app_state::AppState;
use crate::services::auth_service;

/// Completes the auth redirect: exchanges the carried email for a bearer
/// credential and opens a session for it.
pub async fn login(data: web::Data<AppState>, user_email: &str) -> HttpResponse {
    match auth_service::login(&data.agent, &data.registry, user_email).await {
        Ok(user) => HttpResponse::Ok().json(json!({
            "user_email": user.credential.user_email,
            "display_name": user.credential.display_name(),
        })),
        Err(e) => {
            error!("Login failed for {}: {}", user_email, e);
            error_response(&e)
        }
    }
}

pub async fn logout(data: web::Data<AppState>, user_email: &str) -> HttpResponse {
    auth_service::logout(&data.registry, user_email);
    HttpResponse::Ok().json(json!({ "logged_out": true }))
}
