use actix_web::{get, post, web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;

use crate::routes::app_state::AppState;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health).service(login).service(logout);
}

#[derive(Deserialize)]
struct LoginQuery {
    user_email: String,
}

#[derive(Deserialize)]
struct UserBody {
    user_email: String,
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "OK" }))
}

#[get("/api/login")]
async fn login(data: web::Data<AppState>, query: web::Query<LoginQuery>) -> impl Responder {
    crate::handlers::auth_handler::login(data, &query.user_email).await
}

#[post("/api/logout")]
async fn logout(data: web::Data<AppState>, body: web::Json<UserBody>) -> impl Responder {
    crate::handlers::auth_handler::logout(data, &body.user_email).await
}
