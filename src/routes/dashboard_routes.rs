use actix_web::{get, post, web, Responder};
use serde::Deserialize;

use crate::routes::app_state::AppState;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(snapshot)
        .service(refresh)
        .service(complete_task)
        .service(retry_insight)
        .service(priority_tasks);
}

#[derive(Deserialize)]
struct UserQuery {
    user_email: String,
}

#[derive(Deserialize)]
struct UserBody {
    user_email: String,
}

#[derive(Deserialize)]
struct CompleteTaskBody {
    user_email: String,
    task_id: String,
}

#[get("/api/dashboard")]
async fn snapshot(data: web::Data<AppState>, query: web::Query<UserQuery>) -> impl Responder {
    crate::handlers::dashboard_handler::snapshot(data, &query.user_email).await
}

#[post("/api/dashboard/refresh")]
async fn refresh(data: web::Data<AppState>, body: web::Json<UserBody>) -> impl Responder {
    crate::handlers::dashboard_handler::refresh(data, &body.user_email).await
}

#[post("/api/tasks/complete")]
async fn complete_task(
    data: web::Data<AppState>,
    body: web::Json<CompleteTaskBody>,
) -> impl Responder {
    crate::handlers::dashboard_handler::complete_task(data, &body.user_email, &body.task_id).await
}

#[post("/api/insight/retry")]
async fn retry_insight(data: web::Data<AppState>, body: web::Json<UserBody>) -> impl Responder {
    crate::handlers::dashboard_handler::retry_insight(data, &body.user_email).await
}

#[get("/api/priority_tasks")]
async fn priority_tasks(
    data: web::Data<AppState>,
    query: web::Query<UserQuery>,
) -> impl Responder {
    crate::handlers::dashboard_handler::priority_tasks(data, &query.user_email).await
}
