use actix_web::{web, HttpResponse};
use log::error;
use serde_json::json;

use crate::handlers::{error_response, not_authenticated};
use crate::routes::app_state::AppState;
use crate::services::{dashboard_service, insight_service, task_service};

/// Returns the dashboard snapshot, running the combined initial load
/// first if no data has been aggregated yet.
pub async fn snapshot(data: web::Data<AppState>, user_email: &str) -> HttpResponse {
    let Some(user) = data.registry.get(user_email) else {
        return not_authenticated();
    };

    let needs_load = {
        let st = user.dashboard.lock().await;
        !st.loaded && !st.load_in_flight
    };
    if needs_load {
        dashboard_service::initial_load(
            &user.dashboard,
            &data.tasks,
            &data.calendar,
            &data.agent,
            &user.credential,
        )
        .await;
    }

    let st = user.dashboard.lock().await;
    HttpResponse::Ok().json(st.snapshot())
}

pub async fn refresh(data: web::Data<AppState>, user_email: &str) -> HttpResponse {
    let Some(user) = data.registry.get(user_email) else {
        return not_authenticated();
    };
    tokio::join!(
        dashboard_service::fetch_events(&user.dashboard, &data.calendar, &user.credential, false),
        dashboard_service::fetch_tasks(&user.dashboard, &data.tasks, &user.credential, false)
    );
    let st = user.dashboard.lock().await;
    HttpResponse::Ok().json(st.snapshot())
}

pub async fn complete_task(
    data: web::Data<AppState>,
    user_email: &str,
    task_id: &str,
) -> HttpResponse {
    let Some(user) = data.registry.get(user_email) else {
        return not_authenticated();
    };
    match task_service::complete_task(&user.dashboard, &data.tasks, &user.credential, task_id)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(json!({ "completed": task_id })),
        Err(e) => {
            error!("Failed to complete task {}: {}", task_id, e);
            error_response(&e)
        }
    }
}

/// Manual insight retry; responds with whichever of insight or error the
/// attempt produced.
pub async fn retry_insight(data: web::Data<AppState>, user_email: &str) -> HttpResponse {
    let Some(user) = data.registry.get(user_email) else {
        return not_authenticated();
    };
    insight_service::retry_insight(&user.dashboard, &data.agent, user_email).await;
    let st = user.dashboard.lock().await;
    HttpResponse::Ok().json(json!({
        "insight": st.insight,
        "insight_error": st.insight_error,
    }))
}

pub async fn priority_tasks(data: web::Data<AppState>, user_email: &str) -> HttpResponse {
    let Some(user) = data.registry.get(user_email) else {
        return not_authenticated();
    };
    dashboard_service::fetch_priority_tasks(&user.dashboard, &data.agent, &user.credential).await;
    let st = user.dashboard.lock().await;
    HttpResponse::Ok().json(json!({ "tasks": st.priority_tasks }))
}
