use actix_web::{web, HttpResponse};
use log::error;
use serde::Serialize;
use serde_json::json;

use crate::config;
use crate::handlers::{error_response, not_authenticated};
use crate::markup;
use crate::models::chat_session::ChatSession;
use crate::models::message::{Message, Role};
use crate::routes::app_state::AppState;
use crate::services::chat_service;

/// Message as rendered for the conversation view. `html` is produced
/// from the stored content at output time; the raw content rides along
/// untransformed.
#[derive(Serialize)]
struct MessageView {
    id: u64,
    role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'static str>,
    content: String,
    html: String,
    time: String,
    is_error: bool,
}

impl From<&Message> for MessageView {
    fn from(message: &Message) -> Self {
        MessageView {
            id: message.id,
            role: message.role,
            name: match message.role {
                Role::Assistant => Some(config::ASSISTANT_NAME),
                Role::User => None,
            },
            content: message.content.clone(),
            html: markup::render(&message.content),
            time: message.time.clone(),
            is_error: message.is_error,
        }
    }
}

fn session_view(session: &ChatSession) -> HttpResponse {
    let messages: Vec<MessageView> = session.history.iter().map(MessageView::from).collect();
    HttpResponse::Ok().json(json!({
        "session_id": session.session_id,
        "phase": session.phase,
        "thinking": session.thinking,
        "messages": messages,
    }))
}

pub async fn init_session(data: web::Data<AppState>, user_email: &str) -> HttpResponse {
    let Some(user) = data.registry.get(user_email) else {
        return not_authenticated();
    };
    if let Err(e) = chat_service::initialize(&data.agent, &user.chat).await {
        error!("Session init failed for {}: {}", user_email, e);
        return error_response(&e);
    }
    let response = session_view(&*user.chat.lock().await);
    response
}

pub async fn send_message(
    data: web::Data<AppState>,
    user_email: &str,
    message: &str,
) -> HttpResponse {
    let Some(user) = data.registry.get(user_email) else {
        return not_authenticated();
    };
    if message.trim().is_empty() {
        return HttpResponse::BadRequest().json(json!({ "error": "empty message" }));
    }
    if let Err(e) = chat_service::send_message(&data.agent, &user.chat, message).await {
        error!("Chat failed for {}: {}", user_email, e);
        return error_response(&e);
    }
    let response = session_view(&*user.chat.lock().await);
    response
}

pub async fn new_session(data: web::Data<AppState>, user_email: &str) -> HttpResponse {
    let Some(user) = data.registry.get(user_email) else {
        return not_authenticated();
    };
    if let Err(e) = chat_service::new_session(&data.agent, &user.chat).await {
        error!("New session failed for {}: {}", user_email, e);
        return error_response(&e);
    }
    let response = session_view(&*user.chat.lock().await);
    response
}

/// Accepts a dashboard-originated prompt ("help me with task X").
pub async fn inject_prompt(
    data: web::Data<AppState>,
    user_email: &str,
    prompt: &str,
) -> HttpResponse {
    let Some(user) = data.registry.get(user_email) else {
        return not_authenticated();
    };
    if let Err(e) = chat_service::inject_prompt(&data.agent, &user.chat, prompt).await {
        error!("Prompt injection failed for {}: {}", user_email, e);
        return error_response(&e);
    }
    let response = session_view(&*user.chat.lock().await);
    response
}
