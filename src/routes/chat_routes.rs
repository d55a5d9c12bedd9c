use actix_web::{post, web, Responder};
use serde::Deserialize;

use crate::routes::app_state::AppState;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(init_session)
        .service(send_message)
        .service(new_session)
        .service(inject_prompt);
}

#[derive(Deserialize)]
struct UserBody {
    user_email: String,
}

#[derive(Deserialize)]
struct MessageBody {
    user_email: String,
    message: String,
}

#[derive(Deserialize)]
struct PromptBody {
    user_email: String,
    prompt: String,
}

#[post("/api/chat/init")]
async fn init_session(data: web::Data<AppState>, body: web::Json<UserBody>) -> impl Responder {
    crate::handlers::chat_handler::init_session(data, &body.user_email).await
}

#[post("/api/chat/message")]
async fn send_message(data: web::Data<AppState>, body: web::Json<MessageBody>) -> impl Responder {
    crate::handlers::chat_handler::send_message(data, &body.user_email, &body.message).await
}

#[post("/api/chat/new_session")]
async fn new_session(data: web::Data<AppState>, body: web::Json<UserBody>) -> impl Responder {
    crate::handlers::chat_handler::new_session(data, &body.user_email).await
}

#[post("/api/chat/prompt")]
async fn inject_prompt(data: web::Data<AppState>, body: web::Json<PromptBody>) -> impl Responder {
    crate::handlers::chat_handler::inject_prompt(data, &body.user_email, &body.prompt).await
}
