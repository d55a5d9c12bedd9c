pub mod app_state;
pub mod auth_routes;
pub mod chat_routes;
pub mod dashboard_routes;

use actix_web::web;

pub fn init(cfg: &mut web::ServiceConfig) {
    auth_routes::init_routes(cfg);
    dashboard_routes::init_routes(cfg);
    chat_routes::init_routes(cfg);
}
