use std::sync::Arc;

use actix_files::Files;
use actix_web::{middleware::Logger, web, App, HttpServer};

use smartsolve::agent::AgentClient;
use smartsolve::google::GoogleClient;
use smartsolve::routes::{self, app_state::AppState};
use smartsolve::session_registry::SessionRegistry;
use smartsolve::{config, error::CoreError};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    config::init_logging();

    let state = build_state().map_err(std::io::Error::other)?;

    let (host, port) = config::bind_addr();
    log::info!("Starting server on http://{}:{}", host, port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(routes::init)
            // Serve the dashboard frontend from "./static".
            .service(Files::new("/", "./static").index_file("index.html"))
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}

fn build_state() -> Result<AppState, CoreError> {
    let google = Arc::new(GoogleClient::new()?);
    let agent = Arc::new(AgentClient::new(&config::backend_url())?);
    Ok(AppState {
        registry: SessionRegistry::new(),
        tasks: google.clone(),
        calendar: google,
        agent,
    })
}
