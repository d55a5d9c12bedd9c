pub mod agent;
pub mod config;
pub mod error;
pub mod google;
pub mod handlers;
pub mod markup;
pub mod models;
pub mod routes;
pub mod services;
pub mod session_registry;
