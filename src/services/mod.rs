pub mod auth_service;
pub mod chat_service;
pub mod dashboard_service;
pub mod insight_service;
pub mod task_service;
