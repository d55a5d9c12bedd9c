pub mod chat_session;
pub mod credential;
pub mod dashboard;
pub mod event;
pub mod insight;
pub mod message;
pub mod task;
