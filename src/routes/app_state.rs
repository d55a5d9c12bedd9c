use std::sync::Arc;

use crate::agent::AgentBackend;
use crate::google::{CalendarStore, TaskStore};
use crate::session_registry::SessionRegistry;

/// Shared application state: the per-user session registry plus the
/// remote collaborators behind their trait seams.
#[derive(Clone)]
pub struct AppState {
    pub registry: SessionRegistry,
    pub tasks: Arc<dyn TaskStore>,
    pub calendar: Arc<dyn CalendarStore>,
    pub agent: Arc<dyn AgentBackend>,
}
