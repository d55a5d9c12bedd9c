use std::sync::Arc;

use log::{error, info};
use tokio::sync::Mutex;

use crate::agent::AgentBackend;
use crate::google::{CalendarStore, TaskStore};
use crate::models::credential::Credential;
use crate::models::dashboard::DashboardState;
use crate::models::event::CalendarEvent;
use crate::models::task::Task;
use crate::services::insight_service;

/// Fetches the upcoming events window. Read-path failures are logged and
/// swallowed: prior state stays untouched and an empty sequence comes
/// back. `silent` only suppresses the loading flag.
pub async fn fetch_events(
    state: &Arc<Mutex<DashboardState>>,
    calendar: &Arc<dyn CalendarStore>,
    credential: &Credential,
    silent: bool,
) -> Vec<CalendarEvent> {
    if !silent {
        state.lock().await.loading_events = true;
    }
    let fetched = match calendar.upcoming_events(credential).await {
        Ok(events) => {
            let mut st = state.lock().await;
            if st.epoch == credential.epoch {
                st.events = events.clone();
            }
            events
        }
        Err(e) => {
            error!("Error fetching events: {}", e);
            Vec::new()
        }
    };
    if !silent {
        state.lock().await.loading_events = false;
    }
    fetched
}

/// Fetches pending and completed tasks and swaps both collections in
/// under one lock acquisition, so no observer sees one fresh and one
/// stale. Returns the pending sequence for composition by callers.
pub async fn fetch_tasks(
    state: &Arc<Mutex<DashboardState>>,
    store: &Arc<dyn TaskStore>,
    credential: &Credential,
    silent: bool,
) -> Vec<Task> {
    if !silent {
        state.lock().await.loading_tasks = true;
    }
    let pending_result = store.list_pending(credential).await;
    let completed_result = store.list_completed(credential).await;
    let fetched = match (pending_result, completed_result) {
        (Ok(pending), Ok(completed)) => {
            let mut st = state.lock().await;
            if st.epoch == credential.epoch {
                st.pending = pending.clone();
                st.completed = completed;
            }
            pending
        }
        (pending, completed) => {
            for err in [pending.err(), completed.err()].into_iter().flatten() {
                error!("Error fetching tasks: {}", err);
            }
            Vec::new()
        }
    };
    if !silent {
        state.lock().await.loading_tasks = false;
    }
    fetched
}

/// Priority ranking is independent of the task store and unordered
/// relative to the other fetches.
pub async fn fetch_priority_tasks(
    state: &Arc<Mutex<DashboardState>>,
    agent: &Arc<dyn AgentBackend>,
    credential: &Credential,
) {
    match agent.priority_tasks(&credential.user_email).await {
        Ok(tasks) => {
            let mut st = state.lock().await;
            if st.epoch == credential.epoch {
                st.priority_tasks = tasks;
            }
        }
        Err(e) => error!("Error fetching priority tasks: {}", e),
    }
}

/// The combined first load: events and tasks fetched concurrently and
/// joined, priority ranking spawned unordered, insight requested only
/// once both inputs are in and at least one is non-empty. Guarded
/// against re-entry by the in-flight flag, cleared on every exit path.
pub async fn initial_load(
    state: &Arc<Mutex<DashboardState>>,
    store: &Arc<dyn TaskStore>,
    calendar: &Arc<dyn CalendarStore>,
    agent: &Arc<dyn AgentBackend>,
    credential: &Credential,
) {
    {
        let mut st = state.lock().await;
        if st.load_in_flight {
            info!("Initial load already in flight for {}", credential.user_email);
            return;
        }
        st.load_in_flight = true;
    }

    let (events, tasks) = tokio::join!(
        fetch_events(state, calendar, credential, true),
        fetch_tasks(state, store, credential, true)
    );

    {
        let state = state.clone();
        let agent = agent.clone();
        let credential = credential.clone();
        tokio::spawn(async move {
            fetch_priority_tasks(&state, &agent, &credential).await;
        });
    }

    if !events.is_empty() || !tasks.is_empty() {
        insight_service::request_insight(state, agent, &tasks, &events, &credential.user_email)
            .await;
    }

    let mut st = state.lock().await;
    st.load_in_flight = false;
    st.loaded = true;
}
