use std::sync::Arc;

use log::error;
use tokio::sync::Mutex;

use crate::agent::{AgentBackend, OptimizeRequest};
use crate::models::dashboard::DashboardState;
use crate::models::event::CalendarEvent;
use crate::models::insight::InsightError;
use crate::models::task::Task;

/// Requests an AI insight for the given tasks and events. A call with
/// nothing to optimize is a no-op: no request goes out and no state
/// changes. Concurrent requests are not deduplicated; last write wins.
pub async fn request_insight(
    state: &Arc<Mutex<DashboardState>>,
    agent: &Arc<dyn AgentBackend>,
    tasks: &[Task],
    events: &[CalendarEvent],
    user_email: &str,
) {
    if tasks.is_empty() && events.is_empty() {
        return;
    }

    {
        let mut st = state.lock().await;
        st.loading_insight = true;
        st.insight_error = None;
    }

    let request = OptimizeRequest::project(tasks, events, user_email);
    let result = agent.optimize(&request).await;

    let mut st = state.lock().await;
    match result {
        Ok(insight) => {
            st.insight = Some(insight);
        }
        Err(e) => {
            error!("Error fetching insight: {}", e);
            st.insight_error = Some(InsightError::from(&e));
        }
    }
    st.loading_insight = false;
}

/// Manual retry: re-issues the request with the currently held
/// collections.
pub async fn retry_insight(
    state: &Arc<Mutex<DashboardState>>,
    agent: &Arc<dyn AgentBackend>,
    user_email: &str,
) {
    let (tasks, events) = {
        let st = state.lock().await;
        (st.pending.clone(), st.events.clone())
    };
    request_insight(state, agent, &tasks, &events, user_email).await;
}
