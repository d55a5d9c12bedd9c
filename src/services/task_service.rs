use std::sync::Arc;
use std::time::Duration;

use log::info;
use tokio::sync::Mutex;

use crate::config;
use crate::error::CoreError;
use crate::google::TaskStore;
use crate::models::credential::Credential;
use crate::models::dashboard::DashboardState;
use crate::services::dashboard_service;

/// Completes a task against the remote store with an optimistic local
/// update.
///
/// The task id is marked in flight for the whole attempt (a second call
/// for the same id is a no-op until the first resolves). On a successful
/// patch the task moves from `pending` to the front of `completed`
/// before the store is guaranteed durable, and a silent re-fetch is
/// scheduled after a fixed delay to reconcile against propagation lag.
/// On failure nothing moves and the task stays eligible for retry.
pub async fn complete_task(
    state: &Arc<Mutex<DashboardState>>,
    store: &Arc<dyn TaskStore>,
    credential: &Credential,
    task_id: &str,
) -> Result<(), CoreError> {
    {
        let mut st = state.lock().await;
        if !st.completing.insert(task_id.to_string()) {
            info!("Completion already in flight for task {}", task_id);
            return Ok(());
        }
    }

    let outcome = match store.mark_completed(credential, task_id).await {
        Ok(()) => {
            let mut st = state.lock().await;
            if let Some(pos) = st.pending.iter().position(|t| t.id == task_id) {
                let task = st.pending.remove(pos);
                st.completed.insert(0, task);
            }
            st.reconcile_pending += 1;
            drop(st);
            schedule_reconcile(state.clone(), store.clone(), credential.clone());
            Ok(())
        }
        Err(e) => Err(e),
    };

    // Cleared on every exit path, success or not.
    state.lock().await.completing.remove(task_id);
    outcome
}

/// The sole correction mechanism for the optimistic window: a delayed
/// silent re-fetch. If the store has not converged by then, the next
/// explicit refresh corrects the divergence instead.
fn schedule_reconcile(
    state: Arc<Mutex<DashboardState>>,
    store: Arc<dyn TaskStore>,
    credential: Credential,
) {
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(config::RECONCILE_DELAY_MS)).await;
        dashboard_service::fetch_tasks(&state, &store, &credential, true).await;
        let mut st = state.lock().await;
        st.reconcile_pending = st.reconcile_pending.saturating_sub(1);
    });
}
