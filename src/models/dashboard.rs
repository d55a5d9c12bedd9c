use std::collections::HashSet;

use serde::Serialize;
use uuid::Uuid;

use crate::models::event::CalendarEvent;
use crate::models::insight::{Insight, InsightError};
use crate::models::task::{PriorityTask, Task};

/// In-memory source of truth for what the dashboard renders. Mutated only
/// by the aggregator and mutation-coordinator services; the remote store
/// remains authoritative and state is eventually reconciled against it.
#[derive(Debug)]
pub struct DashboardState {
    pub pending: Vec<Task>,
    pub completed: Vec<Task>,
    pub events: Vec<CalendarEvent>,
    pub priority_tasks: Vec<PriorityTask>,
    pub insight: Option<Insight>,
    pub insight_error: Option<InsightError>,
    /// Task ids with a completion request currently in flight. At most
    /// one completion per id at a time.
    pub completing: HashSet<String>,
    /// Optimistic completions awaiting their delayed reconciliation
    /// fetch. Kept observable so convergence can be asserted in tests.
    pub reconcile_pending: usize,
    /// Guard for the combined initial load; set for its whole duration
    /// and cleared on every exit path.
    pub load_in_flight: bool,
    pub loaded: bool,
    pub loading_events: bool,
    pub loading_tasks: bool,
    pub loading_insight: bool,
    /// Copied from the credential at login. Fetch results carrying a
    /// different epoch are stale and must not be applied.
    pub epoch: Uuid,
}

impl DashboardState {
    pub fn new(epoch: Uuid) -> Self {
        DashboardState {
            pending: Vec::new(),
            completed: Vec::new(),
            events: Vec::new(),
            priority_tasks: Vec::new(),
            insight: None,
            insight_error: None,
            completing: HashSet::new(),
            reconcile_pending: 0,
            load_in_flight: false,
            loaded: false,
            loading_events: false,
            loading_tasks: false,
            loading_insight: false,
            epoch,
        }
    }

    pub fn stats(&self) -> DashboardStats {
        let pending_count = self.pending.len();
        let completed_count = self.completed.len();
        let total = pending_count + completed_count;
        // Base 50% plus completion-weighted half, capped at 100.
        let efficiency_score = if total > 0 {
            let earned = (completed_count as f64 / total as f64 * 50.0).round() as u32;
            (50 + earned).min(100)
        } else {
            50
        };
        DashboardStats {
            pending_count,
            completed_count,
            efficiency_score,
            next_deadline: self.events.first().cloned(),
        }
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            pending: self.pending.clone(),
            completed: self.completed.clone(),
            events: self.events.clone(),
            priority_tasks: self.priority_tasks.clone(),
            insight: self.insight.clone(),
            insight_error: self.insight_error.clone(),
            stats: self.stats(),
            loading: self.load_in_flight || self.loading_tasks || self.loading_events,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub pending_count: usize,
    pub completed_count: usize,
    pub efficiency_score: u32,
    pub next_deadline: Option<CalendarEvent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub pending: Vec<Task>,
    pub completed: Vec<Task>,
    pub events: Vec<CalendarEvent>,
    pub priority_tasks: Vec<PriorityTask>,
    pub insight: Option<Insight>,
    pub insight_error: Option<InsightError>,
    pub stats: DashboardStats,
    pub loading: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::Task;

    #[test]
    fn efficiency_score_defaults_to_base() {
        let state = DashboardState::new(Uuid::new_v4());
        assert_eq!(state.stats().efficiency_score, 50);
    }

    #[test]
    fn efficiency_score_caps_at_hundred() {
        let mut state = DashboardState::new(Uuid::new_v4());
        state.completed = vec![Task::stub("t1", "done"), Task::stub("t2", "done too")];
        assert_eq!(state.stats().efficiency_score, 100);
    }

    #[test]
    fn efficiency_score_is_completion_weighted() {
        let mut state = DashboardState::new(Uuid::new_v4());
        state.pending = vec![Task::stub("t1", "open")];
        state.completed = vec![Task::stub("t2", "done")];
        // 50 + round(1/2 * 50) = 75
        assert_eq!(state.stats().efficiency_score, 75);
    }
}
