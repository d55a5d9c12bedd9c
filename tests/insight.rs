use std::sync::Arc;

use async_trait::async_trait;
use mockall::mock;
use tokio::sync::Mutex;
use uuid::Uuid;

use smartsolve::agent::{AgentBackend, ChatTurn, OptimizeRequest};
use smartsolve::error::CoreError;
use smartsolve::models::dashboard::DashboardState;
use smartsolve::models::event::{CalendarEvent, EventTime};
use smartsolve::models::insight::{Insight, InsightErrorCode};
use smartsolve::models::task::{PriorityTask, Task};
use smartsolve::services::insight_service;

mock! {
    pub Agent {}

    #[async_trait]
    impl AgentBackend for Agent {
        async fn fetch_token(&self, user_email: &str) -> Result<String, CoreError>;
        async fn create_session(&self, user_email: &str) -> Result<String, CoreError>;
        async fn chat(&self, turn: &ChatTurn) -> Result<String, CoreError>;
        async fn optimize(&self, request: &OptimizeRequest) -> Result<Insight, CoreError>;
        async fn priority_tasks(&self, user_email: &str) -> Result<Vec<PriorityTask>, CoreError>;
    }
}

fn task(id: &str, title: &str) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        due: None,
        notes: None,
    }
}

fn event(summary: &str) -> CalendarEvent {
    CalendarEvent {
        id: "e1".to_string(),
        summary: summary.to_string(),
        start: EventTime::default(),
        end: EventTime::default(),
    }
}

fn fresh_state() -> Arc<Mutex<DashboardState>> {
    Arc::new(Mutex::new(DashboardState::new(Uuid::new_v4())))
}

#[tokio::test]
async fn nothing_to_optimize_sends_nothing() {
    let state = fresh_state();

    let mut agent = MockAgent::new();
    agent.expect_optimize().times(0);
    let agent: Arc<dyn AgentBackend> = Arc::new(agent);

    insight_service::request_insight(&state, &agent, &[], &[], "alice@example.com").await;

    let st = state.lock().await;
    assert!(st.insight.is_none());
    assert!(st.insight_error.is_none());
    assert!(!st.loading_insight);
}

#[tokio::test]
async fn quota_failure_surfaces_the_server_message() {
    let state = fresh_state();

    let mut agent = MockAgent::new();
    agent
        .expect_optimize()
        .times(1)
        .returning(|_| Err(CoreError::QuotaExceeded("slow down".to_string())));
    let agent: Arc<dyn AgentBackend> = Arc::new(agent);

    let tasks = vec![task("t1", "Write report")];
    insight_service::request_insight(&state, &agent, &tasks, &[], "alice@example.com").await;

    let st = state.lock().await;
    let err = st.insight_error.as_ref().unwrap();
    assert_eq!(err.code, InsightErrorCode::QuotaExceeded);
    assert_eq!(err.message, "slow down");
    assert!(st.insight.is_none());
    assert!(!st.loading_insight);
}

#[tokio::test]
async fn success_replaces_a_prior_error() {
    let state = fresh_state();

    let mut agent = MockAgent::new();
    let mut seq = mockall::Sequence::new();
    agent
        .expect_optimize()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Err(CoreError::Transient("optimize request failed".to_string())));
    agent
        .expect_optimize()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| {
            Ok(Insight {
                kind: "Optimization Suggestion".to_string(),
                message: "Batch the errands".to_string(),
            })
        });
    let agent: Arc<dyn AgentBackend> = Arc::new(agent);

    let tasks = vec![task("t1", "Errands")];
    insight_service::request_insight(&state, &agent, &tasks, &[], "alice@example.com").await;
    {
        let st = state.lock().await;
        let err = st.insight_error.as_ref().unwrap();
        assert_eq!(err.code, InsightErrorCode::Generic);
    }

    insight_service::request_insight(&state, &agent, &tasks, &[], "alice@example.com").await;

    let st = state.lock().await;
    assert_eq!(st.insight.as_ref().unwrap().message, "Batch the errands");
    assert!(st.insight_error.is_none());
}

#[tokio::test]
async fn retry_reissues_from_held_collections() {
    let state = fresh_state();
    {
        let mut st = state.lock().await;
        st.pending = vec![task("t1", "Write report")];
        st.events = vec![event("Standup")];
        st.insight_error = Some(smartsolve::models::insight::InsightError {
            code: InsightErrorCode::Generic,
            message: "earlier failure".to_string(),
        });
    }

    let mut agent = MockAgent::new();
    agent
        .expect_optimize()
        .withf(|req| {
            req.user_email == "alice@example.com"
                && req.tasks.len() == 1
                && req.tasks[0].title == "Write report"
                && req.events.len() == 1
                && req.events[0].summary == "Standup"
        })
        .times(1)
        .returning(|_| {
            Ok(Insight {
                kind: "Optimization Suggestion".to_string(),
                message: "Finish the report first".to_string(),
            })
        });
    let agent: Arc<dyn AgentBackend> = Arc::new(agent);

    insight_service::retry_insight(&state, &agent, "alice@example.com").await;

    let st = state.lock().await;
    assert_eq!(
        st.insight.as_ref().unwrap().message,
        "Finish the report first"
    );
    assert!(st.insight_error.is_none());
}

#[tokio::test]
async fn retry_with_emptied_dashboard_is_a_no_op() {
    let state = fresh_state();

    let mut agent = MockAgent::new();
    agent.expect_optimize().times(0);
    let agent: Arc<dyn AgentBackend> = Arc::new(agent);

    insight_service::retry_insight(&state, &agent, "alice@example.com").await;

    assert!(state.lock().await.insight.is_none());
}
