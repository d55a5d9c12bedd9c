use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use mockall::mock;
use tokio::sync::Mutex;

use smartsolve::agent::{AgentBackend, ChatTurn, OptimizeRequest};
use smartsolve::config;
use smartsolve::error::CoreError;
use smartsolve::models::chat_session::{ChatSession, SessionPhase};
use smartsolve::models::insight::Insight;
use smartsolve::models::message::Role;
use smartsolve::models::task::PriorityTask;
use smartsolve::services::chat_service;

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

fn alice_session() -> Arc<Mutex<ChatSession>> {
    Arc::new(Mutex::new(ChatSession::new("alice@example.com", "alice")))
}

/// A mock agent that echoes every chat turn and records what it saw.
fn echo_agent(seen: Arc<StdMutex<Vec<ChatTurn>>>) -> MockAgent {
    let mut agent = MockAgent::new();
    agent
        .expect_create_session()
        .returning(|_| Ok("s1".to_string()));
    agent.expect_chat().returning(move |turn| {
        seen.lock().unwrap().push(turn.clone());
        Ok(format!("reply to: {}", turn.message))
    });
    agent
}

#[tokio::test]
async fn intro_precedes_user_turns_and_history_keeps_insertion_order() {
    let seen: Arc<StdMutex<Vec<ChatTurn>>> = Arc::new(StdMutex::new(Vec::new()));
    let agent: Arc<dyn AgentBackend> = Arc::new(echo_agent(seen.clone()));
    let session = alice_session();

    chat_service::initialize(&agent, &session).await.unwrap();
    chat_service::send_message(&agent, &session, "first question")
        .await
        .unwrap();
    chat_service::send_message(&agent, &session, "second question")
        .await
        .unwrap();

    let s = session.lock().await;
    assert_eq!(s.phase, SessionPhase::Ready);
    assert_eq!(s.session_id.as_deref(), Some("s1"));
    assert!(!s.thinking);

    // Intro renders no user bubble: the visible history starts with the
    // assistant's reply to it, then strictly alternates.
    let roles: Vec<Role> = s.history.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![
            Role::Assistant,
            Role::User,
            Role::Assistant,
            Role::User,
            Role::Assistant
        ]
    );
    assert!(s.history[0].content.contains("alice@example.com"));
    assert_eq!(s.history[1].content, "first question");
    assert_eq!(s.history[2].content, "reply to: first question");
    assert_eq!(s.history[3].content, "second question");
    assert_eq!(s.history[4].content, "reply to: second question");
    // Ids are monotonic in insertion order.
    assert!(s.history.windows(2).all(|w| w[0].id < w[1].id));

    let turns = seen.lock().unwrap();
    assert_eq!(turns.len(), 3);
    // The intro turn carries the user's identity and an empty history.
    assert!(turns[0].message.contains("alice"));
    assert!(turns[0].message.contains("alice@example.com"));
    assert!(turns[0].history.is_empty());
    // Each later turn snapshots prior history only, role+content.
    assert_eq!(turns[1].history.len(), 1);
    assert_eq!(turns[1].history[0].role, "assistant");
    assert_eq!(turns[2].history.len(), 3);
    assert!(turns.iter().all(|t| t.session_id == "s1"));
    assert!(turns.iter().all(|t| t.user_email == "alice@example.com"));
}

#[tokio::test]
async fn failed_session_creation_blocks_sending_without_auto_retry() {
    let mut agent = MockAgent::new();
    agent
        .expect_create_session()
        .times(1)
        .returning(|_| Err(CoreError::SessionInit("ADK connection error".to_string())));
    agent.expect_chat().times(0);
    let agent: Arc<dyn AgentBackend> = Arc::new(agent);
    let session = alice_session();

    let err = chat_service::initialize(&agent, &session).await.unwrap_err();
    assert!(matches!(err, CoreError::SessionInit(_)));

    let s = session.lock().await;
    assert_eq!(s.phase, SessionPhase::Uninitialized);
    assert!(s.session_id.is_none());
    assert!(s.history.is_empty());
    drop(s);

    let err = chat_service::send_message(&agent, &session, "hello")
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::SessionInit(_)));
}

#[tokio::test]
async fn chat_failure_keeps_user_bubble_and_appends_apology() {
    let calls = AtomicUsize::new(0);
    let mut agent = MockAgent::new();
    agent
        .expect_create_session()
        .returning(|_| Ok("s1".to_string()));
    agent.expect_chat().returning(move |_| {
        if calls.fetch_add(1, Ordering::SeqCst) == 0 {
            Ok("hello alice".to_string())
        } else {
            Err(CoreError::Transient("connection reset".to_string()))
        }
    });
    let agent: Arc<dyn AgentBackend> = Arc::new(agent);
    let session = alice_session();

    chat_service::initialize(&agent, &session).await.unwrap();
    chat_service::send_message(&agent, &session, "are you there?")
        .await
        .unwrap();

    let s = session.lock().await;
    assert_eq!(s.history.len(), 3);
    assert_eq!(s.history[1].role, Role::User);
    assert_eq!(s.history[1].content, "are you there?");
    let apology = &s.history[2];
    assert_eq!(apology.role, Role::Assistant);
    assert!(apology.is_error);
    assert_eq!(apology.content, config::CHAT_APOLOGY);
    assert!(!s.thinking);
}

#[tokio::test]
async fn new_session_clears_history_and_reinitializes() {
    let ids = AtomicUsize::new(0);
    let mut agent = MockAgent::new();
    agent.expect_create_session().times(2).returning(move |_| {
        Ok(format!("s{}", ids.fetch_add(1, Ordering::SeqCst) + 1))
    });
    agent
        .expect_chat()
        .returning(|turn| Ok(format!("reply to: {}", turn.message)));
    let agent: Arc<dyn AgentBackend> = Arc::new(agent);
    let session = alice_session();

    chat_service::initialize(&agent, &session).await.unwrap();
    chat_service::send_message(&agent, &session, "before reset")
        .await
        .unwrap();
    assert_eq!(session.lock().await.history.len(), 3);

    chat_service::new_session(&agent, &session).await.unwrap();

    let s = session.lock().await;
    assert_eq!(s.session_id.as_deref(), Some("s2"));
    assert_eq!(s.phase, SessionPhase::Ready);
    // Only the fresh intro reply remains visible.
    assert_eq!(s.history.len(), 1);
    assert_eq!(s.history[0].role, Role::Assistant);
}

#[tokio::test]
async fn injected_prompt_is_consumed_exactly_once() {
    let seen: Arc<StdMutex<Vec<ChatTurn>>> = Arc::new(StdMutex::new(Vec::new()));
    let agent: Arc<dyn AgentBackend> = Arc::new(echo_agent(seen.clone()));
    let session = alice_session();

    // Injected before any session exists: parked, nothing sent.
    chat_service::inject_prompt(&agent, &session, "help me with task Write report")
        .await
        .unwrap();
    assert!(seen.lock().unwrap().is_empty());

    chat_service::initialize(&agent, &session).await.unwrap();

    {
        let s = session.lock().await;
        assert!(s.pending_prompt.is_none());
        // [intro reply, injected prompt, its reply]
        assert_eq!(s.history.len(), 3);
        assert_eq!(s.history[1].content, "help me with task Write report");
    }

    // Re-initializing must not resend the prompt.
    chat_service::initialize(&agent, &session).await.unwrap();
    assert_eq!(session.lock().await.history.len(), 3);
    assert_eq!(seen.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn prompt_injected_when_ready_goes_straight_through() {
    let seen: Arc<StdMutex<Vec<ChatTurn>>> = Arc::new(StdMutex::new(Vec::new()));
    let agent: Arc<dyn AgentBackend> = Arc::new(echo_agent(seen.clone()));
    let session = alice_session();

    chat_service::initialize(&agent, &session).await.unwrap();
    chat_service::inject_prompt(&agent, &session, "what is due today?")
        .await
        .unwrap();

    let s = session.lock().await;
    assert!(s.pending_prompt.is_none());
    assert_eq!(s.history[1].content, "what is due today?");
}
