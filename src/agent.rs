use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::{json, Value};

use crate::config;
use crate::error::CoreError;
use crate::models::event::{CalendarEvent, EventTime};
use crate::models::insight::Insight;
use crate::models::task::{PriorityTask, Task};

/// One chat request to the agent: the new message plus the full prior
/// history (role and content only) for backend-side context rebuild.
#[derive(Debug, Clone, Serialize)]
pub struct ChatTurn {
    pub message: String,
    pub user_email: String,
    pub session_id: String,
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub role: String,
    pub content: String,
}

/// Minimized projection sent with an insight request: just enough for
/// the optimizer, nothing else leaves the client.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizeRequest {
    pub tasks: Vec<TaskProjection>,
    pub events: Vec<EventProjection>,
    pub user_email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskProjection {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventProjection {
    pub summary: String,
    pub start: EventTime,
    pub end: EventTime,
}

impl OptimizeRequest {
    pub fn project(tasks: &[Task], events: &[CalendarEvent], user_email: &str) -> Self {
        OptimizeRequest {
            tasks: tasks
                .iter()
                .map(|t| TaskProjection {
                    title: t.title.clone(),
                    due: t.due.clone(),
                })
                .collect(),
            events: events
                .iter()
                .map(|e| EventProjection {
                    summary: e.summary.clone(),
                    start: e.start.clone(),
                    end: e.end.clone(),
                })
                .collect(),
            user_email: user_email.to_string(),
        }
    }
}

/// The external backend that fronts the identity vault, the
/// conversational agent, the optimizer, and the priority ranking.
#[async_trait]
pub trait AgentBackend: Send + Sync {
    async fn fetch_token(&self, user_email: &str) -> Result<String, CoreError>;
    async fn create_session(&self, user_email: &str) -> Result<String, CoreError>;
    async fn chat(&self, turn: &ChatTurn) -> Result<String, CoreError>;
    async fn optimize(&self, request: &OptimizeRequest) -> Result<Insight, CoreError>;
    async fn priority_tasks(&self, user_email: &str) -> Result<Vec<PriorityTask>, CoreError>;
}

/// reqwest-backed client of the backend HTTP contract.
#[derive(Clone)]
pub struct AgentClient {
    http: reqwest::Client,
    base_url: String,
}

impl AgentClient {
    pub fn new(base_url: &str) -> Result<Self, CoreError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config::REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(AgentClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl AgentBackend for AgentClient {
    async fn fetch_token(&self, user_email: &str) -> Result<String, CoreError> {
        let response = self
            .http
            .get(self.url(&format!("/token/{}", user_email)))
            .send()
            .await?;
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        parse_token_body(status, body, user_email)
    }

    async fn create_session(&self, user_email: &str) -> Result<String, CoreError> {
        let response = self
            .http
            .post(self.url("/create_session"))
            .json(&json!({ "user_email": user_email }))
            .send()
            .await?;
        let body: Value = response.json().await.unwrap_or(Value::Null);
        parse_session_body(body)
    }

    async fn chat(&self, turn: &ChatTurn) -> Result<String, CoreError> {
        let response = self.http.post(self.url("/chat")).json(turn).send().await?;
        let body: Value = response.json().await.unwrap_or(Value::Null);
        parse_chat_body(body)
    }

    async fn optimize(&self, request: &OptimizeRequest) -> Result<Insight, CoreError> {
        let response = self
            .http
            .post(self.url("/optimize"))
            .json(request)
            .send()
            .await?;
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        classify_optimize_response(status, body)
    }

    async fn priority_tasks(&self, user_email: &str) -> Result<Vec<PriorityTask>, CoreError> {
        let response = self
            .http
            .get(self.url(&format!("/priority_tasks/{}", user_email)))
            .send()
            .await?;
        let body: Value = response.json().await.unwrap_or(Value::Null);
        parse_priority_body(body)
    }
}

fn parse_token_body(status: StatusCode, body: Value, user_email: &str) -> Result<String, CoreError> {
    if !status.is_success() {
        return Err(CoreError::Permission(format!(
            "no token issued for {}: {}",
            user_email, status
        )));
    }
    body.get("access_token")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            CoreError::MalformedResponse("token response missing access_token".to_string())
        })
}

fn parse_session_body(body: Value) -> Result<String, CoreError> {
    if let Some(id) = body.get("session_id").and_then(Value::as_str) {
        return Ok(id.to_string());
    }
    let detail = body
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("create_session response missing session_id");
    Err(CoreError::SessionInit(detail.to_string()))
}

fn parse_chat_body(body: Value) -> Result<String, CoreError> {
    if let Some(content) = body.get("content").and_then(Value::as_str) {
        return Ok(content.to_string());
    }
    let detail = body
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("chat response missing content");
    Err(CoreError::MalformedResponse(detail.to_string()))
}

/// Status 429 means quota, whatever the body looks like. A body carrying
/// an `error` field is a generic failure; anything else must parse as an
/// insight.
fn classify_optimize_response(status: StatusCode, body: Value) -> Result<Insight, CoreError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or(config::QUOTA_DEFAULT_MESSAGE);
        return Err(CoreError::QuotaExceeded(message.to_string()));
    }
    if let Some(error) = body.get("error").and_then(Value::as_str) {
        return Err(CoreError::MalformedResponse(error.to_string()));
    }
    serde_json::from_value::<Insight>(body)
        .map_err(|e| CoreError::MalformedResponse(format!("optimize response: {}", e)))
}

fn parse_priority_body(body: Value) -> Result<Vec<PriorityTask>, CoreError> {
    if let Some(error) = body.get("error").and_then(Value::as_str) {
        return Err(CoreError::MalformedResponse(error.to_string()));
    }
    match body.get("tasks") {
        Some(tasks) => serde_json::from_value(tasks.clone())
            .map_err(|e| CoreError::MalformedResponse(format!("priority tasks: {}", e))),
        None => Err(CoreError::MalformedResponse(
            "priority response missing tasks".to_string(),
        )),
    }
}
