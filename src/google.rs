use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use log::error;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::config;
use crate::error::CoreError;
use crate::models::credential::Credential;
use crate::models::event::CalendarEvent;
use crate::models::task::Task;

const TASKS_URL: &str = "https://tasks.googleapis.com/tasks/v1/lists/@default/tasks";
const CALENDAR_URL: &str = "https://www.googleapis.com/calendar/v3/calendars/primary/events";

/// Remote task store contract: capped list reads plus an idempotent
/// set-to-completed patch, all under the user's bearer credential.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn list_pending(&self, credential: &Credential) -> Result<Vec<Task>, CoreError>;
    async fn list_completed(&self, credential: &Credential) -> Result<Vec<Task>, CoreError>;
    async fn mark_completed(&self, credential: &Credential, task_id: &str)
        -> Result<(), CoreError>;
}

/// Remote calendar store contract: upcoming events, ascending by start.
#[async_trait]
pub trait CalendarStore: Send + Sync {
    async fn upcoming_events(&self, credential: &Credential)
        -> Result<Vec<CalendarEvent>, CoreError>;
}

#[derive(Deserialize)]
struct TaskListResponse {
    #[serde(default)]
    items: Vec<Task>,
}

#[derive(Deserialize)]
struct EventListResponse {
    #[serde(default)]
    items: Vec<CalendarEvent>,
}

/// reqwest-backed client for the Google Tasks and Calendar APIs.
#[derive(Clone)]
pub struct GoogleClient {
    http: reqwest::Client,
}

impl GoogleClient {
    pub fn new() -> Result<Self, CoreError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config::REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(GoogleClient { http })
    }

    async fn list_tasks(
        &self,
        credential: &Credential,
        query: &[(&str, String)],
    ) -> Result<Vec<Task>, CoreError> {
        let response = self
            .http
            .get(TASKS_URL)
            .query(query)
            .bearer_auth(&credential.access_token)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::Transient(format!(
                "task list request failed: {}",
                status
            )));
        }
        let body: TaskListResponse = response
            .json()
            .await
            .map_err(|e| CoreError::MalformedResponse(format!("task list body: {}", e)))?;
        Ok(body.items)
    }
}

#[async_trait]
impl TaskStore for GoogleClient {
    async fn list_pending(&self, credential: &Credential) -> Result<Vec<Task>, CoreError> {
        self.list_tasks(
            credential,
            &[
                ("showCompleted", "false".to_string()),
                ("maxResults", config::MAX_PENDING_TASKS.to_string()),
            ],
        )
        .await
    }

    async fn list_completed(&self, credential: &Credential) -> Result<Vec<Task>, CoreError> {
        self.list_tasks(
            credential,
            &[
                ("showCompleted", "true".to_string()),
                ("showHidden", "true".to_string()),
                ("maxResults", config::MAX_COMPLETED_TASKS.to_string()),
            ],
        )
        .await
    }

    async fn mark_completed(
        &self,
        credential: &Credential,
        task_id: &str,
    ) -> Result<(), CoreError> {
        let response = self
            .http
            .patch(format!("{}/{}", TASKS_URL, task_id))
            .bearer_auth(&credential.access_token)
            .json(&json!({ "status": "completed" }))
            .send()
            .await
            .map_err(|e| {
                error!("Error completing task {}: {}", task_id, e);
                CoreError::Transient(config::TASK_NETWORK_MESSAGE.to_string())
            })?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            error!("Failed to complete task {} ({}): {}", task_id, status, body);
            // A rejected mutation on an otherwise healthy connection is
            // almost always a stale or under-scoped credential.
            Err(CoreError::Permission(
                config::TASK_PERMISSION_MESSAGE.to_string(),
            ))
        }
    }
}

#[async_trait]
impl CalendarStore for GoogleClient {
    async fn upcoming_events(
        &self,
        credential: &Credential,
    ) -> Result<Vec<CalendarEvent>, CoreError> {
        let url = Url::parse_with_params(
            CALENDAR_URL,
            &[
                ("orderBy", "startTime".to_string()),
                ("singleEvents", "true".to_string()),
                ("timeMin", Utc::now().to_rfc3339()),
                ("maxResults", config::MAX_EVENTS.to_string()),
            ],
        )
        .map_err(|e| CoreError::Transient(format!("calendar url: {}", e)))?;
        let response = self
            .http
            .get(url)
            .bearer_auth(&credential.access_token)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::Transient(format!(
                "event list request failed: {}",
                status
            )));
        }
        let body: EventListResponse = response
            .json()
            .await
            .map_err(|e| CoreError::MalformedResponse(format!("event list body: {}", e)))?;
        Ok(body.items)
    }
}
