use serde::Serialize;

use crate::models::message::Message;

/// Lifecycle of a conversation with the agent backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    /// No backend session exists yet.
    Uninitialized,
    /// A session id has been requested; the introduction turn may still
    /// be in flight.
    Initializing,
    /// Introduced to the backend; user-authored messages are accepted.
    Ready,
}

/// One user's conversation with the assistant. The session id is owned
/// here and never reused across user emails; history is append-only.
#[derive(Debug)]
pub struct ChatSession {
    pub user_email: String,
    pub display_name: String,
    pub phase: SessionPhase,
    pub session_id: Option<String>,
    pub history: Vec<Message>,
    pub thinking: bool,
    /// Externally injected prompt (e.g. "help me with task X" from the
    /// dashboard), consumed exactly once when the session is ready.
    pub pending_prompt: Option<String>,
}

impl ChatSession {
    pub fn new(user_email: &str, display_name: &str) -> Self {
        ChatSession {
            user_email: user_email.to_string(),
            display_name: display_name.to_string(),
            phase: SessionPhase::Uninitialized,
            session_id: None,
            history: Vec::new(),
            thinking: false,
            pending_prompt: None,
        }
    }

    /// Drops all conversation state, returning to Uninitialized so a
    /// fresh session can be established.
    pub fn reset(&mut self) {
        self.phase = SessionPhase::Uninitialized;
        self.session_id = None;
        self.history.clear();
        self.thinking = false;
    }
}
