use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Local;
use serde::Serialize;

use crate::config;

static NEXT_MESSAGE_ID: AtomicU64 = AtomicU64::new(1);

fn next_message_id() -> u64 {
    NEXT_MESSAGE_ID.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One turn in the conversation history. Append-only: a message is never
/// mutated after creation, and history order is insertion order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub id: u64,
    pub role: Role,
    pub content: String,
    pub time: String,
    pub is_error: bool,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Message {
            id: next_message_id(),
            role: Role::User,
            content: content.into(),
            time: stamp(),
            is_error: false,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Message {
            id: next_message_id(),
            role: Role::Assistant,
            content: content.into(),
            time: stamp(),
            is_error: false,
        }
    }

    /// Synthetic assistant bubble shown when a chat turn fails.
    pub fn connection_error() -> Self {
        Message {
            id: next_message_id(),
            role: Role::Assistant,
            content: config::CHAT_APOLOGY.to_string(),
            time: stamp(),
            is_error: true,
        }
    }
}

fn stamp() -> String {
    Local::now().format("%H:%M").to_string()
}
