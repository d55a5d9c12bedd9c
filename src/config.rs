use std::env;

pub fn init_logging() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
}

/// Upcoming calendar events shown on the dashboard.
pub const MAX_EVENTS: u32 = 5;
/// Pending tasks fetched per refresh.
pub const MAX_PENDING_TASKS: u32 = 50;
/// Completed (including hidden) tasks fetched per refresh.
pub const MAX_COMPLETED_TASKS: u32 = 100;
/// Delay before the silent re-fetch that reconciles an optimistic
/// task completion with the store's eventual state.
pub const RECONCILE_DELAY_MS: u64 = 1500;
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

pub const ASSISTANT_NAME: &str = "SmartSolve";

pub const QUOTA_DEFAULT_MESSAGE: &str = "AI Quota Limit Reached. Try again later.";
pub const CHAT_APOLOGY: &str =
    "I'm having trouble connecting right now. Please check your backend or ADK agent.";
pub const TASK_PERMISSION_MESSAGE: &str =
    "Failed to update task. Please re-login to grant permissions.";
pub const TASK_NETWORK_MESSAGE: &str = "Network error. Please try again.";

/// Base URL of the backend that fronts the identity vault and the agent.
pub fn backend_url() -> String {
    env::var("BACKEND_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

pub fn bind_addr() -> (String, u16) {
    let host = env::var("BIND_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = env::var("BIND_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    (host, port)
}

/// The introduction turn sent once per session, before any user-authored
/// message, so the agent retains who it is talking to.
pub fn intro_message(display_name: &str, user_email: &str) -> String {
    format!(
        "Hi, I'm {} and my email is {}. I'm using SmartSolve dashboard to manage my tasks, \
         calendar events, and get AI assistance. Please remember my details for our conversation.",
        display_name, user_email
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intro_message_carries_identity() {
        let intro = intro_message("alice", "alice@example.com");
        assert!(intro.contains("alice"));
        assert!(intro.contains("alice@example.com"));
    }
}
