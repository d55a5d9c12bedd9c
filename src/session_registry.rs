use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::Mutex as AsyncMutex;

use crate::models::chat_session::ChatSession;
use crate::models::credential::Credential;
use crate::models::dashboard::DashboardState;

/// Everything the core holds for one logged-in user: the credential and
/// the two state objects, each mutated only by its owning service.
#[derive(Clone)]
pub struct UserSession {
    pub credential: Credential,
    pub dashboard: Arc<AsyncMutex<DashboardState>>,
    pub chat: Arc<AsyncMutex<ChatSession>>,
}

impl UserSession {
    fn from_credential(credential: Credential) -> Self {
        let dashboard = DashboardState::new(credential.epoch);
        let chat = ChatSession::new(&credential.user_email, credential.display_name());
        UserSession {
            credential,
            dashboard: Arc::new(AsyncMutex::new(dashboard)),
            chat: Arc::new(AsyncMutex::new(chat)),
        }
    }
}

/// In-memory registry of user sessions keyed by email. The outer map
/// lock is never held across an await; per-user state has its own locks.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<String, UserSession>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        SessionRegistry {
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Registers a fresh login, replacing any previous session for the
    /// same email. The new credential epoch makes responses still in
    /// flight for the old session unappliable.
    pub fn register(&self, credential: Credential) -> UserSession {
        let user = UserSession::from_credential(credential);
        let mut sessions = self.sessions.lock().unwrap();
        sessions.insert(user.credential.user_email.clone(), user.clone());
        user
    }

    pub fn get(&self, user_email: &str) -> Option<UserSession> {
        let sessions = self.sessions.lock().unwrap();
        sessions.get(user_email).cloned()
    }

    pub fn remove(&self, user_email: &str) -> bool {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.remove(user_email).is_some()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relogin_rotates_the_epoch() {
        let registry = SessionRegistry::new();
        let first = registry.register(Credential::new("alice@example.com", "t1".to_string()));
        let second = registry.register(Credential::new("alice@example.com", "t2".to_string()));
        assert_ne!(first.credential.epoch, second.credential.epoch);
        let current = registry.get("alice@example.com").unwrap();
        assert_eq!(current.credential.epoch, second.credential.epoch);
    }

    #[test]
    fn logout_removes_the_session() {
        let registry = SessionRegistry::new();
        registry.register(Credential::new("alice@example.com", "t1".to_string()));
        assert!(registry.remove("alice@example.com"));
        assert!(registry.get("alice@example.com").is_none());
        assert!(!registry.remove("alice@example.com"));
    }
}
