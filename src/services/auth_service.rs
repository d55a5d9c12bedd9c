use std::sync::Arc;

use log::info;

use crate::agent::AgentBackend;
use crate::error::CoreError;
use crate::models::credential::Credential;
use crate::session_registry::{SessionRegistry, UserSession};

/// Exchanges the user email (carried back from the auth redirect) for a
/// bearer credential and registers a fresh session for it.
pub async fn login(
    agent: &Arc<dyn AgentBackend>,
    registry: &SessionRegistry,
    user_email: &str,
) -> Result<UserSession, CoreError> {
    let access_token = agent.fetch_token(user_email).await?;
    let credential = Credential::new(user_email, access_token);
    info!("Authenticated {}", user_email);
    Ok(registry.register(credential))
}

/// Discards the credential and all per-user state. Responses still in
/// flight for the old session find no registry entry to land in.
pub fn logout(registry: &SessionRegistry, user_email: &str) -> bool {
    let removed = registry.remove(user_email);
    if removed {
        info!("Logged out {}", user_email);
    }
    removed
}
