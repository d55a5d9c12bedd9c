use std::sync::Arc;

use log::{error, info};
use tokio::sync::Mutex;

use crate::agent::{AgentBackend, ChatTurn, HistoryEntry};
use crate::config;
use crate::error::CoreError;
use crate::models::chat_session::{ChatSession, SessionPhase};
use crate::models::message::Message;

/// Establishes a backend session and introduces the user to it.
///
/// The introduction turn is sent exactly once per session lifetime,
/// before any user-authored message, and renders no user bubble: only
/// the assistant's reply becomes the first visible message. If the
/// backend returns no session id the session stays Uninitialized and is
/// not retried automatically. Calling this on an already initialized
/// session is a no-op.
pub async fn initialize(
    agent: &Arc<dyn AgentBackend>,
    session: &Arc<Mutex<ChatSession>>,
) -> Result<(), CoreError> {
    let (user_email, display_name) = {
        let mut s = session.lock().await;
        if s.phase != SessionPhase::Uninitialized {
            return Ok(());
        }
        s.phase = SessionPhase::Initializing;
        (s.user_email.clone(), s.display_name.clone())
    };

    match agent.create_session(&user_email).await {
        Ok(session_id) => {
            info!("Created session {} for {}", session_id, user_email);
            session.lock().await.session_id = Some(session_id);

            let intro = config::intro_message(&display_name, &user_email);
            relay_turn(agent, session, &intro, true).await;
            session.lock().await.phase = SessionPhase::Ready;

            let prompt = session.lock().await.pending_prompt.take();
            if let Some(prompt) = prompt {
                send_message(agent, session, &prompt).await?;
            }
            Ok(())
        }
        Err(e) => {
            error!("Session initialization error for {}: {}", user_email, e);
            session.lock().await.phase = SessionPhase::Uninitialized;
            Err(CoreError::SessionInit(e.to_string()))
        }
    }
}

/// Relays a user-authored message to the agent. The user bubble is
/// appended immediately (it stays even if the backend call fails); on
/// failure a synthetic assistant bubble with a fixed apology is appended
/// instead of a reply. The thinking flag clears on all paths.
pub async fn send_message(
    agent: &Arc<dyn AgentBackend>,
    session: &Arc<Mutex<ChatSession>>,
    text: &str,
) -> Result<(), CoreError> {
    {
        let s = session.lock().await;
        if s.phase != SessionPhase::Ready || s.session_id.is_none() {
            return Err(CoreError::SessionInit(
                "no session established; message not sent".to_string(),
            ));
        }
    }
    relay_turn(agent, session, text, false).await;
    Ok(())
}

/// Clears the conversation and immediately establishes a fresh session.
pub async fn new_session(
    agent: &Arc<dyn AgentBackend>,
    session: &Arc<Mutex<ChatSession>>,
) -> Result<(), CoreError> {
    session.lock().await.reset();
    initialize(agent, session).await
}

/// Accepts a prompt originating outside the conversation view. Sent
/// straight through once the session is ready, otherwise parked and
/// consumed exactly once when initialization completes.
pub async fn inject_prompt(
    agent: &Arc<dyn AgentBackend>,
    session: &Arc<Mutex<ChatSession>>,
    prompt: &str,
) -> Result<(), CoreError> {
    let ready = {
        let mut s = session.lock().await;
        if s.phase == SessionPhase::Ready {
            true
        } else {
            s.pending_prompt = Some(prompt.to_string());
            false
        }
    };
    if ready {
        send_message(agent, session, prompt).await?;
    }
    Ok(())
}

/// One request/response round trip with the agent. The history snapshot
/// sent upstream carries only role and content, and is taken before the
/// optimistic user bubble so it reflects prior turns only. No lock is
/// held across the network call.
async fn relay_turn(
    agent: &Arc<dyn AgentBackend>,
    session: &Arc<Mutex<ChatSession>>,
    message: &str,
    is_intro: bool,
) {
    let (session_id, user_email, history) = {
        let mut s = session.lock().await;
        let history: Vec<HistoryEntry> = s
            .history
            .iter()
            .map(|m| HistoryEntry {
                role: m.role.as_str().to_string(),
                content: m.content.clone(),
            })
            .collect();
        if !is_intro {
            s.history.push(Message::user(message));
        }
        s.thinking = true;
        (s.session_id.clone(), s.user_email.clone(), history)
    };

    let result = match session_id {
        Some(session_id) => {
            let turn = ChatTurn {
                message: message.to_string(),
                user_email,
                session_id,
                history,
            };
            agent.chat(&turn).await
        }
        None => Err(CoreError::SessionInit("no session id".to_string())),
    };

    let mut s = session.lock().await;
    match result {
        Ok(content) => s.history.push(Message::assistant(content)),
        Err(e) => {
            error!("Chat error: {}", e);
            s.history.push(Message::connection_error());
        }
    }
    s.thinking = false;
}
