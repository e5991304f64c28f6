//! Session management for the HTTP server
//!
//! Provides in-memory session storage mapping session tokens to account ids.

use std::{collections::HashMap, sync::Arc};

use storefront::account::AccountId;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Session token (UUID stored in a cookie or sent as a bearer token)
pub type SessionToken = String;

/// In-memory session store
///
/// Sessions are ephemeral and lost on server restart. Tokens that are not in the
/// store resolve to no account.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionToken, AccountId>>>,
}

impl SessionStore {
    /// Create a new empty session store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new session for an account and return its token
    pub async fn create_session(&self, account: AccountId) -> SessionToken {
        let token = Uuid::new_v4().to_string();
        let mut sessions = self.sessions.write().await;
        sessions.insert(token.clone(), account);
        token
    }

    /// Get the account a session token belongs to
    pub async fn get_account(&self, token: &str) -> Option<AccountId> {
        let sessions = self.sessions.read().await;
        sessions.get(token).cloned()
    }

    /// Destroy a session. Unknown tokens are ignored.
    pub async fn destroy_session(&self, token: &str) {
        let mut sessions = self.sessions.write().await;
        sessions.remove(token);
    }

    /// Get the number of active sessions
    pub async fn session_count(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.len()
    }
}
