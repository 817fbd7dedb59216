//! Session tokens and their registry.

use crate::error::{NetworkError, NetworkResult};
use std::collections::HashMap;
use uuid::Uuid;

/// Registry of live sessions: opaque token to login.
///
/// Tokens are random UUIDs, minted on successful authentication and valid
/// only for the process lifetime. They are never persisted and never reused;
/// a user may hold several at once. No business logic lives here.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    sessions: HashMap<String, String>,
}

impl SessionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint and register a fresh token for a login.
    pub fn issue(&mut self, login: impl Into<String>) -> String {
        let token = Uuid::new_v4().to_string();
        self.sessions.insert(token.clone(), login.into());
        token
    }

    /// Resolve a token to the login it authenticates.
    pub fn resolve(&self, token: &str) -> NetworkResult<&str> {
        self.sessions
            .get(token)
            .map(String::as_str)
            .ok_or(NetworkError::InvalidSession)
    }

    /// Drop every session bound to a login.
    pub fn revoke_user(&mut self, login: &str) {
        self.sessions.retain(|_, l| l != login);
    }

    /// Drop every session.
    pub fn clear(&mut self) {
        self.sessions.clear();
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Check if there are no live sessions.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
