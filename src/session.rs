//! Session handling
//!
//! Authentication is delegated to an external identity provider; the
//! client only carries an opaque bearer token. The session is an explicit
//! object passed to whoever needs it, never an ambient singleton.

use std::sync::Arc;

/// Trait for the active user session.
pub trait Session: Send + Sync {
    /// Bearer token for the active session, if any.
    fn current_token(&self) -> Option<String>;

    /// Whether a user session is active.
    fn is_authenticated(&self) -> bool {
        self.current_token().is_some()
    }
}

/// Session backed by a pre-issued token from configuration.
pub struct TokenSession {
    token: String,
}

impl TokenSession {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl Session for TokenSession {
    fn current_token(&self) -> Option<String> {
        Some(self.token.clone())
    }
}

/// No active session; requests go out unauthenticated.
pub struct AnonymousSession;

impl Session for AnonymousSession {
    fn current_token(&self) -> Option<String> {
        None
    }
}

/// Build the session object from an optional configured token.
pub fn from_token(token: Option<String>) -> Arc<dyn Session> {
    match token {
        Some(token) => Arc::new(TokenSession::new(token)),
        None => Arc::new(AnonymousSession),
    }
}
