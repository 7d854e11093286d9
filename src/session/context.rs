//! Operator session context
//!
//! The single source of truth for the authentication token. Every resource
//! client call and the realtime relay read credentials from here, and
//! `logout` notifies every subscriber synchronously.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};
use crate::config::SessionConfig;
use crate::utils::errors::Result;
use super::storage::SessionStorage;

/// Snapshot of the session published to subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub token: Option<String>,
    /// Bumped on every login and logout
    pub generation: u64,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Token plus the generation it was read at
#[derive(Debug, Clone)]
pub struct Credentials {
    pub token: Option<String>,
    pub generation: u64,
}

/// Shared session handle
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    storage: Arc<SessionStorage>,
    token_key: String,
    state: watch::Sender<SessionState>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("Session")
            .field("authenticated", &state.is_authenticated())
            .field("generation", &state.generation)
            .finish()
    }
}

fn normalize_token(token: Option<String>) -> Option<String> {
    token.filter(|t| !t.trim().is_empty())
}

impl Session {
    /// Create a session reading the persisted token once
    pub fn new(storage: Arc<SessionStorage>, config: &SessionConfig) -> Self {
        let token = normalize_token(storage.get(&config.token_key));
        let (state, _) = watch::channel(SessionState { token, generation: 0 });

        Self {
            inner: Arc::new(SessionInner {
                storage,
                token_key: config.token_key.clone(),
                state,
            }),
        }
    }

    /// Current token, if any
    pub fn get_token(&self) -> Option<String> {
        self.inner.state.borrow().token.clone()
    }

    /// Token presence only; validity is decided by the backend
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    /// Current generation counter
    pub fn generation(&self) -> u64 {
        self.inner.state.borrow().generation
    }

    /// Token and generation read atomically
    pub fn credentials(&self) -> Credentials {
        let state = self.inner.state.borrow();
        Credentials {
            token: state.token.clone(),
            generation: state.generation,
        }
    }

    /// Whether credentials read at `generation` are still the current ones
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation() == generation
    }

    /// Store a freshly issued token
    pub fn login(&self, token: impl Into<String>) -> Result<()> {
        let token = token.into();
        let Some(token) = normalize_token(Some(token)) else {
            warn!("Ignoring login with an empty token");
            return Ok(());
        };

        self.inner.storage.set(&self.inner.token_key, &token)?;
        self.inner.state.send_modify(|state| {
            state.token = Some(token);
            state.generation += 1;
        });
        info!(generation = self.generation(), "Operator logged in");
        Ok(())
    }

    /// Drop the token; subscribers observe the change before this returns
    pub fn logout(&self) -> Result<()> {
        if !self.is_authenticated() {
            return Ok(());
        }

        self.inner.state.send_modify(|state| {
            state.token = None;
            state.generation += 1;
        });
        info!(generation = self.generation(), "Operator logged out");
        self.inner.storage.remove(&self.inner.token_key)
    }

    /// Watch session changes
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Underlying storage, shared with the language preference
    pub fn storage(&self) -> &Arc<SessionStorage> {
        &self.inner.storage
    }
}
