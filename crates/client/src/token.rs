//! Bearer-token storage for the API client.
//!
//! The client never reads a global: it asks an injected [`TokenProvider`]
//! for the current token, stores the one returned by login, and clears it
//! when the API answers 401.

use std::sync::RwLock;

use netenergy_core::claims::display_name;

/// Display name used when no readable subject is available.
pub const DEFAULT_DISPLAY_NAME: &str = "User";

/// Source and sink of the session's bearer token.
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> Option<String>;
    fn store(&self, token: String);
    fn clear(&self);

    /// Display name read from the token's `sub` claim (unverified).
    fn display_name(&self) -> String {
        display_name(self.token().as_deref(), DEFAULT_DISPLAY_NAME)
    }
}

/// In-process token store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    inner: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            inner: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenProvider for MemoryTokenStore {
    fn token(&self) -> Option<String> {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn store(&self, token: String) {
        match self.inner.write() {
            Ok(mut guard) => *guard = Some(token),
            Err(poisoned) => *poisoned.into_inner() = Some(token),
        }
    }

    fn clear(&self) {
        match self.inner.write() {
            Ok(mut guard) => *guard = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
    }
}
