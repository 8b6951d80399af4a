//! Bearer token sources
//!
//! The client never validates or refreshes tokens. A provider returning
//! `None` means "not ready": requests are refused before anything is sent.

use std::fmt;

use parking_lot::RwLock;

/// Supplies the bearer credential for each request
pub trait TokenProvider: Send + Sync + fmt::Debug {
    fn access_token(&self) -> Option<String>;
}

/// Token slot updated by the login flow
#[derive(Default)]
pub struct SharedToken {
    token: RwLock<Option<String>>,
}

impl SharedToken {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: RwLock::new(token.filter(|t| !t.is_empty())),
        }
    }

    pub fn set(&self, token: impl Into<String>) {
        let token = token.into();
        *self.token.write() = if token.is_empty() { None } else { Some(token) };
    }

    pub fn clear(&self) {
        *self.token.write() = None;
    }
}

impl TokenProvider for SharedToken {
    fn access_token(&self) -> Option<String> {
        self.token.read().clone()
    }
}

impl fmt::Debug for SharedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedToken")
            .field("present", &self.token.read().is_some())
            .finish()
    }
}
