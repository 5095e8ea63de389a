//! Host integration shim: the chat mini-app runtime around the form.
//!
//! The form receives the host as an injected `Arc<dyn Host>`. Every method has
//! a no-op default so a missing capability is never an error, and
//! [`NoopHost`] stands in when the form runs outside any host.

use serde::{Deserialize, Serialize};

/// The user the host says is signed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostUser {
    pub id: String,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

impl HostUser {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: None,
            first_name: None,
        }
    }
}

pub trait Host: Send + Sync {
    /// Ask for full-screen presentation.
    fn expand(&self) {}

    /// End the mini-app session.
    fn close(&self) {}

    fn current_user(&self) -> Option<HostUser> {
        None
    }
}

/// Host used when the form is not running inside a chat client.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHost;

impl Host for NoopHost {}
