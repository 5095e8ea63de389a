use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::upload::validator::Rejection;

/// Everything that can go wrong between picking a file and the host closing.
/// Every variant is recoverable: the form stays up and the user can retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("Validation rejected: {0}")]
    ValidationRejected(Rejection),

    #[error("Network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("Server error (status {status}): {message}")]
    ServerError { status: u16, message: String },

    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("User identity unavailable")]
    MissingIdentity,
}

/// Coarse classification of a failed attempt, used by the presentation layer
/// and in JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Validation,
    Network,
    Server,
    Timeout,
    Identity,
}

impl SubmitError {
    pub fn kind(&self) -> FailureKind {
        match self {
            SubmitError::ValidationRejected(_) => FailureKind::Validation,
            SubmitError::NetworkUnreachable(_) => FailureKind::Network,
            SubmitError::ServerError { .. } => FailureKind::Server,
            SubmitError::Timeout(_) => FailureKind::Timeout,
            SubmitError::MissingIdentity => FailureKind::Identity,
        }
    }

    /// The string shown inline under the form. Network, server and timeout
    /// failures each produce distinct wording. Formatting only; the transport
    /// logs failures where they happen.
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::ValidationRejected(rejection) => rejection.user_message(),
            SubmitError::NetworkUnreachable(_) => {
                "Could not reach the server. Check your internet connection and press Continue to try again."
                    .to_string()
            }
            SubmitError::ServerError { status, message } => {
                if message.is_empty() {
                    format!("The server returned an error (HTTP {status}). Please try again.")
                } else {
                    format!("The server returned an error (HTTP {status}): {message}")
                }
            }
            SubmitError::Timeout(_) => {
                "The request timed out. Your connection may be slow; press Continue to try again."
                    .to_string()
            }
            SubmitError::MissingIdentity => {
                "Your user identity is unavailable. Reopen the form from the chat and try again."
                    .to_string()
            }
        }
    }
}
