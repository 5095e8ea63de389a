//! Upload transport: the single seam through which the form talks to the
//! intake endpoints.
//!
//! `HttpTransport` is the production implementation. Tests swap in a scripted
//! double through the same trait; there is no other code path.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::SubmitError;
use crate::models::candidate::CandidateFile;

pub mod http;

#[cfg(test)]
pub(crate) mod scripted;

pub use http::HttpTransport;

pub const UPLOAD_PATH: &str = "resume/upload";
pub const SKIP_PATH: &str = "resume/pass";
pub const FILE_FIELD: &str = "file";
pub const IDENTIFIER_FIELD: &str = "telegram_id";

/// What the endpoint said when it accepted a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Receipt {
    pub status: u16,
    /// Parsed JSON body, if the server sent one.
    pub body: Option<serde_json::Value>,
}

/// Result of one transport attempt. Produced exactly once per request.
pub type Outcome = Result<Receipt, SubmitError>;

/// JSON body for the skip notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipNotice {
    #[serde(rename = "telegramUserId")]
    pub telegram_user_id: String,
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the file and identifier as a multipart POST.
    async fn submit(&self, file: &CandidateFile, telegram_id: &str) -> Outcome;

    /// Tells the backend the user chose not to provide a résumé.
    async fn notify_skip(&self, telegram_id: &str) -> Outcome;

    /// Optional capability pre-check. Implementations without one report the
    /// endpoint as reachable.
    async fn probe(&self) -> Result<(), SubmitError> {
        Ok(())
    }
}
