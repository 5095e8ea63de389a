use serde::Serialize;
use tracing::warn;

use crate::errors::SubmitError;
use crate::host::Host;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentitySource {
    Host,
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub value: String,
    pub source: IdentitySource,
}

/// How to pick the identifier sent alongside uploads and skip notices.
///
/// The placeholder path exists for sessions opened outside the chat client. It
/// is not authentication; deployments that must not accept anonymous résumés
/// use [`IdentityPolicy::require_user`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityPolicy {
    placeholder: Option<String>,
}

impl IdentityPolicy {
    pub fn with_placeholder(placeholder: &str) -> Self {
        Self {
            placeholder: Some(placeholder.to_string()),
        }
    }

    pub fn require_user() -> Self {
        Self { placeholder: None }
    }

    /// Host user id when present and non-blank, else the placeholder.
    pub fn resolve(&self, host: &dyn Host) -> Result<Identity, SubmitError> {
        if let Some(user) = host.current_user() {
            let id = user.id.trim();
            if !id.is_empty() {
                return Ok(Identity {
                    value: id.to_string(),
                    source: IdentitySource::Host,
                });
            }
        }

        match &self.placeholder {
            Some(placeholder) => {
                warn!("No host user available; submitting as placeholder '{placeholder}'");
                Ok(Identity {
                    value: placeholder.clone(),
                    source: IdentitySource::Placeholder,
                })
            }
            None => Err(SubmitError::MissingIdentity),
        }
    }
}
