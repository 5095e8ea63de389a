use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::upload::dropzone::InteractionState;

/// Snapshot of everything the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormView {
    pub state: InteractionState,
    pub file_name: Option<String>,
    pub file_size: Option<String>, // "2.00 MB"
    pub uploaded_at: Option<DateTime<Utc>>,
    /// Validation or upload error shown inside the drop zone.
    pub drop_zone_error: Option<String>,
    /// Error from the last Continue/Skip press, shown under the buttons.
    pub form_error: Option<String>,
    pub consent: bool,
    pub continue_enabled: bool,
    pub continue_busy: bool,
    pub skip_enabled: bool,
    pub skip_busy: bool,
    pub closed: bool,
    pub accept: &'static str,
}

impl FormView {
    /// "Uploaded 18.10.2026 14:05" style label, when an upload has succeeded.
    pub fn uploaded_label(&self) -> Option<String> {
        self.uploaded_at
            .map(|at| format!("Uploaded {}", at.format("%d.%m.%Y %H:%M")))
    }
}
