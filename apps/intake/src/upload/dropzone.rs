//! Drop zone controller: the interaction state machine behind the upload area.
//!
//! ```text
//! Idle ──drag-enter──▶ Dragging ──drag-leave──▶ Idle
//! Idle/Dragging ──drop|pick, accepted──▶ Selected ──▶ Uploading
//! Uploading ──Ok──▶ Succeeded        Uploading ──Err──▶ Failed
//! Succeeded/Failed ──remove──▶ Idle
//! ```
//!
//! Uploads are split into `select` (returns an [`UploadTicket`]) and
//! [`DropZone::complete`]. A ticket belongs to one generation of the held
//! file; removing or replacing the file invalidates it, so a late completion
//! is dropped instead of overwriting newer state.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::models::candidate::CandidateFile;
use crate::transport::{Outcome, Transport};
use crate::upload::picker::FilePicker;
use crate::upload::validator::{validate, Rejection, Verdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionState {
    Idle,
    Dragging,
    Selected,
    Uploading,
    Succeeded,
    Failed,
}

/// One pending upload of one accepted file.
#[derive(Debug, Clone)]
pub struct UploadTicket {
    generation: u64,
    file: CandidateFile,
}

impl UploadTicket {
    pub fn file(&self) -> &CandidateFile {
        &self.file
    }
}

#[derive(Debug)]
pub enum Selection {
    /// Accepted; the controller is now `Uploading` and the caller must send
    /// the ticket's file.
    Started(UploadTicket),
    Rejected(Rejection),
    /// No change event, or the controller is busy with an upload.
    Ignored,
}

type UploadObserver = Box<dyn FnMut(&CandidateFile) + Send>;

pub struct DropZone {
    state: InteractionState,
    file: Option<CandidateFile>,
    error: Option<String>,
    picker: FilePicker,
    generation: u64,
    uploaded_at: Option<DateTime<Utc>>,
    on_uploaded: Option<UploadObserver>,
}

impl Default for DropZone {
    fn default() -> Self {
        Self::new()
    }
}

impl DropZone {
    pub fn new() -> Self {
        Self {
            state: InteractionState::Idle,
            file: None,
            error: None,
            picker: FilePicker::new(),
            generation: 0,
            uploaded_at: None,
            on_uploaded: None,
        }
    }

    /// Called with the file after each successful upload.
    pub fn on_uploaded(mut self, observer: impl FnMut(&CandidateFile) + Send + 'static) -> Self {
        self.on_uploaded = Some(Box::new(observer));
        self
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn file(&self) -> Option<&CandidateFile> {
        self.file.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn picker(&self) -> &FilePicker {
        &self.picker
    }

    pub fn uploaded_at(&self) -> Option<DateTime<Utc>> {
        self.uploaded_at
    }

    /// True while a file is selected and its upload has not settled.
    pub fn is_busy(&self) -> bool {
        matches!(
            self.state,
            InteractionState::Selected | InteractionState::Uploading
        )
    }

    pub fn drag_enter(&mut self) {
        if self.state == InteractionState::Idle {
            self.state = InteractionState::Dragging;
        }
    }

    pub fn drag_leave(&mut self) {
        if self.state == InteractionState::Dragging {
            self.state = InteractionState::Idle;
        }
    }

    /// A drop ends the drag gesture whether or not the file is accepted.
    pub fn drop_file(&mut self, file: Option<CandidateFile>) -> Selection {
        if self.state == InteractionState::Dragging {
            self.state = InteractionState::Idle;
        }
        self.select(file)
    }

    /// A file chosen through the picker. Choosing the name the picker still
    /// holds fires no change and is ignored.
    pub fn pick_file(&mut self, file: CandidateFile) -> Selection {
        if self.is_busy() {
            debug!("Ignoring pick of '{}' while an upload is outstanding", file.name());
            return Selection::Ignored;
        }
        if !self.picker.choose(file.name()) {
            debug!("Picker value unchanged for '{}'; no change event", file.name());
            return Selection::Ignored;
        }
        self.select(Some(file))
    }

    fn select(&mut self, file: Option<CandidateFile>) -> Selection {
        if self.is_busy() {
            debug!("Ignoring selection while an upload is outstanding");
            return Selection::Ignored;
        }

        let file = match (validate(file.as_ref()), file) {
            (Verdict::Accepted, Some(file)) => file,
            (Verdict::Accepted, None) => return self.reject(Rejection::Missing),
            (Verdict::Rejected(rejection), _) => return self.reject(rejection),
        };

        self.generation += 1;
        self.error = None;
        self.uploaded_at = None;
        self.state = InteractionState::Selected;
        debug!("Selected '{}' ({})", file.name(), file.size_label());

        // Upload begins as soon as a file is selected.
        self.state = InteractionState::Uploading;
        info!("Uploading '{}'", file.name());

        self.file = Some(file.clone());
        Selection::Started(UploadTicket {
            generation: self.generation,
            file,
        })
    }

    fn reject(&mut self, rejection: Rejection) -> Selection {
        info!("File rejected: {rejection}");
        self.error = Some(rejection.user_message());
        Selection::Rejected(rejection)
    }

    /// Applies the outcome of a ticket's upload. Returns `false` when the
    /// ticket is stale and the outcome was discarded.
    pub fn complete(&mut self, ticket: &UploadTicket, outcome: &Outcome) -> bool {
        if ticket.generation != self.generation || self.state != InteractionState::Uploading {
            debug!(
                "Discarding outcome for '{}': file was removed or replaced",
                ticket.file.name()
            );
            return false;
        }

        match outcome {
            Ok(_) => {
                self.state = InteractionState::Succeeded;
                self.error = None;
                self.uploaded_at = Some(Utc::now());
                info!("Upload of '{}' succeeded", ticket.file.name());
                if let Some(observer) = self.on_uploaded.as_mut() {
                    observer(&ticket.file);
                }
            }
            Err(err) => {
                self.state = InteractionState::Failed;
                self.error = Some(err.user_message());
                info!("Upload of '{}' failed: {err}", ticket.file.name());
            }
        }
        true
    }

    /// Sends the ticket's file and applies the outcome.
    pub async fn run_upload(
        &mut self,
        ticket: UploadTicket,
        transport: &dyn Transport,
        telegram_id: &str,
    ) -> bool {
        let outcome = transport.submit(&ticket.file, telegram_id).await;
        self.complete(&ticket, &outcome)
    }

    /// Clears the file and error, resets the picker so the same file can be
    /// chosen again, and returns to `Idle`. Invalidates any outstanding ticket.
    pub fn remove_file(&mut self) {
        if let Some(file) = self.file.take() {
            debug!("Removed '{}'", file.name());
        }
        self.error = None;
        self.uploaded_at = None;
        self.picker.reset();
        self.generation += 1;
        self.state = InteractionState::Idle;
    }
}
