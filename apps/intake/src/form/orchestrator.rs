//! Form orchestrator: composes the drop zone with consent and the two
//! top-level actions, and hands outcomes to the host.
//!
//! Continue: upload the held file (or close straight away when there is none).
//! Skip: notify the backend that no résumé is coming, then close.
//!
//! Each action has a `start_*` half (gating, marks in flight, returns a plan)
//! and a `finish_*` half (applies the outcome). `press_*` runs both around the
//! transport call. At most one of the two requests is in flight at a time.

use std::sync::Arc;

use tracing::{debug, info};

use crate::errors::SubmitError;
use crate::form::identity::IdentityPolicy;
use crate::host::Host;
use crate::models::candidate::CandidateFile;
use crate::models::view::FormView;
use crate::transport::{Outcome, Transport};
use crate::upload::dropzone::{DropZone, InteractionState, Selection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult {
    /// The host was asked to close.
    Closed,
    /// The form stays up with this message; the user may retry.
    Failed(String),
    /// The button was disabled; nothing happened.
    Disabled,
}

#[derive(Debug)]
pub enum ContinuePlan {
    /// No file held: close without touching the network.
    Close,
    Upload {
        file: CandidateFile,
        telegram_id: String,
    },
    /// Cannot submit at all (no usable identity).
    Refuse(SubmitError),
}

#[derive(Debug)]
pub enum SkipPlan {
    Notify { telegram_id: String },
    Refuse(SubmitError),
}

pub struct FormOrchestrator {
    transport: Arc<dyn Transport>,
    host: Arc<dyn Host>,
    identity: IdentityPolicy,
    drop_zone: DropZone,
    consent: bool,
    submitting: bool,
    skipping: bool,
    message: Option<String>,
    closed: bool,
}

impl FormOrchestrator {
    /// Builds the form and asks the host for full-screen presentation.
    pub fn new(
        transport: Arc<dyn Transport>,
        host: Arc<dyn Host>,
        identity: IdentityPolicy,
    ) -> Self {
        host.expand();
        Self {
            transport,
            host,
            identity,
            drop_zone: DropZone::new(),
            consent: false,
            submitting: false,
            skipping: false,
            message: None,
            closed: false,
        }
    }

    pub fn with_drop_zone(mut self, drop_zone: DropZone) -> Self {
        self.drop_zone = drop_zone;
        self
    }

    pub fn drop_zone(&self) -> &DropZone {
        &self.drop_zone
    }

    /// Drag events and "remove file" go straight to the drop zone.
    pub fn drop_zone_mut(&mut self) -> &mut DropZone {
        &mut self.drop_zone
    }

    pub fn consent(&self) -> bool {
        self.consent
    }

    pub fn set_consent(&mut self, consent: bool) {
        self.consent = consent;
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn can_continue(&self) -> bool {
        self.consent
            && !self.submitting
            && !self.skipping
            && !self.drop_zone.is_busy()
            && !self.closed
    }

    pub fn can_skip(&self) -> bool {
        !self.skipping && !self.submitting && !self.drop_zone.is_busy() && !self.closed
    }

    // ────────────────────────────────────────────────────────────────────────
    // Drop zone events that trigger uploads
    // ────────────────────────────────────────────────────────────────────────

    pub async fn drop_file(&mut self, file: Option<CandidateFile>) -> InteractionState {
        let selection = self.drop_zone.drop_file(file);
        self.upload_selection(selection).await
    }

    pub async fn pick_file(&mut self, file: CandidateFile) -> InteractionState {
        let selection = self.drop_zone.pick_file(file);
        self.upload_selection(selection).await
    }

    async fn upload_selection(&mut self, selection: Selection) -> InteractionState {
        if let Selection::Started(ticket) = selection {
            match self.identity.resolve(self.host.as_ref()) {
                Ok(identity) => {
                    self.drop_zone
                        .run_upload(ticket, self.transport.as_ref(), &identity.value)
                        .await;
                }
                Err(err) => {
                    self.drop_zone.complete(&ticket, &Err(err));
                }
            }
        }
        self.drop_zone.state()
    }

    /// Picks `file` and, once the drop zone holds it (uploaded or failed),
    /// presses Continue. A failed drop zone upload is retried by that press.
    /// Returns `None` when the file was rejected or ignored and nothing is held.
    pub async fn submit_file(&mut self, file: CandidateFile) -> Option<ActionResult> {
        match self.pick_file(file).await {
            InteractionState::Succeeded | InteractionState::Failed => {
                Some(self.press_continue().await)
            }
            state => {
                debug!("Drop zone settled in {state:?}; not continuing");
                None
            }
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // Continue
    // ────────────────────────────────────────────────────────────────────────

    pub fn start_continue(&mut self) -> Option<ContinuePlan> {
        if !self.can_continue() {
            debug!("Continue pressed while disabled");
            return None;
        }

        let Some(file) = self.drop_zone.file().cloned() else {
            return Some(ContinuePlan::Close);
        };

        match self.identity.resolve(self.host.as_ref()) {
            Ok(identity) => {
                self.submitting = true;
                self.message = None;
                Some(ContinuePlan::Upload {
                    file,
                    telegram_id: identity.value,
                })
            }
            Err(err) => Some(ContinuePlan::Refuse(err)),
        }
    }

    pub fn finish_continue(&mut self, outcome: Outcome) -> ActionResult {
        self.submitting = false;
        self.settle(outcome)
    }

    pub async fn press_continue(&mut self) -> ActionResult {
        let Some(plan) = self.start_continue() else {
            return ActionResult::Disabled;
        };

        match plan {
            ContinuePlan::Close => {
                info!("Continue without a file; closing");
                self.message = None;
                self.close();
                ActionResult::Closed
            }
            ContinuePlan::Refuse(err) => self.settle(Err(err)),
            ContinuePlan::Upload { file, telegram_id } => {
                let outcome = self.transport.submit(&file, &telegram_id).await;
                self.finish_continue(outcome)
            }
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // Skip
    // ────────────────────────────────────────────────────────────────────────

    pub fn start_skip(&mut self) -> Option<SkipPlan> {
        if !self.can_skip() {
            debug!("Skip pressed while disabled");
            return None;
        }

        match self.identity.resolve(self.host.as_ref()) {
            Ok(identity) => {
                self.skipping = true;
                self.message = None;
                Some(SkipPlan::Notify {
                    telegram_id: identity.value,
                })
            }
            Err(err) => Some(SkipPlan::Refuse(err)),
        }
    }

    pub fn finish_skip(&mut self, outcome: Outcome) -> ActionResult {
        self.skipping = false;
        self.settle(outcome)
    }

    pub async fn press_skip(&mut self) -> ActionResult {
        let Some(plan) = self.start_skip() else {
            return ActionResult::Disabled;
        };

        match plan {
            SkipPlan::Refuse(err) => self.settle(Err(err)),
            SkipPlan::Notify { telegram_id } => {
                info!("User skipped résumé submission");
                let outcome = self.transport.notify_skip(&telegram_id).await;
                self.finish_skip(outcome)
            }
        }
    }

    /// Runs the transport's capability pre-check.
    pub async fn probe(&self) -> Result<(), SubmitError> {
        self.transport.probe().await
    }

    pub fn view(&self) -> FormView {
        let file = self.drop_zone.file();
        FormView {
            state: self.drop_zone.state(),
            file_name: file.map(|f| f.name().to_string()),
            file_size: file.map(CandidateFile::size_label),
            uploaded_at: self.drop_zone.uploaded_at(),
            drop_zone_error: self.drop_zone.error().map(str::to_string),
            form_error: self.message.clone(),
            consent: self.consent,
            continue_enabled: self.can_continue(),
            continue_busy: self.submitting,
            skip_enabled: self.can_skip(),
            skip_busy: self.skipping,
            closed: self.closed,
            accept: self.drop_zone.picker().accept(),
        }
    }

    fn settle(&mut self, outcome: Outcome) -> ActionResult {
        match outcome {
            Ok(_) => {
                self.message = None;
                self.close();
                ActionResult::Closed
            }
            Err(err) => {
                let message = err.user_message();
                self.message = Some(message.clone());
                ActionResult::Failed(message)
            }
        }
    }

    fn close(&mut self) {
        info!("Closing host session");
        self.host.close();
        self.closed = true;
    }
}
