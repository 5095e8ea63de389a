use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::SubmitError;
use crate::models::candidate::CandidateFile;
use crate::transport::{Outcome, Receipt, Transport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Submit { file_name: String, telegram_id: String },
    Skip { telegram_id: String },
    Probe,
}

/// Test double that replays queued outcomes and records every call.
/// An empty queue answers with a plain 200.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    outcomes: Mutex<VecDeque<Outcome>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn then(self, outcome: Outcome) -> Self {
        self.outcomes.lock().unwrap().push_back(outcome);
        self
    }

    pub(crate) fn then_fail(self, err: SubmitError) -> Self {
        self.then(Err(err))
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn next(&self, call: Call) -> Outcome {
        self.calls.lock().unwrap().push(call);
        self.outcomes.lock().unwrap().pop_front().unwrap_or(Ok(Receipt {
            status: 200,
            body: None,
        }))
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn submit(&self, file: &CandidateFile, telegram_id: &str) -> Outcome {
        self.next(Call::Submit {
            file_name: file.name().to_string(),
            telegram_id: telegram_id.to_string(),
        })
    }

    async fn notify_skip(&self, telegram_id: &str) -> Outcome {
        self.next(Call::Skip {
            telegram_id: telegram_id.to_string(),
        })
    }

    async fn probe(&self) -> Result<(), SubmitError> {
        self.next(Call::Probe).map(|_| ())
    }
}
