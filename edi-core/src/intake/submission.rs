//! Final submission of the intake answers to `/analyze_symptoms`

use tracing::{info, warn};

use super::state::WizardSession;
use crate::client::{BackendError, SymptomSubmission, TriageBackend};
use crate::conversation::{MessageKind, MessageSink};
use crate::locale::{LocaleCatalog, StringKey};

/// Result of a submission, delivered exactly once
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Analysis text returned by the service
    Success(String),
    /// The failure that was reported to the user as a generic message
    Failure(BackendError),
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Success(_))
    }
}

/// Answers ready to be sent; consumed by [`PendingSubmission::send`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    payload: SymptomSubmission,
    analyzing_text: String,
    failure_text: String,
}

impl PendingSubmission {
    /// Capture the payload and the localized status strings from a finished session
    pub(crate) fn from_session(session: &WizardSession, catalog: &LocaleCatalog) -> Self {
        let answer = |step: usize| session.response(step).map(str::to_string);
        let lang = session.language.as_str();

        Self {
            payload: SymptomSubmission {
                main_symptom: answer(0),
                duration: answer(1),
                severity: answer(2),
                additional_symptoms: answer(3),
                lang: session.language.clone(),
            },
            analyzing_text: catalog.text(lang, StringKey::Analyzing).to_string(),
            failure_text: catalog.text(lang, StringKey::AnalysisFailed).to_string(),
        }
    }

    pub fn payload(&self) -> &SymptomSubmission {
        &self.payload
    }

    /// Send the answers and report the result through `sink`
    ///
    /// Posts the "analyzing" status first, then either the analysis text or
    /// the localized failure string. The raw error is logged, never shown.
    pub async fn send(
        self,
        backend: &dyn TriageBackend,
        sink: &dyn MessageSink,
    ) -> SubmissionOutcome {
        sink.post(&self.analyzing_text, MessageKind::Receive);
        info!(
            "Submitting intake answers via {} backend (lang={})",
            backend.name(),
            self.payload.lang
        );

        match backend.analyze_symptoms(self.payload).await {
            Ok(result) => {
                sink.post(&result.analysis, MessageKind::Receive);
                SubmissionOutcome::Success(result.analysis)
            }
            Err(e) => {
                warn!("Symptom analysis failed: {}", e);
                sink.post(&self.failure_text, MessageKind::Receive);
                SubmissionOutcome::Failure(e)
            }
        }
    }
}
