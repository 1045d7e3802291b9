use serde::Serialize;
use std::collections::BTreeMap;

/// Lifecycle of the intake wizard
///
/// ```text
/// Idle -> Step(0) -> Step(i) -> ... -> Step(N-1) -> Submitting -> Done | Failed
/// ```
///
/// `start` re-enters `Step(0)` from any phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WizardPhase {
    Idle,
    Step(usize),
    Submitting,
    Done,
    Failed,
}

impl WizardPhase {
    pub fn name(&self) -> &'static str {
        match self {
            WizardPhase::Idle => "Idle",
            WizardPhase::Step(_) => "Step",
            WizardPhase::Submitting => "Submitting",
            WizardPhase::Done => "Done",
            WizardPhase::Failed => "Failed",
        }
    }

    /// Whether questions are on screen
    pub fn is_open(&self) -> bool {
        matches!(self, WizardPhase::Step(_))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, WizardPhase::Done | WizardPhase::Failed)
    }
}

/// Mutable state of one run of the wizard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardSession {
    /// Fixed for the lifetime of the session
    pub language: String,
    pub current_step: usize,
    /// Sparse; only answered steps have entries
    pub responses: BTreeMap<usize, String>,
}

impl WizardSession {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            current_step: 0,
            responses: BTreeMap::new(),
        }
    }

    pub fn response(&self, step: usize) -> Option<&str> {
        self.responses.get(&step).map(String::as_str)
    }

    pub fn current_response(&self) -> Option<&str> {
        self.response(self.current_step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_empty() {
        let session = WizardSession::new("xh");
        assert_eq!(session.current_step, 0);
        assert!(session.responses.is_empty());
        assert_eq!(session.current_response(), None);
    }

    #[test]
    fn test_phase_predicates() {
        assert!(WizardPhase::Step(2).is_open());
        assert!(!WizardPhase::Submitting.is_open());
        assert!(WizardPhase::Failed.is_terminal());
        assert!(!WizardPhase::Idle.is_terminal());
        assert_eq!(WizardPhase::Step(3).name(), "Step");
    }
}
