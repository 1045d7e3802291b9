//! Guided symptom intake
//!
//! A fixed sequence of single-choice questions, selected by language, walked
//! forward and back one step at a time. Advancing requires an answer for the
//! current step. Advancing from the last step closes the wizard and hands
//! back a [`PendingSubmission`] for the caller to send.
//!
//! Navigation methods return plain [`NavOutcome`] values; wiring them to keys
//! or buttons is the front end's job.

mod state;
mod submission;

pub use state::{WizardPhase, WizardSession};
pub use submission::{PendingSubmission, SubmissionOutcome};

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::locale::{LocaleCatalog, Question, StringKey};

/// Result of a navigation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    /// Now showing the given step
    Moved(usize),
    /// Nothing to do (first step, or wizard not open)
    Unchanged,
    /// Current step is unanswered; show `notice` and stay
    Rejected { notice: String },
    /// Last step answered; the wizard is closed and the answers must be sent
    Submit(PendingSubmission),
}

/// A choice as rendered on the current step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceView {
    pub text: String,
    pub selected: bool,
}

/// Everything a front end needs to draw the current step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepView {
    pub prompt: String,
    pub choices: Vec<ChoiceView>,
    pub index: usize,
    pub count: usize,
    /// `index / (count - 1)`, or 1.0 for a single-step questionnaire
    pub progress: f64,
    pub back_enabled: bool,
    /// Localized "Finish" on the last step, "Next" elsewhere
    pub next_label: String,
}

impl StepView {
    pub fn selected_index(&self) -> Option<usize> {
        self.choices.iter().position(|choice| choice.selected)
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.count
    }
}

/// Symptom intake state machine
pub struct IntakeWizard {
    catalog: Arc<LocaleCatalog>,
    phase: WizardPhase,
    session: Option<WizardSession>,
}

impl IntakeWizard {
    pub fn new(catalog: Arc<LocaleCatalog>) -> Self {
        Self {
            catalog,
            phase: WizardPhase::Idle,
            session: None,
        }
    }

    pub fn phase(&self) -> WizardPhase {
        self.phase
    }

    pub fn session(&self) -> Option<&WizardSession> {
        self.session.as_ref()
    }

    pub fn catalog(&self) -> &LocaleCatalog {
        &self.catalog
    }

    /// Open a fresh session at step 0, discarding any previous one
    pub fn start(&mut self, language: &str) {
        if !self.catalog.has_questions(language) {
            debug!("No questions for '{}', using English set", language);
        }
        self.session = Some(WizardSession::new(language));
        self.phase = WizardPhase::Step(0);
        debug!("Intake started (lang={})", language);
    }

    /// Close the wizard without submitting
    pub fn abandon(&mut self) {
        if self.session.take().is_some() {
            debug!("Intake abandoned");
        }
        self.phase = WizardPhase::Idle;
    }

    /// Question set of the open session
    pub fn questions(&self) -> &[Question] {
        match &self.session {
            Some(session) => self.catalog.questions(&session.language),
            None => &[],
        }
    }

    /// Record `choice` as the answer to the current step, replacing any earlier one
    ///
    /// The choice is not checked against the step's list.
    pub fn select_choice(&mut self, choice: impl Into<String>) {
        if !self.phase.is_open() {
            trace!("select_choice ignored in {} phase", self.phase.name());
            return;
        }
        if let Some(session) = self.session.as_mut() {
            let choice = choice.into();
            trace!("Step {} answered: {}", session.current_step, choice);
            session.responses.insert(session.current_step, choice);
        }
    }

    /// Select the current step's choice at `index`; false if out of range
    pub fn select_index(&mut self, index: usize) -> bool {
        let choice = match (&self.session, self.phase) {
            (Some(session), WizardPhase::Step(step)) => self
                .catalog
                .questions(&session.language)
                .get(step)
                .and_then(|question| question.choices.get(index))
                .cloned(),
            _ => None,
        };

        match choice {
            Some(choice) => {
                self.select_choice(choice);
                true
            }
            None => false,
        }
    }

    pub fn go_back(&mut self) -> NavOutcome {
        let Some(session) = self.session.as_mut() else {
            return NavOutcome::Unchanged;
        };
        if !self.phase.is_open() || session.current_step == 0 {
            return NavOutcome::Unchanged;
        }

        session.current_step -= 1;
        self.phase = WizardPhase::Step(session.current_step);
        NavOutcome::Moved(session.current_step)
    }

    pub fn go_next(&mut self) -> NavOutcome {
        if !self.phase.is_open() {
            return NavOutcome::Unchanged;
        }
        let Some(session) = self.session.as_ref() else {
            return NavOutcome::Unchanged;
        };

        if session.current_response().is_none() {
            return NavOutcome::Rejected {
                notice: self
                    .catalog
                    .text(&session.language, StringKey::SelectionRequired)
                    .to_string(),
            };
        }

        let count = self.catalog.questions(&session.language).len();
        if session.current_step + 1 < count {
            let next = session.current_step + 1;
            if let Some(session) = self.session.as_mut() {
                session.current_step = next;
            }
            self.phase = WizardPhase::Step(next);
            return NavOutcome::Moved(next);
        }

        // Last step: close the wizard before anything is sent
        match self.session.take() {
            Some(session) => {
                let pending = PendingSubmission::from_session(&session, &self.catalog);
                self.phase = WizardPhase::Submitting;
                debug!("Intake complete, {} answers", session.responses.len());
                NavOutcome::Submit(pending)
            }
            None => NavOutcome::Unchanged,
        }
    }

    /// Record the outcome of the submission handed out by `go_next`
    pub fn resolve(&mut self, outcome: &SubmissionOutcome) {
        if self.phase != WizardPhase::Submitting {
            trace!("resolve ignored in {} phase", self.phase.name());
            return;
        }
        self.phase = if outcome.is_success() {
            WizardPhase::Done
        } else {
            WizardPhase::Failed
        };
    }

    /// Render data for the current step, if the wizard is open
    pub fn view(&self) -> Option<StepView> {
        let session = self.session.as_ref()?;
        if !self.phase.is_open() {
            return None;
        }

        let questions = self.catalog.questions(&session.language);
        let question = questions.get(session.current_step)?;
        let count = questions.len();
        let index = session.current_step;
        let selected = session.current_response();

        let progress = if count > 1 {
            index as f64 / (count - 1) as f64
        } else {
            1.0
        };
        let label_key = if index + 1 == count {
            StringKey::Finish
        } else {
            StringKey::Next
        };

        Some(StepView {
            prompt: question.prompt.clone(),
            choices: question
                .choices
                .iter()
                .map(|text| ChoiceView {
                    text: text.clone(),
                    selected: selected == Some(text.as_str()),
                })
                .collect(),
            index,
            count,
            progress,
            back_enabled: index > 0,
            next_label: self
                .catalog
                .text(&session.language, label_key)
                .to_string(),
        })
    }
}
