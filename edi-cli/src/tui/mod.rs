//! Terminal UI for the intake questionnaire
pub mod app;
pub mod events;
pub mod modal;
pub mod screens;
pub mod theme;

use anyhow::Result;

use edi_core::intake::{IntakeWizard, PendingSubmission};

/// How the questionnaire ended
#[derive(Debug)]
pub enum IntakeExit {
    /// Last step answered; the answers still have to be sent
    Submitted(PendingSubmission),
    Abandoned,
}

/// Run the questionnaire full-screen until it is submitted or abandoned
///
/// The terminal is restored before this returns, so the caller can print
/// the analysis as normal output.
pub async fn run_intake(wizard: IntakeWizard) -> Result<IntakeExit> {
    let app = app::App::new(wizard);
    app.run().await
}
