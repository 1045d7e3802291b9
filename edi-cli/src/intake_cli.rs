//! `edi intake` - guided symptom questionnaire

use anyhow::{anyhow, bail, Result};
use tracing::{debug, info};

use edi_core::intake::{IntakeWizard, NavOutcome, PendingSubmission, StepView};

use crate::terminal::TerminalSink;
use crate::tui::{self, IntakeExit};
use crate::AppContext;

/// Walk the questionnaire in the terminal UI, then send the answers
pub async fn run_interactive(ctx: &AppContext) -> Result<()> {
    let mut wizard = IntakeWizard::new(ctx.catalog.clone());
    wizard.start(ctx.language());

    match tui::run_intake(wizard).await? {
        IntakeExit::Submitted(pending) => submit(ctx, pending).await,
        IntakeExit::Abandoned => {
            info!("Intake abandoned by user");
            Ok(())
        }
    }
}

/// Answer each step from `answers` in order, then send
pub async fn run_with_answers(ctx: &AppContext, answers: &[String]) -> Result<()> {
    let mut wizard = IntakeWizard::new(ctx.catalog.clone());
    wizard.start(ctx.language());
    let count = wizard.questions().len();

    let mut answers = answers.iter();
    loop {
        let view = wizard
            .view()
            .ok_or_else(|| anyhow!("Intake closed unexpectedly"))?;
        let Some(answer) = answers.next() else {
            bail!(
                "Expected {} answers, got {} (stopped at \"{}\")",
                count,
                view.index,
                view.prompt
            );
        };

        let index = resolve_answer(&view, answer)?;
        debug!("Step {}: {}", view.index, view.choices[index].text);
        wizard.select_index(index);

        match wizard.go_next() {
            NavOutcome::Moved(_) => continue,
            NavOutcome::Submit(pending) => {
                if answers.next().is_some() {
                    bail!("Too many answers; the questionnaire has {} steps", count);
                }
                return submit(ctx, pending).await;
            }
            NavOutcome::Rejected { notice } => bail!(notice),
            NavOutcome::Unchanged => bail!("Intake did not advance"),
        }
    }
}

async fn submit(ctx: &AppContext, pending: PendingSubmission) -> Result<()> {
    let sink = TerminalSink::new();
    let outcome = pending.send(ctx.backend.as_ref(), &sink).await;
    if outcome.is_success() {
        Ok(())
    } else {
        // The localized failure is already on screen
        bail!("Symptom analysis failed")
    }
}

/// Match an answer by 1-based number or case-insensitive choice text
fn resolve_answer(view: &StepView, answer: &str) -> Result<usize> {
    let answer = answer.trim();

    if let Ok(number) = answer.parse::<usize>() {
        if (1..=view.choices.len()).contains(&number) {
            return Ok(number - 1);
        }
    }

    view.choices
        .iter()
        .position(|choice| choice.text.eq_ignore_ascii_case(answer))
        .ok_or_else(|| {
            let options: Vec<String> = view
                .choices
                .iter()
                .enumerate()
                .map(|(i, choice)| format!("  {}. {}", i + 1, choice.text))
                .collect();
            anyhow!(
                "\"{}\" is not a choice for \"{}\". Options:\n{}",
                answer,
                view.prompt,
                options.join("\n")
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use edi_core::locale::LocaleCatalog;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn first_step() -> StepView {
        let mut wizard = IntakeWizard::new(Arc::new(LocaleCatalog::builtin().unwrap()));
        wizard.start("en");
        wizard.view().unwrap()
    }

    #[test]
    fn test_resolve_by_number() {
        let view = first_step();
        assert_eq!(resolve_answer(&view, "1").unwrap(), 0);
        assert_eq!(resolve_answer(&view, " 4 ").unwrap(), 3);
    }

    #[test]
    fn test_resolve_by_text_ignores_case() {
        let view = first_step();
        assert_eq!(resolve_answer(&view, "headache").unwrap(), 1);
    }

    #[test]
    fn test_out_of_range_number_lists_options() {
        let view = first_step();
        let err = resolve_answer(&view, "99").unwrap_err().to_string();
        assert!(err.contains("1. Fever"));
    }
}
