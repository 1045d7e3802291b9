//! `edi chat`, `edi voice` and `edi summary`

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use edi_core::conversation::{
    call_ambulance, find_clinics, language_changed, ChatSession, MessageSink,
};
use edi_core::locale::{language_name, StringKey};
use edi_core::summary::{fetch_summary, PrintDocument};
use edi_core::voice::{submit_clip, AudioClip};

use crate::terminal::{status, TerminalSink};
use crate::AppContext;

const HELP: &str = "Commands:
  /summary [--print FILE]  show the consultation summary
  /transcript FILE         write this conversation as printable HTML
  /voice FILE              send a recorded clip (.webm, .ogg, .wav)
  /clinics                 list nearby clinics
  /ambulance               emergency instructions
  /lang CODE               switch language
  /help                    show this help
  /quit                    leave the chat";

/// One line of REPL input
#[derive(Debug, PartialEq, Eq)]
enum ReplCommand {
    Message(String),
    Summary { print: Option<PathBuf> },
    Transcript(PathBuf),
    Voice(PathBuf),
    Clinics,
    Ambulance,
    Lang(String),
    Help,
    Quit,
    Empty,
    Invalid(String),
}

fn parse_line(line: &str) -> ReplCommand {
    let line = line.trim();
    if line.is_empty() {
        return ReplCommand::Empty;
    }
    let Some(command) = line.strip_prefix('/') else {
        return ReplCommand::Message(line.to_string());
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    match (name, args.as_slice()) {
        ("summary", []) => ReplCommand::Summary { print: None },
        ("summary", ["--print", file]) => ReplCommand::Summary {
            print: Some(PathBuf::from(file)),
        },
        ("transcript", [file]) => ReplCommand::Transcript(PathBuf::from(file)),
        ("voice", [file]) => ReplCommand::Voice(PathBuf::from(file)),
        ("clinics", []) => ReplCommand::Clinics,
        ("ambulance", []) => ReplCommand::Ambulance,
        ("lang", [code]) => ReplCommand::Lang(code.to_string()),
        ("help", _) => ReplCommand::Help,
        ("quit" | "exit", _) => ReplCommand::Quit,
        _ => ReplCommand::Invalid(line.to_string()),
    }
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

/// Interactive chat until `/quit` or end of input
pub async fn run(ctx: &AppContext) -> Result<()> {
    let mut chat = ChatSession::new(
        ctx.backend.clone(),
        ctx.catalog.clone(),
        ctx.language(),
        ctx.session_id.clone(),
    );
    let sink = TerminalSink::new();

    println!("EDI chat (session {}). Type /help for commands.", chat.session_id());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt();
        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };

        match parse_line(&line) {
            ReplCommand::Empty => {}
            ReplCommand::Message(text) => {
                status(chat.thinking_text());
                chat.send_message(&text, &sink).await;
            }
            ReplCommand::Summary { print } => {
                show_summary(ctx, &chat, &sink, print.as_deref()).await?;
            }
            ReplCommand::Transcript(path) => {
                PrintDocument::from_html(sink.log().printable_html())
                    .write_to(&path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("Transcript written to {}", path.display());
            }
            ReplCommand::Voice(path) => match AudioClip::from_path(&path) {
                Ok(clip) => {
                    status(chat.catalog().text(chat.language(), StringKey::ProcessingAudio));
                    submit_clip(&clip, &mut chat, &sink).await;
                }
                Err(e) => eprintln!("{e}"),
            },
            ReplCommand::Clinics => find_clinics(&sink),
            ReplCommand::Ambulance => call_ambulance(&sink),
            ReplCommand::Lang(code) => {
                if language_name(&code).is_none() {
                    warn!("'{}' has no localized content; English will be used", code);
                }
                chat.set_language(code.as_str());
                language_changed(chat.catalog(), &code, &sink);
            }
            ReplCommand::Help => println!("{HELP}"),
            ReplCommand::Quit => break,
            ReplCommand::Invalid(line) => eprintln!("Unknown command: {line}. Type /help."),
        }
    }

    info!("Chat ended after {} messages", sink.log().len());
    Ok(())
}

/// `edi voice FILE`: one clip, answered in a fresh or continued session
pub async fn voice(ctx: &AppContext, file: &Path) -> Result<()> {
    let clip = AudioClip::from_path(file)
        .with_context(|| format!("Failed to load audio clip {}", file.display()))?;
    let mut chat = ChatSession::new(
        ctx.backend.clone(),
        ctx.catalog.clone(),
        ctx.language(),
        ctx.session_id.clone(),
    );
    let sink = TerminalSink::new();

    status(ctx.catalog.text(ctx.language(), StringKey::ProcessingAudio));
    if submit_clip(&clip, &mut chat, &sink).await.is_none() {
        anyhow::bail!("Voice clip was not answered");
    }
    println!("Session: {}", chat.session_id());
    Ok(())
}

/// `edi summary`: fetch and print the report for the configured session
pub async fn summary(ctx: &AppContext, print: Option<&Path>) -> Result<()> {
    if ctx.config.session_id.is_none() {
        warn!("No --session given; a new session has no conversation to summarize");
    }
    let chat = ChatSession::new(
        ctx.backend.clone(),
        ctx.catalog.clone(),
        ctx.language(),
        ctx.session_id.clone(),
    );
    let sink = TerminalSink::new();
    if !show_summary(ctx, &chat, &sink, print).await? {
        anyhow::bail!("No summary available for session {}", chat.session_id());
    }
    Ok(())
}

/// Returns false when no report was available
async fn show_summary(
    ctx: &AppContext,
    chat: &ChatSession,
    sink: &dyn MessageSink,
    print: Option<&Path>,
) -> Result<bool> {
    status(ctx.catalog.text(chat.language(), StringKey::GeneratingSummary));
    let Some(report) = fetch_summary(
        ctx.backend.as_ref(),
        chat.session_id(),
        chat.catalog(),
        chat.language(),
        sink,
    )
    .await
    else {
        return Ok(false);
    };

    debug!(
        "Summary: {} messages, {} symptoms",
        report.stats.total_messages,
        report.stats.symptoms_identified.len()
    );
    println!("{}", report.report);

    if let Some(path) = print {
        PrintDocument::from_report(&report)
            .write_to(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Printable summary written to {}", path.display());
    }
    Ok(true)
}
