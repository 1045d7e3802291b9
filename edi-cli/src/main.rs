//! EDI - terminal client for the symptom-triage assistant
//!
//! Guided symptom intake, free-text chat, body-region analysis, voice clips
//! and consultation summaries against the triage backend.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use edi_core::client::{HttpBackend, SessionId, TriageBackend};
use edi_core::config::{ClientConfig, ConfigPaths, PROJECT_CONFIG_DIR};
use edi_core::locale::{languages, LocaleCatalog};

mod chat_cli;
mod intake_cli;
mod region_cli;
mod terminal;
mod tui;

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "edi",
    about = "Terminal client for the EDI symptom-triage assistant",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Emit structured JSON logs
    #[clap(long, global = true)]
    trace: bool,

    /// Set log level
    #[clap(long, default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Project configuration directory
    #[clap(long, default_value = PROJECT_CONFIG_DIR, global = true)]
    config: PathBuf,

    /// Triage backend URL (overrides config and EDI_BASE_URL)
    #[clap(long, global = true)]
    base_url: Option<String>,

    /// Language code, e.g. en, zu, af (overrides config and EDI_LANG)
    #[clap(long, global = true)]
    lang: Option<String>,

    /// Conversation id to continue
    #[clap(long, global = true)]
    session: Option<String>,

    /// Log requests and print canned replies instead of calling the backend
    #[clap(long, global = true)]
    dry_run: bool,
}

#[derive(Parser, Debug)]
enum Command {
    /// Answer the guided symptom questionnaire
    Intake {
        /// Answer for the next step, as choice text or 1-based number (repeat per step)
        #[clap(long = "answer", short = 'a')]
        answers: Vec<String>,
    },

    /// Chat with the assistant
    Chat,

    /// Analyze symptoms in one body region
    BodyMap {
        /// head, chest, abdomen, arms, legs or back
        #[clap(long)]
        region: String,

        /// Symptom from the region's list (repeatable)
        #[clap(long = "symptom", short = 's')]
        symptoms: Vec<String>,
    },

    /// Transcribe a recorded clip (.webm, .ogg, .wav) and ask about it
    Voice {
        file: PathBuf,
    },

    /// Show the consultation summary for a session
    Summary {
        /// Also write a printable HTML copy
        #[clap(long)]
        print: Option<PathBuf>,
    },

    /// List supported languages
    Languages {
        /// Output as JSON
        #[clap(long)]
        json: bool,
    },
}

/// Everything a command needs to talk to the backend
pub struct AppContext {
    pub config: ClientConfig,
    pub catalog: Arc<LocaleCatalog>,
    pub backend: Arc<dyn TriageBackend>,
    pub session_id: SessionId,
}

impl AppContext {
    pub fn language(&self) -> &str {
        &self.config.language
    }
}

/// Initialize tracing with CLI flags
///
/// Logs always go to stderr; stdout carries command output.
fn initialize_tracing(log_level: &LogLevel, trace: bool) {
    let filter = EnvFilter::new(log_level.to_filter_directive());

    if trace {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .init();

        tracing::info!("EDI structured tracing enabled");
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Resolve config (flags > env > project > global > defaults) and build the backend
fn build_context(cli: &Cli) -> Result<AppContext> {
    let paths = ConfigPaths::discover(&cli.config);
    let mut config = paths.load_client_config();

    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(lang) = &cli.lang {
        config.language = lang.clone();
    }
    if let Some(session) = &cli.session {
        config.session_id = Some(session.clone());
    }
    config.dry_run = cli.dry_run;
    config.check();

    let catalog = LocaleCatalog::load(Some(&paths.project), paths.global.as_deref())
        .context("Failed to load localized content")?;
    let backend = HttpBackend::new(&config).context("Failed to create triage backend")?;
    let session_id = config.session_id();

    debug!(
        "Using backend {} (lang={}, session={})",
        backend.base_url(),
        config.language,
        session_id
    );

    Ok(AppContext {
        config,
        catalog: Arc::new(catalog),
        backend: Arc::new(backend),
        session_id,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_tracing(&cli.log_level, cli.trace);

    if let Command::Languages { json } = cli.command {
        return languages_command(json);
    }

    let ctx = build_context(&cli)?;

    match cli.command {
        Command::Intake { answers } => {
            if answers.is_empty() {
                intake_cli::run_interactive(&ctx).await
            } else {
                intake_cli::run_with_answers(&ctx, &answers).await
            }
        }
        Command::Chat => chat_cli::run(&ctx).await,
        Command::BodyMap { region, symptoms } => region_cli::run(&ctx, &region, &symptoms).await,
        Command::Voice { file } => chat_cli::voice(&ctx, &file).await,
        Command::Summary { print } => chat_cli::summary(&ctx, print.as_deref()).await,
        Command::Languages { .. } => Ok(()),
    }
}

/// Table row for the language listing
#[derive(Tabled, serde::Serialize)]
struct LanguageRow {
    #[tabled(rename = "Code")]
    code: &'static str,
    #[tabled(rename = "Language")]
    name: &'static str,
}

fn languages_command(json: bool) -> Result<()> {
    let rows: Vec<LanguageRow> = languages()
        .iter()
        .map(|lang| LanguageRow {
            code: lang.code,
            name: lang.name,
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string();
    println!("{table}");
    Ok(())
}
