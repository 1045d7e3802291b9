//! Shared helpers for edi-core integration tests
//!
//! Included with `mod common;` from each test file.

#![allow(dead_code)]

use async_trait::async_trait;
use edi_core::client::{
    AudioRequest, BackendError, BackendResult, ChatReply, ChatRequest, RegionAnalysis,
    RegionRequest, SummaryReply, SummaryRequest, SymptomAnalysis, SymptomSubmission,
    Transcription, TriageBackend,
};
use edi_core::conversation::{MessageKind, MessageSink};
use edi_core::locale::LocaleCatalog;
use std::sync::{Arc, Mutex, Once};

/// Initialize logging for tests (only once per test run)
static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_test_writer()
                    .with_target(true)
                    .with_level(true)
                    .with_thread_ids(false)
                    .with_thread_names(false),
            )
            .with(tracing_subscriber::filter::EnvFilter::from_default_env())
            .try_init();
    });
}

pub fn builtin_catalog() -> Arc<LocaleCatalog> {
    Arc::new(LocaleCatalog::builtin().expect("built-in catalog must load"))
}

/// Backend with a fixed reply for the analysis and chat endpoints
///
/// Other endpoints fail with a transport error. Every request is recorded
/// as `(path, body)`.
pub struct MockBackend {
    pub analysis: BackendResult<SymptomAnalysis>,
    pub chat: BackendResult<ChatReply>,
    pub requests: Mutex<Vec<(&'static str, serde_json::Value)>>,
}

impl MockBackend {
    pub fn answering(analysis: &str) -> Self {
        Self {
            analysis: Ok(SymptomAnalysis {
                analysis: analysis.to_string(),
            }),
            chat: Err(unscripted()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: BackendError) -> Self {
        Self {
            analysis: Err(error.clone()),
            chat: Err(error),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn chatting(answer: &str) -> Self {
        Self {
            analysis: Err(unscripted()),
            chat: Ok(ChatReply {
                answer: answer.to_string(),
                session_id: None,
                context: None,
            }),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(&'static str, serde_json::Value)> {
        self.requests.lock().unwrap().clone()
    }

    fn record<T: serde::Serialize>(&self, path: &'static str, body: &T) {
        let value = serde_json::to_value(body).unwrap();
        self.requests.lock().unwrap().push((path, value));
    }
}

fn unscripted() -> BackendError {
    BackendError::Transport("endpoint not scripted".to_string())
}

#[async_trait]
impl TriageBackend for MockBackend {
    async fn chat(&self, request: ChatRequest) -> BackendResult<ChatReply> {
        self.record("/get", &request);
        self.chat.clone()
    }

    async fn analyze_symptoms(&self, request: SymptomSubmission) -> BackendResult<SymptomAnalysis> {
        self.record("/analyze_symptoms", &request);
        self.analysis.clone()
    }

    async fn analyze_body_region(&self, request: RegionRequest) -> BackendResult<RegionAnalysis> {
        self.record("/analyze_body_region", &request);
        Err(unscripted())
    }

    async fn record_audio(&self, request: AudioRequest) -> BackendResult<Transcription> {
        self.record("/record_audio", &request);
        Err(unscripted())
    }

    async fn conversation_summary(&self, request: SummaryRequest) -> BackendResult<SummaryReply> {
        self.record("/get_conversation_summary", &request);
        Err(unscripted())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Sink that keeps everything posted to it
#[derive(Default)]
pub struct RecordingSink {
    posted: Mutex<Vec<(MessageKind, String)>>,
}

impl RecordingSink {
    pub fn posted(&self) -> Vec<(MessageKind, String)> {
        self.posted.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.posted().into_iter().map(|(_, text)| text).collect()
    }
}

impl MessageSink for RecordingSink {
    fn post(&self, text: &str, kind: MessageKind) {
        self.posted.lock().unwrap().push((kind, text.to_string()));
    }
}
