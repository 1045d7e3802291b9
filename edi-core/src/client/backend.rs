//! Triage backend trait - Abstraction over the analysis server
//!
//! The wizard, chat, body map, voice and summary flows all talk to the
//! server through this trait:
//! - HTTP (reqwest, `http` feature)
//! - Scripted (unit tests)

use async_trait::async_trait;

use super::types::{
    AudioRequest, BackendError, ChatReply, ChatRequest, RegionAnalysis, RegionRequest,
    SummaryReply, SummaryRequest, SymptomAnalysis, SymptomSubmission, Transcription,
};

pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// One method per backend endpoint
///
/// Implementations own transport concerns such as timeouts. Every failure is
/// reported as a [`BackendError`]; callers decide what the user sees.
#[async_trait]
pub trait TriageBackend: Send + Sync {
    /// `/get`
    async fn chat(&self, request: ChatRequest) -> BackendResult<ChatReply>;

    /// `/analyze_symptoms`
    async fn analyze_symptoms(&self, request: SymptomSubmission) -> BackendResult<SymptomAnalysis>;

    /// `/analyze_body_region`
    async fn analyze_body_region(&self, request: RegionRequest) -> BackendResult<RegionAnalysis>;

    /// `/record_audio`
    async fn record_audio(&self, request: AudioRequest) -> BackendResult<Transcription>;

    /// `/get_conversation_summary`
    async fn conversation_summary(&self, request: SummaryRequest) -> BackendResult<SummaryReply>;

    /// Backend identifier for logging
    fn name(&self) -> &'static str;
}

/// Backend returning canned results and recording every request
#[cfg(test)]
pub(crate) mod scripted {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct ScriptedBackend {
        pub chat: Option<BackendResult<ChatReply>>,
        pub analysis: Option<BackendResult<SymptomAnalysis>>,
        pub region: Option<BackendResult<RegionAnalysis>>,
        pub audio: Option<BackendResult<Transcription>>,
        pub summary: Option<BackendResult<SummaryReply>>,
        pub requests: Mutex<Vec<serde_json::Value>>,
    }

    impl ScriptedBackend {
        fn record<T: serde::Serialize>(&self, request: &T) {
            if let Ok(value) = serde_json::to_value(request) {
                self.requests.lock().unwrap().push(value);
            }
        }

        pub fn recorded(&self) -> Vec<serde_json::Value> {
            self.requests.lock().unwrap().clone()
        }
    }

    fn reply<T: Clone>(slot: &Option<BackendResult<T>>) -> BackendResult<T> {
        slot.clone()
            .unwrap_or_else(|| Err(BackendError::Transport("no scripted reply".to_string())))
    }

    #[async_trait]
    impl TriageBackend for ScriptedBackend {
        async fn chat(&self, request: ChatRequest) -> BackendResult<ChatReply> {
            self.record(&request);
            reply(&self.chat)
        }

        async fn analyze_symptoms(
            &self,
            request: SymptomSubmission,
        ) -> BackendResult<SymptomAnalysis> {
            self.record(&request);
            reply(&self.analysis)
        }

        async fn analyze_body_region(&self, request: RegionRequest) -> BackendResult<RegionAnalysis> {
            self.record(&request);
            reply(&self.region)
        }

        async fn record_audio(&self, request: AudioRequest) -> BackendResult<Transcription> {
            self.record(&request);
            reply(&self.audio)
        }

        async fn conversation_summary(
            &self,
            request: SummaryRequest,
        ) -> BackendResult<SummaryReply> {
            self.record(&request);
            reply(&self.summary)
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::scripted::ScriptedBackend;
    use super::*;

    #[tokio::test]
    async fn test_scripted_backend_records_requests() {
        let backend = ScriptedBackend {
            analysis: Some(Ok(SymptomAnalysis {
                analysis: "Likely a viral infection.".to_string(),
            })),
            ..Default::default()
        };

        let request = SymptomSubmission {
            main_symptom: Some("Fever".to_string()),
            lang: "en".to_string(),
            ..Default::default()
        };

        let result = backend.analyze_symptoms(request).await.unwrap();
        assert_eq!(result.analysis, "Likely a viral infection.");
        assert_eq!(backend.recorded().len(), 1);
        assert_eq!(backend.recorded()[0]["main_symptom"], "Fever");
    }

    #[tokio::test]
    async fn test_unscripted_endpoint_is_transport_error() {
        let backend = ScriptedBackend::default();
        let err = backend
            .conversation_summary(SummaryRequest {
                session_id: "s".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Transport(_)));
    }
}
