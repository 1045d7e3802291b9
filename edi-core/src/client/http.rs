//! HTTP backend
//!
//! Implements [`TriageBackend`] as plain JSON POSTs against the configured
//! base URL.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::backend::{BackendResult, TriageBackend};
use super::types::{
    AudioRequest, BackendError, ChatReply, ChatRequest, RegionAnalysis, RegionRequest,
    SummaryReply, SummaryRequest, SummaryStats, SymptomAnalysis, SymptomSubmission, Transcription,
};
use crate::config::ClientConfig;
use crate::error::{EdiError, Result};

/// Lower bound for request timeouts; analysis calls run model inference
pub const MIN_TIMEOUT_SECONDS: u64 = 5;

/// reqwest-backed triage backend
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    /// Log requests and answer with canned replies instead of calling out
    dry_run: bool,
}

/// Body of a non-2xx response
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let timeout_seconds = if config.timeout_seconds < MIN_TIMEOUT_SECONDS {
            warn!(
                "Configured timeout_seconds={} is too low; using minimum of {} seconds",
                config.timeout_seconds, MIN_TIMEOUT_SECONDS
            );
            MIN_TIMEOUT_SECONDS
        } else {
            config.timeout_seconds
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| EdiError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            dry_run: config.dry_run,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<Req, Resp>(&self, path: &str, body: &Req) -> BackendResult<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!("Request to {} failed: {}", url, e);
                BackendError::Transport(e.to_string())
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            warn!("Triage backend error on {}: {} - {}", path, status, message);
            return Err(BackendError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            warn!("Malformed response from {}: {}", path, e);
            BackendError::Malformed(e.to_string())
        })
    }

    fn log_dry_run<Req: Serialize>(&self, path: &str, body: &Req) {
        let payload = serde_json::to_string(body).unwrap_or_default();
        info!("dry_run: would POST {}{} {}", self.base_url, path, payload);
    }
}

#[async_trait]
impl TriageBackend for HttpBackend {
    async fn chat(&self, request: ChatRequest) -> BackendResult<ChatReply> {
        if self.dry_run {
            self.log_dry_run("/get", &request);
            return Ok(ChatReply {
                answer: format!("[dry run] received: {}", request.msg),
                session_id: Some(request.session_id),
                context: None,
            });
        }
        self.post("/get", &request).await
    }

    async fn analyze_symptoms(&self, request: SymptomSubmission) -> BackendResult<SymptomAnalysis> {
        if self.dry_run {
            self.log_dry_run("/analyze_symptoms", &request);
            let answered = [
                &request.main_symptom,
                &request.duration,
                &request.severity,
                &request.additional_symptoms,
            ]
            .into_iter()
            .flatten()
            .cloned()
            .collect::<Vec<_>>();
            return Ok(SymptomAnalysis {
                analysis: format!("[dry run] symptoms: {}", answered.join(", ")),
            });
        }
        self.post("/analyze_symptoms", &request).await
    }

    async fn analyze_body_region(&self, request: RegionRequest) -> BackendResult<RegionAnalysis> {
        if self.dry_run {
            self.log_dry_run("/analyze_body_region", &request);
            return Ok(RegionAnalysis {
                success: true,
                possible_conditions: vec!["[dry run]".to_string()],
                urgent: false,
                recommendation: String::new(),
            });
        }
        self.post("/analyze_body_region", &request).await
    }

    async fn record_audio(&self, request: AudioRequest) -> BackendResult<Transcription> {
        if self.dry_run {
            self.log_dry_run("/record_audio", &request.session_id);
            return Ok(Transcription {
                success: true,
                transcription: Some("[dry run] transcription".to_string()),
                error: None,
            });
        }
        self.post("/record_audio", &request).await
    }

    async fn conversation_summary(&self, request: SummaryRequest) -> BackendResult<SummaryReply> {
        if self.dry_run {
            self.log_dry_run("/get_conversation_summary", &request);
            return Ok(SummaryReply {
                success: true,
                report: format!("[dry run] summary for {}", request.session_id),
                summary: SummaryStats::default(),
            });
        }
        self.post("/get_conversation_summary", &request).await
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
