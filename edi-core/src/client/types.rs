//! Client types - Request and response bodies for the triage backend
//!
//! These types define the JSON contract of the five backend endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Failure talking to the triage backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Connection, timeout or other network failure
    #[error("request failed: {0}")]
    Transport(String),

    /// Non-2xx response; `message` is the body's `error` field when present
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body did not decode into the expected shape
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Opaque conversation id shared by all endpoints of one session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generate `session_<unix-millis>_<9 lowercase alphanumerics>`
    pub fn generate() -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        let entropy = uuid::Uuid::new_v4().simple().to_string();
        Self(format!("session_{millis}_{}", &entropy[..9]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `POST /get`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub msg: String,
    pub lang: String,
    pub session_id: SessionId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub answer: String,

    /// Server-assigned session id, adopted by the client when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ChatContext>,
}

/// Clinical context the server extracted from the conversation so far
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatContext {
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub urgency: Option<String>,
}

/// `POST /analyze_symptoms`
///
/// Unanswered steps are omitted from the body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomSubmission {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_symptom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_symptoms: Option<String>,
    pub lang: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomAnalysis {
    pub analysis: String,
}

/// `POST /analyze_body_region`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRequest {
    pub region: String,
    pub symptoms: Vec<String>,
    pub session_id: SessionId,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionAnalysis {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub possible_conditions: Vec<String>,
    #[serde(default)]
    pub urgent: bool,
    #[serde(default)]
    pub recommendation: String,
}

/// `POST /record_audio`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioRequest {
    /// `data:<mime>;base64,<payload>`
    pub audio: String,
    pub session_id: SessionId,
    pub lang: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcription {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub transcription: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// `POST /get_conversation_summary`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRequest {
    pub session_id: SessionId,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub report: String,
    #[serde(default)]
    pub summary: SummaryStats,
}

/// Structured counterpart of the printable report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub total_messages: u32,
    #[serde(default)]
    pub symptoms_identified: Vec<String>,
    #[serde(default)]
    pub medications_discussed: Vec<String>,
    #[serde(default)]
    pub diagnostic_procedures: Vec<String>,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub doctor_recommendations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_session_id_format() {
        let id = SessionId::generate();
        let parts: Vec<&str> = id.as_str().split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "session");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_submission_omits_unanswered_fields() {
        let submission = SymptomSubmission {
            main_symptom: Some("Fever".to_string()),
            lang: "en".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"main_symptom": "Fever", "lang": "en"})
        );
    }

    #[test]
    fn test_chat_reply_tolerates_missing_context() {
        let reply: ChatReply = serde_json::from_str(r#"{"answer": "Rest and hydrate."}"#).unwrap();
        assert_eq!(reply.answer, "Rest and hydrate.");
        assert!(reply.session_id.is_none());
        assert!(reply.context.is_none());
    }

    #[test]
    fn test_summary_reply_defaults_stats() {
        let reply: SummaryReply =
            serde_json::from_str(r#"{"success": true, "report": "REPORT"}"#).unwrap();
        assert!(reply.success);
        assert_eq!(reply.summary, SummaryStats::default());
    }
}
