//! Free-text chat over `/get`

use std::sync::Arc;
use tracing::{debug, warn};

use super::{MessageKind, MessageSink};
use crate::client::{ChatContext, ChatRequest, SessionId, TriageBackend};
use crate::locale::{LocaleCatalog, StringKey};

/// One conversation with the assistant
pub struct ChatSession {
    backend: Arc<dyn TriageBackend>,
    catalog: Arc<LocaleCatalog>,
    language: String,
    session_id: SessionId,
    last_context: Option<ChatContext>,
}

impl ChatSession {
    pub fn new(
        backend: Arc<dyn TriageBackend>,
        catalog: Arc<LocaleCatalog>,
        language: impl Into<String>,
        session_id: SessionId,
    ) -> Self {
        Self {
            backend,
            catalog,
            language: language.into(),
            session_id,
            last_context: None,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = language.into();
    }

    pub fn catalog(&self) -> &LocaleCatalog {
        &self.catalog
    }

    pub fn backend(&self) -> &dyn TriageBackend {
        self.backend.as_ref()
    }

    /// Context from the most recent successful reply
    pub fn last_context(&self) -> Option<&ChatContext> {
        self.last_context.as_ref()
    }

    /// Localized "thinking" indicator text
    pub fn thinking_text(&self) -> &str {
        self.catalog.text(&self.language, StringKey::Thinking)
    }

    /// Post the user's text and ask the assistant about it
    ///
    /// Blank input is ignored and returns `None`.
    pub async fn send_message(&mut self, text: &str, sink: &dyn MessageSink) -> Option<String> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        sink.post(text, MessageKind::Send);
        self.respond(text, sink).await
    }

    /// Ask the assistant without echoing the user's text
    ///
    /// Posts the answer, or the localized chat error on failure, and returns
    /// the answer when there is one.
    pub async fn respond(&mut self, text: &str, sink: &dyn MessageSink) -> Option<String> {
        let request = ChatRequest {
            msg: text.to_string(),
            lang: self.language.clone(),
            session_id: self.session_id.clone(),
        };

        match self.backend.chat(request).await {
            Ok(reply) => {
                if let Some(session_id) = reply.session_id {
                    if session_id != self.session_id {
                        debug!("Adopting server session id {}", session_id);
                        self.session_id = session_id;
                    }
                }
                self.last_context = reply.context;
                sink.post(&reply.answer, MessageKind::Receive);
                Some(reply.answer)
            }
            Err(e) => {
                warn!("Chat request via {} failed: {}", self.backend.name(), e);
                sink.post(
                    self.catalog.text(&self.language, StringKey::ChatError),
                    MessageKind::Receive,
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{BackendError, ChatReply, ScriptedBackend};
    use crate::conversation::recording::RecordingSink;
    use pretty_assertions::assert_eq;

    fn session(backend: ScriptedBackend) -> (ChatSession, Arc<ScriptedBackend>) {
        let backend = Arc::new(backend);
        let catalog = Arc::new(LocaleCatalog::builtin().unwrap());
        let chat = ChatSession::new(backend.clone(), catalog, "en", "session_1_aaaaaaaaa".into());
        (chat, backend)
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let (mut chat, backend) = session(ScriptedBackend::default());
        let sink = RecordingSink::default();

        assert_eq!(chat.send_message("   ", &sink).await, None);
        assert!(sink.posted().is_empty());
        assert!(backend.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_answer_is_posted_after_user_text() {
        let (mut chat, backend) = session(ScriptedBackend {
            chat: Some(Ok(ChatReply {
                answer: "Drink fluids and rest.".to_string(),
                session_id: Some("session_server".into()),
                context: Some(ChatContext {
                    symptoms: vec!["fever".to_string()],
                    ..Default::default()
                }),
            })),
            ..Default::default()
        });
        let sink = RecordingSink::default();

        let answer = chat.send_message("  I have a fever ", &sink).await;
        assert_eq!(answer.as_deref(), Some("Drink fluids and rest."));
        assert_eq!(
            sink.posted(),
            vec![
                (MessageKind::Send, "I have a fever".to_string()),
                (MessageKind::Receive, "Drink fluids and rest.".to_string()),
            ]
        );
        assert_eq!(backend.recorded()[0]["msg"], "I have a fever");
        assert_eq!(backend.recorded()[0]["session_id"], "session_1_aaaaaaaaa");
        assert_eq!(chat.session_id().as_str(), "session_server");
        assert_eq!(chat.last_context().unwrap().symptoms, vec!["fever"]);
    }

    #[tokio::test]
    async fn test_failure_posts_localized_error() {
        let (mut chat, _) = session(ScriptedBackend {
            chat: Some(Err(BackendError::Status {
                status: 500,
                message: "boom".to_string(),
            })),
            ..Default::default()
        });
        let sink = RecordingSink::default();

        assert_eq!(chat.respond("hello", &sink).await, None);
        assert_eq!(
            sink.texts(),
            vec!["Sorry, I encountered an error. Please try again later."]
        );
    }

    #[tokio::test]
    async fn test_language_is_sent_with_request() {
        let (mut chat, backend) = session(ScriptedBackend {
            chat: Some(Ok(ChatReply {
                answer: "Sawubona".to_string(),
                session_id: None,
                context: None,
            })),
            ..Default::default()
        });
        chat.set_language("zu");
        assert_eq!(chat.thinking_text(), "EDI iyacabanga...");

        chat.respond("hello", &RecordingSink::default()).await;
        assert_eq!(backend.recorded()[0]["lang"], "zu");
        assert_eq!(chat.session_id().as_str(), "session_1_aaaaaaaaa");
    }
}
