//! Conversation - Message display, chat and quick actions
//!
//! Every flow reports to the user through a [`MessageSink`]. The sink is the
//! only output channel the core library knows about, so a terminal, a test
//! recorder or a transcript log can sit behind it.

mod chat;
mod quick_actions;

pub use chat::ChatSession;
pub use quick_actions::{
    ambulance_instructions, call_ambulance, find_clinics, language_changed, Clinic, CLINICS,
};

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;
use std::sync::Mutex;
use tokio::sync::mpsc::UnboundedSender;
use tracing::trace;

use crate::summary::escape_html;

/// Direction of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Typed or spoken by the user
    Send,
    /// Produced by the assistant
    Receive,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::Send => f.write_str("send"),
            MessageKind::Receive => f.write_str("receive"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub text: String,
    pub kind: MessageKind,
    pub time: DateTime<Local>,
}

impl ChatMessage {
    pub fn new(text: impl Into<String>, kind: MessageKind) -> Self {
        Self {
            text: text.into(),
            kind,
            time: Local::now(),
        }
    }

    /// `HH:MM` label shown next to the message
    pub fn time_label(&self) -> String {
        self.time.format("%H:%M").to_string()
    }
}

/// Message-display collaborator
///
/// Posting must never fail; a display that has gone away drops the message.
pub trait MessageSink: Send + Sync {
    fn post(&self, text: &str, kind: MessageKind);
}

impl MessageSink for UnboundedSender<ChatMessage> {
    fn post(&self, text: &str, kind: MessageKind) {
        if self.send(ChatMessage::new(text, kind)).is_err() {
            trace!("Message display closed; dropping {} message", kind);
        }
    }
}

/// Sink that discards everything
pub struct NullSink;

impl MessageSink for NullSink {
    fn post(&self, _text: &str, _kind: MessageKind) {}
}

/// Ordered record of a conversation
#[derive(Debug, Default)]
pub struct ConversationLog {
    messages: Mutex<Vec<ChatMessage>>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, message: ChatMessage) {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(message);
    }

    /// Snapshot of all messages in posting order
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Standalone HTML transcript suitable for printing
    pub fn printable_html(&self) -> String {
        let generated = Local::now().format("%Y-%m-%d %H:%M:%S");
        let mut html = format!(
            r#"<!DOCTYPE html>
<html>
<head>
<title>Medical Consultation Summary</title>
<style>
body {{ font-family: Arial, sans-serif; line-height: 1.6; padding: 20px; }}
.header {{ text-align: center; margin-bottom: 20px; }}
.message {{ margin-bottom: 15px; padding-bottom: 15px; border-bottom: 1px solid #eee; }}
.send {{ text-align: right; color: #2C50EF; }}
.receive {{ text-align: left; }}
.time {{ font-size: 11px; color: #777; }}
.content {{ white-space: pre-wrap; }}
.footer {{ margin-top: 30px; font-size: 12px; text-align: center; color: #777; }}
</style>
</head>
<body>
<div class="header">
<h2>Medical Consultation Summary</h2>
<p>Generated on {generated}</p>
</div>
"#
        );

        for message in self.messages() {
            html.push_str(&format!(
                "<div class=\"message {}\">\n<div class=\"content\">{}</div>\n<div class=\"time\">{}</div>\n</div>\n",
                message.kind,
                escape_html(&message.text),
                message.time_label()
            ));
        }

        html.push_str(
            r#"<div class="footer">
<p>This summary is for informational purposes only and does not replace professional medical advice.</p>
<p>For emergencies, call 10177 (Ambulance) or 112 (Cell phone emergency)</p>
</div>
</body>
</html>
"#,
        );
        html
    }
}

impl MessageSink for ConversationLog {
    fn post(&self, text: &str, kind: MessageKind) {
        self.push(ChatMessage::new(text, kind));
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_time_label_format() {
        let message = ChatMessage::new("hi", MessageKind::Send);
        let label = message.time_label();
        assert_eq!(label.len(), 5);
        assert_eq!(&label[2..3], ":");
    }

    #[test]
    fn test_channel_sink_ignores_closed_receiver() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<ChatMessage>();
        drop(rx);
        tx.post("nobody is listening", MessageKind::Receive);
    }

    #[test]
    fn test_channel_sink_delivers_in_order() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<ChatMessage>();
        tx.post("first", MessageKind::Send);
        tx.post("second", MessageKind::Receive);

        let first = rx.try_recv().unwrap();
        let second = rx.try_recv().unwrap();
        assert_eq!((first.text.as_str(), first.kind), ("first", MessageKind::Send));
        assert_eq!(
            (second.text.as_str(), second.kind),
            ("second", MessageKind::Receive)
        );
    }

    #[test]
    fn test_printable_html_escapes_and_classifies() {
        let log = ConversationLog::new();
        log.post("<b>chest pain</b>", MessageKind::Send);
        log.post("Please call 10177.", MessageKind::Receive);

        let html = log.printable_html();
        assert!(html.contains("<title>Medical Consultation Summary</title>"));
        assert!(html.contains("<div class=\"message send\">"));
        assert!(html.contains("<div class=\"message receive\">"));
        assert!(html.contains("&lt;b&gt;chest pain&lt;/b&gt;"));
        assert!(!html.contains("<b>chest pain</b>"));
        assert!(html.contains("112 (Cell phone emergency)"));
    }

    #[test]
    fn test_log_keeps_posting_order() {
        let log = ConversationLog::new();
        assert!(log.is_empty());
        log.post("a", MessageKind::Send);
        log.post("b", MessageKind::Receive);
        let texts: Vec<_> = log.messages().into_iter().map(|m| m.text).collect();
        assert_eq!(texts, vec!["a", "b"]);
    }
}
