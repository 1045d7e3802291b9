//! Line-oriented message display for stdout

use std::io::Write;

use edi_core::conversation::{ChatMessage, ConversationLog, MessageKind, MessageSink};

/// Prints every posted message and keeps a transcript of the conversation
#[derive(Default)]
pub struct TerminalSink {
    log: ConversationLog,
}

impl TerminalSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }
}

impl MessageSink for TerminalSink {
    fn post(&self, text: &str, kind: MessageKind) {
        let message = ChatMessage::new(text, kind);
        let mut stdout = std::io::stdout().lock();
        // A closed stdout drops the message like any other gone display
        let _ = writeln!(stdout, "{}", format_message(&message));
        let _ = stdout.flush();
        self.log.push(message);
    }
}

/// `EDI [14:02]: text`, with continuation lines indented under the text
pub fn format_message(message: &ChatMessage) -> String {
    let speaker = match message.kind {
        MessageKind::Send => "You",
        MessageKind::Receive => "EDI",
    };
    let prefix = format!("{speaker} [{}]: ", message.time_label());
    let indent = " ".repeat(prefix.len());

    let mut out = String::new();
    for (i, line) in message.text.lines().enumerate() {
        if i == 0 {
            out.push_str(&prefix);
        } else {
            out.push('\n');
            out.push_str(&indent);
        }
        out.push_str(line);
    }
    if out.is_empty() {
        out.push_str(prefix.trim_end());
    }
    out
}

/// Transient status line on stderr, e.g. the thinking indicator
pub fn status(text: &str) {
    eprintln!("{text}");
}
