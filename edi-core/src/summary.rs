//! Consultation summary and printable documents

use std::path::Path;
use tracing::{debug, info, warn};

use crate::client::{SessionId, SummaryRequest, SummaryStats, TriageBackend};
use crate::conversation::{MessageKind, MessageSink};
use crate::error::Result;
use crate::locale::{LocaleCatalog, StringKey};

/// Summary returned by `/get_conversation_summary`
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryReport {
    /// Preformatted plain-text report
    pub report: String,
    pub stats: SummaryStats,
}

/// Fetch the summary of a conversation
///
/// On failure the localized notice is posted to `sink` and `None` is
/// returned: "unavailable" when the server declines, "error" when the
/// request itself fails.
pub async fn fetch_summary(
    backend: &dyn TriageBackend,
    session_id: &SessionId,
    catalog: &LocaleCatalog,
    lang: &str,
    sink: &dyn MessageSink,
) -> Option<SummaryReport> {
    let request = SummaryRequest {
        session_id: session_id.clone(),
    };

    match backend.conversation_summary(request).await {
        Ok(reply) if reply.success => {
            debug!(
                "Summary for {}: {} messages",
                session_id, reply.summary.total_messages
            );
            Some(SummaryReport {
                report: reply.report,
                stats: reply.summary,
            })
        }
        Ok(_) => {
            sink.post(
                catalog.text(lang, StringKey::SummaryUnavailable),
                MessageKind::Receive,
            );
            None
        }
        Err(e) => {
            warn!("Summary request failed: {}", e);
            sink.post(
                catalog.text(lang, StringKey::SummaryError),
                MessageKind::Receive,
            );
            None
        }
    }
}

/// Standalone HTML page wrapping a report for printing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintDocument {
    html: String,
}

impl PrintDocument {
    pub fn from_report(report: &SummaryReport) -> Self {
        Self::from_text(&report.report)
    }

    pub fn from_text(text: &str) -> Self {
        let html = format!(
            "<html><head><title>Medical Summary</title>\
             <style>body {{ font-family: Arial; padding: 20px; }} pre {{ white-space: pre-wrap; }}</style>\
             </head><body><pre>{}</pre></body></html>\n",
            escape_html(text)
        );
        Self { html }
    }

    /// Wrap already-rendered HTML
    pub fn from_html(html: String) -> Self {
        Self { html }
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, &self.html)?;
        info!("Wrote printable summary to {}", path.display());
        Ok(())
    }
}

/// Escape text for inclusion in HTML element content or attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
