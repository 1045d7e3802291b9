//! Voice clip submission over `/record_audio`
//!
//! Clips are pre-recorded files; capture is left to the platform.

use base64::Engine;
use std::path::Path;
use tracing::{debug, warn};

use crate::client::AudioRequest;
use crate::conversation::{ChatSession, MessageKind, MessageSink};
use crate::error::{EdiError, Result};
use crate::locale::StringKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Webm,
    Ogg,
    Wav,
}

impl AudioFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            AudioFormat::Webm => "audio/webm",
            AudioFormat::Ogg => "audio/ogg",
            AudioFormat::Wav => "audio/wav",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "webm" => Some(AudioFormat::Webm),
            "ogg" | "oga" => Some(AudioFormat::Ogg),
            "wav" => Some(AudioFormat::Wav),
            _ => None,
        }
    }
}

/// Recorded audio ready for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    pub format: AudioFormat,
}

impl AudioClip {
    pub fn new(bytes: Vec<u8>, format: AudioFormat) -> Self {
        Self { bytes, format }
    }

    /// Read a clip, taking the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(AudioFormat::from_extension)
            .ok_or_else(|| {
                EdiError::Validation(format!(
                    "unsupported audio file {} (expected .webm, .ogg or .wav)",
                    path.display()
                ))
            })?;
        let bytes = std::fs::read(path)?;
        if bytes.is_empty() {
            return Err(EdiError::Validation(format!(
                "audio file {} is empty",
                path.display()
            )));
        }
        debug!("Loaded {} byte {} clip", bytes.len(), format.mime_type());
        Ok(Self { bytes, format })
    }

    /// `data:<mime>;base64,<payload>`
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime_type(),
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// Transcribe a clip and continue the chat with the transcription
///
/// The transcription is posted as the user's message and answered through
/// [`ChatSession::respond`]. Returns the transcription when there was one.
pub async fn submit_clip(
    clip: &AudioClip,
    chat: &mut ChatSession,
    sink: &dyn MessageSink,
) -> Option<String> {
    let request = AudioRequest {
        audio: clip.to_data_url(),
        session_id: chat.session_id().clone(),
        lang: chat.language().to_string(),
    };

    let result = chat.backend().record_audio(request).await;
    let lang = chat.language().to_string();

    match result {
        Ok(reply) => match reply
            .transcription
            .filter(|text| reply.success && !text.trim().is_empty())
        {
            Some(transcription) => {
                sink.post(&transcription, MessageKind::Send);
                chat.respond(&transcription, sink).await;
                Some(transcription)
            }
            None => {
                debug!("No transcription: {:?}", reply.error);
                sink.post(
                    chat.catalog().text(&lang, StringKey::TranscriptionFailed),
                    MessageKind::Receive,
                );
                None
            }
        },
        Err(e) => {
            warn!("Audio processing failed: {}", e);
            sink.post(
                chat.catalog().text(&lang, StringKey::AudioError),
                MessageKind::Receive,
            );
            None
        }
    }
}
