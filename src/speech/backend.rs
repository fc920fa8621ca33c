use serde::Serialize;

use crate::error::SpeechError;

/// One speech output channel (screen-reader API, OS text-to-speech, ...).
///
/// Calls may be slow or fail at any time; the manager decides when to probe
/// and when to fall back.
pub trait SpeechBackend {
    fn name(&self) -> &str;

    /// Whether the backend can currently accept speech.
    fn probe(&mut self) -> bool;

    fn speak(&mut self, text: &str) -> Result<(), SpeechError>;

    /// Stop the in-flight utterance. Nothing playing is not an error.
    fn cancel(&mut self) -> Result<(), SpeechError>;
}

/// What the manager currently believes about a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Availability {
    Unknown,
    Available,
    Unavailable,
}

impl Availability {
    pub fn from_probe(ok: bool) -> Self {
        if ok {
            Availability::Available
        } else {
            Availability::Unavailable
        }
    }
}

/// Result of one `announce` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AnnounceOutcome {
    /// Empty text; nothing to do
    Skipped,
    Delivered { backend: String },
    /// No backend accepted the text
    Dropped,
}

impl AnnounceOutcome {
    /// Skipped counts as success: there was nothing to deliver.
    pub fn is_success(&self) -> bool {
        !matches!(self, AnnounceOutcome::Dropped)
    }

    pub fn backend(&self) -> Option<&str> {
        match self {
            AnnounceOutcome::Delivered { backend } => Some(backend),
            _ => None,
        }
    }
}
