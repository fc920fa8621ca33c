use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::speech::backend::AnnounceOutcome;

/// Which part of the engine asked for an announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnouncementSource {
    Focus,
    Menu,
    Screen,
    Direct,
}

#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub tick: u64,

    pub source: AnnouncementSource,
    pub text: String,
    pub interrupt: bool,

    /// Backend that spoke, if any
    pub backend: Option<String>,
    pub dropped: bool,
}

impl TraceEvent {
    pub fn now(tick: u64, source: AnnouncementSource, text: &str) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            tick,
            source,
            text: text.to_string(),
            interrupt: true,
            backend: None,
            dropped: false,
        }
    }

    pub fn with_interrupt(mut self, interrupt: bool) -> Self {
        self.interrupt = interrupt;
        self
    }

    pub fn with_outcome(mut self, outcome: &AnnounceOutcome) -> Self {
        self.backend = outcome.backend().map(str::to_string);
        self.dropped = matches!(outcome, AnnounceOutcome::Dropped);
        self
    }
}
