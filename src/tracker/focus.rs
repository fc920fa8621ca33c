use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::clock::Interval;
use crate::error::HostError;
use crate::host::widget::{WidgetHost, WidgetRef};
use crate::introspect::introspector::describe;
use crate::speech::backend::AnnounceOutcome;
use crate::speech::manager::SpeechManager;

pub const DEFAULT_FOCUS_INTERVAL: Duration = Duration::from_millis(100);

/// Result of one focus poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusEvent {
    /// Not due, no focus manager, nothing focused, or focus unchanged
    Idle,
    /// Focus moved but the widget had nothing to say
    Silent { widget: WidgetRef },
    Announced {
        widget: WidgetRef,
        text: String,
        outcome: AnnounceOutcome,
    },
}

/// Announces the focused widget whenever focus moves to a different one.
pub struct FocusTracker {
    interval: Interval,
    last_focused: Option<WidgetRef>,
    focus_manager_seen: bool,
}

impl Default for FocusTracker {
    fn default() -> Self {
        Self::new(DEFAULT_FOCUS_INTERVAL)
    }
}

impl FocusTracker {
    pub fn new(period: Duration) -> Self {
        Self {
            interval: Interval::new(period),
            last_focused: None,
            focus_manager_seen: false,
        }
    }

    pub fn last_focused(&self) -> Option<WidgetRef> {
        self.last_focused
    }

    /// Poll when the focus interval has elapsed.
    pub fn tick(
        &mut self,
        host: &dyn WidgetHost,
        speech: &mut SpeechManager,
        now: Instant,
    ) -> FocusEvent {
        if !self.interval.due(now) {
            return FocusEvent::Idle;
        }
        self.poll(host, speech)
    }

    /// Read the host's focus once and announce it if it changed.
    pub fn poll(&mut self, host: &dyn WidgetHost, speech: &mut SpeechManager) -> FocusEvent {
        let current = match host.current_focus() {
            Ok(current) => current,
            Err(HostError::FocusManagerUnavailable) => {
                // Re-polled every tick until the host creates one
                return FocusEvent::Idle;
            }
            Err(e) => {
                debug!(error = %e, "focus unreadable this tick");
                return FocusEvent::Idle;
            }
        };

        if !self.focus_manager_seen {
            self.focus_manager_seen = true;
            info!("Focus manager found; tracking focus changes");
        }

        let Some(widget) = current else {
            return FocusEvent::Idle;
        };

        if self.last_focused == Some(widget) {
            return FocusEvent::Idle;
        }
        self.last_focused = Some(widget);

        let text = describe(host, widget).text();
        if text.is_empty() {
            debug!(%widget, "focused widget has no label");
            return FocusEvent::Silent { widget };
        }

        let outcome = speech.announce(&text, true);
        FocusEvent::Announced {
            widget,
            text,
            outcome,
        }
    }
}
