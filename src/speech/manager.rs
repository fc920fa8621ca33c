use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::clock::Interval;
use crate::speech::backend::{AnnounceOutcome, Availability, SpeechBackend};
use crate::speech::detect::screen_reader_running;

pub const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_secs(10);

struct BackendSlot {
    backend: Box<dyn SpeechBackend>,
    priority: u32,
    availability: Availability,
}

/// Where announcements end up, combined with whether a screen reader runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SpeechStatus {
    Active { backend: String, screen_reader: bool },
    Unavailable { screen_reader: bool },
    NotConfigured,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendStatus {
    pub name: String,
    pub priority: u32,
    pub availability: Availability,
}

/// Owns the speech backends in priority order and delivers announcements
/// through the first one that accepts them.
///
/// Availability is re-probed on a fixed period (`refresh`), never on every
/// call. A backend that fails mid-call is marked unavailable and the same
/// call falls through to the next backend.
pub struct SpeechManager {
    slots: Vec<BackendSlot>,
    probe_interval: Interval,
    /// Index of the backend that spoke last, if any
    last_speaker: Option<usize>,
    screen_reader_detector: fn() -> bool,
}

impl Default for SpeechManager {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_INTERVAL)
    }
}

impl SpeechManager {
    pub fn new(probe_period: Duration) -> Self {
        Self {
            slots: vec![],
            probe_interval: Interval::new(probe_period),
            last_speaker: None,
            screen_reader_detector: screen_reader_running,
        }
    }

    /// Replace the running-screen-reader check used in status reports.
    pub fn with_screen_reader_detector(mut self, detector: fn() -> bool) -> Self {
        self.screen_reader_detector = detector;
        self
    }

    /// Add a backend. Lower `priority` is tried first; equal priorities keep
    /// registration order.
    pub fn register(&mut self, backend: Box<dyn SpeechBackend>, priority: u32) {
        debug!(backend = backend.name(), priority, "registering speech backend");

        let position = self
            .slots
            .iter()
            .position(|s| s.priority > priority)
            .unwrap_or(self.slots.len());

        self.slots.insert(
            position,
            BackendSlot {
                backend,
                priority,
                availability: Availability::Unknown,
            },
        );

        // Indices after the insertion point shifted
        if let Some(last) = self.last_speaker {
            if last >= position {
                self.last_speaker = Some(last + 1);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn statuses(&self) -> Vec<BackendStatus> {
        self.slots
            .iter()
            .map(|s| BackendStatus {
                name: s.backend.name().to_string(),
                priority: s.priority,
                availability: s.availability,
            })
            .collect()
    }

    pub fn availability(&self, name: &str) -> Option<Availability> {
        self.slots
            .iter()
            .find(|s| s.backend.name() == name)
            .map(|s| s.availability)
    }

    /// Re-probe every backend if the probe period has elapsed.
    /// Returns true when probes ran.
    pub fn refresh(&mut self, now: Instant) -> bool {
        if !self.probe_interval.due(now) {
            return false;
        }
        self.probe_all();
        true
    }

    /// Probe every backend now, regardless of the period.
    pub fn probe_all(&mut self) {
        let mut changed = false;

        for slot in &mut self.slots {
            let before = slot.availability;
            slot.availability = Availability::from_probe(slot.backend.probe());

            if before != slot.availability {
                changed = true;
                log_transition(slot.backend.name(), before, slot.availability);
            }
        }

        if changed {
            self.log_status();
        }
    }

    /// Speak `text` through the highest-priority backend that accepts it.
    ///
    /// With `interrupt`, whatever is speaking is cancelled first. Failures
    /// never escape: a total failure drops the text and reports `Dropped`.
    pub fn announce(&mut self, text: &str, interrupt: bool) -> AnnounceOutcome {
        if text.trim().is_empty() {
            return AnnounceOutcome::Skipped;
        }

        info!("[Screen Reader] {}", text);

        // Set once a higher-priority backend fails during this call; lets
        // lower-priority unavailable backends be re-probed right away
        let mut fallback_armed = false;

        for index in 0..self.slots.len() {
            if !self.ready_for_speech(index, fallback_armed) {
                continue;
            }

            if interrupt {
                self.cancel_for(index);
            }

            let slot = &mut self.slots[index];
            match slot.backend.speak(text) {
                Ok(()) => {
                    debug!(backend = slot.backend.name(), "announcement delivered");
                    self.last_speaker = Some(index);
                    return AnnounceOutcome::Delivered {
                        backend: slot.backend.name().to_string(),
                    };
                }
                Err(e) => {
                    warn!(
                        backend = slot.backend.name(),
                        error = %e,
                        "speech failed, falling back to next backend"
                    );
                    slot.availability = Availability::Unavailable;
                    fallback_armed = true;
                }
            }
        }

        warn!("Could not speak text (no speech backend available): {}", text);
        AnnounceOutcome::Dropped
    }

    /// Cancel whatever is speaking on every backend that was ever reached,
    /// including ones marked unavailable since they last spoke.
    pub fn silence(&mut self) {
        for slot in &mut self.slots {
            if slot.availability == Availability::Unknown {
                continue;
            }
            if let Err(e) = slot.backend.cancel() {
                debug!(backend = slot.backend.name(), error = %e, "cancel failed");
            }
        }
        self.last_speaker = None;
    }

    fn ready_for_speech(&mut self, index: usize, fallback_armed: bool) -> bool {
        let slot = &mut self.slots[index];

        match slot.availability {
            Availability::Available => true,
            Availability::Unavailable if !fallback_armed => false,
            before => {
                slot.availability = Availability::from_probe(slot.backend.probe());
                if before != slot.availability {
                    log_transition(slot.backend.name(), before, slot.availability);
                }
                slot.availability == Availability::Available
            }
        }
    }

    /// Cancel-then-speak: stop the previous speaker (if it is a different
    /// backend) and the target, so at most one utterance is live.
    fn cancel_for(&mut self, index: usize) {
        if let Some(previous) = self.last_speaker.take() {
            if previous != index {
                if let Some(slot) = self.slots.get_mut(previous) {
                    if let Err(e) = slot.backend.cancel() {
                        debug!(backend = slot.backend.name(), error = %e, "cancel failed");
                    }
                }
            }
        }

        let slot = &mut self.slots[index];
        if let Err(e) = slot.backend.cancel() {
            debug!(backend = slot.backend.name(), error = %e, "cancel failed");
        }
    }

    /// Current output path. Runs the screen-reader check.
    pub fn status(&self) -> SpeechStatus {
        if self.slots.is_empty() {
            return SpeechStatus::NotConfigured;
        }

        let screen_reader = (self.screen_reader_detector)();
        match self
            .slots
            .iter()
            .find(|s| s.availability == Availability::Available)
        {
            Some(slot) => SpeechStatus::Active {
                backend: slot.backend.name().to_string(),
                screen_reader,
            },
            None => SpeechStatus::Unavailable { screen_reader },
        }
    }

    fn log_status(&self) {
        match self.status() {
            SpeechStatus::Active {
                backend,
                screen_reader: true,
            } => info!("Screen reader detected. {} will receive announcements", backend),
            SpeechStatus::Active {
                backend,
                screen_reader: false,
            } => warn!(
                "No screen reader detected, but {} is available. You may hear system speech.",
                backend
            ),
            SpeechStatus::Unavailable { screen_reader: true } => {
                error!("Screen reader detected, but no speech backend answers. Announcements will be dropped.")
            }
            SpeechStatus::Unavailable { screen_reader: false } => {
                error!("No screen reader detected and no speech backend available. Announcements will be dropped.")
            }
            SpeechStatus::NotConfigured => {
                error!("No speech backends configured. Announcements will be dropped.")
            }
        }
    }
}

fn log_transition(name: &str, before: Availability, after: Availability) {
    match after {
        Availability::Available => info!("{} is now available", name),
        Availability::Unavailable if before == Availability::Available => {
            warn!("{} is no longer available", name)
        }
        _ => debug!(backend = name, ?before, ?after, "backend availability"),
    }
}
