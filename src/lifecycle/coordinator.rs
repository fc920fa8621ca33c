use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use tracing::{error, info};

use crate::cli::config::AppConfig;
use crate::clock::duration_from_secs as secs;
use crate::host::events::{ScreenEventSource, Subscription};
use crate::host::widget::WidgetHost;
use crate::narrator::menu::{MenuNarrator, ScanOutcome};
use crate::narrator::vocabulary::Vocabulary;
use crate::speech::backend::AnnounceOutcome;
use crate::speech::manager::SpeechManager;
use crate::speech::registry::BackendRegistry;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::{AnnouncementSource, TraceEvent};
use crate::tracker::focus::{FocusEvent, FocusTracker};

/// What one engine tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    /// Screens announced this tick, in arrival order
    pub screens: Vec<String>,
    pub focus: FocusEvent,
    pub menu: ScanOutcome,
}

impl Default for TickReport {
    fn default() -> Self {
        Self {
            screens: vec![],
            focus: FocusEvent::Idle,
            menu: ScanOutcome::Idle,
        }
    }
}

impl TickReport {
    /// Texts sent to the speech manager this tick, in the order spoken.
    pub fn announcements(&self) -> Vec<String> {
        let mut spoken: Vec<String> = self
            .screens
            .iter()
            .map(|name| screen_announcement(name))
            .collect();
        if let FocusEvent::Announced { text, .. } = &self.focus {
            spoken.push(text.clone());
        }
        if let ScanOutcome::Announced { summary, .. } = &self.menu {
            spoken.push(summary.clone());
        }
        spoken
    }
}

pub fn screen_announcement(name: &str) -> String {
    format!("Screen: {}", name)
}

/// Wires the speech manager, focus tracker and menu narrator together and
/// reacts to screen transitions.
///
/// Every public entry point contains its own faults: errors are logged and
/// a panic inside a host or backend implementation is caught, so nothing
/// unwinds into the host's frame loop.
pub struct AccessibilityEngine {
    speech: SpeechManager,
    focus: FocusTracker,
    menu: MenuNarrator,
    last_screen: Option<String>,
    subscription: Option<Subscription>,
    tracer: TraceLogger,
    ticks: u64,
}

impl AccessibilityEngine {
    pub fn new(speech: SpeechManager, focus: FocusTracker, menu: MenuNarrator) -> Self {
        info!("Accessibility engine components initialized");
        Self {
            speech,
            focus,
            menu,
            last_screen: None,
            subscription: None,
            tracer: TraceLogger::disabled(),
            ticks: 0,
        }
    }

    /// Assemble an engine from configuration, resolving backends through
    /// `registry`.
    pub fn from_config(config: &AppConfig, registry: &BackendRegistry) -> Self {
        let speech = registry.build_manager(
            &config.backends,
            secs(config.engine.probe_interval_secs),
        );
        let focus = FocusTracker::new(secs(config.engine.focus_interval_secs));
        let menu = MenuNarrator::new(
            secs(config.engine.scan_interval_secs),
            Vocabulary::from_config(&config.menu),
        );
        Self::new(speech, focus, menu)
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn speech(&self) -> &SpeechManager {
        &self.speech
    }

    pub fn speech_mut(&mut self) -> &mut SpeechManager {
        &mut self.speech
    }

    pub fn menu(&self) -> &MenuNarrator {
        &self.menu
    }

    pub fn focus(&self) -> &FocusTracker {
        &self.focus
    }

    pub fn last_screen(&self) -> Option<&str> {
        self.last_screen.as_deref()
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Subscribe to the host's screen transitions.
    pub fn attach(&mut self, source: &mut dyn ScreenEventSource) {
        if let Some(old) = self.subscription.take() {
            source.unsubscribe(old.id);
        }
        self.subscription = Some(source.subscribe());
        info!("Listening for screen changes");
    }

    /// Unsubscribe and stop any speech still playing.
    pub fn detach(&mut self, source: &mut dyn ScreenEventSource) {
        if let Some(subscription) = self.subscription.take() {
            source.unsubscribe(subscription.id);
            info!("Stopped listening for screen changes");
        }
        contain("stopping speech", (), || self.speech.silence());
    }

    /// Announce a new screen and re-arm the menu narrator. Repeated
    /// notifications for the current screen are ignored.
    /// Returns true when the screen was announced.
    pub fn handle_screen_transition(&mut self, name: &str) -> bool {
        contain("handling screen change", false, || self.screen_changed(name))
    }

    /// Speak arbitrary text through the backends.
    pub fn announce(&mut self, text: &str, interrupt: bool) -> AnnounceOutcome {
        contain("speaking text", AnnounceOutcome::Dropped, || {
            let outcome = self.speech.announce(text, interrupt);
            self.trace(AnnouncementSource::Direct, text, interrupt, &outcome);
            outcome
        })
    }

    /// One host frame: refresh backend availability, handle pending screen
    /// transitions, then run the focus and menu polls that are due.
    pub fn tick(&mut self, host: &mut dyn WidgetHost, now: Instant) -> TickReport {
        contain("tick", TickReport::default(), || self.run_tick(host, now))
    }

    fn run_tick(&mut self, host: &mut dyn WidgetHost, now: Instant) -> TickReport {
        self.ticks += 1;
        self.speech.refresh(now);

        let mut report = TickReport::default();

        let pending = self
            .subscription
            .as_ref()
            .map(Subscription::drain)
            .unwrap_or_default();
        for transition in pending {
            if self.screen_changed(&transition.name) {
                report.screens.push(transition.name);
            }
        }

        report.focus = self.focus.tick(&*host, &mut self.speech, now);
        if let FocusEvent::Announced { text, outcome, .. } = &report.focus {
            self.trace(AnnouncementSource::Focus, text, true, outcome);
        }

        report.menu = self.menu.tick(host, &mut self.speech, now);
        if let ScanOutcome::Announced { summary, outcome } = &report.menu {
            self.trace(AnnouncementSource::Menu, summary, true, outcome);
        }

        report
    }

    fn screen_changed(&mut self, name: &str) -> bool {
        if self.last_screen.as_deref() == Some(name) {
            return false;
        }
        self.last_screen = Some(name.to_string());
        info!("Screen changed to: {}", name);

        let text = screen_announcement(name);
        let outcome = self.speech.announce(&text, true);
        self.trace(AnnouncementSource::Screen, &text, true, &outcome);

        self.menu.reset_scan();
        true
    }

    fn trace(&self, source: AnnouncementSource, text: &str, interrupt: bool, outcome: &AnnounceOutcome) {
        if !self.tracer.is_enabled() || matches!(outcome, AnnounceOutcome::Skipped) {
            return;
        }
        let event = TraceEvent::now(self.ticks, source, text)
            .with_interrupt(interrupt)
            .with_outcome(outcome);
        self.tracer.log(&event);
    }
}

/// Run `f`, turning a panic into a logged error and `fallback`.
fn contain<T>(context: &str, fallback: T, f: impl FnOnce() -> T) -> T {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(payload) => {
            error!("Error {}: {}", context, panic_message(payload.as_ref()));
            fallback
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
