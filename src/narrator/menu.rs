use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::clock::Interval;
use crate::host::widget::WidgetHost;
use crate::introspect::introspector::selectable_label;
use crate::narrator::snapshot::{MenuItem, MenuSnapshot};
use crate::narrator::vocabulary::Vocabulary;
use crate::speech::backend::AnnounceOutcome;
use crate::speech::manager::SpeechManager;

pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(1);

/// Result of one menu scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Not due, host not ready, or no labelled interactive widgets
    Idle,
    /// Same menu as the one already announced
    Unchanged,
    Announced {
        summary: String,
        outcome: AnnounceOutcome,
    },
}

/// Scans interactive widgets, announces the menu they form once per distinct
/// content, and puts focus on its first entry.
pub struct MenuNarrator {
    interval: Interval,
    vocabulary: Vocabulary,
    last_hash: Option<u64>,
    has_announced: bool,
}

impl Default for MenuNarrator {
    fn default() -> Self {
        Self::new(DEFAULT_SCAN_INTERVAL, Vocabulary::default())
    }
}

impl MenuNarrator {
    pub fn new(period: Duration, vocabulary: Vocabulary) -> Self {
        info!(terms = vocabulary.len(), "Menu narrator will scan for menu screens");
        Self {
            interval: Interval::new(period),
            vocabulary,
            last_hash: None,
            has_announced: false,
        }
    }

    pub fn has_announced(&self) -> bool {
        self.has_announced
    }

    pub fn last_hash(&self) -> Option<u64> {
        self.last_hash
    }

    /// Forget what was announced so the next non-empty scan speaks again.
    pub fn reset_scan(&mut self) {
        self.last_hash = None;
        self.has_announced = false;
    }

    /// Scan when the scan interval has elapsed.
    pub fn tick(
        &mut self,
        host: &mut dyn WidgetHost,
        speech: &mut SpeechManager,
        now: Instant,
    ) -> ScanOutcome {
        if !self.interval.due(now) {
            return ScanOutcome::Idle;
        }
        self.poll(host, speech)
    }

    pub fn poll(&mut self, host: &mut dyn WidgetHost, speech: &mut SpeechManager) -> ScanOutcome {
        let snapshot = self.snapshot(host);
        if snapshot.is_empty() {
            return ScanOutcome::Idle;
        }

        let hash = snapshot.content_hash();
        if self.last_hash != Some(hash) {
            self.last_hash = Some(hash);
            self.has_announced = false;
            info!("Menu narrator: detected menu changes, re-scanning...");
        }

        if self.has_announced {
            return ScanOutcome::Unchanged;
        }

        let summary = snapshot.summary();
        info!("Menu narrator announcing: {}", summary);
        let outcome = speech.announce(&summary, true);
        self.has_announced = true;

        // Focus the first entry so keyboard navigation starts on the menu
        if let Some(first) = snapshot.items.first() {
            match host.set_focus(first.widget) {
                Ok(()) => info!("Menu narrator: focused first menu item '{}'", first.label),
                Err(e) => warn!("Menu narrator: could not focus '{}': {}", first.label, e),
            }
        }

        ScanOutcome::Announced { summary, outcome }
    }

    /// Matched menu entries, or every labelled interactive widget when none
    /// of them match the vocabulary.
    pub fn snapshot(&self, host: &dyn WidgetHost) -> MenuSnapshot {
        let widgets = match host.active_widgets() {
            Ok(widgets) => widgets,
            Err(e) => {
                debug!(error = %e, "widget enumeration unavailable this scan");
                return MenuSnapshot::default();
            }
        };

        let labelled: Vec<MenuItem> = widgets
            .into_iter()
            .filter_map(|widget| {
                let node = host.node(widget).ok()?;
                if !node.is_usable() {
                    return None;
                }
                let label = selectable_label(&node);
                if label.is_empty() {
                    return None;
                }
                Some(MenuItem { label, widget })
            })
            .collect();

        let matched: Vec<MenuItem> = labelled
            .iter()
            .filter(|item| self.vocabulary.matches(&item.label))
            .cloned()
            .collect();

        let items = if matched.is_empty() { labelled } else { matched };
        MenuSnapshot { items }
    }
}
