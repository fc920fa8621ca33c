use std::sync::mpsc::{self, Sender};

use serde::Deserialize;
use tracing::debug;

use crate::error::{HostError, ScriptError};
use crate::host::events::{ScreenEventSource, ScreenTransition, Subscription, SubscriptionId};
use crate::host::widget::{WidgetHost, WidgetNode, WidgetRef};

// ============================================================================
// ScriptedHost: in-memory widget tree driven by code or a replay script
// ============================================================================

/// A host whose widget tree, focus and screen transitions are set explicitly.
pub struct ScriptedHost {
    widgets: Vec<(WidgetRef, WidgetNode)>,
    focus: Option<WidgetRef>,
    focus_manager_ready: bool,
    tree_ready: bool,
    subscribers: Vec<(SubscriptionId, Sender<ScreenTransition>)>,
    next_subscription: u64,
    focus_requests: Vec<WidgetRef>,
}

impl Default for ScriptedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self {
            widgets: vec![],
            focus: None,
            focus_manager_ready: true,
            tree_ready: true,
            subscribers: vec![],
            next_subscription: 1,
            focus_requests: vec![],
        }
    }

    /// Replace the whole widget tree. Handles not in `widgets` become stale.
    pub fn set_widgets(&mut self, widgets: Vec<(WidgetRef, WidgetNode)>) {
        self.widgets = widgets;
        if let Some(f) = self.focus {
            if self.lookup(f).is_none() {
                self.focus = None;
            }
        }
    }

    pub fn add_widget(&mut self, widget: WidgetRef, node: WidgetNode) {
        match self.widgets.iter_mut().find(|(w, _)| *w == widget) {
            Some((_, existing)) => *existing = node,
            None => self.widgets.push((widget, node)),
        }
    }

    pub fn remove_widget(&mut self, widget: WidgetRef) {
        self.widgets.retain(|(w, _)| *w != widget);
        if self.focus == Some(widget) {
            self.focus = None;
        }
    }

    /// Move focus as the user (or the host itself) would.
    pub fn move_focus(&mut self, widget: Option<WidgetRef>) {
        self.focus = widget;
    }

    pub fn set_focus_manager_ready(&mut self, ready: bool) {
        self.focus_manager_ready = ready;
    }

    pub fn set_tree_ready(&mut self, ready: bool) {
        self.tree_ready = ready;
    }

    /// Push a screen transition to every subscriber.
    pub fn transition(&mut self, name: &str) {
        debug!(screen = name, subscribers = self.subscribers.len(), "scripted screen transition");
        let event = ScreenTransition {
            name: name.to_string(),
        };
        // Subscribers whose receiver was dropped are pruned
        self.subscribers
            .retain(|(_, tx)| tx.send(event.clone()).is_ok());
    }

    /// Focus moves requested through `WidgetHost::set_focus`, oldest first.
    pub fn focus_requests(&self) -> &[WidgetRef] {
        &self.focus_requests
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Apply one frame of a replay script.
    pub fn apply_frame(&mut self, frame: &ScriptFrame) {
        if let Some(widgets) = &frame.widgets {
            self.set_widgets(
                widgets
                    .iter()
                    .map(|w| (WidgetRef(w.id), w.node.clone()))
                    .collect(),
            );
        }

        if let Some(ready) = frame.focus_manager {
            self.set_focus_manager_ready(ready);
        }

        if let Some(id) = frame.focus {
            self.move_focus(Some(WidgetRef(id)));
        }

        if let Some(screen) = &frame.screen {
            self.transition(screen);
        }
    }

    fn lookup(&self, widget: WidgetRef) -> Option<&WidgetNode> {
        self.widgets
            .iter()
            .find(|(w, _)| *w == widget)
            .map(|(_, n)| n)
    }
}

impl WidgetHost for ScriptedHost {
    fn active_widgets(&self) -> Result<Vec<WidgetRef>, HostError> {
        if !self.tree_ready {
            return Err(HostError::NotReady("scripted tree not loaded".into()));
        }
        Ok(self.widgets.iter().map(|(w, _)| *w).collect())
    }

    fn node(&self, widget: WidgetRef) -> Result<WidgetNode, HostError> {
        self.lookup(widget)
            .cloned()
            .ok_or(HostError::StaleWidget(widget))
    }

    fn current_focus(&self) -> Result<Option<WidgetRef>, HostError> {
        if !self.focus_manager_ready {
            return Err(HostError::FocusManagerUnavailable);
        }
        Ok(self.focus)
    }

    fn set_focus(&mut self, widget: WidgetRef) -> Result<(), HostError> {
        if !self.focus_manager_ready {
            return Err(HostError::FocusManagerUnavailable);
        }
        if self.lookup(widget).is_none() {
            return Err(HostError::StaleWidget(widget));
        }
        self.focus = Some(widget);
        self.focus_requests.push(widget);
        Ok(())
    }
}

impl ScreenEventSource for ScriptedHost {
    fn subscribe(&mut self) -> Subscription {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;

        let (tx, rx) = mpsc::channel();
        self.subscribers.push((id, tx));

        Subscription { id, events: rx }
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(sid, _)| *sid != id);
    }
}

// ============================================================================
// Replay script model (YAML)
// ============================================================================

/// A recorded host session: one entry per frame (or run of identical frames).
///
/// ```yaml
/// frame_ms: 100
/// frames:
///   - screen: MainMenu
///     widgets:
///       - { id: 1, name: ContinueBtn, control: { kind: button }, child_text: Continue }
///       - { id: 2, name: OptionsBtn, control: { kind: button }, child_text: Options }
///     repeat: 12
///   - focus: 2
///     repeat: 5
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayScript {
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u64,
    #[serde(default)]
    pub frames: Vec<ScriptFrame>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptFrame {
    #[serde(default)]
    pub screen: Option<String>,

    /// Replaces the whole tree when present; otherwise the tree carries over
    #[serde(default)]
    pub widgets: Option<Vec<ScriptWidget>>,

    #[serde(default)]
    pub focus: Option<u64>,

    #[serde(default)]
    pub focus_manager: Option<bool>,

    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptWidget {
    pub id: u64,
    #[serde(flatten)]
    pub node: WidgetNode,
}

fn default_frame_ms() -> u64 {
    100
}

fn default_repeat() -> u32 {
    1
}

impl ReplayScript {
    pub fn load(path: &str) -> Result<Self, ScriptError> {
        let content = std::fs::read_to_string(path).map_err(|e| ScriptError::Read {
            path: path.to_string(),
            source: e,
        })?;
        Self::parse(&content, path)
    }

    /// Parse script text; `origin` names the source in errors.
    pub fn parse(content: &str, origin: &str) -> Result<Self, ScriptError> {
        serde_yaml::from_str(content).map_err(|e| ScriptError::Parse {
            path: origin.to_string(),
            source: e,
        })
    }

    /// Total frames after expanding `repeat`.
    pub fn frame_count(&self) -> u64 {
        self.frames.iter().map(|f| f.repeat.max(1) as u64).sum()
    }
}
