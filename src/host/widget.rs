use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::HostError;

/// Opaque, non-owning handle to a host UI element.
///
/// Two handles are equal iff they refer to the same host object. The engine
/// never owns the element; a handle may go stale at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WidgetRef(pub u64);

impl fmt::Display for WidgetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Interactive component attached to a widget, as the host models it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Control {
    Button,
    Toggle {
        #[serde(default)]
        is_on: bool,
    },
    Dropdown {
        #[serde(default)]
        options: Vec<String>,
        /// Index into `options`; hosts may report out-of-range values
        #[serde(default)]
        selected: i64,
    },
    Slider {
        value: f32,
        #[serde(default)]
        min: f32,
        #[serde(default = "default_slider_max")]
        max: f32,
    },
    InputField {
        #[serde(default)]
        text: String,
        #[serde(default)]
        placeholder: Option<String>,
    },
    ScrollRect,
    /// Focusable but otherwise untyped
    Selectable,
}

fn default_slider_max() -> f32 {
    1.0
}

/// Raw view of one widget's components at the moment it was read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetNode {
    /// Internal debug identifier (e.g. a game-object name)
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub control: Option<Control>,

    /// Plain text component on the widget itself
    #[serde(default)]
    pub text: Option<String>,
    /// Rich text component on the widget itself
    #[serde(default)]
    pub rich_text: Option<String>,

    /// First plain text component found among descendants
    #[serde(default)]
    pub child_text: Option<String>,
    /// First rich text component found among descendants
    #[serde(default)]
    pub child_rich_text: Option<String>,

    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default = "default_true")]
    pub interactable: bool,
}

fn default_true() -> bool {
    true
}

impl WidgetNode {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            control: None,
            text: None,
            rich_text: None,
            child_text: None,
            child_rich_text: None,
            active: true,
            interactable: true,
        }
    }

    pub fn with_control(mut self, control: Control) -> Self {
        self.control = Some(control);
        self
    }

    pub fn with_child_text(mut self, text: &str) -> Self {
        self.child_text = Some(text.to_string());
        self
    }

    pub fn with_child_rich_text(mut self, text: &str) -> Self {
        self.child_rich_text = Some(text.to_string());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.interactable = false;
        self
    }

    /// Carries an interactive component, is active in the hierarchy and
    /// accepts input. Plain text elements are never usable.
    pub fn is_usable(&self) -> bool {
        self.control.is_some() && self.active && self.interactable
    }
}

/// Read/write access to the host's widget tree and input focus.
///
/// The engine only ever reads widgets; the single write is moving focus.
pub trait WidgetHost {
    /// Widgets the host currently exposes as interactive, in host order.
    /// Callers still re-check `WidgetNode::is_usable` since state can lag.
    fn active_widgets(&self) -> Result<Vec<WidgetRef>, HostError>;

    fn node(&self, widget: WidgetRef) -> Result<WidgetNode, HostError>;

    /// `Err(FocusManagerUnavailable)` until the host has a focus manager.
    fn current_focus(&self) -> Result<Option<WidgetRef>, HostError>;

    fn set_focus(&mut self, widget: WidgetRef) -> Result<(), HostError>;
}
