use serde::Serialize;

/// Semantic kind plus kind-specific state, produced once per inspection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum WidgetState {
    Button,
    Toggle { on: bool },
    Dropdown { selected: Option<String> },
    Slider { percent: u8 },
    InputField { value: String },
    ScrollRegion,
    Generic,
    Unknown,
}

/// Payload-free discriminant of `WidgetState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WidgetKind {
    Button,
    Toggle,
    Dropdown,
    Slider,
    InputField,
    ScrollRegion,
    Generic,
    Unknown,
}

impl WidgetState {
    pub fn kind(&self) -> WidgetKind {
        match self {
            WidgetState::Button => WidgetKind::Button,
            WidgetState::Toggle { .. } => WidgetKind::Toggle,
            WidgetState::Dropdown { .. } => WidgetKind::Dropdown,
            WidgetState::Slider { .. } => WidgetKind::Slider,
            WidgetState::InputField { .. } => WidgetKind::InputField,
            WidgetState::ScrollRegion => WidgetKind::ScrollRegion,
            WidgetState::Generic => WidgetKind::Generic,
            WidgetState::Unknown => WidgetKind::Unknown,
        }
    }
}

/// What the engine knows about one widget at one instant. Never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetDescriptor {
    pub state: WidgetState,
    pub label: String,
}

impl WidgetDescriptor {
    /// Descriptor for a widget that could not be read at all.
    pub fn unreadable() -> Self {
        Self {
            state: WidgetState::Unknown,
            label: String::new(),
        }
    }

    pub fn kind(&self) -> WidgetKind {
        self.state.kind()
    }

    /// Human-readable announcement text. Empty when there is nothing to say.
    pub fn text(&self) -> String {
        let label = &self.label;

        match &self.state {
            WidgetState::Button => format!("Button: {}", label),
            WidgetState::Toggle { on } => {
                let state = if *on { "checked" } else { "unchecked" };
                format!("Checkbox {}: {}", state, label)
            }
            WidgetState::Dropdown { selected } => match selected {
                Some(option) if !option.is_empty() => {
                    format!("Dropdown: {}. Selected: {}", label, option)
                }
                _ => format!("Dropdown: {}", label),
            },
            WidgetState::Slider { percent } => {
                format!("Slider: {}. Value: {} percent", label, percent)
            }
            WidgetState::InputField { value } => {
                format!("Input field: {}. Current value: {}", label, value)
            }
            WidgetState::ScrollRegion => format!("Scroll view: {}", label),
            WidgetState::Generic | WidgetState::Unknown => label.clone(),
        }
    }
}
