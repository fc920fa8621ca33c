use tracing::debug;

use crate::host::widget::{Control, WidgetHost, WidgetNode, WidgetRef};
use crate::introspect::descriptor::{WidgetDescriptor, WidgetState};

/// Inspect a widget through the host. Never fails: an unreadable widget
/// yields an `Unknown` descriptor with an empty label.
pub fn describe(host: &dyn WidgetHost, widget: WidgetRef) -> WidgetDescriptor {
    match host.node(widget) {
        Ok(node) => describe_node(&node),
        Err(e) => {
            debug!(%widget, error = %e, "widget unreadable, using empty label");
            WidgetDescriptor::unreadable()
        }
    }
}

/// Classify a node's components once and pick the label for that kind.
pub fn describe_node(node: &WidgetNode) -> WidgetDescriptor {
    let Some(control) = &node.control else {
        return WidgetDescriptor {
            state: WidgetState::Unknown,
            label: direct_text(node).unwrap_or_else(|| node.name.trim().to_string()),
        };
    };

    let (state, label) = match control {
        Control::Button => (WidgetState::Button, selectable_label(node)),
        Control::Toggle { is_on } => (WidgetState::Toggle { on: *is_on }, selectable_label(node)),
        Control::Dropdown { options, selected } => {
            let option = usize::try_from(*selected)
                .ok()
                .and_then(|i| options.get(i))
                .map(|o| o.trim().to_string());
            (WidgetState::Dropdown { selected: option }, selectable_label(node))
        }
        Control::Slider { value, min, max } => (
            WidgetState::Slider {
                percent: slider_percent(*value, *min, *max),
            },
            selectable_label(node),
        ),
        Control::InputField { text, placeholder } => {
            // Input fields carry their value as child text, so the
            // placeholder is the only label source besides the name
            let label = non_empty(placeholder.as_deref()).unwrap_or_else(|| node.name.trim().to_string());
            (WidgetState::InputField { value: text.clone() }, label)
        }
        Control::ScrollRect => (WidgetState::ScrollRegion, node.name.trim().to_string()),
        Control::Selectable => (WidgetState::Generic, selectable_label(node)),
    };

    WidgetDescriptor { state, label }
}

/// Label for an interactive widget: nested text, nested rich text, then the
/// widget's own identifier. Empty when none of them has content.
pub fn selectable_label(node: &WidgetNode) -> String {
    non_empty(node.child_text.as_deref())
        .or_else(|| non_empty(node.child_rich_text.as_deref()))
        .or_else(|| non_empty(Some(node.name.as_str())))
        .unwrap_or_default()
}

/// Percentage of the slider's range, rounded; 0 for an empty or inverted range.
pub fn slider_percent(value: f32, min: f32, max: f32) -> u8 {
    let range = max - min;
    if !range.is_finite() || range <= 0.0 || !value.is_finite() {
        return 0;
    }
    let percent = ((value - min) / range * 100.0).round();
    percent.clamp(0.0, 100.0) as u8
}

fn direct_text(node: &WidgetNode) -> Option<String> {
    non_empty(node.text.as_deref()).or_else(|| non_empty(node.rich_text.as_deref()))
}

fn non_empty(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
