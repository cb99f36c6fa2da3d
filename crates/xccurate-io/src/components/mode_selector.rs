//! Visualization mode buttons and the class color legend.

use dioxus::prelude::*;
use xccurate_overlay::{TissueClass, VisualizationMode};

/// CSS `rgb()` value for a class color.
fn css_color(class: TissueClass) -> String {
    let [r, g, b] = class.color();
    format!("rgb({r}, {g}, {b})")
}

/// Props for the [`ModeSelector`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ModeSelectorProps {
    /// Currently active mode.
    selected: VisualizationMode,
    /// Disables every button, e.g. before a result has arrived.
    #[props(default)]
    disabled: bool,
    /// Fired when a mode button is clicked, including the active one.
    on_select: EventHandler<VisualizationMode>,
}

/// One button per visualization mode. The heatmap modes carry a swatch
/// of their class color; the active mode is highlighted.
#[component]
pub fn ModeSelector(props: ModeSelectorProps) -> Element {
    rsx! {
        div { class: "mode-selector", role: "group", aria_label: "Visualization mode",
            for mode in VisualizationMode::ALL {
                {render_button(mode, props.selected == mode, props.disabled, props.on_select)}
            }
        }
    }
}

fn render_button(
    mode: VisualizationMode,
    is_selected: bool,
    disabled: bool,
    on_select: EventHandler<VisualizationMode>,
) -> Element {
    let class = if is_selected {
        "btn btn--mode btn--mode-active"
    } else {
        "btn btn--mode"
    };
    let swatch = mode.class().map(css_color);

    rsx! {
        button {
            class: "{class}",
            disabled: disabled,
            "aria-pressed": "{is_selected}",
            onclick: move |_| on_select.call(mode),
            if let Some(color) = swatch {
                span { class: "swatch", style: "background: {color}" }
            }
            "{mode.label()}"
        }
    }
}

/// Legend mapping each class color to its name.
#[component]
pub fn Legend() -> Element {
    rsx! {
        ul { class: "legend",
            for class in TissueClass::ALL {
                li { class: "legend__item",
                    span { class: "swatch", style: format!("background: {}", css_color(class)) }
                    "{class.name()}"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_colors_as_css() {
        assert_eq!(css_color(TissueClass::NecroticCore), "rgb(255, 0, 0)");
        assert_eq!(css_color(TissueClass::Edema), "rgb(255, 255, 0)");
        assert_eq!(css_color(TissueClass::EnhancingTumor), "rgb(0, 255, 0)");
    }
}
