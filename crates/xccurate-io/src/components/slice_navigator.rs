//! Previous/next controls and a slider for moving through slices.

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdChevronLeft, LdChevronRight};

/// Props for the [`SliceNavigator`] component.
#[derive(Props, Clone, PartialEq)]
pub struct SliceNavigatorProps {
    /// Position of the shown slice, `0..len`.
    position: usize,
    /// Number of slices in the result.
    len: usize,
    /// Volume index of the shown slice, for display.
    slice_index: u32,
    /// Fired with the requested position.
    on_select: EventHandler<usize>,
}

/// Slice navigation. Hidden entirely for single-slice results.
#[component]
pub fn SliceNavigator(props: SliceNavigatorProps) -> Element {
    if props.len < 2 {
        return rsx! {};
    }

    let position = props.position;
    let last = props.len - 1;
    let on_select = props.on_select;
    let ordinal = position + 1;

    rsx! {
        div { class: "slice-nav",
            button {
                class: "btn btn--icon",
                aria_label: "Previous slice",
                disabled: position == 0,
                onclick: move |_| {
                    if let Some(prev) = position.checked_sub(1) {
                        on_select.call(prev);
                    }
                },
                Icon { width: 16, height: 16, icon: LdChevronLeft }
            }

            input {
                r#type: "range",
                min: "0",
                max: "{last}",
                value: "{position}",
                aria_label: "Slice",
                oninput: move |evt| {
                    if let Ok(p) = evt.value().parse::<usize>() {
                        on_select.call(p);
                    }
                },
            }

            button {
                class: "btn btn--icon",
                aria_label: "Next slice",
                disabled: position >= last,
                onclick: move |_| {
                    if position < last {
                        on_select.call(position + 1);
                    }
                },
                Icon { width: 16, height: 16, icon: LdChevronRight }
            }

            span { class: "text-secondary text-small",
                "Slice {props.slice_index} ({ordinal} of {props.len})"
            }
        }
    }
}
