//! Dismissible error notice.

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::LdX;

/// Props for the [`Notice`] component.
#[derive(Props, Clone, PartialEq)]
pub struct NoticeProps {
    /// Short heading, e.g. "Segmentation Error".
    title: String,
    /// Error text shown under the heading.
    message: String,
    /// Called when the close button is pressed.
    on_dismiss: EventHandler<()>,
}

/// An alert box with a close button. The parent decides when it goes
/// away.
#[component]
pub fn Notice(props: NoticeProps) -> Element {
    rsx! {
        div { class: "notice", role: "alert",
            div { class: "notice__body",
                strong { "{props.title}" }
                p { "{props.message}" }
            }
            button {
                class: "btn btn--icon",
                aria_label: "Dismiss",
                onclick: move |_| props.on_dismiss.call(()),
                Icon { width: 16, height: 16, icon: LdX }
            }
        }
    }
}
