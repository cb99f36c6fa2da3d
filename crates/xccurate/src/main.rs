mod classification;
mod segmentation;

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdBrain, LdScan};
use xccurate_client::{Client, ClientConfig};
use xccurate_io::StatusIndicator;

use crate::classification::ClassificationPage;
use crate::segmentation::SegmentationPage;

fn main() {
    dioxus::logger::initialize_default();
    dioxus::launch(app);
}

/// Backend settings, with the URL overridable at build time through
/// `XCCURATE_BACKEND_URL`.
fn client_config() -> ClientConfig {
    option_env!("XCCURATE_BACKEND_URL")
        .map_or_else(ClientConfig::default, ClientConfig::with_base_url)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Segmentation,
    Classification,
}

/// Heading and text of a dismissible error notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NoticeText {
    pub title: &'static str,
    pub message: String,
}

impl NoticeText {
    pub(crate) fn new(title: &'static str, message: impl Into<String>) -> Self {
        Self {
            title,
            message: message.into(),
        }
    }
}

/// Root application component.
///
/// Provides the backend [`Client`] as context and switches between the
/// segmentation viewer and the classification page.
fn app() -> Element {
    let config = use_hook(client_config);
    let poll_ms = config.status_poll_interval_ms();
    use_context_provider(|| {
        tracing::info!(backend = %config.base_url, "using backend");
        Client::new(&config)
    });

    let mut page = use_signal(|| Page::Segmentation);

    let tab_class = move |tab: Page| {
        if page() == tab {
            "tab tab--active"
        } else {
            "tab"
        }
    };

    rsx! {
        style { dangerous_inner_html: include_str!("../assets/xccurate.css") }

        div { class: "app",
            header { class: "app__header",
                div {
                    h1 { class: "app__title", "Xccurate-ML" }
                    p { class: "text-muted text-small",
                        "Brain tumor classification and segmentation"
                    }
                }
                StatusIndicator { interval_ms: poll_ms, show_details: true }
            }

            nav { class: "tabs",
                button {
                    class: tab_class(Page::Segmentation),
                    onclick: move |_| page.set(Page::Segmentation),
                    Icon { width: 16, height: 16, icon: LdBrain }
                    "Segmentation"
                }
                button {
                    class: tab_class(Page::Classification),
                    onclick: move |_| page.set(Page::Classification),
                    Icon { width: 16, height: 16, icon: LdScan }
                    "Classification"
                }
            }

            main { class: "app__main",
                {match page() {
                    Page::Segmentation => rsx! { SegmentationPage {} },
                    Page::Classification => rsx! { ClassificationPage {} },
                }}
            }

            footer { class: "app__footer text-muted text-small",
                "For research use only. Not a diagnostic device."
            }
        }
    }
}
