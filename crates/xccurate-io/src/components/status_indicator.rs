//! Backend model status badge.
//!
//! Polls `/status` on mount and then on a fixed interval for as long as
//! the component is mounted. The [`Client`] comes from context.

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdCheck, LdLoader, LdX};
use xccurate_client::{Client, ClientError, ModelHealth, StatusResponse};

/// Props for the [`StatusIndicator`] component.
#[derive(Props, Clone, PartialEq)]
pub struct StatusIndicatorProps {
    /// Milliseconds between polls.
    interval_ms: u32,
    /// Show per-model rows for the dual-model status shape.
    #[props(default)]
    show_details: bool,
}

/// Badge showing whether the backend models are reachable and loaded.
#[component]
pub fn StatusIndicator(props: StatusIndicatorProps) -> Element {
    let client: Client = use_context();
    let mut poll: Signal<Option<Result<StatusResponse, ClientError>>> = use_signal(|| None);
    let interval_ms = props.interval_ms;

    use_future(move || {
        let client = client.clone();
        async move {
            loop {
                let outcome = client.status().await;
                poll.set(Some(outcome));
                gloo_timers::future::TimeoutFuture::new(interval_ms).await;
            }
        }
    });

    let current = poll.read();
    let Some(outcome) = current.as_ref() else {
        return rsx! {
            div { class: "status status--checking",
                Icon { width: 16, height: 16, icon: LdLoader, class: "spin" }
                span { "Checking models..." }
            }
        };
    };

    let health = ModelHealth::from_poll(outcome);
    let (class, connected) = match health {
        ModelHealth::Connected => ("status status--ok", true),
        ModelHealth::Partial => ("status status--partial", false),
        ModelHealth::Disconnected => ("status status--error", false),
    };
    let details = match outcome {
        Ok(StatusResponse::Dual(dual)) if props.show_details => Some((
            dual.classification_model_loaded,
            dual.segmentation_model_loaded,
        )),
        _ => None,
    };

    rsx! {
        div { class: "{class}",
            if connected {
                Icon { width: 16, height: 16, icon: LdCheck }
            } else {
                Icon { width: 16, height: 16, icon: LdX }
            }
            span { "{health}" }

            if let Some((classification, segmentation)) = details {
                ul { class: "status__details",
                    {render_model_row("Classification", classification)}
                    {render_model_row("Segmentation", segmentation)}
                }
            }
        }
    }
}

fn render_model_row(name: &'static str, loaded: bool) -> Element {
    let state = if loaded { "loaded" } else { "not loaded" };
    rsx! {
        li { class: if loaded { "text-success" } else { "text-error" },
            "{name}: {state}"
        }
    }
}
