//! Classification result card.

use dioxus::prelude::*;
use xccurate_client::ClassifyResponse;

/// Props for the [`ClassificationResult`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ClassificationResultProps {
    response: ClassifyResponse,
}

/// Predicted class with its confidence, followed by the per-class
/// breakdown, most likely first.
#[component]
pub fn ClassificationResult(props: ClassificationResultProps) -> Element {
    let response = &props.response;
    let confidence = format!("{:.1}", response.confidence_percent());
    let findings = response.findings();

    rsx! {
        div { class: "card",
            h3 { class: "card__title", "Analysis Results" }
            p { class: "diagnosis",
                span { class: "text-secondary", "Diagnosis: " }
                strong { "{response.predicted_class}" }
            }
            p {
                span { class: "text-secondary", "Confidence: " }
                "{confidence}%"
            }

            h4 { "Findings" }
            ul { class: "findings",
                for finding in findings {
                    li { class: "findings__item",
                        span { "{finding.class_name}" }
                        span { class: "text-secondary",
                            {format!("{:.1}%", finding.confidence_percent)}
                        }
                    }
                }
            }

            h4 { "Recommendations" }
            ul {
                li { "Consult a healthcare professional for further evaluation." }
                li { "Review the scan and clinical history." }
            }
        }
    }
}
