//! Classification page: a single MRI image upload and the predicted class.

use std::rc::Rc;

use dioxus::prelude::*;
use xccurate_client::{Client, ClassifyResponse, Upload, UploadKind};
use xccurate_io::components::image_mime_type;
use xccurate_io::{ClassificationResult, EncodedImage, FileUpload, Notice};
use xccurate_overlay::Sequencer;

use crate::NoticeText;

#[component]
pub fn ClassificationPage() -> Element {
    let client: Client = use_context();

    let mut scan = use_signal(|| Option::<Upload>::None);
    let mut preview = use_signal(|| Option::<Rc<[u8]>>::None);
    let mut requests = use_signal(Sequencer::new);
    let mut analyzing = use_signal(|| false);
    let mut response = use_signal(|| Option::<ClassifyResponse>::None);
    let mut notice = use_signal(|| Option::<NoticeText>::None);

    let on_upload = move |upload: Upload| {
        requests.write().invalidate();
        analyzing.set(false);
        response.set(None);
        notice.set(None);
        preview.set(Some(Rc::from(upload.bytes.as_slice())));
        scan.set(Some(upload));
    };

    let on_analyze = move |_| {
        let Some(upload) = scan() else {
            notice.set(Some(NoticeText::new(
                "Missing Image",
                "Please upload an MRI image to classify.",
            )));
            return;
        };

        let ticket = requests.write().issue();
        analyzing.set(true);
        response.set(None);
        notice.set(None);

        let client = client.clone();
        spawn(async move {
            let outcome = client.classify(upload).await;
            if !requests.peek().is_current(ticket) {
                return;
            }
            analyzing.set(false);

            match outcome {
                Ok(r) => {
                    tracing::info!(class = %r.predicted_class, "classification received");
                    response.set(Some(r));
                }
                Err(e) => {
                    notice.set(Some(NoticeText::new("Classification Error", e.to_string())));
                }
            }
        });
    };

    let on_reset = move |_| {
        requests.write().invalidate();
        analyzing.set(false);
        scan.set(None);
        preview.set(None);
        response.set(None);
        notice.set(None);
    };

    let scan_name = scan.read().as_ref().map(|s| s.file_name.clone());
    let mime_type = scan_name.as_deref().map_or("image/png", image_mime_type);

    rsx! {
        div { class: "page",
            h2 { class: "page__title", "Brain Tumor Classification" }
            p { class: "text-secondary",
                "Upload a single MRI slice to predict the tumor class."
            }

            if let Some(ref n) = notice() {
                Notice {
                    title: n.title.to_string(),
                    message: n.message.clone(),
                    on_dismiss: move |()| notice.set(None),
                }
            }

            FileUpload {
                kind: UploadKind::Image,
                label: "MRI Image",
                selected: scan_name.clone(),
                on_upload: on_upload,
            }

            div { class: "actions",
                button {
                    class: "btn btn--primary",
                    disabled: scan_name.is_none() || analyzing(),
                    onclick: on_analyze,
                    if analyzing() { "Analyzing..." } else { "Analyze" }
                }
                button { class: "btn", onclick: on_reset, "Clear" }
            }

            div { class: "viewer",
                if let Some(bytes) = preview() {
                    div { class: "viewer__reference",
                        h3 { "Scan" }
                        EncodedImage {
                            bytes: bytes,
                            mime_type: mime_type,
                            alt: "Uploaded MRI scan",
                        }
                    }
                }

                if analyzing() {
                    p { class: "text-secondary pulse", "Classifying..." }
                } else if let Some(r) = response() {
                    ClassificationResult { response: r }
                }
            }
        }
    }
}
