//! File upload component with drag-and-drop and file picker.

use dioxus::html::{FileData, HasFileData};
use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::LdUpload;
use xccurate_client::{Upload, UploadKind};

/// Props for the [`FileUpload`] component.
#[derive(Props, Clone, PartialEq)]
pub struct FileUploadProps {
    /// Which files the zone accepts.
    kind: UploadKind,
    /// Heading shown above the drop zone, e.g. "FLAIR".
    label: String,
    /// Name of the file currently held by the parent, if any. Lets the
    /// parent clear the zone on "New analysis".
    #[props(!optional)]
    selected: Option<String>,
    /// Called with the file after it passed validation and was read.
    on_upload: EventHandler<Upload>,
}

/// A drag-and-drop zone with a file picker button.
///
/// Files whose name does not match `kind` are rejected with an inline
/// message and never reach `on_upload`.
#[component]
pub fn FileUpload(props: FileUploadProps) -> Element {
    let mut dragging = use_signal(|| false);
    let mut error = use_signal(|| Option::<String>::None);
    let kind = props.kind;
    let accept = kind.accept();
    let hint = kind.extensions().join(", ");

    // Shared by the picker and drag-and-drop paths.
    let process_files = move |files: Vec<FileData>| async move {
        let Some(file) = files.first() else {
            return;
        };
        let name = file.name();
        if !kind.matches(&name) {
            error.set(Some(format!(
                "Invalid file format: please upload {} files only.",
                kind.extensions().join(" or ")
            )));
            return;
        }
        match file.read_bytes().await {
            Ok(bytes) => {
                error.set(None);
                props.on_upload.call(Upload::new(name, bytes.to_vec()));
            }
            Err(e) => {
                error.set(Some(format!("Failed to read file: {e}")));
            }
        }
    };

    let handle_files = move |evt: FormEvent| async move {
        process_files(evt.files()).await;
    };

    let handle_drop = move |evt: DragEvent| async move {
        evt.prevent_default();
        dragging.set(false);
        process_files(evt.files()).await;
    };

    let zone_class = if dragging() {
        "upload-zone upload-zone--active"
    } else {
        "upload-zone"
    };

    rsx! {
        div {
            class: "{zone_class}",
            ondragover: move |evt| {
                evt.prevent_default();
                dragging.set(true);
            },
            ondragleave: move |_| {
                dragging.set(false);
            },
            ondrop: handle_drop,

            h3 { class: "upload-zone__label", "{props.label}" }

            if let Some(ref name) = props.selected {
                p { class: "text-success", "Loaded: {name}" }
            }

            if let Some(ref err) = error() {
                p { class: "text-error", "{err}" }
            }

            Icon { width: 32, height: 32, icon: LdUpload }

            p { class: "text-secondary", "Drop a file here or " }

            label { class: "btn btn--primary",
                input {
                    r#type: "file",
                    accept: "{accept}",
                    class: "hidden",
                    onchange: handle_files,
                }
                "Choose File"
            }

            p { class: "text-muted text-small", "{hint}" }
        }
    }
}
