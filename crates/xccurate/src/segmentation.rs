//! Segmentation page: FLAIR + T1CE upload, the overlay viewer, mode
//! selection, slice navigation, and PNG export.

use std::rc::Rc;

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdDownload, LdRotateCcw};
use xccurate_client::{Client, Upload, UploadKind};
use xccurate_io::{
    EncodedImage, FileUpload, Legend, ModeSelector, Notice, OverlayView, SliceNavigator, download,
};
use xccurate_overlay::{RenderRequest, Sequencer, Viewer, VisualizationMode};

use crate::NoticeText;

/// Render `request` off the current event and present it if it is still
/// the newest when it finishes.
fn schedule_render(
    request: Option<RenderRequest>,
    mut viewer: Signal<Viewer>,
    mut notice: Signal<Option<NoticeText>>,
) {
    let Some(request) = request else {
        return;
    };
    spawn(async move {
        // Yield to the browser event loop so the button state repaints
        // before the synchronous decode and composite.
        gloo_timers::future::TimeoutFuture::new(0).await;

        // A newer request arrived while this one waited for its turn.
        if !viewer.peek().is_current(request.ticket()) {
            return;
        }

        let outcome = request.render();
        let completion = viewer.write().complete(request.ticket(), outcome);
        if let Err(e) = completion {
            tracing::warn!(mode = %request.mode(), "render failed: {e}");
            notice.set(Some(NoticeText::new("Rendering Error", e.to_string())));
        }
    });
}

#[component]
#[allow(clippy::too_many_lines)]
pub fn SegmentationPage() -> Element {
    let client: Client = use_context();

    // --- Page state ---
    let mut flair = use_signal(|| Option::<Upload>::None);
    let mut t1ce = use_signal(|| Option::<Upload>::None);
    let mut viewer = use_signal(Viewer::default);
    let mut analysis = use_signal(Sequencer::new);
    let mut analyzing = use_signal(|| false);
    let mut notice = use_signal(|| Option::<NoticeText>::None);

    // A new file makes any shown or pending result obsolete.
    let mut discard_result = move || {
        analysis.write().invalidate();
        analyzing.set(false);
        viewer.write().reset();
    };

    let on_flair = move |upload: Upload| {
        flair.set(Some(upload));
        discard_result();
    };
    let on_t1ce = move |upload: Upload| {
        t1ce.set(Some(upload));
        discard_result();
    };

    // --- Analyze ---
    let on_analyze = move |_| {
        let (Some(flair_file), Some(t1ce_file)) = (flair(), t1ce()) else {
            notice.set(Some(NoticeText::new(
                "Missing Required Files",
                "Please upload both FLAIR and T1CE files.",
            )));
            return;
        };

        let ticket = analysis.write().issue();
        viewer.write().reset();
        analyzing.set(true);
        notice.set(None);

        let client = client.clone();
        spawn(async move {
            let outcome = client.segment(flair_file, t1ce_file).await;

            // A newer analysis or file change superseded this one.
            if !analysis.peek().is_current(ticket) {
                return;
            }
            analyzing.set(false);

            match outcome {
                Ok(result) => {
                    tracing::info!(slices = result.len(), "segmentation received");
                    let request = viewer.write().receive(result);
                    schedule_render(Some(request), viewer, notice);
                }
                Err(e) => {
                    notice.set(Some(NoticeText::new("Segmentation Error", e.to_string())));
                }
            }
        });
    };

    // --- Viewer controls ---
    let on_mode = move |mode: VisualizationMode| {
        let request = viewer.write().set_mode(mode);
        schedule_render(request, viewer, notice);
    };

    let on_slice = move |position: usize| {
        let selected = viewer.write().select_slice(position);
        match selected {
            Ok(request) => schedule_render(request, viewer, notice),
            Err(e) => notice.set(Some(NoticeText::new("Navigation Error", e.to_string()))),
        }
    };

    let on_export = move |_| {
        let (png, file_name) = {
            let v = viewer.read();
            let Some(slice) = v.current_slice() else {
                return;
            };
            let base = flair
                .peek()
                .as_ref()
                .map_or("xccurate", |f| download::base_name(&f.file_name))
                .to_owned();
            let file_name = download::frame_file_name(&base, slice.slice_index, v.mode().slug());
            (v.surface().encode_png(), file_name)
        };
        let outcome = png
            .map_err(|e| e.to_string())
            .and_then(|bytes| {
                download::trigger_download(&bytes, &file_name, "image/png")
                    .map_err(|e| e.to_string())
            });
        if let Err(e) = outcome {
            let message = format!("Download failed: {e}");
            notice.set(Some(NoticeText::new("Export Error", message)));
        }
    };

    let on_new_analysis = move |_| {
        flair.set(None);
        t1ce.set(None);
        notice.set(None);
        discard_result();
    };

    // --- Derived view state ---
    let anatomy = use_memo(move || {
        viewer
            .read()
            .current_slice()
            .map(|s| Rc::<[u8]>::from(s.original_image.as_slice()))
    });
    let ground_truth = use_memo(move || {
        viewer
            .read()
            .current_slice()
            .and_then(|s| s.ground_truth_image.as_deref())
            .map(Rc::<[u8]>::from)
    });

    let (mode, frame, revision, slice_info) = {
        let v = viewer.read();
        let surface = v.surface();
        let slice_info = v.result().zip(v.current_slice()).map(|(result, slice)| {
            (v.position(), result.len(), slice.slice_index)
        });
        (v.mode(), surface.snapshot(), surface.revision(), slice_info)
    };
    let has_result = slice_info.is_some();
    let both_selected = flair.read().is_some() && t1ce.read().is_some();
    let flair_name = flair.read().as_ref().map(|f| f.file_name.clone());
    let t1ce_name = t1ce.read().as_ref().map(|f| f.file_name.clone());

    rsx! {
        div { class: "page",
            h2 { class: "page__title", "Brain Tumor Segmentation" }
            p { class: "text-secondary",
                "Upload FLAIR and T1CE volumes to segment tumor sub-regions."
            }

            if let Some(ref n) = notice() {
                Notice {
                    title: n.title.to_string(),
                    message: n.message.clone(),
                    on_dismiss: move |()| notice.set(None),
                }
            }

            div { class: "upload-grid",
                FileUpload {
                    kind: UploadKind::Nifti,
                    label: "FLAIR",
                    selected: flair_name,
                    on_upload: on_flair,
                }
                FileUpload {
                    kind: UploadKind::Nifti,
                    label: "T1CE",
                    selected: t1ce_name,
                    on_upload: on_t1ce,
                }
            }

            div { class: "actions",
                button {
                    class: "btn btn--primary",
                    disabled: !both_selected || analyzing(),
                    onclick: on_analyze,
                    if analyzing() { "Analyzing..." } else { "Analyze" }
                }
                button {
                    class: "btn",
                    onclick: on_new_analysis,
                    Icon { width: 16, height: 16, icon: LdRotateCcw }
                    "New analysis"
                }
            }

            div { class: "viewer",
                div { class: "viewer__canvas",
                    if analyzing() {
                        p { class: "text-secondary pulse", "Segmenting..." }
                    } else if has_result {
                        OverlayView { frame: frame, revision: revision }
                    } else {
                        p { class: "text-placeholder", "Upload both volumes and run the analysis" }
                    }
                }

                div { class: "viewer__controls",
                    h3 { "Visualization" }
                    ModeSelector {
                        selected: mode,
                        disabled: !has_result,
                        on_select: on_mode,
                    }
                    Legend {}

                    if let Some((position, len, slice_index)) = slice_info {
                        SliceNavigator {
                            position: position,
                            len: len,
                            slice_index: slice_index,
                            on_select: on_slice,
                        }
                    }

                    button {
                        class: "btn",
                        disabled: !has_result,
                        onclick: on_export,
                        Icon { width: 16, height: 16, icon: LdDownload }
                        "Export PNG"
                    }
                }

                if let Some(bytes) = anatomy() {
                    div { class: "viewer__reference",
                        h3 { "Original Slice" }
                        EncodedImage {
                            bytes: bytes,
                            alt: "Anatomical slice without overlay",
                            class: "overlay-frame",
                        }
                    }
                }

                if let Some(bytes) = ground_truth() {
                    div { class: "viewer__reference",
                        h3 { "Ground Truth" }
                        EncodedImage {
                            bytes: bytes,
                            alt: "Ground truth segmentation",
                            class: "overlay-frame",
                        }
                    }
                }
            }
        }
    }
}
