//! Display of the composed overlay frame.
//!
//! The frame is re-encoded to a PNG Blob URL only when the surface
//! revision changes, so unrelated re-renders (status polls, notices)
//! reuse the cached URL instead of encoding 256x256 pixels again.

use std::sync::Arc;

use dioxus::prelude::*;
use xccurate_overlay::types::RgbaImage;

use crate::raster;

/// Props for the [`OverlayView`] component.
#[derive(Props, Clone)]
pub struct OverlayViewProps {
    /// The most recently presented frame.
    frame: Arc<RgbaImage>,
    /// Surface revision `frame` was taken at.
    revision: u64,
    /// Alternative text for the image.
    #[props(default = String::from("Segmentation overlay"))]
    alt: String,
}

impl PartialEq for OverlayViewProps {
    fn eq(&self, other: &Self) -> bool {
        self.revision == other.revision
            && Arc::ptr_eq(&self.frame, &other.frame)
            && self.alt == other.alt
    }
}

/// Blob URL for one surface revision.
struct CachedFrame {
    revision: u64,
    url: String,
}

/// Shows the current frame at its native surface size.
#[component]
pub fn OverlayView(props: OverlayViewProps) -> Element {
    let mut cache: Signal<Option<CachedFrame>> = use_signal(|| None);

    // Revoke the outstanding blob URL when the component is destroyed.
    {
        let cache = cache;
        use_drop(move || {
            if let Some(ref cached) = *cache.peek() {
                raster::revoke_blob_url(&cached.url);
            }
        });
    }

    let needs_regen = cache
        .peek()
        .as_ref()
        .is_none_or(|c| c.revision != props.revision);

    if needs_regen {
        if let Some(ref old) = cache.take() {
            raster::revoke_blob_url(&old.url);
        }
        match raster::rgba_image_to_blob_url(&props.frame) {
            Ok(url) => cache.set(Some(CachedFrame {
                revision: props.revision,
                url,
            })),
            Err(e) => {
                tracing::warn!("failed to encode overlay frame: {e}");
                return rsx! {
                    p { class: "text-error text-small", "Failed to display overlay: {e}" }
                };
            }
        }
    }

    let width = props.frame.width();
    let height = props.frame.height();
    let url = cache.peek().as_ref().map(|c| c.url.clone());

    rsx! {
        if let Some(url) = url {
            img {
                class: "overlay-frame",
                src: "{url}",
                width: "{width}",
                height: "{height}",
                alt: "{props.alt}",
            }
        }
    }
}
