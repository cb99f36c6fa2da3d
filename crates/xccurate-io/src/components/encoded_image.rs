//! `<img>` for image bytes that are already encoded, such as the ground
//! truth slice or a scan picked for classification.

use std::rc::Rc;

use dioxus::prelude::*;

use crate::raster;

/// Props for the [`EncodedImage`] component.
#[derive(Props, Clone)]
pub struct EncodedImageProps {
    /// Encoded image bytes (PNG, JPEG, ...).
    bytes: Rc<[u8]>,
    /// MIME type of `bytes`.
    #[props(default = String::from("image/png"))]
    mime_type: String,
    alt: String,
    #[props(default = String::from("encoded-image"))]
    class: String,
}

impl PartialEq for EncodedImageProps {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.bytes, &other.bytes)
            && self.mime_type == other.mime_type
            && self.alt == other.alt
            && self.class == other.class
    }
}

/// Displays encoded bytes through a short-lived Blob URL that is revoked
/// once the browser has loaded (or failed to load) it.
#[component]
pub fn EncodedImage(props: EncodedImageProps) -> Element {
    match raster::bytes_to_blob_url(&props.bytes, &props.mime_type) {
        Ok(url) => {
            let url_for_error = url.clone();
            rsx! {
                img {
                    src: "{url}",
                    class: "{props.class}",
                    alt: "{props.alt}",
                    onload: move |_| raster::revoke_blob_url(&url),
                    onerror: move |_| raster::revoke_blob_url(&url_for_error),
                }
            }
        }
        Err(e) => rsx! {
            p { class: "text-error text-small", "Failed to display {props.alt}: {e}" }
        },
    }
}

/// MIME type for an uploaded image, from its extension.
#[must_use]
pub fn image_mime_type(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("bmp") => "image/bmp",
        Some("webp") => "image/webp",
        _ => "image/png",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_types_by_extension() {
        assert_eq!(image_mime_type("scan.JPG"), "image/jpeg");
        assert_eq!(image_mime_type("scan.jpeg"), "image/jpeg");
        assert_eq!(image_mime_type("scan.webp"), "image/webp");
        assert_eq!(image_mime_type("scan.bmp"), "image/bmp");
        assert_eq!(image_mime_type("scan.png"), "image/png");
        assert_eq!(image_mime_type("scan"), "image/png");
    }
}
