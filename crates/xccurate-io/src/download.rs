//! File download via Blob URLs.
//!
//! Dioxus has no built-in file download API. This module triggers
//! downloads by creating a `Blob`, generating an object URL, and
//! programmatically clicking a temporary `<a>` element.
//!
//! All functions in this module require a browser environment
//! (`wasm32-unknown-unknown` target).

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;

use crate::raster;

/// Errors that can occur when triggering a file download.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),

    /// The Blob for the download could not be created.
    #[error(transparent)]
    Raster(#[from] raster::RasterError),
}

impl From<JsValue> for DownloadError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// Trigger a download of `data` as `filename`.
///
/// The object URL is revoked after the click.
///
/// # Errors
///
/// Returns [`DownloadError`] if any browser API call fails (e.g. `Blob`
/// creation, `URL.createObjectURL`, element creation).
pub fn trigger_download(data: &[u8], filename: &str, mime_type: &str) -> Result<(), DownloadError> {
    let window =
        web_sys::window().ok_or_else(|| DownloadError::JsError("no global window".into()))?;
    let document = window
        .document()
        .ok_or_else(|| DownloadError::JsError("no document".into()))?;

    let url = raster::bytes_to_blob_url(data, mime_type)?;

    let anchor: web_sys::HtmlAnchorElement = document
        .create_element("a")?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|e| DownloadError::JsError(format!("failed to cast element: {e:?}")))?;

    anchor.set_href(&url);
    anchor.set_download(filename);

    let body = document
        .body()
        .ok_or_else(|| DownloadError::JsError("no document body".into()))?;
    body.append_child(&anchor)?;
    anchor.click();

    // The download has already started; cleanup failures are not errors.
    let _ = body.remove_child(&anchor);
    raster::revoke_blob_url(&url);

    Ok(())
}

/// File name for an exported overlay frame, e.g.
/// `BraTS_001-slice-75-edema.png`.
#[must_use]
pub fn frame_file_name(base: &str, slice_index: u32, mode_slug: &str) -> String {
    format!("{base}-slice-{slice_index}-{mode_slug}.png")
}

/// Strip `.nii.gz`, `.nii`, or any other final extension from an upload
/// name, for use as a download base name.
#[must_use]
pub fn base_name(file_name: &str) -> &str {
    let lower = file_name.to_ascii_lowercase();
    if lower.ends_with(".nii.gz") {
        return &file_name[..file_name.len() - ".nii.gz".len()];
    }
    file_name
        .rsplit_once('.')
        .map_or(file_name, |(base, _)| base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_name_strips_compound_nifti_extension() {
        assert_eq!(base_name("BraTS_001_flair.nii.gz"), "BraTS_001_flair");
        assert_eq!(base_name("BraTS_001_flair.NII.GZ"), "BraTS_001_flair");
        assert_eq!(base_name("scan.nii"), "scan");
        assert_eq!(base_name("no_extension"), "no_extension");
    }

    #[test]
    fn frame_file_name_format() {
        assert_eq!(
            frame_file_name("case", 75, "edema"),
            "case-slice-75-edema.png"
        );
    }
}
