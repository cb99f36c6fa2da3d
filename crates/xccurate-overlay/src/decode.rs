//! Raster decoding for slice layers.
//!
//! Accepts the encoded bytes of one [`SliceResult`](crate::SliceResult)
//! layer (PNG from the segmentation backend, though anything the `image`
//! crate can read is accepted) and produces a single-channel raster.
//!
//! Masks and probability maps arrive either as true single-channel images
//! or as grayscale replicated across RGB. The first channel is read in
//! both cases, without luminance weighting, so label values survive
//! decoding exactly.

use image::{DynamicImage, GrayImage, Luma, RgbaImage};

use crate::types::{LayerKind, OverlayError};

/// Decode one layer into a single-channel raster.
///
/// # Errors
///
/// Returns [`OverlayError::EmptyInput`] if `bytes` is empty.
/// Returns [`OverlayError::Decode`] if the image format is unrecognized
/// or the data is corrupt.
pub fn decode_layer(bytes: &[u8], layer: LayerKind) -> Result<GrayImage, OverlayError> {
    if bytes.is_empty() {
        return Err(OverlayError::EmptyInput { layer });
    }

    let img =
        image::load_from_memory(bytes).map_err(|source| OverlayError::Decode { layer, source })?;
    Ok(first_channel(img))
}

/// Decode one layer keeping all of its color channels.
///
/// Used for the anatomical slice, which is drawn as-is underneath the
/// overlay.
///
/// # Errors
///
/// Same conditions as [`decode_layer`].
pub fn decode_rgba(bytes: &[u8], layer: LayerKind) -> Result<RgbaImage, OverlayError> {
    if bytes.is_empty() {
        return Err(OverlayError::EmptyInput { layer });
    }

    let img =
        image::load_from_memory(bytes).map_err(|source| OverlayError::Decode { layer, source })?;
    Ok(img.to_rgba8())
}

/// Extract the first channel of a decoded image.
fn first_channel(img: DynamicImage) -> GrayImage {
    match img {
        DynamicImage::ImageLuma8(gray) => gray,
        other => {
            let rgba = other.to_rgba8();
            GrayImage::from_fn(rgba.width(), rgba.height(), |x, y| {
                Luma([rgba.get_pixel(x, y).0[0]])
            })
        }
    }
}
