//! Mask colorizer: recolor a label or probability raster into an RGBA
//! overlay.
//!
//! In [`Combined`](VisualizationMode::Combined) mode every pixel is read
//! as a class label and painted in its class color at half opacity;
//! background and unrecognized labels become fully transparent. The
//! single-class modes read that class's probability raster instead and
//! paint the class hue with an alpha proportional to the probability.
//!
//! Everything here is pure: no drawing surface, no I/O.

use image::{GrayImage, RgbaImage};

use crate::decode;
use crate::types::{OverlayError, ProbabilityScale, SliceResult, TissueClass, VisualizationMode};

/// Opacity of every class region in combined mode.
pub const COMBINED_ALPHA: u8 = 128;

/// A fully transparent pixel. RGB is zeroed so buffers stay
/// byte-for-byte reproducible.
const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

/// Color a single intensity value.
#[must_use]
pub fn colorize_value(value: u8, mode: VisualizationMode, scale: ProbabilityScale) -> [u8; 4] {
    match mode.class() {
        None => TissueClass::from_label(value).map_or(TRANSPARENT, |class| {
            let [r, g, b] = class.color();
            [r, g, b, COMBINED_ALPHA]
        }),
        Some(class) => {
            let [r, g, b] = class.color();
            [r, g, b, scale.alpha(value)]
        }
    }
}

/// Color a raw single-channel pixel buffer.
///
/// Returns an RGBA buffer four times the length of `values`, in the
/// same pixel order.
#[must_use = "returns the colorized RGBA buffer"]
pub fn colorize_pixels(
    values: &[u8],
    mode: VisualizationMode,
    scale: ProbabilityScale,
) -> Vec<u8> {
    values
        .iter()
        .flat_map(|&v| colorize_value(v, mode, scale))
        .collect()
}

/// Color a decoded single-channel raster.
///
/// The output has the same dimensions as `raster`.
#[must_use = "returns the colorized overlay"]
pub fn colorize(raster: &GrayImage, mode: VisualizationMode, scale: ProbabilityScale) -> RgbaImage {
    let mut overlay = RgbaImage::new(raster.width(), raster.height());
    for (out, src) in overlay.pixels_mut().zip(raster.pixels()) {
        out.0 = colorize_value(src.0[0], mode, scale);
    }
    overlay
}

/// Select, decode and colorize the layer `mode` reads from `slice`.
///
/// # Errors
///
/// Returns [`OverlayError::MissingLayer`] if the slice lacks the
/// probability raster a single-class mode needs. The check happens
/// before any decoding.
/// Returns [`OverlayError::EmptyInput`] or [`OverlayError::Decode`] if
/// the layer bytes cannot be decoded.
pub fn colorize_slice(
    slice: &SliceResult,
    mode: VisualizationMode,
    scale: ProbabilityScale,
) -> Result<RgbaImage, OverlayError> {
    let layer = mode.layer();
    let bytes = slice.layer(layer).ok_or(OverlayError::MissingLayer(layer))?;
    let raster = decode::decode_layer(bytes, layer)?;
    Ok(colorize(&raster, mode, scale))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::LayerKind;

    fn rgba_chunks(buf: &[u8]) -> Vec<[u8; 4]> {
        buf.chunks_exact(4)
            .map(|c| [c[0], c[1], c[2], c[3]])
            .collect()
    }

    #[test]
    fn combined_labels_map_to_fixed_colors() {
        let out = colorize_pixels(
            &[0, 1, 2, 3],
            VisualizationMode::Combined,
            ProbabilityScale::Percent,
        );
        let pixels = rgba_chunks(&out);
        assert_eq!(pixels[0][3], 0);
        assert_eq!(pixels[1], [255, 0, 0, 128]);
        assert_eq!(pixels[2], [255, 255, 0, 128]);
        assert_eq!(pixels[3], [0, 255, 0, 128]);
    }

    #[test]
    fn combined_unknown_labels_are_transparent() {
        for v in (0..=255u8).filter(|v| !(1..=3).contains(v)) {
            let px = colorize_value(v, VisualizationMode::Combined, ProbabilityScale::Percent);
            assert_eq!(px[3], 0, "label {v} should be transparent");
        }
    }

    #[test]
    fn combined_ignores_probability_scale() {
        for v in 0..=255u8 {
            assert_eq!(
                colorize_value(v, VisualizationMode::Combined, ProbabilityScale::Percent),
                colorize_value(v, VisualizationMode::Combined, ProbabilityScale::Full),
            );
        }
    }

    #[test]
    fn heatmap_modes_use_class_hue() {
        let cases = [
            (VisualizationMode::Core, [255u8, 0, 0]),
            (VisualizationMode::Edema, [255, 255, 0]),
            (VisualizationMode::Enhancing, [0, 255, 0]),
        ];
        for (mode, rgb) in cases {
            let px = colorize_value(40, mode, ProbabilityScale::Percent);
            assert_eq!(&px[..3], &rgb, "{mode}");
        }
    }

    #[test]
    fn heatmap_alpha_endpoints() {
        let zero = colorize_value(0, VisualizationMode::Core, ProbabilityScale::Percent);
        let full = colorize_value(100, VisualizationMode::Core, ProbabilityScale::Percent);
        assert_eq!(zero[3], 0);
        assert_eq!(full[3], 255);

        let full_scale = colorize_value(255, VisualizationMode::Edema, ProbabilityScale::Full);
        assert_eq!(full_scale[3], 255);
    }

    #[test]
    fn heatmap_alpha_is_monotonic() {
        let values: Vec<u8> = (0..=255).collect();
        let out = colorize_pixels(&values, VisualizationMode::Enhancing, ProbabilityScale::Percent);
        let alphas: Vec<u8> = rgba_chunks(&out).iter().map(|p| p[3]).collect();
        assert!(alphas.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn colorize_preserves_dimensions() {
        let raster = GrayImage::new(5, 3);
        let overlay = colorize(&raster, VisualizationMode::Combined, ProbabilityScale::Percent);
        assert_eq!(overlay.dimensions(), (5, 3));
    }

    #[test]
    fn colorize_matches_pixel_buffer_form() {
        let raster = GrayImage::from_raw(2, 2, vec![3, 2, 1, 0]).unwrap();
        let overlay = colorize(&raster, VisualizationMode::Combined, ProbabilityScale::Percent);
        let expected = colorize_pixels(
            raster.as_raw(),
            VisualizationMode::Combined,
            ProbabilityScale::Percent,
        );
        assert_eq!(overlay.as_raw(), &expected);
    }

    #[test]
    fn colorize_is_deterministic() {
        let raster = GrayImage::from_fn(8, 8, |x, y| {
            image::Luma([u8::try_from((x + y) % 5).unwrap()])
        });
        let a = colorize(&raster, VisualizationMode::Combined, ProbabilityScale::Percent);
        let b = colorize(&raster, VisualizationMode::Combined, ProbabilityScale::Percent);
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn missing_probability_layer_is_reported_before_decoding() {
        // The combined mask is garbage: if the colorizer decoded anything
        // before checking for the core layer, this would be a Decode error.
        let slice = SliceResult {
            slice_index: 0,
            original_image: vec![0xFF],
            combined_mask: vec![0xFF],
            core_probability: None,
            edema_probability: None,
            enhancing_probability: None,
            ground_truth_image: None,
        };
        let result = colorize_slice(&slice, VisualizationMode::Core, ProbabilityScale::Percent);
        assert!(matches!(
            result,
            Err(OverlayError::MissingLayer(LayerKind::CoreProbability))
        ));
    }
}
