//! xccurate-overlay: Pure segmentation overlay pipeline (sans-IO).
//!
//! Turns one slice of a brain tumor segmentation result into a displayable
//! frame through:
//! layer selection -> decode -> colorize -> stretch -> source-over composite.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! encoded rasters and returns pixel buffers. Talking to the segmentation
//! backend lives in `xccurate-client`; browser interaction lives in
//! `xccurate-io`.

pub mod colorize;
pub mod composite;
pub mod decode;
pub mod receiver;
pub mod sequence;
pub mod types;
pub mod viewer;

pub use composite::{ScaleFilter, Surface};
pub use receiver::SegmentationResult;
pub use sequence::{Sequencer, Ticket};
pub use types::{
    Dimensions, LayerKind, OverlayConfig, OverlayError, ProbabilityScale, SliceResult,
    TissueClass, VisualizationMode,
};
pub use viewer::{Completion, RenderRequest, Viewer};

use image::RgbaImage;

/// Render one slice in `mode` into a new frame of `config.surface` size.
///
/// # Pipeline steps
///
/// 1. Check that the slice carries the layer `mode` reads
/// 2. Decode the anatomical slice
/// 3. Decode and colorize the mode's layer
/// 4. Stretch both to the surface size and composite overlay over original
///
/// # Errors
///
/// Returns [`OverlayError::MissingLayer`] before decoding anything if the
/// slice lacks the layer for `mode`.
/// Returns [`OverlayError::EmptyInput`] or [`OverlayError::Decode`] if a
/// raster cannot be decoded.
pub fn render_frame(
    slice: &SliceResult,
    mode: VisualizationMode,
    config: &OverlayConfig,
) -> Result<RgbaImage, OverlayError> {
    let (original, overlay) = prepare(slice, mode, config)?;
    Ok(composite::compose_frame(
        &original,
        &overlay,
        config.surface,
        config.scale_filter,
    ))
}

/// Render one slice in `mode` straight onto `surface`.
///
/// The surface keeps its own size; `config.surface` is ignored.
///
/// # Errors
///
/// Same as [`render_frame`]. The surface is left untouched on error.
pub fn render_slice(
    surface: &mut Surface,
    slice: &SliceResult,
    mode: VisualizationMode,
    config: &OverlayConfig,
) -> Result<(), OverlayError> {
    let (original, overlay) = prepare(slice, mode, config)?;
    composite::composite(surface, &original, &overlay, config.scale_filter);
    Ok(())
}

/// Steps 1-3 of the render pipeline: the decoded original and the
/// colorized overlay, at their native size.
fn prepare(
    slice: &SliceResult,
    mode: VisualizationMode,
    config: &OverlayConfig,
) -> Result<(RgbaImage, RgbaImage), OverlayError> {
    tracing::debug!(slice = slice.slice_index, %mode, "rendering frame");

    // 1. Fail fast on a missing layer.
    let layer = mode.layer();
    if slice.layer(layer).is_none() {
        return Err(OverlayError::MissingLayer(layer));
    }

    // 2. Anatomical slice.
    let original = decode::decode_rgba(&slice.original_image, LayerKind::Original)?;

    // 3. Overlay.
    let overlay = colorize::colorize_slice(slice, mode, config.probability_scale)?;
    Ok((original, overlay))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage, Luma};

    fn png(img: GrayImage) -> Vec<u8> {
        let mut buf = std::io::Cursor::new(Vec::new());
        DynamicImage::ImageLuma8(img)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    fn slice() -> SliceResult {
        SliceResult {
            slice_index: 0,
            original_image: png(GrayImage::from_pixel(2, 2, Luma([100]))),
            combined_mask: png(GrayImage::from_raw(2, 2, vec![0, 1, 2, 3]).unwrap()),
            core_probability: None,
            edema_probability: None,
            enhancing_probability: None,
            ground_truth_image: None,
        }
    }

    fn config() -> OverlayConfig {
        OverlayConfig {
            surface: Dimensions::new(2, 2),
            ..OverlayConfig::default()
        }
    }

    #[test]
    fn combined_frame_blends_class_colors() {
        let frame = render_frame(&slice(), VisualizationMode::Combined, &config()).unwrap();
        let px: Vec<[u8; 4]> = frame.pixels().map(|p| p.0).collect();
        assert_eq!(px[0], [100, 100, 100, 255]);
        assert_eq!(px[1], [178, 50, 50, 255]);
        assert_eq!(px[2], [178, 178, 50, 255]);
        assert_eq!(px[3], [50, 178, 50, 255]);
    }

    #[test]
    fn missing_layer_wins_over_corrupt_original() {
        let mut s = slice();
        s.original_image = vec![1, 2, 3];
        let result = render_frame(&s, VisualizationMode::Edema, &config());
        assert!(matches!(
            result,
            Err(OverlayError::MissingLayer(LayerKind::EdemaProbability))
        ));
    }

    #[test]
    fn corrupt_original_is_a_decode_error() {
        let mut s = slice();
        s.original_image = vec![1, 2, 3];
        let result = render_frame(&s, VisualizationMode::Combined, &config());
        assert!(matches!(
            result,
            Err(OverlayError::Decode {
                layer: LayerKind::Original,
                ..
            })
        ));
    }

    #[test]
    fn mask_smaller_than_original_still_renders() {
        let s = SliceResult {
            original_image: png(GrayImage::from_pixel(240, 240, Luma([100]))),
            combined_mask: png(GrayImage::from_pixel(128, 128, Luma([1]))),
            ..slice()
        };
        let frame =
            render_frame(&s, VisualizationMode::Combined, &OverlayConfig::default()).unwrap();
        assert_eq!(frame.dimensions(), (256, 256));
        assert_eq!(frame.get_pixel(128, 128).0, [178, 50, 50, 255]);
    }

    #[test]
    fn render_slice_uses_surface_size() {
        let mut surface = Surface::new(Dimensions::new(6, 4));
        render_slice(&mut surface, &slice(), VisualizationMode::Combined, &config()).unwrap();
        assert_eq!(surface.frame().dimensions(), (6, 4));
        assert_eq!(surface.revision(), 1);
    }
}
