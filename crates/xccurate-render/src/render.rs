//! Batch rendering of a segmentation result to PNG files.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use xccurate_overlay::{
    OverlayConfig, OverlayError, SegmentationResult, SliceResult, Surface, VisualizationMode,
};

/// Output path for one rendered frame.
pub fn frame_path(dir: &Path, slice_index: u32, mode: VisualizationMode) -> PathBuf {
    dir.join(format!("slice-{slice_index}-{}.png", mode.slug()))
}

/// The slices to render: all of them, or the one whose `slice_index`
/// equals `only`.
fn select(result: &SegmentationResult, only: Option<u32>) -> anyhow::Result<&[SliceResult]> {
    let slices = result.slices();
    let Some(index) = only else {
        return Ok(slices);
    };
    match slices.iter().position(|s| s.slice_index == index) {
        Some(pos) => Ok(&slices[pos..=pos]),
        None => {
            let available: Vec<String> = slices.iter().map(|s| s.slice_index.to_string()).collect();
            bail!("no slice with index {index} (available: {})", available.join(", "))
        }
    }
}

/// Render every selected slice in every mode into `dir`.
///
/// A slice without the probability layer a mode needs is skipped for that
/// mode. Any other failure stops the run.
///
/// Returns the number of files written.
pub fn render_all(
    result: &SegmentationResult,
    only: Option<u32>,
    modes: &[VisualizationMode],
    config: &OverlayConfig,
    dir: &Path,
) -> anyhow::Result<usize> {
    let mut surface = Surface::new(config.surface);
    let mut written = 0;

    for slice in select(result, only)? {
        for &mode in modes {
            match xccurate_overlay::render_slice(&mut surface, slice, mode, config) {
                Ok(()) => {}
                Err(OverlayError::MissingLayer(layer)) => {
                    tracing::warn!(slice = slice.slice_index, %mode, %layer, "skipped");
                    continue;
                }
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("rendering slice {} ({mode})", slice.slice_index)
                    });
                }
            }

            let path = frame_path(dir, slice.slice_index, mode);
            let png = surface.encode_png().context("encoding PNG")?;
            std::fs::write(&path, png).with_context(|| format!("writing {}", path.display()))?;
            tracing::debug!(path = %path.display(), "wrote frame");
            written += 1;
        }
    }
    Ok(written)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use image::{DynamicImage, GrayImage, Luma};
    use xccurate_overlay::Dimensions;

    use super::*;

    fn png(img: GrayImage) -> Vec<u8> {
        let mut buf = std::io::Cursor::new(Vec::new());
        DynamicImage::ImageLuma8(img)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    /// A 2x2 slice labeled necrotic core everywhere, with only the core
    /// probability layer present.
    fn slice(index: u32) -> SliceResult {
        SliceResult {
            slice_index: index,
            original_image: png(GrayImage::from_pixel(2, 2, Luma([0]))),
            combined_mask: png(GrayImage::from_pixel(2, 2, Luma([1]))),
            core_probability: Some(png(GrayImage::from_pixel(2, 2, Luma([100])))),
            edema_probability: None,
            enhancing_probability: None,
            ground_truth_image: None,
        }
    }

    fn result(indices: &[u32]) -> SegmentationResult {
        SegmentationResult::from_slices(indices.iter().copied().map(slice).collect()).unwrap()
    }

    fn config() -> OverlayConfig {
        OverlayConfig {
            surface: Dimensions::new(4, 4),
            ..OverlayConfig::default()
        }
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("xccurate-render-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn frame_paths_use_index_and_slug() {
        let path = frame_path(Path::new("out"), 42, VisualizationMode::Enhancing);
        assert_eq!(path, Path::new("out").join("slice-42-enhancing.png"));
    }

    #[test]
    fn missing_layers_are_skipped() {
        let dir = temp_dir("skip");
        let written =
            render_all(&result(&[7]), None, &VisualizationMode::ALL, &config(), &dir).unwrap();

        assert_eq!(written, 2);
        assert!(frame_path(&dir, 7, VisualizationMode::Combined).exists());
        assert!(frame_path(&dir, 7, VisualizationMode::Core).exists());
        assert!(!frame_path(&dir, 7, VisualizationMode::Edema).exists());
        assert!(!frame_path(&dir, 7, VisualizationMode::Enhancing).exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn frames_have_surface_size_and_overlay_color() {
        let dir = temp_dir("pixels");
        render_all(&result(&[1]), None, &[VisualizationMode::Core], &config(), &dir).unwrap();

        let frame = image::open(frame_path(&dir, 1, VisualizationMode::Core))
            .unwrap()
            .to_rgba8();
        assert_eq!(frame.dimensions(), (4, 4));
        // Full core probability over black: solid red.
        assert_eq!(frame.get_pixel(2, 2).0, [255, 0, 0, 255]);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn only_the_requested_slice_is_rendered() {
        let dir = temp_dir("only");
        let modes = [VisualizationMode::Combined];
        let written = render_all(&result(&[3, 1, 2]), Some(2), &modes, &config(), &dir).unwrap();

        assert_eq!(written, 1);
        assert!(frame_path(&dir, 2, VisualizationMode::Combined).exists());
        assert!(!frame_path(&dir, 1, VisualizationMode::Combined).exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn unknown_slice_index_is_an_error() {
        let dir = temp_dir("unknown");
        let modes = [VisualizationMode::Combined];
        let err = render_all(&result(&[1, 2]), Some(9), &modes, &config(), &dir).unwrap_err();
        assert!(err.to_string().contains("available: 1, 2"));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn corrupt_raster_aborts() {
        let dir = temp_dir("corrupt");
        let mut bad = slice(1);
        bad.original_image = vec![1, 2, 3];
        let result = SegmentationResult::from_slices(vec![bad]).unwrap();
        let modes = [VisualizationMode::Combined];
        assert!(render_all(&result, None, &modes, &config(), &dir).is_err());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
