//! Compositor: draw the original slice and its colorized overlay onto a
//! fixed-size output surface.
//!
//! Both rasters are stretched to the surface size (aspect ratio is not
//! preserved) and combined with source-over alpha blending. A frame is
//! always assembled off-surface first and then swapped in whole, so a
//! failed draw leaves the previous frame visible.

use std::fmt;
use std::sync::Arc;

use image::{ImageEncoder, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::types::Dimensions;

/// Resampling filter used when stretching rasters to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScaleFilter {
    /// Nearest-neighbor: blocky, keeps label edges hard.
    Nearest,
    /// Bilinear interpolation, close to a browser canvas default.
    #[default]
    Triangle,
    /// Bicubic (Catmull-Rom).
    CatmullRom,
    /// Gaussian.
    Gaussian,
    /// Lanczos with 3 lobes.
    Lanczos3,
}

impl ScaleFilter {
    /// Convert to the `image` crate's `FilterType`.
    const fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            Self::Nearest => image::imageops::FilterType::Nearest,
            Self::Triangle => image::imageops::FilterType::Triangle,
            Self::CatmullRom => image::imageops::FilterType::CatmullRom,
            Self::Gaussian => image::imageops::FilterType::Gaussian,
            Self::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

impl fmt::Display for ScaleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nearest => f.write_str("Nearest"),
            Self::Triangle => f.write_str("Triangle"),
            Self::CatmullRom => f.write_str("CatmullRom"),
            Self::Gaussian => f.write_str("Gaussian"),
            Self::Lanczos3 => f.write_str("Lanczos3"),
        }
    }
}

/// The drawable output surface.
///
/// Holds the most recently presented frame behind an `Arc` so views can
/// keep a snapshot while a newer frame is being composed.
#[derive(Debug, Clone)]
pub struct Surface {
    frame: Arc<RgbaImage>,
    revision: u64,
}

impl Surface {
    /// Create a fully transparent surface.
    #[must_use]
    pub fn new(dimensions: Dimensions) -> Self {
        Self {
            frame: Arc::new(RgbaImage::new(dimensions.width, dimensions.height)),
            revision: 0,
        }
    }

    /// Surface size in pixels.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.frame.width(), self.frame.height())
    }

    /// The currently presented frame.
    #[must_use]
    pub fn frame(&self) -> &RgbaImage {
        &self.frame
    }

    /// A cheap shared handle to the currently presented frame.
    #[must_use]
    pub fn snapshot(&self) -> Arc<RgbaImage> {
        Arc::clone(&self.frame)
    }

    /// Incremented every time a frame is presented or the surface is
    /// cleared. Views use it to skip re-encoding an unchanged frame.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Reset to a fully transparent frame of the same size.
    pub fn clear(&mut self) {
        let Dimensions { width, height } = self.dimensions();
        self.present(RgbaImage::new(width, height));
    }

    /// Replace the whole frame.
    pub(crate) fn present(&mut self, frame: RgbaImage) {
        self.frame = Arc::new(frame);
        self.revision += 1;
    }

    /// Encode the current frame as PNG.
    ///
    /// # Errors
    ///
    /// Returns the encoder error if PNG encoding fails.
    pub fn encode_png(&self) -> Result<Vec<u8>, image::ImageError> {
        encode_png(&self.frame)
    }
}

/// Encode an RGBA frame as PNG bytes.
///
/// # Errors
///
/// Returns the encoder error if PNG encoding fails.
pub fn encode_png(frame: &RgbaImage) -> Result<Vec<u8>, image::ImageError> {
    let mut png_bytes = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
    encoder.write_image(
        frame.as_raw(),
        frame.width(),
        frame.height(),
        image::ExtendedColorType::Rgba8,
    )?;
    Ok(png_bytes)
}

/// Compose `overlay` on top of `original` and present the result on
/// `surface`.
///
/// Redrawing with identical inputs yields an identical frame.
pub fn composite(
    surface: &mut Surface,
    original: &RgbaImage,
    overlay: &RgbaImage,
    filter: ScaleFilter,
) {
    let frame = compose_frame(original, overlay, surface.dimensions(), filter);
    surface.present(frame);
}

/// Build a composed frame of size `target` without touching any surface.
///
/// Starts from a transparent frame, draws the stretched original, then
/// blends the stretched overlay over it. Each raster is stretched to
/// `target` on its own, so the two need not share a size.
#[must_use]
pub fn compose_frame(
    original: &RgbaImage,
    overlay: &RgbaImage,
    target: Dimensions,
    filter: ScaleFilter,
) -> RgbaImage {
    if original.dimensions() != overlay.dimensions() {
        tracing::warn!(
            original = %Dimensions::new(original.width(), original.height()),
            overlay = %Dimensions::new(overlay.width(), overlay.height()),
            "original and overlay differ in size, stretching each to the surface"
        );
    }

    let mut frame = RgbaImage::new(target.width, target.height);
    draw_over(&mut frame, &stretch(original, target, filter));
    draw_over(&mut frame, &stretch(overlay, target, filter));
    frame
}

/// Blend `src` over every pixel of `dst`. Both must have the same size.
fn draw_over(dst: &mut RgbaImage, src: &RgbaImage) {
    for (d, s) in dst.pixels_mut().zip(src.pixels()) {
        d.0 = blend_source_over(d.0, s.0);
    }
}

/// Source-over blend of one straight-alpha pixel onto another.
///
/// `out_a = a_s + a_d (1 - a_s)` and
/// `out_c = (c_s a_s + c_d a_d (1 - a_s)) / out_a` per color channel.
#[must_use]
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn blend_source_over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    let sa = f32::from(src[3]) / 255.0;
    let da = f32::from(dst[3]) / 255.0;
    let dst_weight = da * (1.0 - sa);
    let out_a = sa + dst_weight;
    if out_a <= 0.0 {
        return [0, 0, 0, 0];
    }

    let channel = |s: u8, d: u8| -> u8 {
        let c = f32::from(s).mul_add(sa, f32::from(d) * dst_weight) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };

    [
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ]
}

/// Stretch `img` to exactly `target`, resampling in premultiplied alpha
/// so transparent pixels do not bleed their color into class edges.
fn stretch(img: &RgbaImage, target: Dimensions, filter: ScaleFilter) -> RgbaImage {
    if img.dimensions() == (target.width, target.height) {
        return img.clone();
    }
    let premultiplied = map_pixels(img, premultiply);
    let resized = image::imageops::resize(
        &premultiplied,
        target.width,
        target.height,
        filter.to_image_filter(),
    );
    map_pixels(&resized, unpremultiply)
}

fn map_pixels(img: &RgbaImage, f: fn([u8; 4]) -> [u8; 4]) -> RgbaImage {
    let mut out = img.clone();
    for p in out.pixels_mut() {
        *p = Rgba(f(p.0));
    }
    out
}

#[expect(clippy::cast_possible_truncation)]
fn premultiply([r, g, b, a]: [u8; 4]) -> [u8; 4] {
    let scale = |c: u8| ((u16::from(c) * u16::from(a) + 127) / 255) as u8;
    [scale(r), scale(g), scale(b), a]
}

#[expect(clippy::cast_possible_truncation)]
fn unpremultiply([r, g, b, a]: [u8; 4]) -> [u8; 4] {
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let scale = |c: u8| ((u16::from(c) * 255 + u16::from(a) / 2) / u16::from(a)).min(255) as u8;
    [scale(r), scale(g), scale(b), a]
}
