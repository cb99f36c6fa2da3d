//! Shared types for the segmentation overlay pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_with::base64::Base64;
use serde_with::serde_as;

use crate::composite::ScaleFilter;

/// Re-export `GrayImage` so downstream crates can reference decoded
/// single-channel rasters without depending on `image` directly.
pub use image::GrayImage;

/// Re-export `RgbaImage` so downstream crates can reference colorized
/// overlays and composited frames without depending on `image` directly.
pub use image::RgbaImage;

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Create a new pair of dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns `true` if either axis is zero.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// One imaged slice as returned by the segmentation backend.
///
/// Every raster field holds the *encoded* image bytes (PNG on the wire,
/// base64 in JSON). Decoding happens lazily in the render pipeline so a
/// corrupt probability layer only fails the modes that read it.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceResult {
    /// Position of the slice within the scanned volume; ordering key.
    pub slice_index: u32,

    /// Grayscale anatomical slice.
    #[serde_as(as = "Base64")]
    pub original_image: Vec<u8>,

    /// Single-channel label image with values in `{0, 1, 2, 3}`.
    #[serde_as(as = "Base64")]
    pub combined_mask: Vec<u8>,

    /// Necrotic/core class probability raster.
    #[serde_as(as = "Option<Base64>")]
    pub core_probability: Option<Vec<u8>>,

    /// Edema class probability raster.
    #[serde_as(as = "Option<Base64>")]
    pub edema_probability: Option<Vec<u8>>,

    /// Enhancing tumor class probability raster.
    #[serde_as(as = "Option<Base64>")]
    pub enhancing_probability: Option<Vec<u8>>,

    /// Annotated reference slice, present only when the backend had
    /// ground truth for the volume.
    #[serde_as(as = "Option<Base64>")]
    pub ground_truth_image: Option<Vec<u8>>,
}

impl SliceResult {
    /// Encoded bytes of the given layer, if the backend supplied it.
    #[must_use]
    pub fn layer(&self, kind: LayerKind) -> Option<&[u8]> {
        match kind {
            LayerKind::Original => Some(&self.original_image),
            LayerKind::CombinedMask => Some(&self.combined_mask),
            LayerKind::CoreProbability => self.core_probability.as_deref(),
            LayerKind::EdemaProbability => self.edema_probability.as_deref(),
            LayerKind::EnhancingProbability => self.enhancing_probability.as_deref(),
            LayerKind::GroundTruth => self.ground_truth_image.as_deref(),
        }
    }
}

/// Identifies one raster carried by a [`SliceResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    /// The grayscale anatomical slice.
    Original,
    /// The multi-class label mask.
    CombinedMask,
    /// Necrotic/core probability raster.
    CoreProbability,
    /// Edema probability raster.
    EdemaProbability,
    /// Enhancing tumor probability raster.
    EnhancingProbability,
    /// Annotated ground-truth slice.
    GroundTruth,
}

impl LayerKind {
    /// Wire field name of the layer in the `/segment` response.
    #[must_use]
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::Original => "original_image",
            Self::CombinedMask => "combined_mask",
            Self::CoreProbability => "core_probability",
            Self::EdemaProbability => "edema_probability",
            Self::EnhancingProbability => "enhancing_probability",
            Self::GroundTruth => "ground_truth_image",
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// Tumor sub-region encoded by a non-zero mask label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TissueClass {
    /// Label 1: necrotic / non-enhancing core.
    NecroticCore,
    /// Label 2: peritumoral edema.
    Edema,
    /// Label 3: enhancing tumor.
    EnhancingTumor,
}

impl TissueClass {
    /// All classes in label order.
    pub const ALL: [Self; 3] = [Self::NecroticCore, Self::Edema, Self::EnhancingTumor];

    /// Map a mask pixel value to its class. Background (0) and any
    /// unrecognized value map to `None`.
    #[must_use]
    pub const fn from_label(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::NecroticCore),
            2 => Some(Self::Edema),
            3 => Some(Self::EnhancingTumor),
            _ => None,
        }
    }

    /// Mask pixel value for this class.
    #[must_use]
    pub const fn label(self) -> u8 {
        match self {
            Self::NecroticCore => 1,
            Self::Edema => 2,
            Self::EnhancingTumor => 3,
        }
    }

    /// Fixed overlay hue: red, yellow, green.
    #[must_use]
    pub const fn color(self) -> [u8; 3] {
        match self {
            Self::NecroticCore => [255, 0, 0],
            Self::Edema => [255, 255, 0],
            Self::EnhancingTumor => [0, 255, 0],
        }
    }

    /// Human-readable class name for legends.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NecroticCore => "Necrotic/Core",
            Self::Edema => "Edema",
            Self::EnhancingTumor => "Enhancing Tumor",
        }
    }

    /// Probability layer holding this class's per-pixel likelihood.
    #[must_use]
    pub const fn probability_layer(self) -> LayerKind {
        match self {
            Self::NecroticCore => LayerKind::CoreProbability,
            Self::Edema => LayerKind::EdemaProbability,
            Self::EnhancingTumor => LayerKind::EnhancingProbability,
        }
    }
}

impl fmt::Display for TissueClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How the segmentation overlay is visualized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualizationMode {
    /// Every class at once, each in its fixed color at half opacity.
    #[default]
    Combined,
    /// Necrotic/core probability heatmap.
    Core,
    /// Edema probability heatmap.
    Edema,
    /// Enhancing tumor probability heatmap.
    Enhancing,
}

impl VisualizationMode {
    /// All modes in selector order.
    pub const ALL: [Self; 4] = [Self::Combined, Self::Core, Self::Edema, Self::Enhancing];

    /// Button label for the mode selector.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Combined => "Combined",
            Self::Core => "Core/Necrotic",
            Self::Edema => "Edema",
            Self::Enhancing => "Enhancing",
        }
    }

    /// Lowercase identifier, used in file names and on the command line.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Combined => "combined",
            Self::Core => "core",
            Self::Edema => "edema",
            Self::Enhancing => "enhancing",
        }
    }

    /// The single class a heatmap mode shows, or `None` for
    /// [`Combined`](Self::Combined).
    #[must_use]
    pub const fn class(self) -> Option<TissueClass> {
        match self {
            Self::Combined => None,
            Self::Core => Some(TissueClass::NecroticCore),
            Self::Edema => Some(TissueClass::Edema),
            Self::Enhancing => Some(TissueClass::EnhancingTumor),
        }
    }

    /// The raster the colorizer reads in this mode.
    #[must_use]
    pub const fn layer(self) -> LayerKind {
        match self.class() {
            None => LayerKind::CombinedMask,
            Some(class) => class.probability_layer(),
        }
    }
}

impl fmt::Display for VisualizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Value domain of the probability rasters.
///
/// The backend contract does not pin this down, so both encodings are
/// supported and the choice lives in [`OverlayConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbabilityScale {
    /// Pixel values are percentages in `[0, 100]`; alpha is `v * 2.55`.
    #[default]
    Percent,
    /// Pixel values already span `[0, 255]`; alpha is `v`.
    Full,
}

impl ProbabilityScale {
    /// Convert a probability pixel to an overlay alpha.
    ///
    /// Rounds half to even and saturates at 255, matching a clamped
    /// byte store.
    #[must_use]
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn alpha(self, value: u8) -> u8 {
        match self {
            Self::Percent => {
                let scaled = (f64::from(value) * 2.55).round_ties_even();
                scaled.min(255.0) as u8
            }
            Self::Full => value,
        }
    }
}

/// Configuration for colorizing and compositing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Fixed size of the output surface. Source rasters are stretched
    /// to fit regardless of their native resolution.
    pub surface: Dimensions,

    /// Value domain of the probability rasters.
    pub probability_scale: ProbabilityScale,

    /// Resampling filter used when stretching rasters to the surface.
    pub scale_filter: ScaleFilter,
}

impl OverlayConfig {
    /// Default output surface edge length in pixels.
    pub const DEFAULT_SURFACE_SIZE: u32 = 256;

    /// Check invariants that serde and the public fields cannot enforce.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::InvalidConfig`] if the surface has a
    /// zero-length axis.
    pub fn validate(&self) -> Result<(), OverlayError> {
        if self.surface.is_empty() {
            return Err(OverlayError::InvalidConfig(format!(
                "surface must be non-empty, got {}",
                self.surface
            )));
        }
        Ok(())
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            surface: Dimensions::new(Self::DEFAULT_SURFACE_SIZE, Self::DEFAULT_SURFACE_SIZE),
            probability_scale: ProbabilityScale::default(),
            scale_filter: ScaleFilter::default(),
        }
    }
}

/// Errors that can occur while receiving, decoding, or rendering
/// segmentation results.
#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    /// The backend returned zero slices.
    #[error("segmentation result contains no slices")]
    EmptyResult,

    /// The active mode needs a layer the slice does not carry.
    #[error("slice has no {0} layer")]
    MissingLayer(LayerKind),

    /// A layer was present but held no bytes.
    #[error("{layer} layer is empty")]
    EmptyInput {
        /// Which layer was empty.
        layer: LayerKind,
    },

    /// A layer failed to decode as an image.
    #[error("failed to decode {layer} layer: {source}")]
    Decode {
        /// Which layer failed.
        layer: LayerKind,
        /// Underlying decoder error.
        #[source]
        source: image::ImageError,
    },

    /// A slice position past the end of the result was requested.
    #[error("slice {index} is out of range for a result with {len} slices")]
    SliceOutOfRange {
        /// Requested position.
        index: usize,
        /// Number of slices available.
        len: usize,
    },

    /// Overlay configuration is invalid.
    #[error("invalid overlay configuration: {0}")]
    InvalidConfig(String),
}
