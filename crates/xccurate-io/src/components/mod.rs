//! Dioxus UI components for Xccurate-ML.
//!
//! Provides the upload zones, visualization mode selector and legend,
//! slice navigation, overlay display, backend status badge, and the
//! classification result card.

mod classification;
mod encoded_image;
mod mode_selector;
mod notice;
mod overlay_view;
mod slice_navigator;
mod status_indicator;
mod upload;

pub use classification::ClassificationResult;
pub use encoded_image::{EncodedImage, image_mime_type};
pub use mode_selector::{Legend, ModeSelector};
pub use notice::Notice;
pub use overlay_view::OverlayView;
pub use slice_navigator::SliceNavigator;
pub use status_indicator::StatusIndicator;
pub use upload::FileUpload;
