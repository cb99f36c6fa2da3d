//! xccurate-io: Browser I/O and Dioxus component library.
//!
//! Handles file uploads, Blob downloads, and raster encoding for display,
//! and provides reusable UI components for the Xccurate-ML web
//! application.

pub mod components;
pub mod download;
pub mod raster;

pub use components::{
    ClassificationResult, EncodedImage, FileUpload, Legend, ModeSelector, Notice, OverlayView,
    SliceNavigator, StatusIndicator,
};
