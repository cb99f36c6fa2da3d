//! xccurate-client: Typed client for the Xccurate-ML backend.
//!
//! Wraps the three endpoints the front-end uses:
//!
//! - `GET /status`: model health, single- or dual-model shape
//! - `POST /classify`: 2D scan classification
//! - `POST /segment`: FLAIR + T1CE volume segmentation
//!
//! Segmentation responses are handed to
//! [`SegmentationResult::from_slices`](xccurate_overlay::SegmentationResult::from_slices),
//! so callers only ever see non-empty, slice-ordered results.
//!
//! Runs natively on tokio and in the browser on `fetch`, via `reqwest`.

pub mod client;
pub mod config;
pub mod error;
pub mod types;
pub mod upload;

pub use client::Client;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use types::{
    ClassifyResponse, DualModelStatus, Finding, ModelHealth, SingleModelStatus, StatusResponse,
};
pub use upload::{Upload, UploadKind};
