//! Result receiver: validate and hold one segmentation response.

use std::sync::Arc;

use crate::types::{OverlayError, SliceResult};

/// A non-empty, slice-ordered segmentation result.
///
/// Immutable once received; clones share the same slice storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentationResult {
    slices: Arc<[SliceResult]>,
}

impl SegmentationResult {
    /// Accept the slices returned by the segmentation backend.
    ///
    /// Slices are ordered by `slice_index`; records with equal indices
    /// keep their wire order.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::EmptyResult`] if `slices` is empty.
    pub fn from_slices(mut slices: Vec<SliceResult>) -> Result<Self, OverlayError> {
        if slices.is_empty() {
            return Err(OverlayError::EmptyResult);
        }
        slices.sort_by_key(|s| s.slice_index);
        tracing::debug!(count = slices.len(), "received segmentation result");
        Ok(Self {
            slices: slices.into(),
        })
    }

    /// Number of slices. Always at least one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    /// Always `false`; present for API symmetry with slices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// The slice at `position` in `slice_index` order.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::SliceOutOfRange`] past the last slice.
    pub fn slice(&self, position: usize) -> Result<&SliceResult, OverlayError> {
        self.slices
            .get(position)
            .ok_or(OverlayError::SliceOutOfRange {
                index: position,
                len: self.slices.len(),
            })
    }

    /// All slices in `slice_index` order.
    #[must_use]
    pub fn slices(&self) -> &[SliceResult] {
        &self.slices
    }
}
