//! Page-scoped viewer state: the active visualization mode, the current
//! segmentation result and slice, and the output surface.
//!
//! Every state change that should redraw hands back a [`RenderRequest`].
//! The caller renders it (possibly after yielding to an event loop) and
//! passes the outcome to [`Viewer::complete`], which draws it only if no
//! newer request was issued in the meantime.

use image::RgbaImage;

use crate::composite::Surface;
use crate::receiver::SegmentationResult;
use crate::sequence::{Sequencer, Ticket};
use crate::types::{OverlayConfig, OverlayError, SliceResult, VisualizationMode};

/// Everything needed to render one frame, detached from the viewer so it
/// can be moved into an async task.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    ticket: Ticket,
    result: SegmentationResult,
    position: usize,
    mode: VisualizationMode,
    config: OverlayConfig,
}

impl RenderRequest {
    /// Sequence number captured when the request was issued.
    #[must_use]
    pub const fn ticket(&self) -> Ticket {
        self.ticket
    }

    /// Mode the frame is rendered in.
    #[must_use]
    pub const fn mode(&self) -> VisualizationMode {
        self.mode
    }

    /// Slice position the frame is rendered for.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Decode, colorize and compose the requested frame.
    ///
    /// # Errors
    ///
    /// Propagates any [`OverlayError`] from the render pipeline.
    pub fn render(&self) -> Result<RgbaImage, OverlayError> {
        let slice = self.result.slice(self.position)?;
        crate::render_frame(slice, self.mode, &self.config)
    }
}

/// What [`Viewer::complete`] did with a finished render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The frame was presented on the surface.
    Drawn,
    /// A newer request had been issued; the frame was dropped.
    Discarded,
}

/// State container for the segmentation viewer.
#[derive(Debug)]
pub struct Viewer {
    config: OverlayConfig,
    mode: VisualizationMode,
    result: Option<SegmentationResult>,
    position: usize,
    sequencer: Sequencer,
    surface: Surface,
}

impl Viewer {
    /// Create an empty viewer in [`VisualizationMode::Combined`].
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::InvalidConfig`] if `config` fails
    /// validation.
    pub fn new(config: OverlayConfig) -> Result<Self, OverlayError> {
        config.validate()?;
        Ok(Self {
            config,
            mode: VisualizationMode::default(),
            result: None,
            position: 0,
            sequencer: Sequencer::new(),
            surface: Surface::new(config.surface),
        })
    }

    /// The active visualization mode.
    #[must_use]
    pub const fn mode(&self) -> VisualizationMode {
        self.mode
    }

    /// The overlay configuration in use.
    #[must_use]
    pub const fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// The most recently received result, if any.
    #[must_use]
    pub const fn result(&self) -> Option<&SegmentationResult> {
        self.result.as_ref()
    }

    /// The displayed slice, if a result is loaded.
    #[must_use]
    pub fn current_slice(&self) -> Option<&SliceResult> {
        self.result.as_ref()?.slice(self.position).ok()
    }

    /// Position of the displayed slice within the result.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// The output surface.
    #[must_use]
    pub const fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Returns `true` while a request holding `ticket` would still be
    /// drawn. Lets callers skip rendering a request that was superseded
    /// before it started.
    #[must_use]
    pub const fn is_current(&self, ticket: Ticket) -> bool {
        self.sequencer.is_current(ticket)
    }

    /// Switch the visualization mode.
    ///
    /// Returns a request for exactly one redraw when the mode changes and
    /// a result is loaded. Re-selecting the current mode, or changing
    /// mode before any result arrived, returns `None`.
    pub fn set_mode(&mut self, mode: VisualizationMode) -> Option<RenderRequest> {
        if mode == self.mode {
            return None;
        }
        self.mode = mode;
        self.request()
    }

    /// Take ownership of a new result and show its first slice.
    pub fn receive(&mut self, result: SegmentationResult) -> RenderRequest {
        self.position = 0;
        let ticket = self.sequencer.issue();
        let request = RenderRequest {
            ticket,
            result: result.clone(),
            position: 0,
            mode: self.mode,
            config: self.config,
        };
        self.result = Some(result);
        request
    }

    /// Show the slice at `position`.
    ///
    /// Returns `Ok(None)` if that slice is already shown.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::SliceOutOfRange`] if `position` is past the
    /// last slice, or if no result is loaded.
    pub fn select_slice(&mut self, position: usize) -> Result<Option<RenderRequest>, OverlayError> {
        let len = self.result.as_ref().map_or(0, SegmentationResult::len);
        if position >= len {
            return Err(OverlayError::SliceOutOfRange { index: position, len });
        }
        if position == self.position {
            return Ok(None);
        }
        self.position = position;
        Ok(self.request())
    }

    /// Move to the next slice, if there is one.
    pub fn next_slice(&mut self) -> Option<RenderRequest> {
        self.select_slice(self.position + 1).ok().flatten()
    }

    /// Move to the previous slice, if there is one.
    pub fn previous_slice(&mut self) -> Option<RenderRequest> {
        let position = self.position.checked_sub(1)?;
        self.select_slice(position).ok().flatten()
    }

    /// Request a redraw of the current state without changing it.
    pub fn redraw(&mut self) -> Option<RenderRequest> {
        self.request()
    }

    /// Drop the current result, clear the surface, and make every
    /// in-flight request stale.
    pub fn reset(&mut self) {
        self.sequencer.invalidate();
        self.result = None;
        self.position = 0;
        self.surface.clear();
    }

    /// Apply the outcome of a finished render.
    ///
    /// Stale outcomes, successful or not, are discarded. A current
    /// successful frame replaces the surface contents whole; a current
    /// failure leaves the previous frame in place.
    ///
    /// # Errors
    ///
    /// Returns the render error of a current request.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        outcome: Result<RgbaImage, OverlayError>,
    ) -> Result<Completion, OverlayError> {
        if !self.is_current(ticket) {
            tracing::warn!(ticket = ticket.get(), "discarding stale frame");
            return Ok(Completion::Discarded);
        }
        let frame = outcome?;
        self.surface.present(frame);
        Ok(Completion::Drawn)
    }

    /// Render `request` synchronously and apply the outcome.
    ///
    /// # Errors
    ///
    /// Same as [`complete`](Self::complete).
    pub fn render_now(&mut self, request: &RenderRequest) -> Result<Completion, OverlayError> {
        self.complete(request.ticket, request.render())
    }

    fn request(&mut self) -> Option<RenderRequest> {
        let result = self.result.clone()?;
        Some(RenderRequest {
            ticket: self.sequencer.issue(),
            result,
            position: self.position,
            mode: self.mode,
            config: self.config,
        })
    }
}

impl Default for Viewer {
    /// An empty viewer with the default [`OverlayConfig`].
    fn default() -> Self {
        let config = OverlayConfig::default();
        Self {
            config,
            mode: VisualizationMode::default(),
            result: None,
            position: 0,
            sequencer: Sequencer::new(),
            surface: Surface::new(config.surface),
        }
    }
}
