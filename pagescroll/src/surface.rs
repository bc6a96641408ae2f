use crate::types::finite_or;
use crate::{Orientation, ScrollSource};

/// Anything that can absorb a main-axis scroll delta and report its edges.
///
/// Deltas are logical: positive scrolls toward the end of the content.
pub trait ScrollSurface {
    /// Consumes the largest prefix of `delta` that fits in the remaining extent.
    ///
    /// Must return exactly the consumed amount: same sign as `delta`, never larger in
    /// magnitude. This is the only mutation point of the surface's scroll offset.
    fn try_consume(&mut self, delta: f32, source: ScrollSource) -> f32;

    fn is_at_start_edge(&self) -> bool;

    fn is_at_end_edge(&self) -> bool;

    /// Moves to `progression` (0 = start edge, 1 = end edge) along `orientation`.
    fn move_to_progression(&mut self, progression: f32, animated: bool, orientation: Orientation);

    fn progression(&self) -> f32;
}

/// A reference content surface: a scroll offset within `[0, max_scroll]`.
///
/// `move_to_progression` is applied immediately; the `animated` flag is ignored.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentSurface {
    offset: f32,
    max_scroll: f32,
    orientation: Orientation,
    snap_viewport: Option<f32>,
}

impl ContentSurface {
    pub fn new(max_scroll: f32) -> Self {
        Self {
            offset: 0.0,
            max_scroll: sanitize_extent(max_scroll),
            orientation: Orientation::Horizontal,
            snap_viewport: None,
        }
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_offset(mut self, offset: f32) -> Self {
        self.offset = finite_or(offset, 0.0).clamp(0.0, self.max_scroll);
        self
    }

    /// Aligns `move_to_progression` results down to a multiple of `viewport`.
    pub fn with_snap_viewport(mut self, viewport: Option<f32>) -> Self {
        self.snap_viewport = viewport.filter(|v| v.is_finite() && *v > 0.0);
        self
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn max_scroll(&self) -> f32 {
        self.max_scroll
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Updates the scrollable extent, e.g. after the document was re-laid out.
    pub fn set_max_scroll(&mut self, max_scroll: f32) {
        self.max_scroll = sanitize_extent(max_scroll);
        self.offset = self.offset.min(self.max_scroll);
    }

    /// Scrolls to the start edge and returns the (non-positive) distance moved.
    pub fn scroll_to_start(&mut self) -> f32 {
        let delta = -self.offset;
        self.offset = 0.0;
        delta
    }

    /// Scrolls to the end edge and returns the (non-negative) distance moved.
    pub fn scroll_to_end(&mut self) -> f32 {
        let delta = self.max_scroll - self.offset;
        self.offset = self.max_scroll;
        delta
    }
}

impl ScrollSurface for ContentSurface {
    fn try_consume(&mut self, delta: f32, _source: ScrollSource) -> f32 {
        if !delta.is_finite() || delta == 0.0 {
            return 0.0;
        }
        let consumed = if delta < 0.0 {
            delta.max(-self.offset)
        } else {
            delta.min(self.max_scroll - self.offset)
        };
        self.offset = (self.offset + consumed).clamp(0.0, self.max_scroll);
        consumed
    }

    fn is_at_start_edge(&self) -> bool {
        self.offset <= 0.0
    }

    fn is_at_end_edge(&self) -> bool {
        self.offset >= self.max_scroll
    }

    fn move_to_progression(&mut self, progression: f32, _animated: bool, orientation: Orientation) {
        if orientation != self.orientation {
            return;
        }
        let progression = finite_or(progression, 0.0).clamp(0.0, 1.0);
        let mut offset = progression * self.max_scroll;
        if let Some(viewport) = self.snap_viewport {
            offset -= offset % viewport;
        }
        self.offset = offset.clamp(0.0, self.max_scroll);
    }

    fn progression(&self) -> f32 {
        if self.max_scroll > 0.0 {
            self.offset / self.max_scroll
        } else {
            0.0
        }
    }
}

fn sanitize_extent(extent: f32) -> f32 {
    finite_or(extent, 0.0).max(0.0)
}
