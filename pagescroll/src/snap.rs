use crate::types::finite_or;
use crate::{PageLayoutInfo, PagerOptions};

/// The two candidate resting offsets around the current position, as logical distances.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnapBounds {
    /// Offset of the closest resting position at or before the current one (`<= 0`).
    pub lower: f32,
    /// Offset of the closest resting position at or after the current one (`>= 0`).
    pub upper: f32,
}

impl SnapBounds {
    pub const ZERO: Self = Self {
        lower: 0.0,
        upper: 0.0,
    };

    /// Whether `offset` is a legal snapping result for these bounds.
    pub fn admits(&self, offset: f32) -> bool {
        offset == self.lower || offset == self.upper || offset == 0.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FinalSnappingItem {
    ClosestItem,
    NextItem,
    PreviousItem,
}

/// Which branch of the closest-item decision produced a target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapReason {
    Velocity,
    CrossedSnapPositionalThreshold,
    CrossedPositionThresholdFraction,
    Closest,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapDecision {
    pub bounds: SnapBounds,
    pub item: FinalSnappingItem,
    pub reason: SnapReason,
    /// Logical distance to travel; one of `bounds.lower`, `bounds.upper` or `0`.
    pub target: f32,
}

/// Picks the page boundary a released pager settles on.
///
/// Inputs are the release velocity (logical, positive toward the next page) and the drag
/// distance accumulated by the gesture (drag space, see [`crate::NestedScrollRouter`]).
#[derive(Clone, Debug, Default)]
pub struct SnapCalculator {
    options: PagerOptions,
}

impl SnapCalculator {
    pub fn new(options: PagerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PagerOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: PagerOptions) {
        self.options = options;
    }

    pub fn classify(&self, velocity: f32) -> FinalSnappingItem {
        let velocity = finite_or(velocity, 0.0);
        if velocity.abs() < self.options.minimum_fling_velocity {
            FinalSnappingItem::ClosestItem
        } else if velocity > 0.0 {
            FinalSnappingItem::NextItem
        } else {
            FinalSnappingItem::PreviousItem
        }
    }

    pub fn search_snapping_bounds(&self, layout: &PageLayoutInfo, drag_delta: f32) -> SnapBounds {
        let mut lower = f32::NEG_INFINITY;
        let mut upper = f32::INFINITY;
        for offset in layout.visible_page_offsets().filter(|o| o.is_finite()) {
            if offset <= 0.0 && offset > lower {
                lower = offset;
            }
            if offset >= 0.0 && offset < upper {
                upper = offset;
            }
        }

        if lower == f32::NEG_INFINITY {
            lower = upper;
        }
        if upper == f32::INFINITY {
            upper = lower;
        }
        if !lower.is_finite() || !upper.is_finite() {
            return SnapBounds::ZERO;
        }

        let dragging = finite_or(drag_delta, 0.0) != 0.0;
        let forward = is_forward(drag_delta);
        if !layout.can_scroll_forward {
            upper = 0.0;
            if dragging && forward {
                lower = 0.0;
            }
        }
        if !layout.can_scroll_backward {
            lower = 0.0;
            if dragging && !forward {
                upper = 0.0;
            }
        }

        ptrace!(lower, upper, "SnapCalculator: bounds");
        SnapBounds { lower, upper }
    }

    pub fn decide(&self, layout: &PageLayoutInfo, velocity: f32, drag_delta: f32) -> SnapDecision {
        let bounds = self.search_snapping_bounds(layout, drag_delta);
        let item = self.classify(velocity);
        let (reason, target) = match item {
            FinalSnappingItem::NextItem => (SnapReason::Velocity, bounds.upper),
            FinalSnappingItem::PreviousItem => (SnapReason::Velocity, bounds.lower),
            FinalSnappingItem::ClosestItem => self.closest(layout.page_size, drag_delta, bounds),
        };

        let target = if !target.is_finite() {
            pwarn!(target, "SnapCalculator: non-finite snap target");
            0.0
        } else if !bounds.admits(target) {
            debug_assert!(
                false,
                "snap target {target} is none of {} / {} / 0",
                bounds.lower, bounds.upper
            );
            pwarn!(target, ?bounds, "SnapCalculator: illegal snap target");
            0.0
        } else {
            target
        };

        pdebug!(?item, ?reason, target, "SnapCalculator: decided");
        SnapDecision {
            bounds,
            item,
            reason,
            target,
        }
    }

    /// Logical distance the pager must travel to settle after a release.
    pub fn calculate_snap_offset(&self, layout: &PageLayoutInfo, velocity: f32, drag_delta: f32) -> f32 {
        self.decide(layout, velocity, drag_delta).target
    }

    /// Final bound for an already computed pair of bounds.
    pub fn calculate_final_snapping_bound(
        &self,
        page_size: f32,
        velocity: f32,
        drag_delta: f32,
        bounds: SnapBounds,
    ) -> f32 {
        match self.classify(velocity) {
            FinalSnappingItem::NextItem => bounds.upper,
            FinalSnappingItem::PreviousItem => bounds.lower,
            FinalSnappingItem::ClosestItem => self.closest(page_size, drag_delta, bounds).1,
        }
    }

    fn closest(&self, page_size: f32, drag_delta: f32, bounds: SnapBounds) -> (SnapReason, f32) {
        let drag_delta = finite_or(drag_delta, 0.0);
        let forward = is_forward(drag_delta);
        let offset = if page_size > 0.0 && page_size.is_finite() {
            drag_delta / page_size
        } else {
            0.0
        };
        let overflow = offset - offset.trunc();
        let position_threshold = self.options.position_threshold_fraction_for(page_size);

        if overflow.abs() > self.options.snap_positional_threshold {
            let target = if forward { bounds.upper } else { bounds.lower };
            (SnapReason::CrossedSnapPositionalThreshold, target)
        } else if offset.abs() >= position_threshold.abs() && offset != 0.0 {
            // Moved on purpose but not far enough: fall back toward where the drag started.
            let target = if forward { bounds.lower } else { bounds.upper };
            (SnapReason::CrossedPositionThresholdFraction, target)
        } else if bounds.lower.abs() < bounds.upper.abs() {
            (SnapReason::Closest, bounds.lower)
        } else {
            (SnapReason::Closest, bounds.upper)
        }
    }
}

/// A drag toward the start (positive drag delta) is backward; anything else counts as forward.
fn is_forward(drag_delta: f32) -> bool {
    finite_or(drag_delta, 0.0) <= 0.0
}
