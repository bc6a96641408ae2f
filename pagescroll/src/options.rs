use crate::{OptionsError, Orientation};

/// Minimum release velocity (per density unit) for a fling to move to a neighbor page.
pub const DEFAULT_MINIMUM_FLING_VELOCITY: f32 = 400.0;

/// Minimum drag distance (per density unit) that counts as an intentional page move.
pub const DEFAULT_POSITION_THRESHOLD: f32 = 56.0;

pub const DEFAULT_SNAP_POSITIONAL_THRESHOLD: f32 = 0.5;

pub const DEFAULT_BEYOND_VIEWPORT_PAGE_COUNT: usize = 2;

/// Host-supplied configuration of the pager engine.
///
/// All values are in the host's pixel space. Use [`PagerOptions::for_density`] to scale the
/// density-dependent defaults.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PagerOptions {
    /// Release velocities below this (absolute) snap to the closest page instead of flinging.
    pub minimum_fling_velocity: f32,
    /// Fraction of a page a slow drag must cover before the pager moves on, in `0..=1`.
    pub snap_positional_threshold: f32,
    /// Explicit minimum-drag fraction. When `None`, derived from `position_threshold_distance`.
    pub position_threshold_fraction: Option<f32>,
    pub position_threshold_distance: f32,
    pub orientation: Orientation,
    pub reverse_layout: bool,
    /// Pages kept materialized on each side of the current one.
    pub beyond_viewport_page_count: usize,
}

impl Default for PagerOptions {
    fn default() -> Self {
        Self {
            minimum_fling_velocity: DEFAULT_MINIMUM_FLING_VELOCITY,
            snap_positional_threshold: DEFAULT_SNAP_POSITIONAL_THRESHOLD,
            position_threshold_fraction: None,
            position_threshold_distance: DEFAULT_POSITION_THRESHOLD,
            orientation: Orientation::Horizontal,
            reverse_layout: false,
            beyond_viewport_page_count: DEFAULT_BEYOND_VIEWPORT_PAGE_COUNT,
        }
    }
}

impl PagerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults with density-dependent values scaled by `density` (pixels per dp).
    pub fn for_density(density: f32) -> Self {
        let density = if density.is_finite() && density > 0.0 {
            density
        } else {
            1.0
        };
        Self {
            minimum_fling_velocity: DEFAULT_MINIMUM_FLING_VELOCITY * density,
            position_threshold_distance: DEFAULT_POSITION_THRESHOLD * density,
            ..Self::default()
        }
    }

    pub fn with_minimum_fling_velocity(mut self, velocity: f32) -> Self {
        self.minimum_fling_velocity = velocity;
        self
    }

    pub fn with_snap_positional_threshold(mut self, threshold: f32) -> Self {
        self.snap_positional_threshold = threshold;
        self
    }

    pub fn with_position_threshold_fraction(mut self, fraction: Option<f32>) -> Self {
        self.position_threshold_fraction = fraction;
        self
    }

    pub fn with_position_threshold_distance(mut self, distance: f32) -> Self {
        self.position_threshold_distance = distance;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_reverse_layout(mut self, reverse_layout: bool) -> Self {
        self.reverse_layout = reverse_layout;
        self
    }

    pub fn with_beyond_viewport_page_count(mut self, count: usize) -> Self {
        self.beyond_viewport_page_count = count;
        self
    }

    /// Checks every knob; the engine assumes validated options.
    pub fn validate(&self) -> Result<(), OptionsError> {
        let finite = [
            ("minimum_fling_velocity", self.minimum_fling_velocity),
            ("snap_positional_threshold", self.snap_positional_threshold),
            ("position_threshold_distance", self.position_threshold_distance),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(OptionsError::NonFiniteValue { field });
            }
        }
        if !(0.0..=1.0).contains(&self.snap_positional_threshold) {
            return Err(OptionsError::SnapPositionalThresholdOutOfRange(
                self.snap_positional_threshold,
            ));
        }
        if self.minimum_fling_velocity <= 0.0 {
            return Err(OptionsError::NonPositiveMinimumFlingVelocity(
                self.minimum_fling_velocity,
            ));
        }
        if let Some(fraction) = self.position_threshold_fraction {
            if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
                return Err(OptionsError::InvalidPositionThresholdFraction(fraction));
            }
        }
        Ok(())
    }

    /// Minimum fraction of `page_size` a drag must cover to count as intentional.
    pub fn position_threshold_fraction_for(&self, page_size: f32) -> f32 {
        if let Some(fraction) = self.position_threshold_fraction {
            return fraction;
        }
        if page_size.is_nan() || page_size <= 0.0 {
            return 0.0;
        }
        let min_threshold = self.position_threshold_distance.min(page_size / 2.0);
        min_threshold / page_size
    }
}
