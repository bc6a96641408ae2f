use core::ops::{Add, Neg, Sub};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

/// Where a scroll delta comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollSource {
    /// A direct user drag (touch, trackpad, wheel).
    UserInput,
    /// Animation frames (flings, page animations) or any other non-gesture source.
    Programmatic,
}

/// Priority levels of the [`crate::ScrollOwnershipToken`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MutatePriority {
    #[default]
    Default,
    UserInput,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollDirection {
    Forward,
    Backward,
}

impl ScrollDirection {
    /// `None` for a zero (or NaN) delta.
    pub fn of(delta: f32) -> Option<Self> {
        if delta > 0.0 {
            Some(Self::Forward)
        } else if delta < 0.0 {
            Some(Self::Backward)
        } else {
            None
        }
    }
}

/// A 2-D offset in gesture space (screen pixels, finger direction).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Offset2D {
    pub x: f32,
    pub y: f32,
}

impl Offset2D {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn main_axis(self, orientation: Orientation) -> f32 {
        match orientation {
            Orientation::Horizontal => self.x,
            Orientation::Vertical => self.y,
        }
    }

    pub fn cross_axis(self, orientation: Orientation) -> f32 {
        match orientation {
            Orientation::Horizontal => self.y,
            Orientation::Vertical => self.x,
        }
    }

    /// Builds an offset with `value` on the main axis and zero on the cross axis.
    pub fn on_axis(value: f32, orientation: Orientation) -> Self {
        match orientation {
            Orientation::Horizontal => Self::new(value, 0.0),
            Orientation::Vertical => Self::new(0.0, value),
        }
    }

    /// Replaces non-finite components with zero.
    pub fn sanitized(self) -> Self {
        Self {
            x: finite_or(self.x, 0.0),
            y: finite_or(self.y, 0.0),
        }
    }
}

impl Add for Offset2D {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Offset2D {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Offset2D {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// Release velocity in gesture space, pixels per second.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Velocity2D {
    pub x: f32,
    pub y: f32,
}

impl Velocity2D {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn main_axis(self, orientation: Orientation) -> f32 {
        match orientation {
            Orientation::Horizontal => self.x,
            Orientation::Vertical => self.y,
        }
    }

    pub fn on_axis(value: f32, orientation: Orientation) -> Self {
        match orientation {
            Orientation::Horizontal => Self::new(value, 0.0),
            Orientation::Vertical => Self::new(0.0, value),
        }
    }
}

impl Add for Velocity2D {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Velocity2D {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisiblePageInfo {
    pub index: usize,
    /// Distance (logical px) the pager must scroll to bring this page to its resting position.
    ///
    /// Negative when the page lies before the snapped position, positive when after.
    pub offset_from_snap: f32,
}

/// Read-only snapshot of the pager layout, recomputed by the host on every layout pass.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageLayoutInfo {
    /// Visible pages ordered by index.
    pub visible_pages: Vec<VisiblePageInfo>,
    pub page_count: usize,
    pub page_size: f32,
    pub page_spacing: f32,
    /// Informational. Gesture mapping follows `PagerOptions::reverse_layout`.
    pub reverse_layout: bool,
    /// Fraction of a page the pager is away from the nearest snapped page, in (-1, 1).
    pub current_offset_fraction: f32,
    pub can_scroll_forward: bool,
    pub can_scroll_backward: bool,
}

impl PageLayoutInfo {
    pub fn first_visible(&self) -> Option<VisiblePageInfo> {
        self.visible_pages.first().copied()
    }

    pub fn last_visible(&self) -> Option<VisiblePageInfo> {
        self.visible_pages.last().copied()
    }

    /// `true` when a page-to-page transition is on screen.
    pub fn is_in_transition(&self) -> bool {
        match (self.visible_pages.first(), self.visible_pages.last()) {
            (Some(first), Some(last)) => first.index != last.index,
            _ => false,
        }
    }

    pub fn is_snapped(&self) -> bool {
        self.current_offset_fraction.abs() <= SNAP_EPSILON
    }

    /// Offsets of visible pages, in index order.
    pub fn visible_page_offsets(&self) -> impl Iterator<Item = f32> + '_ {
        self.visible_pages.iter().map(|p| p.offset_from_snap)
    }

    /// Next page in reading order, if it exists.
    pub fn page_after(&self, index: usize) -> Option<usize> {
        let next = index.checked_add(1)?;
        (next < self.page_count).then_some(next)
    }

    /// Previous page in reading order, if it exists.
    pub fn page_before(&self, index: usize) -> Option<usize> {
        index.checked_sub(1)
    }
}

/// Tolerance for `current_offset_fraction` to count as snapped.
pub const SNAP_EPSILON: f32 = 1e-4;

pub(crate) fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}
