use core::ops::RangeInclusive;

use crate::types::finite_or;
use crate::{PageLayoutInfo, PagerSnapshot, ScrollSurface, VisiblePageInfo};

/// The host pager as seen by the engine.
///
/// The engine never writes layout directly. It reads a fresh [`PageLayoutInfo`] at the start
/// of every routing pass and moves the pager only through [`PagerHost::dispatch_raw_delta`].
pub trait PagerHost {
    fn layout_info(&self) -> PageLayoutInfo;

    /// Applies a logical delta (positive = toward the next page) to the pager's raw offset and
    /// returns how much of it was applied.
    fn dispatch_raw_delta(&mut self, delta: f32) -> f32;

    /// Looks up the content surface of `index`; `None` when it is not attached.
    fn surface_mut(&mut self, index: usize) -> Option<&mut dyn ScrollSurface>;
}

/// A single-writer pager model: a continuous scroll position over equally sized pages.
#[derive(Clone, Debug, PartialEq)]
pub struct PagerState {
    page_count: usize,
    page_size: f32,
    page_spacing: f32,
    position: f32,
    reverse_layout: bool,
    beyond_viewport_page_count: usize,
}

impl PagerState {
    pub fn new(page_count: usize, page_size: f32) -> Self {
        Self {
            page_count,
            page_size: finite_or(page_size, 0.0).max(0.0),
            page_spacing: 0.0,
            position: 0.0,
            reverse_layout: false,
            beyond_viewport_page_count: crate::options::DEFAULT_BEYOND_VIEWPORT_PAGE_COUNT,
        }
    }

    pub fn with_page_spacing(mut self, spacing: f32) -> Self {
        self.page_spacing = finite_or(spacing, 0.0).max(0.0);
        self
    }

    /// Reported through [`PageLayoutInfo::reverse_layout`]; keep it equal to
    /// `PagerOptions::reverse_layout`.
    pub fn with_reverse_layout(mut self, reverse_layout: bool) -> Self {
        self.reverse_layout = reverse_layout;
        self
    }

    pub fn with_beyond_viewport_page_count(mut self, count: usize) -> Self {
        self.beyond_viewport_page_count = count;
        self
    }

    pub fn with_position(mut self, position: f32) -> Self {
        self.position = finite_or(position, 0.0).clamp(0.0, self.max_position());
        self
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn page_size(&self) -> f32 {
        self.page_size
    }

    pub fn page_spacing(&self) -> f32 {
        self.page_spacing
    }

    /// Distance between the starts of two consecutive pages.
    pub fn stride(&self) -> f32 {
        self.page_size + self.page_spacing
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn max_position(&self) -> f32 {
        match self.page_count {
            0 => 0.0,
            n => (n - 1) as f32 * self.stride(),
        }
    }

    /// The page closest to the snapped position.
    pub fn current_page(&self) -> usize {
        let stride = self.stride();
        if self.page_count == 0 || stride <= 0.0 {
            return 0;
        }
        let page = (self.position / stride).round();
        (page.max(0.0) as usize).min(self.page_count - 1)
    }

    /// Signed fraction of a page between the position and `current_page`.
    pub fn current_page_offset_fraction(&self) -> f32 {
        let stride = self.stride();
        if stride <= 0.0 {
            return 0.0;
        }
        let fraction = (self.position - self.current_page() as f32 * stride) / stride;
        finite_or(fraction, 0.0)
    }

    pub fn can_scroll_forward(&self) -> bool {
        self.position < self.max_position()
    }

    pub fn can_scroll_backward(&self) -> bool {
        self.position > 0.0
    }

    /// Pages a host should keep materialized around the current one.
    pub fn composed_range(&self) -> Option<RangeInclusive<usize>> {
        if self.page_count == 0 {
            return None;
        }
        let current = self.current_page();
        let start = current.saturating_sub(self.beyond_viewport_page_count);
        let end = current
            .saturating_add(self.beyond_viewport_page_count)
            .min(self.page_count - 1);
        Some(start..=end)
    }

    pub fn layout_info(&self) -> PageLayoutInfo {
        PageLayoutInfo {
            visible_pages: self.visible_pages(),
            page_count: self.page_count,
            page_size: self.page_size,
            page_spacing: self.page_spacing,
            reverse_layout: self.reverse_layout,
            current_offset_fraction: self.current_page_offset_fraction(),
            can_scroll_forward: self.can_scroll_forward(),
            can_scroll_backward: self.can_scroll_backward(),
        }
    }

    fn visible_pages(&self) -> Vec<VisiblePageInfo> {
        if self.page_count == 0 {
            return Vec::new();
        }
        let stride = self.stride();
        if self.page_size <= 0.0 || stride <= 0.0 {
            return vec![VisiblePageInfo {
                index: self.current_page(),
                offset_from_snap: 0.0,
            }];
        }
        let first = ((self.position / stride).floor().max(0.0) as usize).min(self.page_count - 1);
        (first..self.page_count.min(first + 2))
            .map(|index| VisiblePageInfo {
                index,
                offset_from_snap: index as f32 * stride - self.position,
            })
            .filter(|page| page.offset_from_snap.abs() < self.page_size)
            .collect()
    }

    /// Applies a raw delta, clamped to the first and last page.
    pub fn dispatch_raw_delta(&mut self, delta: f32) -> f32 {
        if !delta.is_finite() || delta == 0.0 {
            return 0.0;
        }
        let max = self.max_position();
        let target = self.position + delta;
        if target < 0.0 {
            let consumed = -self.position;
            self.position = 0.0;
            consumed
        } else if target > max {
            let consumed = max - self.position;
            self.position = max;
            consumed
        } else {
            self.position = target;
            delta
        }
    }

    pub fn jump_to_page(&mut self, page: usize) {
        let page = page.min(self.page_count.saturating_sub(1));
        self.position = page as f32 * self.stride();
    }

    /// Changes the page size while keeping the fractional page position.
    pub fn set_page_size(&mut self, page_size: f32) {
        let old_stride = self.stride();
        self.page_size = finite_or(page_size, 0.0).max(0.0);
        let new_stride = self.stride();
        if old_stride > 0.0 {
            self.position = (self.position / old_stride * new_stride).clamp(0.0, self.max_position());
        } else {
            self.position = 0.0;
        }
    }

    pub fn set_page_count(&mut self, page_count: usize) {
        self.page_count = page_count;
        self.position = self.position.clamp(0.0, self.max_position());
    }

    pub fn snapshot(&self) -> PagerSnapshot {
        PagerSnapshot {
            position: self.position,
            page_count: self.page_count,
            page_size: self.page_size,
            page_spacing: self.page_spacing,
        }
    }

    pub fn restore(&mut self, snapshot: PagerSnapshot) {
        self.page_count = snapshot.page_count;
        self.page_size = finite_or(snapshot.page_size, 0.0).max(0.0);
        self.page_spacing = finite_or(snapshot.page_spacing, 0.0).max(0.0);
        self.position = finite_or(snapshot.position, 0.0).clamp(0.0, self.max_position());
    }
}

/// A [`PagerState`] plus the content surfaces attached to its pages.
#[derive(Clone, Debug)]
pub struct Pager<S> {
    state: PagerState,
    surfaces: Vec<Option<S>>,
}

impl<S: ScrollSurface> Pager<S> {
    pub fn new(state: PagerState) -> Self {
        let mut surfaces = Vec::with_capacity(state.page_count());
        surfaces.resize_with(state.page_count(), || None);
        Self { state, surfaces }
    }

    /// Builds a pager with one surface per page.
    pub fn with_surfaces(state: PagerState, surfaces: impl IntoIterator<Item = S>) -> Self {
        let mut pager = Self::new(state);
        for (index, surface) in surfaces.into_iter().enumerate() {
            pager.attach(index, surface);
        }
        pager
    }

    pub fn state(&self) -> &PagerState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut PagerState {
        &mut self.state
    }

    /// Attaches the surface of `index`, returning the previous one. Out-of-range indexes are
    /// ignored.
    pub fn attach(&mut self, index: usize, surface: S) -> Option<S> {
        let slot = self.surfaces.get_mut(index)?;
        slot.replace(surface)
    }

    pub fn detach(&mut self, index: usize) -> Option<S> {
        self.surfaces.get_mut(index)?.take()
    }

    pub fn surface(&self, index: usize) -> Option<&S> {
        self.surfaces.get(index)?.as_ref()
    }

    pub fn surface_at(&mut self, index: usize) -> Option<&mut S> {
        self.surfaces.get_mut(index)?.as_mut()
    }

    /// Resizes the page sequence; surfaces of removed pages are dropped.
    pub fn set_page_count(&mut self, page_count: usize) {
        self.state.set_page_count(page_count);
        self.surfaces.resize_with(page_count, || None);
    }

    /// Drops surfaces outside [`PagerState::composed_range`].
    pub fn detach_outside_composed_range(&mut self) {
        let range = self.state.composed_range();
        for (index, slot) in self.surfaces.iter_mut().enumerate() {
            if !range.as_ref().is_some_and(|r| r.contains(&index)) {
                *slot = None;
            }
        }
    }
}

impl<S: ScrollSurface> PagerHost for Pager<S> {
    fn layout_info(&self) -> PageLayoutInfo {
        self.state.layout_info()
    }

    fn dispatch_raw_delta(&mut self, delta: f32) -> f32 {
        self.state.dispatch_raw_delta(delta)
    }

    fn surface_mut(&mut self, index: usize) -> Option<&mut dyn ScrollSurface> {
        let surface = self.surfaces.get_mut(index)?.as_mut()?;
        Some(surface as &mut dyn ScrollSurface)
    }
}
