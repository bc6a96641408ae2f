use crate::{PageLayoutInfo, PagerHost, PagerOptions, ScrollSource, VisiblePageInfo};

/// A routing call stops after this many passes even if every pass made progress.
pub const MAX_ROUTE_PASSES: usize = 8;

/// Consumption breakdown of one routing pass, in drag space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RoutePass {
    pub offered: f32,
    pub first_target: Option<usize>,
    pub consumed_by_first: f32,
    /// Delta offered to the pager after clamping, `0` when the pager step was skipped.
    pub pager_delta: f32,
    pub consumed_by_pager: f32,
    pub second_target: Option<usize>,
    pub consumed_by_second: f32,
    pub remainder: f32,
}

impl RoutePass {
    pub fn consumed(&self) -> f32 {
        self.consumed_by_first + self.consumed_by_pager + self.consumed_by_second
    }
}

/// Result of routing one delta, in drag space.
///
/// `consumed + remainder == offered` up to floating-point rounding.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RouteOutcome {
    pub offered: f32,
    pub consumed: f32,
    pub consumed_by_pager: f32,
    pub remainder: f32,
    pub passes: usize,
}

impl RouteOutcome {
    /// Nothing consumed; the whole (sanitized) delta is left for the caller.
    pub fn untouched(delta: f32) -> Self {
        let delta = if delta.is_finite() { delta } else { 0.0 };
        Self {
            offered: delta,
            remainder: delta,
            ..Self::default()
        }
    }
}

/// Distributes one scroll delta across the visible content surfaces and the pager.
///
/// Deltas are in drag space: positive when the content follows a finger moving toward the
/// start, which pulls the pager toward the previous page. Surfaces and the pager are driven
/// with the negated (logical) value.
///
/// Each pass offers the delta to the leaving page, then to the pager, then to the entering
/// page, and repeats with the remainder while a pass makes progress.
#[derive(Clone, Debug, Default)]
pub struct NestedScrollRouter {
    options: PagerOptions,
}

impl NestedScrollRouter {
    pub fn new(options: PagerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PagerOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: PagerOptions) {
        self.options = options;
    }

    /// Absorbs a user drag before the host's own scrollables see it.
    ///
    /// Only a page transition left mid-way is absorbed; in the steady single-page case the
    /// delta is returned untouched for the post-scroll phase.
    pub fn pre_scroll(
        &self,
        host: &mut dyn PagerHost,
        delta: f32,
        source: ScrollSource,
    ) -> RouteOutcome {
        let layout = host.layout_info();
        if source != ScrollSource::UserInput || !layout.is_in_transition() || layout.is_snapped() {
            return RouteOutcome::untouched(delta);
        }
        self.route(host, delta, source)
    }

    pub fn route(&self, host: &mut dyn PagerHost, delta: f32, source: ScrollSource) -> RouteOutcome {
        self.route_observed(host, delta, source, |_| {})
    }

    /// Like [`NestedScrollRouter::route`], reporting every pass to `on_pass`.
    pub fn route_observed(
        &self,
        host: &mut dyn PagerHost,
        delta: f32,
        source: ScrollSource,
        mut on_pass: impl FnMut(&RoutePass),
    ) -> RouteOutcome {
        if !delta.is_finite() {
            pwarn!(delta, "NestedScrollRouter: non-finite delta treated as no motion");
            return RouteOutcome::untouched(0.0);
        }
        let mut outcome = RouteOutcome::untouched(delta);
        if delta == 0.0 {
            return outcome;
        }

        let mut pending = delta;
        while outcome.passes < MAX_ROUTE_PASSES {
            let pass = self.pass(host, pending, source);
            on_pass(&pass);
            outcome.passes += 1;
            outcome.consumed += pass.consumed();
            outcome.consumed_by_pager += pass.consumed_by_pager;

            let left = pass.remainder;
            if left == 0.0 || left == pending {
                pending = left;
                break;
            }
            pending = left;
        }
        outcome.remainder = pending;

        ptrace!(
            delta,
            consumed = outcome.consumed,
            remainder = outcome.remainder,
            passes = outcome.passes,
            "NestedScrollRouter: routed"
        );
        outcome
    }

    /// Keeps the seam continuous when the leaving page of a visible transition changes size.
    ///
    /// The resized page is scrolled to its end and the distance it moved is routed back
    /// through the pager. Returns the routed outcome, or `None` when nothing had to move.
    pub fn on_document_resized(&self, host: &mut dyn PagerHost, index: usize) -> Option<RouteOutcome> {
        let layout = host.layout_info();
        let first = layout.first_visible()?;
        if !layout.is_in_transition() || first.index != index {
            return None;
        }
        let scrolled = {
            let surface = host.surface_mut(index)?;
            surface.try_consume(f32::MAX, ScrollSource::Programmatic)
        };
        if !scrolled.is_finite() || scrolled <= 0.0 {
            return None;
        }
        pdebug!(index, scrolled, "NestedScrollRouter: leaving page resized");
        Some(self.route(host, scrolled, ScrollSource::Programmatic))
    }

    fn pass(&self, host: &mut dyn PagerHost, delta: f32, source: ScrollSource) -> RoutePass {
        let layout = host.layout_info();
        let mut pass = RoutePass {
            offered: delta,
            ..RoutePass::default()
        };
        let (first, last) = match (layout.first_visible(), layout.last_visible()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                pass.pager_delta = self.pager_delta(&layout, None, delta, source);
                pass.consumed_by_pager = dispatch_to_pager(host, pass.pager_delta);
                pass.remainder = delta - pass.consumed_by_pager;
                return pass;
            }
        };

        if source == ScrollSource::UserInput && layout.visible_pages.len() == 1 {
            self.prepare_entering_page(host, &layout, first.index, delta);
        }

        // The page being scrolled away from goes first.
        let (first_target, second_target) = if delta >= 0.0 {
            (last, first)
        } else {
            (first, last)
        };

        let mut left = delta;
        pass.first_target = Some(first_target.index);
        pass.consumed_by_first = consume_in_surface(host, first_target.index, left, source);
        left -= pass.consumed_by_first;

        pass.pager_delta = self.pager_delta(&layout, Some((first, last)), left, source);
        pass.consumed_by_pager = dispatch_to_pager(host, pass.pager_delta);
        left -= pass.consumed_by_pager;

        pass.second_target = Some(second_target.index);
        pass.consumed_by_second = consume_in_surface(host, second_target.index, left, source);
        left -= pass.consumed_by_second;

        pass.remainder = if left.is_finite() { left } else { 0.0 };
        ptrace!(
            offered = delta,
            first = pass.consumed_by_first,
            pager = pass.consumed_by_pager,
            second = pass.consumed_by_second,
            remainder = pass.remainder,
            "NestedScrollRouter: pass"
        );
        pass
    }

    /// Clamps what the pager may take from `delta`.
    fn pager_delta(
        &self,
        layout: &PageLayoutInfo,
        edges: Option<(VisiblePageInfo, VisiblePageInfo)>,
        delta: f32,
        source: ScrollSource,
    ) -> f32 {
        let page_size = layout.page_size;
        if !page_size.is_finite() || page_size <= 0.0 || delta == 0.0 {
            return 0.0;
        }
        match edges {
            Some((first, last))
                if first.index != last.index
                    && source == ScrollSource::UserInput
                    && !layout.is_snapped() =>
            {
                let min_bound = -(page_size + first.offset_from_snap);
                let max_bound = page_size - last.offset_from_snap;
                if !min_bound.is_finite() || !max_bound.is_finite() {
                    pwarn!(min_bound, max_bound, "NestedScrollRouter: non-finite pager bound");
                    return 0.0;
                }
                if min_bound > max_bound {
                    pwarn!(min_bound, max_bound, "NestedScrollRouter: empty pager bound");
                    return 0.0;
                }
                delta.clamp(min_bound, max_bound)
            }
            _ => delta.clamp(-page_size, page_size),
        }
    }

    /// Moves the neighbor about to enter the viewport to the edge it enters with.
    fn prepare_entering_page(
        &self,
        host: &mut dyn PagerHost,
        layout: &PageLayoutInfo,
        current: usize,
        delta: f32,
    ) {
        let (neighbor, progression) = if delta > 0.0 {
            (layout.page_before(current), 1.0)
        } else {
            (layout.page_after(current), 0.0)
        };
        let Some(neighbor) = neighbor else {
            return;
        };
        let Some(surface) = host.surface_mut(neighbor) else {
            ptrace!(neighbor, "NestedScrollRouter: entering page not attached");
            return;
        };
        let at_entry_edge = if progression > 0.5 {
            surface.is_at_end_edge()
        } else {
            surface.is_at_start_edge()
        };
        if !at_entry_edge {
            pdebug!(neighbor, progression, "NestedScrollRouter: preparing entering page");
            surface.move_to_progression(progression, false, self.options.orientation);
        }
    }
}

fn consume_in_surface(host: &mut dyn PagerHost, index: usize, delta: f32, source: ScrollSource) -> f32 {
    if delta == 0.0 {
        return 0.0;
    }
    let Some(surface) = host.surface_mut(index) else {
        return 0.0;
    };
    let consumed = surface.try_consume(-delta, source);
    -clamp_consumption(-delta, consumed)
}

fn dispatch_to_pager(host: &mut dyn PagerHost, delta: f32) -> f32 {
    if delta == 0.0 {
        return 0.0;
    }
    let consumed = host.dispatch_raw_delta(-delta);
    -clamp_consumption(-delta, consumed)
}

/// Bounds a reported consumption to the range `[0, offered]` (or `[offered, 0]`).
pub(crate) fn clamp_consumption(offered: f32, consumed: f32) -> f32 {
    if !consumed.is_finite() {
        pwarn!(offered, "non-finite consumption treated as none");
        return 0.0;
    }
    let clamped = if offered >= 0.0 {
        consumed.clamp(0.0, offered)
    } else {
        consumed.clamp(offered, 0.0)
    };
    if clamped != consumed {
        pwarn!(offered, consumed, "consumption exceeds offered delta; clamped");
    }
    clamped
}
