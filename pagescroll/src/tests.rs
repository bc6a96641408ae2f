use crate::*;

use proptest::prelude::*;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        debug_assert!(start < end_exclusive);
        start + (self.next_u64() % (end_exclusive - start) as u64) as usize
    }

    fn gen_f32(&mut self, start: f32, end: f32) -> f32 {
        let unit = (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32;
        start + (end - start) * unit
    }
}

fn flat_pager(page_count: usize, page_size: f32, position: f32) -> Pager<ContentSurface> {
    let state = PagerState::new(page_count, page_size).with_position(position);
    Pager::with_surfaces(state, (0..page_count).map(|_| ContentSurface::new(0.0)))
}

fn two_page_layout(first: f32, last: f32) -> PageLayoutInfo {
    PageLayoutInfo {
        visible_pages: vec![
            VisiblePageInfo {
                index: 0,
                offset_from_snap: first,
            },
            VisiblePageInfo {
                index: 1,
                offset_from_snap: last,
            },
        ],
        page_count: 2,
        page_size: 1000.0,
        page_spacing: 0.0,
        reverse_layout: false,
        current_offset_fraction: -first / 1000.0,
        can_scroll_forward: true,
        can_scroll_backward: true,
    }
}

fn assert_close(a: f32, b: f32) {
    assert!((a - b).abs() <= 1e-3, "{a} != {b}");
}

/// A surface that reports twice what it was offered.
#[derive(Clone, Copy, Debug, Default)]
struct GreedySurface {
    offers: usize,
}

impl ScrollSurface for GreedySurface {
    fn try_consume(&mut self, delta: f32, _source: ScrollSource) -> f32 {
        self.offers += 1;
        delta * 2.0
    }

    fn is_at_start_edge(&self) -> bool {
        false
    }

    fn is_at_end_edge(&self) -> bool {
        false
    }

    fn move_to_progression(&mut self, _progression: f32, _animated: bool, _orientation: Orientation) {}

    fn progression(&self) -> f32 {
        0.5
    }
}

#[test]
fn options_defaults_and_density() {
    let options = PagerOptions::default();
    assert_eq!(options.minimum_fling_velocity, 400.0);
    assert_eq!(options.snap_positional_threshold, 0.5);
    assert_eq!(options.position_threshold_fraction, None);
    assert_eq!(options.orientation, Orientation::Horizontal);
    assert_eq!(options.beyond_viewport_page_count, 2);
    assert!(options.validate().is_ok());

    let dense = PagerOptions::for_density(2.0);
    assert_eq!(dense.minimum_fling_velocity, 800.0);
    assert_eq!(dense.position_threshold_distance, 112.0);
    assert_eq!(PagerOptions::for_density(f32::NAN), PagerOptions::default());
}

#[test]
fn options_validate_rejects_bad_values() {
    let bad = PagerOptions::default().with_snap_positional_threshold(1.5);
    assert_eq!(
        bad.validate(),
        Err(OptionsError::SnapPositionalThresholdOutOfRange(1.5))
    );

    let bad = PagerOptions::default().with_minimum_fling_velocity(0.0);
    assert_eq!(
        bad.validate(),
        Err(OptionsError::NonPositiveMinimumFlingVelocity(0.0))
    );

    let bad = PagerOptions::default().with_position_threshold_fraction(Some(-0.1));
    assert_eq!(
        bad.validate(),
        Err(OptionsError::InvalidPositionThresholdFraction(-0.1))
    );

    let bad = PagerOptions::default().with_position_threshold_distance(f32::INFINITY);
    assert_eq!(
        bad.validate(),
        Err(OptionsError::NonFiniteValue {
            field: "position_threshold_distance"
        })
    );
}

#[test]
fn position_threshold_fraction_is_derived_from_page_size() {
    let options = PagerOptions::default();
    assert_close(options.position_threshold_fraction_for(1000.0), 0.056);
    // Small pages cap the threshold at half a page.
    assert_close(options.position_threshold_fraction_for(80.0), 0.5);
    assert_eq!(options.position_threshold_fraction_for(0.0), 0.0);
    assert_eq!(options.position_threshold_fraction_for(f32::NAN), 0.0);

    let fixed = options.with_position_threshold_fraction(Some(0.2));
    assert_eq!(fixed.position_threshold_fraction_for(1000.0), 0.2);
}

#[test]
fn pager_state_layout_reports_visible_pages() {
    let state = PagerState::new(3, 1000.0).with_position(200.0);
    let layout = state.layout_info();
    assert_eq!(
        layout.visible_pages,
        vec![
            VisiblePageInfo {
                index: 0,
                offset_from_snap: -200.0
            },
            VisiblePageInfo {
                index: 1,
                offset_from_snap: 800.0
            },
        ]
    );
    assert!(layout.is_in_transition());
    assert!(!layout.is_snapped());
    assert_close(layout.current_offset_fraction, 0.2);
    assert!(layout.can_scroll_forward);
    assert!(layout.can_scroll_backward);

    let snapped = PagerState::new(3, 1000.0).with_position(2000.0).layout_info();
    assert_eq!(snapped.visible_pages.len(), 1);
    assert_eq!(snapped.visible_pages[0].index, 2);
    assert!(snapped.is_snapped());
    assert!(!snapped.can_scroll_forward);
}

#[test]
fn pager_state_spacing_changes_stride() {
    let state = PagerState::new(3, 1000.0)
        .with_page_spacing(20.0)
        .with_position(1020.0);
    assert_eq!(state.stride(), 1020.0);
    assert_eq!(state.max_position(), 2040.0);
    assert_eq!(state.current_page(), 1);
    assert_eq!(state.current_page_offset_fraction(), 0.0);
}

#[test]
fn pager_state_dispatch_clamps_to_page_range() {
    let mut state = PagerState::new(3, 1000.0);
    assert_eq!(state.dispatch_raw_delta(-50.0), 0.0);
    assert_eq!(state.dispatch_raw_delta(1500.0), 1500.0);
    assert_eq!(state.dispatch_raw_delta(900.0), 500.0);
    assert_eq!(state.position(), 2000.0);
    assert_eq!(state.dispatch_raw_delta(f32::NAN), 0.0);
    assert_eq!(state.position(), 2000.0);
}

#[test]
fn pager_state_composed_range_and_jump() {
    let mut state = PagerState::new(10, 500.0).with_beyond_viewport_page_count(1);
    assert_eq!(state.composed_range(), Some(0..=1));
    state.jump_to_page(5);
    assert_eq!(state.position(), 2500.0);
    assert_eq!(state.composed_range(), Some(4..=6));
    state.jump_to_page(99);
    assert_eq!(state.current_page(), 9);
    assert_eq!(PagerState::new(0, 500.0).composed_range(), None);
}

#[test]
fn pager_state_resize_keeps_fraction() {
    let mut state = PagerState::new(4, 1000.0).with_position(1500.0);
    state.set_page_size(500.0);
    assert_eq!(state.position(), 750.0);
    assert_close(state.current_page_offset_fraction(), -0.5);

    state.set_page_count(2);
    assert_eq!(state.position(), 500.0);
}

#[test]
fn pager_snapshot_restore() {
    let state = PagerState::new(5, 800.0)
        .with_page_spacing(16.0)
        .with_position(1632.0);
    let snapshot = state.snapshot();
    assert_eq!(snapshot.nearest_page(), 2);

    let mut restored = PagerState::new(0, 0.0);
    restored.restore(snapshot);
    assert_eq!(restored.position(), 1632.0);
    assert_eq!(restored.page_count(), 5);
    assert_eq!(restored.current_page(), 2);

    let mut clamped = PagerState::new(0, 0.0);
    clamped.restore(PagerSnapshot {
        position: 1.0e9,
        ..snapshot
    });
    assert_eq!(clamped.position(), clamped.max_position());
}

#[test]
fn pager_attach_detach_and_composed_cleanup() {
    let state = PagerState::new(6, 100.0)
        .with_beyond_viewport_page_count(1)
        .with_position(300.0);
    let mut pager = Pager::with_surfaces(state, (0..6).map(|i| ContentSurface::new(i as f32)));
    assert_eq!(pager.surface(4).map(ContentSurface::max_scroll), Some(4.0));

    pager.detach_outside_composed_range();
    let attached: Vec<usize> = (0..6).filter(|&i| pager.surface(i).is_some()).collect();
    assert_eq!(attached, vec![2, 3, 4]);

    assert!(pager.attach(0, ContentSurface::new(9.0)).is_none());
    assert_eq!(pager.detach(0).map(|s| s.max_scroll()), Some(9.0));
    assert!(pager.attach(42, ContentSurface::new(1.0)).is_none());

    pager.set_page_count(3);
    assert!(pager.surface(4).is_none());
}

#[test]
fn content_surface_consumes_exactly_to_edges() {
    let mut surface = ContentSurface::new(300.0).with_offset(250.0);
    assert_eq!(surface.try_consume(100.0, ScrollSource::UserInput), 50.0);
    assert!(surface.is_at_end_edge());
    assert_eq!(surface.try_consume(10.0, ScrollSource::UserInput), 0.0);
    assert_eq!(surface.try_consume(-400.0, ScrollSource::UserInput), -300.0);
    assert!(surface.is_at_start_edge());
    assert_eq!(surface.try_consume(f32::NAN, ScrollSource::UserInput), 0.0);

    assert_eq!(surface.scroll_to_end(), 300.0);
    assert_eq!(surface.scroll_to_start(), -300.0);
}

#[test]
fn content_surface_progression() {
    let mut surface = ContentSurface::new(1000.0).with_snap_viewport(Some(300.0));
    surface.move_to_progression(1.0, false, Orientation::Horizontal);
    assert_eq!(surface.offset(), 900.0);
    assert_close(surface.progression(), 0.9);

    // Other axis: ignored.
    surface.move_to_progression(0.0, true, Orientation::Vertical);
    assert_eq!(surface.offset(), 900.0);

    surface.set_max_scroll(500.0);
    assert_eq!(surface.offset(), 500.0);
    assert_eq!(ContentSurface::new(0.0).progression(), 0.0);
}

#[test]
fn ownership_user_input_preempts_default() {
    let mut token = ScrollOwnershipToken::new();
    let fling = token.try_acquire(MutatePriority::Default).unwrap();
    assert!(token.is_owned_by(fling));

    let drag = token.try_acquire(MutatePriority::UserInput).unwrap();
    assert!(!token.is_owned_by(fling));
    assert!(token.is_owned_by(drag));
    assert_ne!(fling.id(), drag.id());

    assert_eq!(
        token.try_acquire(MutatePriority::Default),
        Err(OwnershipError::Busy {
            held: MutatePriority::UserInput,
            requested: MutatePriority::Default,
        })
    );

    assert!(!token.release(fling));
    assert!(token.is_held());
    assert!(token.release(drag));
    assert!(!token.is_held());
    assert!(token.try_acquire(MutatePriority::Default).is_ok());
}

#[test]
fn ownership_equal_priority_preempts() {
    let mut token = ScrollOwnershipToken::new();
    let a = token.try_acquire(MutatePriority::UserInput).unwrap();
    let b = token.try_acquire(MutatePriority::UserInput).unwrap();
    assert!(!token.is_owned_by(a));
    assert_eq!(token.current(), Some(b));
}

#[test]
fn router_clamps_pager_to_visible_transition() {
    let mut pager = flat_pager(2, 1000.0, 200.0);
    let router = NestedScrollRouter::default();

    let mut passes = Vec::new();
    let outcome = router.route_observed(&mut pager, 300.0, ScrollSource::UserInput, |pass| {
        passes.push(*pass)
    });

    assert_eq!(passes[0].first_target, Some(1));
    assert_eq!(passes[0].consumed_by_first, 0.0);
    assert_eq!(passes[0].pager_delta, 200.0);
    assert_eq!(passes[0].consumed_by_pager, 200.0);
    assert_eq!(passes[0].remainder, 100.0);
    // The remainder is offered once more, then reported back.
    assert_eq!(passes[1].offered, 100.0);
    assert_eq!(passes.len(), 2);

    assert_eq!(outcome.consumed, 200.0);
    assert_eq!(outcome.remainder, 100.0);
    assert_eq!(pager.state().position(), 0.0);
}

#[test]
fn router_offers_remainder_to_surface_at_seam() {
    let state = PagerState::new(2, 1000.0).with_position(200.0);
    let mut pager = Pager::new(state);
    pager.attach(0, ContentSurface::new(500.0).with_offset(500.0));
    pager.attach(1, ContentSurface::new(500.0));

    let router = NestedScrollRouter::default();
    let outcome = router.route(&mut pager, 300.0, ScrollSource::UserInput);

    assert_eq!(outcome.consumed, 300.0);
    assert_eq!(outcome.consumed_by_pager, 200.0);
    assert_eq!(outcome.remainder, 0.0);
    assert_eq!(pager.surface(0).map(ContentSurface::offset), Some(400.0));
    assert_eq!(pager.surface(1).map(ContentSurface::offset), Some(0.0));
}

#[test]
fn router_leaving_page_scrolls_before_pager() {
    let state = PagerState::new(3, 1000.0);
    let mut pager = Pager::new(state);
    pager.attach(0, ContentSurface::new(150.0));
    pager.attach(1, ContentSurface::new(400.0));

    let router = NestedScrollRouter::default();
    let outcome = router.route(&mut pager, -250.0, ScrollSource::UserInput);

    assert_eq!(outcome.consumed, -250.0);
    assert_eq!(pager.surface(0).map(ContentSurface::offset), Some(150.0));
    assert_eq!(pager.state().position(), 100.0);
    assert_eq!(outcome.consumed_by_pager, -100.0);
}

#[test]
fn router_prepares_entering_neighbor() {
    let state = PagerState::new(3, 1000.0).with_position(1000.0);
    let mut pager = Pager::new(state);
    pager.attach(0, ContentSurface::new(500.0));
    pager.attach(1, ContentSurface::new(0.0));
    pager.attach(2, ContentSurface::new(500.0).with_offset(300.0));
    let router = NestedScrollRouter::default();

    router.route(&mut pager, -10.0, ScrollSource::UserInput);
    assert_eq!(pager.surface(2).map(ContentSurface::offset), Some(0.0));
    assert_eq!(pager.state().position(), 1010.0);

    pager.state_mut().jump_to_page(1);
    router.route(&mut pager, 10.0, ScrollSource::UserInput);
    assert_eq!(pager.surface(0).map(ContentSurface::offset), Some(500.0));
    assert_eq!(pager.state().position(), 990.0);
}

#[test]
fn router_programmatic_deltas_skip_neighbor_preparation() {
    let state = PagerState::new(3, 1000.0).with_position(1000.0);
    let mut pager = Pager::new(state);
    pager.attach(2, ContentSurface::new(500.0).with_offset(300.0));
    let router = NestedScrollRouter::default();

    let outcome = router.route(&mut pager, -10.0, ScrollSource::Programmatic);
    assert_eq!(outcome.consumed, -10.0);
    assert_eq!(pager.surface(2).map(ContentSurface::offset), Some(300.0));
}

#[test]
fn router_missing_surfaces_consume_nothing() {
    let mut pager: Pager<ContentSurface> = Pager::new(PagerState::new(2, 1000.0));
    let router = NestedScrollRouter::default();
    let outcome = router.route(&mut pager, -50.0, ScrollSource::UserInput);
    assert_eq!(outcome.consumed, -50.0);
    assert_eq!(pager.state().position(), 50.0);
}

#[test]
fn router_zero_delta_at_snapped_rest_is_noop() {
    let mut pager = flat_pager(3, 1000.0, 1000.0);
    let before = pager.state().clone();
    let router = NestedScrollRouter::default();

    let outcome = router.route(&mut pager, 0.0, ScrollSource::UserInput);
    assert_eq!(outcome, RouteOutcome::untouched(0.0));
    assert_eq!(outcome.passes, 0);
    assert_eq!(pager.state(), &before);
}

#[test]
fn router_non_finite_delta_is_no_motion() {
    let mut pager = flat_pager(3, 1000.0, 500.0);
    let router = NestedScrollRouter::default();
    for delta in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
        let outcome = router.route(&mut pager, delta, ScrollSource::UserInput);
        assert_eq!(outcome.consumed, 0.0);
        assert_eq!(outcome.remainder, 0.0);
        assert_eq!(pager.state().position(), 500.0);
    }
}

#[test]
fn router_degenerate_page_size_skips_pager() {
    let mut pager = flat_pager(3, 0.0, 0.0);
    let router = NestedScrollRouter::default();
    let outcome = router.route(&mut pager, -40.0, ScrollSource::UserInput);
    assert_eq!(outcome.consumed_by_pager, 0.0);
    assert_eq!(outcome.remainder, -40.0);
    assert_eq!(outcome.passes, 1);
}

/// Reports a NaN offset for its first visible page.
struct CorruptLayoutHost(Pager<ContentSurface>);

impl PagerHost for CorruptLayoutHost {
    fn layout_info(&self) -> PageLayoutInfo {
        let mut layout = self.0.layout_info();
        if let Some(first) = layout.visible_pages.first_mut() {
            first.offset_from_snap = f32::NAN;
        }
        layout
    }

    fn dispatch_raw_delta(&mut self, delta: f32) -> f32 {
        self.0.dispatch_raw_delta(delta)
    }

    fn surface_mut(&mut self, index: usize) -> Option<&mut dyn ScrollSurface> {
        self.0.surface_mut(index)
    }
}

#[test]
fn router_non_finite_layout_offset_keeps_pager_still() {
    let mut host = CorruptLayoutHost(flat_pager(2, 1000.0, 200.0));
    let router = NestedScrollRouter::default();

    let outcome = router.route(&mut host, 300.0, ScrollSource::UserInput);
    assert_eq!(outcome.consumed_by_pager, 0.0);
    assert_eq!(outcome.consumed, 0.0);
    assert_eq!(outcome.remainder, 300.0);
    assert_eq!(host.0.state().position(), 200.0);

    // Programmatic deltas are bounded by the page size alone.
    let outcome = router.route(&mut host, -100.0, ScrollSource::Programmatic);
    assert_eq!(outcome.consumed_by_pager, -100.0);
    assert_eq!(host.0.state().position(), 300.0);
}

#[test]
fn router_clamps_over_reporting_surface() {
    let state = PagerState::new(2, 1000.0);
    let mut pager = Pager::with_surfaces(state, [GreedySurface::default(), GreedySurface::default()]);
    let router = NestedScrollRouter::default();

    let outcome = router.route(&mut pager, -120.0, ScrollSource::UserInput);
    assert!(pager.surface(0).is_some_and(|s| s.offers == 1));
    assert_eq!(outcome.consumed, -120.0);
    assert_eq!(outcome.remainder, 0.0);
    assert_eq!(pager.state().position(), 0.0);
}

#[test]
fn router_pre_scroll_only_absorbs_transitions() {
    let router = NestedScrollRouter::default();

    let mut snapped = flat_pager(3, 1000.0, 1000.0);
    let outcome = router.pre_scroll(&mut snapped, -30.0, ScrollSource::UserInput);
    assert_eq!(outcome.consumed, 0.0);
    assert_eq!(outcome.remainder, -30.0);
    assert_eq!(snapped.state().position(), 1000.0);

    let mut moving = flat_pager(3, 1000.0, 1200.0);
    let outcome = router.pre_scroll(&mut moving, -30.0, ScrollSource::UserInput);
    assert_eq!(outcome.consumed, -30.0);
    assert_eq!(moving.state().position(), 1230.0);

    let outcome = router.pre_scroll(&mut moving, -30.0, ScrollSource::Programmatic);
    assert_eq!(outcome.consumed, 0.0);
}

#[test]
fn router_document_resize_keeps_leaving_page_at_end() {
    let state = PagerState::new(2, 1000.0).with_position(300.0);
    let mut pager = Pager::new(state);
    pager.attach(0, ContentSurface::new(1000.0).with_offset(1000.0));
    pager.attach(1, ContentSurface::new(1000.0));
    let router = NestedScrollRouter::default();

    assert_eq!(router.on_document_resized(&mut pager, 1), None);
    assert_eq!(router.on_document_resized(&mut pager, 0), None);

    if let Some(surface) = pager.surface_at(0) {
        surface.set_max_scroll(1200.0);
    }
    let outcome = router.on_document_resized(&mut pager, 0);
    assert_eq!(outcome.map(|o| o.consumed), Some(200.0));
    assert_eq!(pager.surface(0).map(ContentSurface::offset), Some(1200.0));
    assert_eq!(pager.state().position(), 100.0);
}

#[test]
fn router_random_drags_conserve_delta() {
    let mut rng = Lcg::new(0x5eed);
    let router = NestedScrollRouter::default();
    for _ in 0..50 {
        let page_count = rng.gen_range_usize(1, 6);
        let state = PagerState::new(page_count, 800.0).with_position(rng.gen_f32(0.0, 4000.0));
        let mut pager = Pager::with_surfaces(
            state,
            (0..page_count).map(|_| {
                let max = rng.gen_f32(0.0, 1200.0);
                ContentSurface::new(max).with_offset(rng.gen_f32(0.0, max))
            }),
        );
        let mut offered = 0.0f64;
        let mut accounted = 0.0f64;
        for _ in 0..40 {
            let delta = rng.gen_f32(-400.0, 400.0);
            let outcome = router.route(&mut pager, delta, ScrollSource::UserInput);
            offered += delta as f64;
            accounted += (outcome.consumed + outcome.remainder) as f64;
            assert!(pager.state().position() >= 0.0);
            assert!(pager.state().position() <= pager.state().max_position());
        }
        assert!((offered - accounted).abs() < 0.05, "{offered} vs {accounted}");
    }
}

#[test]
fn snap_release_velocity_above_threshold_picks_upper() {
    let calculator = SnapCalculator::default();
    let layout = PagerState::new(3, 1000.0).with_position(200.0).layout_info();
    let bounds = calculator.search_snapping_bounds(&layout, -200.0);
    assert_eq!(bounds, SnapBounds { lower: -200.0, upper: 800.0 });

    for drag in [-200.0, 0.0, 350.0] {
        let decision = calculator.decide(&layout, 500.0, drag);
        assert_eq!(decision.item, FinalSnappingItem::NextItem);
        assert_eq!(decision.target, 800.0);
    }
    assert_eq!(calculator.calculate_snap_offset(&layout, -500.0, 0.0), -200.0);
}

#[test]
fn snap_closest_item_branches() {
    let calculator = SnapCalculator::default();

    let layout = two_page_layout(-600.0, 400.0);
    let decision = calculator.decide(&layout, 0.0, -600.0);
    assert_eq!(decision.reason, SnapReason::CrossedSnapPositionalThreshold);
    assert_eq!(decision.target, 400.0);

    let layout = two_page_layout(-100.0, 900.0);
    let decision = calculator.decide(&layout, 100.0, -100.0);
    assert_eq!(decision.reason, SnapReason::CrossedPositionThresholdFraction);
    assert_eq!(decision.target, -100.0);

    let layout = two_page_layout(-30.0, 970.0);
    let decision = calculator.decide(&layout, 0.0, -30.0);
    assert_eq!(decision.reason, SnapReason::Closest);
    assert_eq!(decision.target, -30.0);

    let layout = two_page_layout(-700.0, 300.0);
    let decision = calculator.decide(&layout, 0.0, 0.0);
    assert_eq!(decision.reason, SnapReason::Closest);
    assert_eq!(decision.target, 300.0);
}

#[test]
fn snap_backward_drag_mirrors_forward() {
    let calculator = SnapCalculator::default();
    let layout = two_page_layout(-400.0, 600.0);
    // Dragged 600 back from page 1.
    assert_eq!(calculator.calculate_snap_offset(&layout, 0.0, 600.0), -400.0);
    // Dragged 100 back from page 1: undershoot, return to it.
    let layout = two_page_layout(-900.0, 100.0);
    assert_eq!(calculator.calculate_snap_offset(&layout, 0.0, 100.0), 100.0);
}

#[test]
fn snap_bounds_mirror_missing_side() {
    let calculator = SnapCalculator::default();
    let mut layout = two_page_layout(-50.0, 950.0);
    layout.visible_pages.truncate(1);
    let bounds = calculator.search_snapping_bounds(&layout, 0.0);
    assert_eq!(bounds, SnapBounds { lower: -50.0, upper: -50.0 });

    layout.visible_pages.clear();
    assert_eq!(calculator.search_snapping_bounds(&layout, 0.0), SnapBounds::ZERO);
    assert_eq!(calculator.calculate_snap_offset(&layout, 10_000.0, 0.0), 0.0);
}

#[test]
fn snap_edges_are_dead_stops() {
    let calculator = SnapCalculator::default();
    let mut layout = two_page_layout(-300.0, 700.0);
    layout.can_scroll_forward = false;

    let pushing = calculator.search_snapping_bounds(&layout, -10.0);
    assert_eq!(pushing, SnapBounds::ZERO);
    assert_eq!(calculator.calculate_snap_offset(&layout, 5000.0, -10.0), 0.0);

    let leaving = calculator.search_snapping_bounds(&layout, 10.0);
    assert_eq!(leaving, SnapBounds { lower: -300.0, upper: 0.0 });

    layout.can_scroll_forward = true;
    layout.can_scroll_backward = false;
    assert_eq!(calculator.search_snapping_bounds(&layout, 10.0), SnapBounds::ZERO);
    assert_eq!(
        calculator.search_snapping_bounds(&layout, -10.0),
        SnapBounds { lower: 0.0, upper: 700.0 }
    );
}

#[test]
fn snap_non_finite_inputs_settle_closest() {
    let calculator = SnapCalculator::default();
    let layout = two_page_layout(-100.0, 900.0);
    assert_eq!(calculator.classify(f32::NAN), FinalSnappingItem::ClosestItem);
    assert_eq!(calculator.calculate_snap_offset(&layout, f32::NAN, f32::NAN), -100.0);
    assert_eq!(calculator.classify(f32::INFINITY), FinalSnappingItem::ClosestItem);
}

#[test]
fn snap_final_bound_for_explicit_bounds() {
    let calculator = SnapCalculator::new(PagerOptions::default().with_minimum_fling_velocity(100.0));
    let bounds = SnapBounds { lower: -10.0, upper: 90.0 };
    assert_eq!(calculator.calculate_final_snapping_bound(100.0, 150.0, -10.0, bounds), 90.0);
    assert_eq!(calculator.calculate_final_snapping_bound(100.0, -150.0, -10.0, bounds), -10.0);
    assert_eq!(calculator.calculate_final_snapping_bound(100.0, 0.0, -70.0, bounds), 90.0);
    assert_eq!(calculator.calculate_final_snapping_bound(0.0, 0.0, -70.0, bounds), -10.0);
}

fn arb_layout() -> impl Strategy<Value = PageLayoutInfo> {
    (
        1.0f32..100_000.0,
        0.0f32..1.0,
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(page_size, fraction, two_visible, forward, backward)| {
            let first = -fraction * page_size;
            let mut visible_pages = vec![VisiblePageInfo {
                index: 0,
                offset_from_snap: first,
            }];
            if two_visible {
                visible_pages.push(VisiblePageInfo {
                    index: 1,
                    offset_from_snap: first + page_size,
                });
            }
            PageLayoutInfo {
                visible_pages,
                page_count: 2,
                page_size,
                page_spacing: 0.0,
                reverse_layout: false,
                current_offset_fraction: fraction,
                can_scroll_forward: forward,
                can_scroll_backward: backward,
            }
        })
}

proptest! {
    #[test]
    fn snap_target_is_always_a_bound(
        layout in arb_layout(),
        velocity in -5000.0f32..5000.0,
        drag in -3.0f32..3.0,
    ) {
        let calculator = SnapCalculator::default();
        let drag = drag * layout.page_size;
        let decision = calculator.decide(&layout, velocity, drag);
        prop_assert!(decision.bounds.admits(decision.target));
        prop_assert!(decision.bounds.lower <= 0.0);
        prop_assert!(decision.bounds.upper >= 0.0 || decision.bounds.upper == decision.bounds.lower);
        if decision.item == FinalSnappingItem::NextItem {
            prop_assert_eq!(decision.target, decision.bounds.upper);
        }
    }

    #[test]
    fn snap_thresholds_are_independent_across_page_sizes(
        exponent in 0.0f32..6.0,
        drag_fraction in -0.49f32..0.49,
        positional in 0.0f32..1.0,
    ) {
        let page_size = 10.0f32.powf(exponent);
        let position = -drag_fraction * page_size;
        let layout = PagerState::new(2, page_size)
            .with_position(position.max(0.0))
            .layout_info();
        let calculator = SnapCalculator::new(
            PagerOptions::default().with_snap_positional_threshold(positional),
        );
        let decision = calculator.decide(&layout, 0.0, drag_fraction * page_size);
        prop_assert!(decision.bounds.admits(decision.target));
        if drag_fraction.abs() > positional + 1e-4 {
            prop_assert_eq!(decision.reason, SnapReason::CrossedSnapPositionalThreshold);
        }
    }

    #[test]
    fn routing_conserves_delta_and_never_over_consumes(
        position in 0.0f32..3000.0,
        extents in prop::collection::vec((0.0f32..1500.0, 0.0f32..1.0), 4),
        deltas in prop::collection::vec(-600.0f32..600.0, 1..30),
        user_input in any::<bool>(),
    ) {
        let state = PagerState::new(4, 1000.0).with_position(position);
        let mut pager = Pager::with_surfaces(
            state,
            extents.iter().map(|&(max, at)| ContentSurface::new(max).with_offset(max * at)),
        );
        let router = NestedScrollRouter::default();
        let source = if user_input { ScrollSource::UserInput } else { ScrollSource::Programmatic };

        for delta in deltas {
            let mut passes = Vec::new();
            let outcome = router.route_observed(&mut pager, delta, source, |p| passes.push(*p));
            prop_assert!((outcome.consumed + outcome.remainder - delta).abs() < 1e-2);
            prop_assert!(outcome.passes <= MAX_ROUTE_PASSES);
            for pass in passes {
                prop_assert!(pass.consumed_by_first.abs() <= pass.offered.abs());
                prop_assert!(pass.consumed_by_first * pass.offered >= 0.0);
                prop_assert!(pass.consumed_by_pager.abs() <= pass.pager_delta.abs());
                let for_second = pass.offered - pass.consumed_by_first - pass.consumed_by_pager;
                prop_assert!(pass.consumed_by_second.abs() <= for_second.abs() + 1e-3);
            }
        }
    }

    #[test]
    fn forward_drags_never_pass_the_last_page(
        page_count in 1usize..6,
        deltas in prop::collection::vec(-900.0f32..0.0, 1..20),
    ) {
        let state = PagerState::new(page_count, 500.0);
        let max = state.max_position();
        let mut pager = Pager::with_surfaces(state.with_position(max), (0..page_count).map(|_| ContentSurface::new(0.0)));
        prop_assert!(!pager.layout_info().can_scroll_forward);
        let router = NestedScrollRouter::default();
        for delta in deltas {
            router.route(&mut pager, delta, ScrollSource::UserInput);
            router.route(&mut pager, delta, ScrollSource::Programmatic);
            prop_assert_eq!(pager.state().position(), max);
        }
    }

    #[test]
    fn zero_delta_on_snapped_page_changes_nothing(page in 0usize..5, max in 0.0f32..1000.0, at in 0.0f32..1.0) {
        let state = PagerState::new(5, 700.0).with_position(page as f32 * 700.0);
        let mut pager = Pager::with_surfaces(
            state,
            (0..5).map(|_| ContentSurface::new(max).with_offset(max * at)),
        );
        let before_state = pager.state().clone();
        let before_surfaces: Vec<ContentSurface> = (0..5).filter_map(|i| pager.surface(i).copied()).collect();

        let router = NestedScrollRouter::default();
        router.route(&mut pager, 0.0, ScrollSource::UserInput);

        let after_surfaces: Vec<ContentSurface> = (0..5).filter_map(|i| pager.surface(i).copied()).collect();
        prop_assert_eq!(pager.state(), &before_state);
        prop_assert_eq!(before_surfaces, after_surfaces);
    }
}
