// Example: routing a drag across two scrollable pages, then picking the snap target.
use pagescroll::{
    ContentSurface, NestedScrollRouter, Pager, PagerHost, PagerOptions, PagerState, ScrollSource,
    SnapCalculator,
};

fn main() {
    let options = PagerOptions::default();
    let state = PagerState::new(3, 1000.0);
    // Page 0 scrolls 400px horizontally inside itself before the pager moves.
    let mut pager = Pager::with_surfaces(
        state,
        [
            ContentSurface::new(400.0),
            ContentSurface::new(600.0),
            ContentSurface::new(0.0),
        ],
    );
    let router = NestedScrollRouter::new(options);

    // Drag toward the next page in 100px steps.
    for _ in 0..8 {
        let outcome = router.route(&mut pager, -100.0, ScrollSource::UserInput);
        println!(
            "consumed={} pager={} position={} page0_offset={}",
            outcome.consumed,
            outcome.consumed_by_pager,
            pager.state().position(),
            pager.surface(0).map_or(0.0, |s| s.offset()),
        );
    }

    let snap = SnapCalculator::new(options);
    let layout = pager.layout_info();
    let decision = snap.decide(&layout, 0.0, -800.0);
    println!("release: {decision:?}");
}
