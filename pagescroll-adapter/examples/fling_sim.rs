use pagescroll::{ContentSurface, Offset2D, Pager, PagerOptions, PagerState};
use pagescroll_adapter::{FlingTick, PagerController};

fn main() {
    // Example: a controller driven from a 60 fps loop, without holding any UI objects.
    //
    // An adapter would:
    // - forward every nested-scroll callback to handle() (drag() bundles pre and post scroll)
    // - call release() or handle(PreFling) when the pointer goes up
    // - call tick(now_ms) each frame while is_flinging() is true
    // - render pages using the pager state
    let state = PagerState::new(10, 1080.0);
    let pager = Pager::with_surfaces(state, (0..10).map(|_| ContentSurface::new(0.0)));
    let mut c = PagerController::new(pager, PagerOptions::for_density(2.75));

    let mut now_ms = 0u64;
    for _ in 0..6 {
        c.drag(Offset2D::new(-36.0, 0.0), now_ms);
        now_ms += 16;
    }
    println!(
        "t={now_ms} dragged={} position={}",
        c.drag_distance(),
        c.host().state().position()
    );

    let mut tick = c.release(now_ms);
    while tick == FlingTick::Running {
        now_ms += 16;
        tick = c.tick(now_ms);
        if now_ms % 80 == 0 {
            println!("t={now_ms} position={}", c.host().state().position());
        }
    }

    println!(
        "done: {tick:?} page={} position={}",
        c.host().state().current_page(),
        c.host().state().position()
    );
}
