use pagescroll::{
    MutatePriority, NestedScrollRouter, Offset2D, OwnershipError, PagerHost, PagerOptions,
    RouteOutcome, ScrollOwner, ScrollOwnershipToken, ScrollSource, Velocity2D,
};

use crate::{FlingConfig, FlingReport, FlingRouter, FlingTick, VelocityTracker1D};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging,
    Flinging,
}

/// Nested-scroll events delivered by the host, in gesture space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NestedScrollEvent {
    /// A delta, before the host's own scrollables see it.
    PreScroll { delta: Offset2D, source: ScrollSource },
    /// What is left after the host's scrollables consumed theirs.
    PostScroll {
        consumed: Offset2D,
        available: Offset2D,
        source: ScrollSource,
    },
    /// Release velocity, before the host's scrollables fling.
    PreFling { velocity: Velocity2D },
    PostFling {
        consumed: Velocity2D,
        available: Velocity2D,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EventOutcome {
    Scroll {
        consumed: Offset2D,
        unconsumed: Offset2D,
    },
    Fling {
        consumed: Velocity2D,
        remaining: Velocity2D,
    },
}

/// A framework-neutral controller that wraps a [`PagerHost`] and answers its nested-scroll
/// events.
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `handle(event, now_ms)` for every nested-scroll callback, in order
/// - `tick(now_ms)` each frame while [`PagerController::is_flinging`] is true
///
/// A user drag takes the [`ScrollOwnershipToken`] with [`MutatePriority::UserInput`] and
/// cancels a running fling. Flings and page animations run with [`MutatePriority::Default`].
#[derive(Clone, Debug)]
pub struct PagerController<H> {
    host: H,
    options: PagerOptions,
    router: NestedScrollRouter,
    fling: FlingRouter,
    token: ScrollOwnershipToken,
    state: GestureState,
    drag_owner: Option<ScrollOwner>,
    drag_distance: f32,
    tracker: VelocityTracker1D,
}

impl<H: PagerHost> PagerController<H> {
    pub fn new(host: H, options: PagerOptions) -> Self {
        Self::with_fling_config(host, options, FlingConfig::default())
    }

    pub fn with_fling_config(host: H, options: PagerOptions, config: FlingConfig) -> Self {
        if let Err(_err) = options.validate() {
            pwarn!(error = %_err, "PagerController: invalid options");
        }
        if host.layout_info().reverse_layout != options.reverse_layout {
            pwarn!(
                options = options.reverse_layout,
                "PagerController: host layout disagrees on reverse_layout; using options"
            );
        }
        Self {
            host,
            options,
            router: NestedScrollRouter::new(options),
            fling: FlingRouter::new(options, config),
            token: ScrollOwnershipToken::new(),
            state: GestureState::Idle,
            drag_owner: None,
            drag_distance: 0.0,
            tracker: VelocityTracker1D::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn options(&self) -> &PagerOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: PagerOptions) {
        self.options = options;
        self.router.set_options(options);
        self.fling.set_options(options);
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_flinging(&self) -> bool {
        self.fling.is_running()
    }

    pub fn ownership(&self) -> &ScrollOwnershipToken {
        &self.token
    }

    /// Distance dragged by the current gesture, in drag space.
    pub fn drag_distance(&self) -> f32 {
        self.drag_distance
    }

    pub fn handle(&mut self, event: NestedScrollEvent, now_ms: u64) -> EventOutcome {
        match event {
            NestedScrollEvent::PreScroll { delta, source } => {
                let delta = delta.sanitized();
                if source == ScrollSource::UserInput {
                    self.begin_drag();
                    self.track_drag(delta, now_ms);
                }
                let drag = self.drag_of(delta);
                let outcome = self.router.pre_scroll(&mut self.host, drag, source);
                self.scroll_outcome(delta, outcome)
            }
            NestedScrollEvent::PostScroll {
                available, source, ..
            } => {
                let available = available.sanitized();
                if source == ScrollSource::UserInput && self.state != GestureState::Dragging {
                    self.begin_drag();
                    self.track_drag(available, now_ms);
                }
                let drag = self.drag_of(available);
                let outcome = self.router.route(&mut self.host, drag, source);
                self.scroll_outcome(available, outcome)
            }
            NestedScrollEvent::PreFling { velocity } => {
                let drag_velocity = self.drag_velocity_of(velocity);
                let tick = self.start_fling(-drag_velocity, now_ms);
                self.fling_outcome(velocity, tick)
            }
            NestedScrollEvent::PostFling { available, .. } => {
                let settled = {
                    let layout = self.host.layout_info();
                    layout.is_snapped() || layout.visible_pages.is_empty()
                };
                if self.state == GestureState::Flinging || settled {
                    self.end_drag();
                    return EventOutcome::Fling {
                        consumed: Velocity2D::ZERO,
                        remaining: available,
                    };
                }
                let drag_velocity = self.drag_velocity_of(available);
                let tick = self.start_fling(-drag_velocity, now_ms);
                self.fling_outcome(available, tick)
            }
        }
    }

    /// Pre-scroll then post-scroll for one user drag delta. Returns the combined outcome.
    pub fn drag(&mut self, delta: Offset2D, now_ms: u64) -> EventOutcome {
        let pre = self.handle(
            NestedScrollEvent::PreScroll {
                delta,
                source: ScrollSource::UserInput,
            },
            now_ms,
        );
        let EventOutcome::Scroll {
            consumed: pre_consumed,
            unconsumed,
        } = pre
        else {
            return pre;
        };
        match self.handle(
            NestedScrollEvent::PostScroll {
                consumed: Offset2D::ZERO,
                available: unconsumed,
                source: ScrollSource::UserInput,
            },
            now_ms,
        ) {
            EventOutcome::Scroll {
                consumed,
                unconsumed,
            } => EventOutcome::Scroll {
                consumed: pre_consumed + consumed,
                unconsumed,
            },
            other => other,
        }
    }

    /// Ends a drag with the velocity estimated from its samples.
    pub fn release(&mut self, now_ms: u64) -> FlingTick {
        let drag_velocity = self.tracker.velocity_at(now_ms);
        self.start_fling(-drag_velocity, now_ms)
    }

    /// Animates to `page` with a settle spring.
    ///
    /// Fails while a user drag holds the pager. A running fling is replaced.
    pub fn animate_to_page(&mut self, page: usize, now_ms: u64) -> Result<FlingTick, OwnershipError> {
        let layout = self.host.layout_info();
        let Some(first) = layout.first_visible() else {
            return Ok(FlingTick::Idle);
        };
        let owner = self.token.try_acquire(MutatePriority::Default)?;
        let _ = self.fling.cancel();

        let page = page.min(layout.page_count.saturating_sub(1));
        let stride = layout.page_size + layout.page_spacing;
        let distance = (page as f32 - first.index as f32) * stride + first.offset_from_snap;
        pdebug!(page, distance, "PagerController: animate to page");

        self.state = GestureState::Flinging;
        let tick = self.fling.animate_by(owner, distance, 0.0, now_ms);
        self.after_fling_tick(owner, tick);
        Ok(tick)
    }

    /// Advances a running fling.
    pub fn tick(&mut self, now_ms: u64) -> FlingTick {
        let owner = self.fling.owner();
        let tick = self.fling.tick(&mut self.host, &self.token, now_ms);
        if let Some(owner) = owner {
            self.after_fling_tick(owner, tick);
        }
        tick
    }

    /// Stops a running fling; `None` when there was none.
    pub fn cancel_fling(&mut self) -> Option<FlingReport> {
        let owner = self.fling.owner()?;
        let report = self.fling.cancel();
        self.token.release(owner);
        if self.state == GestureState::Flinging {
            self.state = GestureState::Idle;
        }
        report
    }

    /// See [`NestedScrollRouter::on_document_resized`].
    pub fn on_document_resized(&mut self, index: usize) -> Option<RouteOutcome> {
        self.router.on_document_resized(&mut self.host, index)
    }

    fn begin_drag(&mut self) {
        if self.state == GestureState::Dragging {
            return;
        }
        if let Some(_report) = self.cancel_fling() {
            pdebug!(?_report, "PagerController: fling preempted by drag");
        }
        match self.token.try_acquire(MutatePriority::UserInput) {
            Ok(owner) => self.drag_owner = Some(owner),
            Err(_err) => {
                pwarn!(error = %_err, "PagerController: drag could not take ownership");
            }
        }
        self.state = GestureState::Dragging;
        self.drag_distance = 0.0;
        self.tracker.reset();
    }

    fn track_drag(&mut self, delta: Offset2D, now_ms: u64) {
        self.drag_distance += self.drag_of(delta);
        self.tracker.add_data_point(now_ms, self.drag_distance);
    }

    fn end_drag(&mut self) {
        if let Some(owner) = self.drag_owner.take() {
            self.token.release(owner);
        }
        if self.state == GestureState::Dragging {
            self.state = GestureState::Idle;
        }
    }

    fn start_fling(&mut self, velocity: f32, now_ms: u64) -> FlingTick {
        let drag_distance = self.drag_distance;
        self.end_drag();
        let _ = self.fling.cancel();

        let owner = match self.token.try_acquire(MutatePriority::Default) {
            Ok(owner) => owner,
            Err(_err) => {
                pwarn!(error = %_err, "PagerController: fling could not take ownership");
                return FlingTick::Idle;
            }
        };
        self.state = GestureState::Flinging;
        let tick = self
            .fling
            .fling(&mut self.host, owner, velocity, drag_distance, now_ms);
        self.after_fling_tick(owner, tick);
        self.drag_distance = 0.0;
        tick
    }

    fn after_fling_tick(&mut self, owner: ScrollOwner, tick: FlingTick) {
        if let FlingTick::Finished(_report) = tick {
            ptrace!(?_report, "PagerController: fling finished");
            self.token.release(owner);
            if self.state == GestureState::Flinging {
                self.state = GestureState::Idle;
            }
        }
    }

    /// Main-axis drag-space value of a gesture-space offset.
    ///
    /// `PagerOptions::reverse_layout` decides the mapping; the host's
    /// `PageLayoutInfo::reverse_layout` is not consulted.
    fn drag_of(&self, offset: Offset2D) -> f32 {
        let main = offset.main_axis(self.options.orientation);
        if self.options.reverse_layout { -main } else { main }
    }

    fn drag_velocity_of(&self, velocity: Velocity2D) -> f32 {
        let main = velocity.main_axis(self.options.orientation);
        let main = if main.is_finite() { main } else { 0.0 };
        if self.options.reverse_layout { -main } else { main }
    }

    fn scroll_outcome(&self, delta: Offset2D, outcome: RouteOutcome) -> EventOutcome {
        let consumed_main = if self.options.reverse_layout {
            -outcome.consumed
        } else {
            outcome.consumed
        };
        let consumed = Offset2D::on_axis(consumed_main, self.options.orientation);
        EventOutcome::Scroll {
            consumed,
            unconsumed: delta - consumed,
        }
    }

    /// Velocity claimed by a fling that just started. One that finished at once claims only
    /// what its report consumed.
    fn fling_outcome(&self, velocity: Velocity2D, tick: FlingTick) -> EventOutcome {
        let main = match tick {
            FlingTick::Running => velocity.main_axis(self.options.orientation),
            FlingTick::Finished(report) => self.gesture_of_logical(report.consumed_velocity),
            FlingTick::Idle => 0.0,
        };
        let main = if main.is_finite() { main } else { 0.0 };
        let consumed = Velocity2D::on_axis(main, self.options.orientation);
        EventOutcome::Fling {
            consumed,
            remaining: velocity - consumed,
        }
    }

    /// Gesture-space main-axis value of a logical scalar.
    fn gesture_of_logical(&self, logical: f32) -> f32 {
        let drag = -logical;
        if self.options.reverse_layout { -drag } else { drag }
    }
}
