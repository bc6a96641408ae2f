use pagescroll::{
    NestedScrollRouter, PagerHost, PagerOptions, ScrollOwner, ScrollOwnershipToken, ScrollSource,
    SnapCalculator,
};

use crate::{ExponentialDecay, Spring};

/// Tuning of the fling and settle animations. Distances in px, velocities in px/s.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlingConfig {
    pub decay_friction_multiplier: f32,
    pub spring_stiffness: f32,
    pub spring_damping_ratio: f32,
    /// The settle spring is at rest once this close to the target.
    pub visibility_threshold: f32,
    /// A fling stops when more than this much of a frame delta is left unconsumed.
    pub frame_epsilon: f32,
    /// Below this velocity the decay hands over to the settle spring.
    pub handoff_velocity: f32,
    /// Velocity under which a decay is finished.
    pub min_velocity: f32,
    /// The settle spring also needs its velocity under this to rest.
    pub rest_velocity: f32,
    /// Longer frame gaps are clamped to this.
    pub max_frame_ms: u64,
}

impl Default for FlingConfig {
    fn default() -> Self {
        Self {
            decay_friction_multiplier: 1.0,
            spring_stiffness: 400.0,
            spring_damping_ratio: 1.0,
            visibility_threshold: 0.5,
            frame_epsilon: 0.5,
            handoff_velocity: 50.0,
            min_velocity: 1.0,
            rest_velocity: 10.0,
            max_frame_ms: 100,
        }
    }
}

impl FlingConfig {
    pub fn with_decay_friction_multiplier(mut self, multiplier: f32) -> Self {
        self.decay_friction_multiplier = multiplier;
        self
    }

    pub fn with_spring(mut self, stiffness: f32, damping_ratio: f32) -> Self {
        self.spring_stiffness = stiffness;
        self.spring_damping_ratio = damping_ratio;
        self
    }

    pub fn with_handoff_velocity(mut self, velocity: f32) -> Self {
        self.handoff_velocity = velocity;
        self
    }

    pub fn with_frame_epsilon(mut self, epsilon: f32) -> Self {
        self.frame_epsilon = epsilon;
        self
    }

    /// Replaces non-finite or negative fields with their defaults.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let pick = |value: f32, default: f32| {
            if value.is_finite() && value >= 0.0 {
                value
            } else {
                pwarn!(value, default, "FlingConfig: invalid value replaced");
                default
            }
        };
        Self {
            decay_friction_multiplier: pick(
                self.decay_friction_multiplier,
                defaults.decay_friction_multiplier,
            ),
            spring_stiffness: pick(self.spring_stiffness, defaults.spring_stiffness),
            spring_damping_ratio: pick(self.spring_damping_ratio, defaults.spring_damping_ratio),
            visibility_threshold: pick(self.visibility_threshold, defaults.visibility_threshold),
            frame_epsilon: pick(self.frame_epsilon, defaults.frame_epsilon),
            handoff_velocity: pick(self.handoff_velocity, defaults.handoff_velocity),
            min_velocity: pick(self.min_velocity, defaults.min_velocity),
            rest_velocity: pick(self.rest_velocity, defaults.rest_velocity),
            max_frame_ms: self.max_frame_ms,
        }
    }
}

/// How a fling ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlingEnd {
    /// Reached the target, or the velocity decayed away.
    Settled,
    /// A frame could not be consumed: an edge was hit.
    Blocked,
    /// Cancelled, or the ownership token was taken over.
    Cancelled,
}

/// Summary of a finished fling. Velocities are logical (positive toward the next page).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlingReport {
    pub initial_velocity: f32,
    pub consumed_velocity: f32,
    /// Momentum left for an ancestor scroll container.
    pub remaining_velocity: f32,
    /// Logical distance consumed by the pager and the content surfaces.
    pub distance: f32,
    pub end: FlingEnd,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FlingTick {
    Idle,
    Running,
    /// Emitted once per fling.
    Finished(FlingReport),
}

#[derive(Clone, Copy, Debug)]
enum Motion {
    /// Pager fling, decaying toward `target`.
    Decay(ExponentialDecay),
    /// Settle toward the target.
    Spring(Spring),
    /// Single visible page: the fling belongs to its content surface alone.
    Surface { index: usize, decay: ExponentialDecay },
}

#[derive(Clone, Copy, Debug)]
struct ActiveFling {
    owner: ScrollOwner,
    motion: Motion,
    initial_velocity: f32,
    velocity: f32,
    /// Pager displacement the fling settles on.
    target: f32,
    /// Total consumed, by the pager and the surfaces. This is the motion curve's coordinate.
    travelled: f32,
    /// Part of `travelled` taken by content surfaces during a pager fling.
    absorbed: f32,
    phase_ms: u64,
    last_ms: u64,
}

/// Orchestrates decay-then-settle animations, one frame per [`FlingRouter::tick`].
///
/// Every frame delta is routed back through the [`NestedScrollRouter`] as a programmatic
/// scroll, so the content surfaces keep consuming as they do during a drag. What they absorb
/// moves the end of the motion out by as much, so the pager still lands on its target.
/// The fling holds a
/// [`ScrollOwner`]; once the token no longer belongs to it, the next tick cancels it before
/// any delta is applied.
#[derive(Clone, Debug)]
pub struct FlingRouter {
    config: FlingConfig,
    router: NestedScrollRouter,
    snap: SnapCalculator,
    active: Option<ActiveFling>,
}

impl FlingRouter {
    pub fn new(options: PagerOptions, config: FlingConfig) -> Self {
        Self {
            config: config.sanitized(),
            router: NestedScrollRouter::new(options),
            snap: SnapCalculator::new(options),
            active: None,
        }
    }

    pub fn config(&self) -> &FlingConfig {
        &self.config
    }

    pub fn snap_calculator(&self) -> &SnapCalculator {
        &self.snap
    }

    pub fn set_options(&mut self, options: PagerOptions) {
        self.router.set_options(options);
        self.snap.set_options(options);
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn owner(&self) -> Option<ScrollOwner> {
        self.active.map(|a| a.owner)
    }

    /// Starts a release fling with a logical `velocity` after a gesture that dragged
    /// `drag_delta` (drag space) in total.
    ///
    /// A snapped single page takes the fling on its own surface. Otherwise the pager flings
    /// toward the page picked by the [`SnapCalculator`]. Returns `Finished` right away when
    /// there is nothing to animate.
    pub fn fling(
        &mut self,
        host: &mut dyn PagerHost,
        owner: ScrollOwner,
        velocity: f32,
        drag_delta: f32,
        now_ms: u64,
    ) -> FlingTick {
        let velocity = if velocity.is_finite() { velocity } else { 0.0 };
        self.active = None;
        let layout = host.layout_info();

        if layout.visible_pages.len() == 1 && layout.is_snapped() {
            let index = layout.visible_pages[0].index;
            if velocity.abs() <= self.config.min_velocity {
                return FlingTick::Finished(report(velocity, 0.0, 0.0, FlingEnd::Settled));
            }
            if host.surface_mut(index).is_none() {
                pdebug!(index, "FlingRouter: no surface for single-page fling");
                return FlingTick::Finished(report(velocity, 0.0, 0.0, FlingEnd::Blocked));
            }
            pdebug!(index, velocity, "FlingRouter: single-page fling");
            let decay = ExponentialDecay::new(velocity, self.config.decay_friction_multiplier);
            self.begin(owner, Motion::Surface { index, decay }, velocity, 0.0, now_ms);
            return FlingTick::Running;
        }

        let target = self.snap.calculate_snap_offset(&layout, velocity, drag_delta);
        self.animate_by(owner, target, velocity, now_ms)
    }

    /// Animates the pager by `distance` (logical), starting with `velocity`.
    pub fn animate_by(
        &mut self,
        owner: ScrollOwner,
        distance: f32,
        velocity: f32,
        now_ms: u64,
    ) -> FlingTick {
        let distance = if distance.is_finite() { distance } else { 0.0 };
        let velocity = if velocity.is_finite() { velocity } else { 0.0 };
        if distance.abs() < self.config.visibility_threshold
            && velocity.abs() <= self.config.handoff_velocity
        {
            self.active = None;
            return FlingTick::Finished(report(velocity, velocity, 0.0, FlingEnd::Settled));
        }

        let toward_target = distance * velocity > 0.0;
        let motion = if toward_target && velocity.abs() > self.config.handoff_velocity {
            Motion::Decay(ExponentialDecay::new(
                velocity,
                self.config.decay_friction_multiplier,
            ))
        } else {
            Motion::Spring(self.settle_spring(0.0, distance, velocity))
        };
        pdebug!(distance, velocity, "FlingRouter: pager fling");
        self.begin(owner, motion, velocity, distance, now_ms);
        FlingTick::Running
    }

    /// Stops the running fling. The last fully applied frame stands.
    pub fn cancel(&mut self) -> Option<FlingReport> {
        let active = self.active.take()?;
        pdebug!(travelled = active.travelled, "FlingRouter: cancelled");
        Some(finished(&active, active.velocity, FlingEnd::Cancelled))
    }

    /// Advances the running fling to `now_ms`.
    pub fn tick(
        &mut self,
        host: &mut dyn PagerHost,
        token: &ScrollOwnershipToken,
        now_ms: u64,
    ) -> FlingTick {
        let Some(mut active) = self.active else {
            return FlingTick::Idle;
        };
        if !token.is_owned_by(active.owner) {
            self.active = None;
            pdebug!("FlingRouter: ownership lost");
            return FlingTick::Finished(finished(&active, active.velocity, FlingEnd::Cancelled));
        }

        let dt_ms = now_ms
            .saturating_sub(active.last_ms)
            .min(self.config.max_frame_ms);
        active.last_ms = now_ms;
        if dt_ms == 0 {
            self.active = Some(active);
            return FlingTick::Running;
        }
        active.phase_ms += dt_ms;

        let step = match active.motion {
            Motion::Surface { index, decay } => self.step_surface(host, &mut active, index, decay),
            Motion::Decay(decay) => self.step_decay(host, &mut active, decay, dt_ms),
            Motion::Spring(spring) => self.step_spring(host, &mut active, spring, dt_ms),
        };
        match step {
            Some(end) => {
                self.active = None;
                let remaining = if end == FlingEnd::Settled {
                    0.0
                } else {
                    active.velocity
                };
                pdebug!(?end, travelled = active.travelled, "FlingRouter: finished");
                FlingTick::Finished(finished(&active, remaining, end))
            }
            None => {
                self.active = Some(active);
                FlingTick::Running
            }
        }
    }

    fn begin(&mut self, owner: ScrollOwner, motion: Motion, velocity: f32, target: f32, now_ms: u64) {
        self.active = Some(ActiveFling {
            owner,
            motion,
            initial_velocity: velocity,
            velocity,
            target,
            travelled: 0.0,
            absorbed: 0.0,
            phase_ms: 0,
            last_ms: now_ms,
        });
    }

    /// A spring from `position` to `target` whose velocity is capped so a critically damped
    /// settle cannot overshoot.
    fn settle_spring(&self, position: f32, target: f32, velocity: f32) -> Spring {
        let spring = Spring::new(position, target)
            .with_stiffness(self.config.spring_stiffness)
            .with_damping_ratio(self.config.spring_damping_ratio)
            .with_rest_threshold(self.config.visibility_threshold)
            .with_velocity_threshold(self.config.rest_velocity);
        let cap = spring.natural_frequency() * (target - position).abs();
        let cap = if cap.is_nan() { 0.0 } else { cap };
        spring.with_velocity(velocity.max(-cap).min(cap))
    }

    fn step_surface(
        &self,
        host: &mut dyn PagerHost,
        active: &mut ActiveFling,
        index: usize,
        decay: ExponentialDecay,
    ) -> Option<FlingEnd> {
        let secs = active.phase_ms as f32 / 1000.0;
        let delta = decay.value_at(secs) - active.travelled;
        active.velocity = decay.velocity_at(secs);

        let Some(surface) = host.surface_mut(index) else {
            return Some(FlingEnd::Blocked);
        };
        let consumed = surface.try_consume(delta, ScrollSource::Programmatic);
        let consumed = if consumed.is_finite() && consumed * delta >= 0.0 {
            if consumed.abs() > delta.abs() { delta } else { consumed }
        } else {
            0.0
        };
        active.travelled += consumed;
        ptrace!(index, delta, consumed, "FlingRouter: surface frame");

        if (delta - consumed).abs() > self.config.frame_epsilon {
            Some(FlingEnd::Blocked)
        } else if active.velocity.abs() < self.config.min_velocity {
            Some(FlingEnd::Settled)
        } else {
            None
        }
    }

    fn step_decay(
        &self,
        host: &mut dyn PagerHost,
        active: &mut ActiveFling,
        decay: ExponentialDecay,
        dt_ms: u64,
    ) -> Option<FlingEnd> {
        let secs = active.phase_ms as f32 / 1000.0;
        let value = decay.value_at(secs);
        let velocity = decay.velocity_at(secs);
        let end = active.target + active.absorbed;
        let crossed = (end - value) * velocity <= 0.0;

        if crossed || velocity.abs() < self.config.handoff_velocity {
            // Hand the rest of the way over to the spring, from the last applied frame.
            ptrace!(crossed, velocity, "FlingRouter: decay handoff");
            let spring = self.settle_spring(active.travelled, end, active.velocity);
            active.motion = Motion::Spring(spring);
            active.phase_ms = 0;
            return self.step_spring(host, active, spring, dt_ms);
        }

        active.velocity = velocity;
        self.apply_pager_frame(host, active, value)
    }

    fn step_spring(
        &self,
        host: &mut dyn PagerHost,
        active: &mut ActiveFling,
        mut spring: Spring,
        dt_ms: u64,
    ) -> Option<FlingEnd> {
        spring.advance(dt_ms as f32 / 1000.0);
        active.velocity = spring.velocity();
        let absorbed = active.absorbed;
        let end = self.apply_pager_frame(host, active, spring.position());
        if active.absorbed != absorbed {
            spring.retarget(active.target + active.absorbed);
        }
        active.motion = Motion::Spring(spring);
        if end.is_some() {
            return end;
        }
        spring.is_at_rest().then_some(FlingEnd::Settled)
    }

    /// Routes the step from `travelled` to `value`; `Some(Blocked)` when it did not fit.
    fn apply_pager_frame(
        &self,
        host: &mut dyn PagerHost,
        active: &mut ActiveFling,
        value: f32,
    ) -> Option<FlingEnd> {
        let delta = value - active.travelled;
        if delta == 0.0 || !delta.is_finite() {
            return None;
        }
        // Logical deltas route in drag space.
        let outcome = self.router.route(host, -delta, ScrollSource::Programmatic);
        let consumed = -outcome.consumed;
        active.travelled += consumed;
        active.absorbed += consumed + outcome.consumed_by_pager;
        ptrace!(delta, consumed, absorbed = active.absorbed, "FlingRouter: pager frame");
        ((delta - consumed).abs() > self.config.frame_epsilon).then_some(FlingEnd::Blocked)
    }
}

fn report(initial: f32, consumed: f32, distance: f32, end: FlingEnd) -> FlingReport {
    FlingReport {
        initial_velocity: initial,
        consumed_velocity: consumed,
        remaining_velocity: initial - consumed,
        distance,
        end,
    }
}

fn finished(active: &ActiveFling, remaining: f32, end: FlingEnd) -> FlingReport {
    let consumed = active.initial_velocity - remaining;
    let consumed = if consumed.is_nan() {
        active.initial_velocity
    } else {
        consumed
    };
    FlingReport {
        initial_velocity: active.initial_velocity,
        consumed_velocity: consumed,
        remaining_velocity: active.initial_velocity - consumed,
        distance: active.travelled,
        end,
    }
}
