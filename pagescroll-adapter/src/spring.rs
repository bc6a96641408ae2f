/// Integration steps are subdivided to at most this many seconds.
const MAX_STEP_SECS: f32 = 0.004;

const MIN_STIFFNESS: f32 = 0.1;

/// A damped harmonic oscillator pulling a scalar toward its target.
///
/// `damping_ratio = 1.0` is critical damping: the fastest approach without oscillation.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spring {
    position: f32,
    velocity: f32,
    target: f32,
    stiffness: f32,
    damping_ratio: f32,
    rest_threshold: f32,
    velocity_threshold: f32,
    at_rest: bool,
}

impl Spring {
    pub fn new(initial: f32, target: f32) -> Self {
        Self {
            position: initial,
            velocity: 0.0,
            target,
            stiffness: 400.0,
            damping_ratio: 1.0,
            rest_threshold: 0.5,
            velocity_threshold: 10.0,
            at_rest: false,
        }
    }

    pub fn with_velocity(mut self, velocity: f32) -> Self {
        self.velocity = if velocity.is_finite() { velocity } else { 0.0 };
        self
    }

    pub fn with_stiffness(mut self, stiffness: f32) -> Self {
        self.stiffness = stiffness.max(MIN_STIFFNESS);
        self
    }

    pub fn with_damping_ratio(mut self, ratio: f32) -> Self {
        self.damping_ratio = ratio.max(0.0);
        self
    }

    pub fn with_rest_threshold(mut self, threshold: f32) -> Self {
        self.rest_threshold = threshold.abs();
        self
    }

    pub fn with_velocity_threshold(mut self, threshold: f32) -> Self {
        self.velocity_threshold = threshold.abs();
        self
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// Moves the target, keeping position and velocity.
    pub fn retarget(&mut self, target: f32) {
        if target.is_finite() && target != self.target {
            self.target = target;
            self.at_rest = false;
        }
    }

    /// Undamped angular frequency, `sqrt(stiffness)`.
    pub fn natural_frequency(&self) -> f32 {
        self.stiffness.sqrt()
    }

    fn step(&mut self, dt: f32) {
        // Semi-implicit Euler.
        let damping = 2.0 * self.damping_ratio * self.natural_frequency();
        let acceleration =
            -self.stiffness * (self.position - self.target) - damping * self.velocity;
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }

    pub fn advance(&mut self, secs: f32) {
        if self.at_rest || secs.is_nan() || secs <= 0.0 {
            return;
        }
        let mut remaining = secs;
        while remaining > 0.0 {
            let dt = remaining.min(MAX_STEP_SECS);
            self.step(dt);
            remaining -= dt;
        }
        if (self.position - self.target).abs() < self.rest_threshold
            && self.velocity.abs() < self.velocity_threshold
        {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }
}
