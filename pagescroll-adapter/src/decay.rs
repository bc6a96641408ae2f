/// Base friction of the exponential decay curve, per second.
pub const EXPONENTIAL_DECAY_FRICTION: f32 = -4.2;

/// Frictional velocity decay: `v(t) = v0 * e^(f * t)`.
///
/// Positions are relative to where the decay started.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExponentialDecay {
    initial_velocity: f32,
    friction: f32,
}

impl ExponentialDecay {
    /// `friction_multiplier` scales the base friction; it is clamped to a small positive value.
    pub fn new(initial_velocity: f32, friction_multiplier: f32) -> Self {
        let multiplier = if friction_multiplier.is_finite() {
            friction_multiplier.max(0.01)
        } else {
            1.0
        };
        Self {
            initial_velocity: if initial_velocity.is_finite() {
                initial_velocity
            } else {
                0.0
            },
            friction: EXPONENTIAL_DECAY_FRICTION * multiplier,
        }
    }

    pub fn initial_velocity(&self) -> f32 {
        self.initial_velocity
    }

    pub fn value_at(&self, secs: f32) -> f32 {
        self.initial_velocity / self.friction * ((self.friction * secs).exp() - 1.0)
    }

    pub fn velocity_at(&self, secs: f32) -> f32 {
        self.initial_velocity * (self.friction * secs).exp()
    }

    /// Distance covered once the velocity has fully decayed.
    pub fn total_distance(&self) -> f32 {
        -self.initial_velocity / self.friction
    }

    /// Time until the velocity drops below `velocity_threshold`.
    pub fn duration_secs(&self, velocity_threshold: f32) -> f32 {
        let v0 = self.initial_velocity.abs();
        let threshold = velocity_threshold.abs();
        if v0 <= threshold || threshold == 0.0 {
            return 0.0;
        }
        (threshold / v0).ln() / self.friction
    }
}
