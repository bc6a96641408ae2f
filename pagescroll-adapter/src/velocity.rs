const HISTORY_SIZE: usize = 20;

/// Samples older than this (relative to the newest) are ignored.
const HORIZON_MS: u64 = 100;

/// A gap this long between samples means the pointer had stopped.
const ASSUME_STOPPED_MS: u64 = 40;

/// Recency weight per sample step.
const RECENCY_DECAY: f32 = 0.95;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Sample {
    time_ms: u64,
    position: f32,
}

/// Estimates the release velocity of a 1-D drag from recent position samples.
///
/// Velocity is the slope of a recency-weighted least squares fit over the samples inside the
/// horizon, in position units per second.
#[derive(Clone, Debug, Default)]
pub struct VelocityTracker1D {
    samples: [Option<Sample>; HISTORY_SIZE],
    newest: usize,
}

impl VelocityTracker1D {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an absolute position. Non-finite positions are ignored.
    pub fn add_data_point(&mut self, time_ms: u64, position: f32) {
        if !position.is_finite() {
            return;
        }
        self.newest = (self.newest + 1) % HISTORY_SIZE;
        self.samples[self.newest] = Some(Sample { time_ms, position });
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.samples[self.newest].is_none()
    }

    /// Velocity at release time `now_ms`; `0` if the pointer rested before release.
    pub fn velocity_at(&self, now_ms: u64) -> f32 {
        match self.samples[self.newest] {
            Some(newest) if now_ms.saturating_sub(newest.time_ms) <= ASSUME_STOPPED_MS => {
                self.velocity()
            }
            _ => 0.0,
        }
    }

    pub fn velocity(&self) -> f32 {
        let Some(newest) = self.samples[self.newest] else {
            return 0.0;
        };

        let mut times = [0.0f32; HISTORY_SIZE];
        let mut positions = [0.0f32; HISTORY_SIZE];
        let mut count = 0;
        let mut previous = newest;
        let mut index = self.newest;
        while count < HISTORY_SIZE {
            let Some(sample) = self.samples[index] else {
                break;
            };
            let age = newest.time_ms.saturating_sub(sample.time_ms);
            if age > HORIZON_MS || previous.time_ms.saturating_sub(sample.time_ms) > ASSUME_STOPPED_MS {
                break;
            }
            times[count] = -(age as f32);
            positions[count] = sample.position;
            count += 1;
            previous = sample;
            index = (index + HISTORY_SIZE - 1) % HISTORY_SIZE;
        }
        if count < 2 {
            return 0.0;
        }

        let mut weight = 1.0f32;
        let (mut sw, mut st, mut sx, mut stt, mut stx) = (0.0f32, 0.0f32, 0.0f32, 0.0f32, 0.0f32);
        for (&t, &x) in times[..count].iter().zip(&positions[..count]) {
            sw += weight;
            st += weight * t;
            sx += weight * x;
            stt += weight * t * t;
            stx += weight * t * x;
            weight *= RECENCY_DECAY;
        }
        let denominator = sw * stt - st * st;
        if denominator.abs() < f32::EPSILON {
            return 0.0;
        }
        let per_ms = (sw * stx - st * sx) / denominator;
        if per_ms.is_finite() { per_ms * 1000.0 } else { 0.0 }
    }
}
