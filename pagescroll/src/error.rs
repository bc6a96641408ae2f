use crate::MutatePriority;

/// Rejected [`crate::PagerOptions`].
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum OptionsError {
    #[error("snap_positional_threshold must be within 0..=1, got {0}")]
    SnapPositionalThresholdOutOfRange(f32),
    #[error("minimum_fling_velocity must be positive, got {0}")]
    NonPositiveMinimumFlingVelocity(f32),
    #[error("position_threshold_fraction must be within 0..=1, got {0}")]
    InvalidPositionThresholdFraction(f32),
    #[error("{field} must be finite")]
    NonFiniteValue { field: &'static str },
}

/// Returned when the ownership token refuses an acquisition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OwnershipError {
    #[error("scroll owned with priority {held:?}, requested {requested:?}")]
    Busy {
        held: MutatePriority,
        requested: MutatePriority,
    },
}
