//! A headless nested-scroll and page-snap engine for paginated viewers.
//!
//! For frame-driven flings, velocity tracking and the host event protocol, see the
//! `pagescroll-adapter` crate.
//!
//! The engine coordinates one continuous gesture across two layers of scrollable state: the
//! internal scroll of the visible pages and the pager's page-to-page position. It provides:
//! - delta routing across content surfaces and the pager ([`NestedScrollRouter`])
//! - release snapping to the previous, current or next page ([`SnapCalculator`])
//! - priority-based exclusion between drags and animations ([`ScrollOwnershipToken`])
//!
//! It is UI-agnostic. A host is expected to provide, through [`PagerHost`]:
//! - a fresh [`PageLayoutInfo`] snapshot per routing pass
//! - a raw delta entry point on its pager
//! - a [`ScrollSurface`] per attached page
//!
//! [`PagerState`], [`ContentSurface`] and [`Pager`] are reference implementations of those.
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod error;
mod options;
mod ownership;
mod pager;
mod router;
mod snap;
mod state;
mod surface;
mod types;

#[cfg(test)]
mod tests;

pub use error::{OptionsError, OwnershipError};
pub use options::{
    DEFAULT_BEYOND_VIEWPORT_PAGE_COUNT, DEFAULT_MINIMUM_FLING_VELOCITY,
    DEFAULT_POSITION_THRESHOLD, DEFAULT_SNAP_POSITIONAL_THRESHOLD, PagerOptions,
};
pub use ownership::{ScrollOwner, ScrollOwnershipToken};
pub use pager::{Pager, PagerHost, PagerState};
pub use router::{MAX_ROUTE_PASSES, NestedScrollRouter, RouteOutcome, RoutePass};
pub use snap::{FinalSnappingItem, SnapBounds, SnapCalculator, SnapDecision, SnapReason};
pub use state::PagerSnapshot;
pub use surface::{ContentSurface, ScrollSurface};
pub use types::{
    MutatePriority, Offset2D, Orientation, PageLayoutInfo, SNAP_EPSILON, ScrollDirection,
    ScrollSource, Velocity2D, VisiblePageInfo,
};
