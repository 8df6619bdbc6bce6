//! Collision-free popup placement along a zoomable timeline.
//!
//! ```text
//!   TimestampedEvent ──TimeScale──▶ PositionedEvent ─┬─▶ layout_combined  ──▶ lanes above/below
//!                                                    └─▶ layout_swimlanes ──▶ one row per entity
//! ```

pub mod layout;
pub mod model;
pub mod scale;

pub use layout::{LayoutResults, build_request, compute_layouts};
pub use scale::{TimeScale, position_events};
