pub mod event;
pub mod lane;
pub mod placement;

pub use event::{Positioned, PositionedEvent, TimestampedEvent};
pub(crate) use lane::Lane;
pub use lane::{ExclusionWindow, LaneDescriptor};
pub use placement::{CombinedLayout, LayoutDecision, SwimlaneDecision, SwimlaneLayout};
