use serde::{Deserialize, Serialize};
use timeline_layout_protocol::SharedStr;

use super::lane::{ExclusionWindow, LaneDescriptor};

/// Where one event's popup goes in combined mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDecision {
    pub event_id: SharedStr,
    /// Lane index in creation order.
    pub lane: usize,
    pub is_above: bool,
    pub vertical_level: u32,
    /// The unclamped position; the marker is drawn here.
    pub anchor_px: f64,
    /// The window recorded against the lane, built from the clamped position.
    pub window: ExclusionWindow,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombinedLayout {
    /// In placement order (ascending position).
    pub decisions: Vec<LayoutDecision>,
    pub max_level: u32,
    pub lane_count: usize,
}

/// One (event, entity) placement in swimlane mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwimlaneDecision {
    pub placement_id: SharedStr,
    pub event_id: SharedStr,
    pub y_offset: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwimlaneLayout {
    pub placements: Vec<SwimlaneDecision>,
    pub lanes: Vec<LaneDescriptor>,
}
