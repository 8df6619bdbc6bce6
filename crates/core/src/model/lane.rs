use serde::{Deserialize, Serialize};
use timeline_layout_protocol::SharedStr;

/// Horizontal pixel range around a popup that no other popup in the same
/// lane may enter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExclusionWindow {
    pub left: f64,
    pub right: f64,
}

impl ExclusionWindow {
    pub fn around(center: f64, half_extent: f64) -> Self {
        Self {
            left: center - half_extent,
            right: center + half_extent,
        }
    }

    pub fn overlaps(&self, other: &ExclusionWindow) -> bool {
        self.left <= other.right && other.left <= self.right
    }
}

/// A combined-mode lane while one layout pass is running. Never outlives
/// the pass that created it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Lane {
    pub right_boundary: f64,
    /// Raw (unclamped) position of the last event placed here.
    pub last_position: f64,
}

impl Lane {
    pub fn opened_by(window: &ExclusionWindow, raw_position: f64) -> Self {
        Self {
            right_boundary: window.right,
            last_position: raw_position,
        }
    }

    /// The window must start strictly after this lane's right boundary, and
    /// the raw position must be at least `min_separation` from the last one.
    pub fn accepts(&self, window: &ExclusionWindow, raw_position: f64, min_separation: f64) -> bool {
        window.left > self.right_boundary
            && (raw_position - self.last_position).abs() >= min_separation
    }

    pub fn occupy(&mut self, window: &ExclusionWindow, raw_position: f64) {
        self.right_boundary = window.right;
        self.last_position = raw_position;
    }
}

/// A swimlane row: one per entry in the caller's entity order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneDescriptor {
    pub entity_id: SharedStr,
    /// Top edge of the row in pixels.
    pub y_offset: f64,
}
