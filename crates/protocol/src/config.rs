use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::messages::ProtocolError;

pub const DEFAULT_POPUP_WIDTH_PX: f64 = 200.0;
pub const DEFAULT_BUFFER_PX: f64 = 10.0;
pub const DEFAULT_MIN_SEPARATION_PX: f64 = 20.0;
pub const DEFAULT_POPUP_VERTICAL_SPACING_PX: f64 = 60.0;
pub const DEFAULT_SWIMLANE_HEIGHT_PX: f64 = 48.0;
pub const DEFAULT_RESIZE_DEBOUNCE_MS: u64 = 200;

/// Sizing constants shared by a timeline view and its layout service.
///
/// Every field is optional in the serialized form; missing keys take the
/// defaults above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub popup_width_px: f64,
    /// Extra horizontal margin on each side of a popup.
    pub buffer_px: f64,
    /// Minimum raw-position distance between consecutive events in one lane.
    pub min_separation_px: f64,
    pub popup_vertical_spacing_px: f64,
    pub swimlane_height_px: f64,
    /// Quiet period before a resize-triggered recomputation runs.
    pub resize_debounce_ms: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            popup_width_px: DEFAULT_POPUP_WIDTH_PX,
            buffer_px: DEFAULT_BUFFER_PX,
            min_separation_px: DEFAULT_MIN_SEPARATION_PX,
            popup_vertical_spacing_px: DEFAULT_POPUP_VERTICAL_SPACING_PX,
            swimlane_height_px: DEFAULT_SWIMLANE_HEIGHT_PX,
            resize_debounce_ms: DEFAULT_RESIZE_DEBOUNCE_MS,
        }
    }
}

impl LayoutConfig {
    pub fn from_json(data: &[u8]) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Insert this config's sizing constants into a `CALCULATE_LAYOUT`
    /// payload object wherever the payload does not already set them.
    pub fn fill_payload(&self, payload: &mut Map<String, Value>) {
        let sizing = [
            ("popupWidthPx", self.popup_width_px),
            ("bufferPx", self.buffer_px),
            ("minSeparationPx", self.min_separation_px),
            ("popupVerticalSpacingPx", self.popup_vertical_spacing_px),
            ("swimlaneHeightPx", self.swimlane_height_px),
        ];
        for (key, value) in sizing {
            payload
                .entry(key)
                .or_insert_with(|| Value::from(value));
        }
    }
}
