use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{DEFAULT_BUFFER_PX, DEFAULT_MIN_SEPARATION_PX, LayoutConfig};
use crate::shared_str::SharedStr;

/// Monotonic id stamped on a request and echoed by both of its responses.
pub type RequestId = u64;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a JSON object payload")]
    NotAnObject,
}

/// A message sent into the layout boundary.
///
/// Serialized as `{ "type": "CALCULATE_LAYOUT", "payload": { ... } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutRequest {
    CalculateLayout(CalculateLayout),
}

/// A full recomputation request: every event, the current width, the entity
/// order and all sizing constants. Nothing is carried over between requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateLayout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<RequestId>,
    pub events: Vec<EventInput>,
    pub timeline_width_px: f64,
    #[serde(default)]
    pub entity_order: Vec<SharedStr>,
    pub popup_width_px: f64,
    pub popup_vertical_spacing_px: f64,
    pub swimlane_height_px: f64,
    #[serde(default = "default_buffer_px")]
    pub buffer_px: f64,
    #[serde(default = "default_min_separation_px")]
    pub min_separation_px: f64,
}

fn default_buffer_px() -> f64 {
    DEFAULT_BUFFER_PX
}

fn default_min_separation_px() -> f64 {
    DEFAULT_MIN_SEPARATION_PX
}

/// One event as sent over the wire: its pixel position is already computed
/// by the caller's time scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInput {
    pub id: SharedStr,
    pub position: f64,
    #[serde(default)]
    pub entity_ids: Vec<SharedStr>,
}

/// A message emitted by the layout boundary. Each request yields one of each
/// variant, delivered independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutResponse {
    CombinedLayoutResult(CombinedLayoutResult),
    SwimlaneLayoutResult(SwimlaneLayoutResult),
}

impl LayoutResponse {
    pub fn request_id(&self) -> Option<RequestId> {
        match self {
            LayoutResponse::CombinedLayoutResult(r) => r.request_id,
            LayoutResponse::SwimlaneLayoutResult(r) => r.request_id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedLayoutResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<RequestId>,
    pub events: Vec<CombinedPlacement>,
    /// Highest vertical level used; sizes the container.
    pub max_level: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedPlacement {
    pub id: SharedStr,
    pub is_above: bool,
    /// `vertical_level * popupVerticalSpacingPx`.
    pub vertical_offset: f64,
    pub vertical_level: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwimlaneLayoutResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<RequestId>,
    pub events: Vec<SwimlanePlacement>,
    pub lanes: Vec<SwimlaneRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwimlanePlacement {
    /// `eventId + "-" + entityId`.
    pub placement_id: SharedStr,
    pub event_id: SharedStr,
    pub y_offset: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwimlaneRow {
    pub entity_id: SharedStr,
    /// Top edge of the row.
    pub y_offset: f64,
}

pub fn decode_request(data: &[u8]) -> Result<LayoutRequest, ProtocolError> {
    Ok(serde_json::from_slice(data)?)
}

/// Decode a request, taking any sizing constant the payload omits from
/// `config`.
pub fn decode_request_with_defaults(
    data: &[u8],
    config: &LayoutConfig,
) -> Result<LayoutRequest, ProtocolError> {
    let mut value: serde_json::Value = serde_json::from_slice(data)?;
    let payload = value
        .get_mut("payload")
        .and_then(serde_json::Value::as_object_mut)
        .ok_or(ProtocolError::NotAnObject)?;
    config.fill_payload(payload);
    Ok(serde_json::from_value(value)?)
}

pub fn encode_response(response: &LayoutResponse) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(response)?)
}
