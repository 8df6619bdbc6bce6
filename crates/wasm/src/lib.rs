use timeline_layout_core::{TimeScale, compute_layouts};
use timeline_layout_protocol::{LayoutRequest, LayoutResponse, ProtocolError, decode_request};
use wasm_bindgen::prelude::*;

/// Handle one `CALCULATE_LAYOUT` message and return both responses as a
/// JSON array `[COMBINED_LAYOUT_RESULT, SWIMLANE_LAYOUT_RESULT]`.
///
/// Meant to be called from a web worker's `onmessage`; the worker posts
/// each array element back to the page.
#[wasm_bindgen]
pub fn calculate_layout(request_json: &str) -> Result<String, JsError> {
    handle_message(request_json).map_err(|e| JsError::new(&e.to_string()))
}

/// Map a timestamp to a pixel x on a `[min, max] → [0, width]` scale.
#[wasm_bindgen]
pub fn time_to_pixel(min_timestamp: f64, max_timestamp: f64, width: f64, timestamp: f64) -> f64 {
    TimeScale::new(min_timestamp, max_timestamp, width).to_pixel(timestamp)
}

/// Inverse of [`time_to_pixel`].
#[wasm_bindgen]
pub fn pixel_to_time(min_timestamp: f64, max_timestamp: f64, width: f64, x: f64) -> f64 {
    TimeScale::new(min_timestamp, max_timestamp, width).to_timestamp(x)
}

fn handle_message(request_json: &str) -> Result<String, ProtocolError> {
    let LayoutRequest::CalculateLayout(payload) = decode_request(request_json.as_bytes())?;
    let results = compute_layouts(&payload);
    let responses = [
        LayoutResponse::CombinedLayoutResult(results.combined),
        LayoutResponse::SwimlaneLayoutResult(results.swimlane),
    ];
    Ok(serde_json::to_string(&responses)?)
}
