//! Lane assignment for event popups.
//!
//! Both engines are synchronous and stateless: every call builds its own
//! lane list and drops it on return. [`compute_layouts`] runs both for one
//! `CALCULATE_LAYOUT` payload so a view can switch display mode without
//! asking for a new layout.

pub mod combined;
pub mod swimlane;

use timeline_layout_protocol::{
    CalculateLayout, CombinedLayoutResult, CombinedPlacement, LayoutConfig, SharedStr,
    SwimlaneLayoutResult, SwimlanePlacement, SwimlaneRow,
};

use crate::model::PositionedEvent;

pub use combined::{CombinedParams, layout_combined};
pub use swimlane::layout_swimlanes;

/// Both results for one request, tagged with its request id.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResults {
    pub combined: CombinedLayoutResult,
    pub swimlane: SwimlaneLayoutResult,
}

/// Build a `CALCULATE_LAYOUT` payload from events already on a scale, with
/// sizing constants taken from `config`.
pub fn build_request(
    events: &[PositionedEvent],
    timeline_width_px: f64,
    entity_order: Vec<SharedStr>,
    config: &LayoutConfig,
) -> CalculateLayout {
    CalculateLayout {
        request_id: None,
        events: events.iter().map(PositionedEvent::to_input).collect(),
        timeline_width_px,
        entity_order,
        popup_width_px: config.popup_width_px,
        popup_vertical_spacing_px: config.popup_vertical_spacing_px,
        swimlane_height_px: config.swimlane_height_px,
        buffer_px: config.buffer_px,
        min_separation_px: config.min_separation_px,
    }
}

pub fn compute_layouts(request: &CalculateLayout) -> LayoutResults {
    let width = request.timeline_width_px;

    let combined = layout_combined(
        &request.events,
        width,
        &CombinedParams {
            popup_width_px: request.popup_width_px,
            buffer_px: request.buffer_px,
            min_separation_px: request.min_separation_px,
        },
    );
    let swimlane = layout_swimlanes(
        &request.events,
        &request.entity_order,
        request.swimlane_height_px,
        width,
    );

    tracing::debug!(
        request_id = request.request_id,
        events = request.events.len(),
        lanes = combined.lane_count,
        max_level = combined.max_level,
        placements = swimlane.placements.len(),
        "computed layouts"
    );

    let spacing = request.popup_vertical_spacing_px;
    LayoutResults {
        combined: CombinedLayoutResult {
            request_id: request.request_id,
            events: combined
                .decisions
                .into_iter()
                .map(|d| CombinedPlacement {
                    id: d.event_id,
                    is_above: d.is_above,
                    vertical_offset: f64::from(d.vertical_level) * spacing,
                    vertical_level: d.vertical_level,
                })
                .collect(),
            max_level: combined.max_level,
        },
        swimlane: SwimlaneLayoutResult {
            request_id: request.request_id,
            events: swimlane
                .placements
                .into_iter()
                .map(|p| SwimlanePlacement {
                    placement_id: p.placement_id,
                    event_id: p.event_id,
                    y_offset: p.y_offset,
                })
                .collect(),
            lanes: swimlane
                .lanes
                .into_iter()
                .map(|l| SwimlaneRow {
                    entity_id: l.entity_id,
                    y_offset: l.y_offset,
                })
                .collect(),
        },
    }
}
