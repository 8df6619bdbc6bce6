use crate::model::{CombinedLayout, ExclusionWindow, Lane, LayoutDecision, Positioned};

/// Sizing constants for the combined layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombinedParams {
    pub popup_width_px: f64,
    /// Extra horizontal margin on each side of a popup.
    pub buffer_px: f64,
    /// Events whose raw positions are closer than this never share a lane.
    pub min_separation_px: f64,
}

/// Assign each event's popup to a lane above or below the axis.
///
/// Events are placed in ascending position order (stable, so ties keep
/// their input order). Each event takes the first lane, in creation order,
/// whose right boundary lies strictly left of its exclusion window and
/// whose last raw position is at least `min_separation_px` away; otherwise
/// a new lane is opened. Even lanes go above the axis and odd lanes below,
/// stacking at level `lane / 2`.
///
/// The exclusion window is built around the position clamped so the popup
/// fits inside `[0, width]`. Separation is measured on raw positions, and
/// decisions report the raw position as the marker anchor.
///
/// A zero width or an empty event list yields an empty layout.
pub fn layout_combined<E: Positioned>(
    events: &[E],
    width: f64,
    params: &CombinedParams,
) -> CombinedLayout {
    if events.is_empty() || width <= 0.0 || width.is_nan() {
        return CombinedLayout::default();
    }

    let mut order: Vec<&E> = events.iter().collect();
    order.sort_by(|a, b| a.position().total_cmp(&b.position()));

    let half_extent = params.popup_width_px / 2.0 + params.buffer_px;
    let (lo, hi) = (half_extent, width - half_extent);

    let mut lanes: Vec<Lane> = Vec::new();
    let mut decisions = Vec::with_capacity(order.len());
    let mut max_level = 0;

    for event in order {
        let raw = event.position();
        // min-then-max: when the popup is wider than the timeline, lo wins.
        let clamped = raw.min(hi).max(lo);
        let window = ExclusionWindow::around(clamped, half_extent);

        let lane = match lanes
            .iter()
            .position(|lane| lane.accepts(&window, raw, params.min_separation_px))
        {
            Some(index) => {
                lanes[index].occupy(&window, raw);
                index
            }
            None => {
                lanes.push(Lane::opened_by(&window, raw));
                lanes.len() - 1
            }
        };

        let vertical_level = u32::try_from(lane / 2).unwrap_or(u32::MAX);
        max_level = max_level.max(vertical_level);
        decisions.push(LayoutDecision {
            event_id: event.id().clone(),
            lane,
            is_above: lane % 2 == 0,
            vertical_level,
            anchor_px: raw,
            window,
        });
    }

    tracing::trace!(
        events = decisions.len(),
        lanes = lanes.len(),
        max_level,
        "combined layout"
    );

    CombinedLayout {
        decisions,
        max_level,
        lane_count: lanes.len(),
    }
}
