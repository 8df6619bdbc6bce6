use std::collections::HashMap;

use timeline_layout_protocol::SharedStr;

use crate::model::{LaneDescriptor, Positioned, SwimlaneDecision, SwimlaneLayout};

/// Give every entity in `entity_order` a fixed row and plot each event once
/// per entity it involves.
///
/// Row `i` is centered at `i * lane_height + lane_height / 2`; offsets are
/// reported as the row's top edge. Entity ids missing from `entity_order`
/// produce no placement, so an event with no known entity is dropped.
/// A repeated entity id on one event is plotted once.
pub fn layout_swimlanes<E: Positioned>(
    events: &[E],
    entity_order: &[SharedStr],
    lane_height_px: f64,
    width: f64,
) -> SwimlaneLayout {
    if events.is_empty() || width <= 0.0 || width.is_nan() {
        return SwimlaneLayout::default();
    }

    let lanes: Vec<LaneDescriptor> = entity_order
        .iter()
        .enumerate()
        .map(|(i, entity_id)| {
            let center = i as f64 * lane_height_px + lane_height_px / 2.0;
            LaneDescriptor {
                entity_id: entity_id.clone(),
                y_offset: center - lane_height_px / 2.0,
            }
        })
        .collect();

    // First occurrence wins if the order repeats an entity.
    let mut rows: HashMap<&str, f64> = HashMap::with_capacity(lanes.len());
    for lane in &lanes {
        rows.entry(lane.entity_id.as_str()).or_insert(lane.y_offset);
    }

    let mut placements = Vec::new();
    let mut seen: Vec<&str> = Vec::new();
    for event in events {
        seen.clear();
        for entity_id in event.entity_ids() {
            let Some(&y_offset) = rows.get(entity_id.as_str()) else {
                continue;
            };
            if seen.contains(&entity_id.as_str()) {
                continue;
            }
            seen.push(entity_id.as_str());
            placements.push(SwimlaneDecision {
                placement_id: event.id().joined(entity_id),
                event_id: event.id().clone(),
                y_offset,
            });
        }
    }

    tracing::trace!(
        events = events.len(),
        placements = placements.len(),
        lanes = lanes.len(),
        "swimlane layout"
    );

    SwimlaneLayout { placements, lanes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PositionedEvent, TimestampedEvent};

    fn event(id: &str, entities: &[&str]) -> PositionedEvent {
        PositionedEvent {
            event: TimestampedEvent {
                id: id.into(),
                timestamp: 0.0,
                entity_ids: entities.iter().map(|e| SharedStr::from(*e)).collect(),
            },
            position: 50.0,
        }
    }

    fn order(ids: &[&str]) -> Vec<SharedStr> {
        ids.iter().map(|e| SharedStr::from(*e)).collect()
    }

    #[test]
    fn rows_follow_entity_order() {
        let layout = layout_swimlanes(
            &[event("e", &["c"])],
            &order(&["a", "b", "c"]),
            40.0,
            800.0,
        );
        let offsets: Vec<(&str, f64)> = layout
            .lanes
            .iter()
            .map(|l| (l.entity_id.as_str(), l.y_offset))
            .collect();
        assert_eq!(offsets, vec![("a", 0.0), ("b", 40.0), ("c", 80.0)]);
        assert_eq!(layout.placements[0].y_offset, 80.0);
    }

    #[test]
    fn fans_out_one_placement_per_known_entity() {
        let layout = layout_swimlanes(
            &[event("evt", &["alice", "bob", "mallory"])],
            &order(&["bob", "alice"]),
            30.0,
            800.0,
        );
        let placements: Vec<(&str, f64)> = layout
            .placements
            .iter()
            .map(|p| (p.placement_id.as_str(), p.y_offset))
            .collect();
        assert_eq!(placements, vec![("evt-alice", 30.0), ("evt-bob", 0.0)]);
        assert!(layout.placements.iter().all(|p| p.event_id == "evt"));
    }

    #[test]
    fn events_without_known_entities_are_dropped() {
        let layout = layout_swimlanes(
            &[event("none", &[]), event("stranger", &["zed"]), event("ok", &["a"])],
            &order(&["a"]),
            30.0,
            800.0,
        );
        assert_eq!(layout.placements.len(), 1);
        assert_eq!(layout.placements[0].placement_id, "ok-a");
        assert_eq!(layout.lanes.len(), 1);
    }

    #[test]
    fn repeated_entity_is_plotted_once() {
        let layout = layout_swimlanes(&[event("e", &["a", "a"])], &order(&["a"]), 30.0, 800.0);
        assert_eq!(layout.placements.len(), 1);
    }

    #[test]
    fn zero_width_short_circuits() {
        let layout = layout_swimlanes(&[event("e", &["a"])], &order(&["a"]), 30.0, 0.0);
        assert_eq!(layout, SwimlaneLayout::default());
    }
}
