use serde::{Deserialize, Serialize};
use timeline_layout_protocol::{EventInput, SharedStr};

/// Anything the layout engines can place: an id, a pixel position on the
/// axis, and the entities it involves.
pub trait Positioned {
    fn id(&self) -> &SharedStr;
    /// Pixel x of the event's marker. Assumed finite.
    fn position(&self) -> f64;
    fn entity_ids(&self) -> &[SharedStr];
}

/// An event as it arrives from the data model, before it is placed on a scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimestampedEvent {
    pub id: SharedStr,
    pub timestamp: f64,
    /// May be empty.
    #[serde(default)]
    pub entity_ids: Vec<SharedStr>,
}

/// A [`TimestampedEvent`] with its pixel position on the current scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedEvent {
    pub event: TimestampedEvent,
    pub position: f64,
}

impl PositionedEvent {
    /// Wire form for a `CALCULATE_LAYOUT` payload.
    pub fn to_input(&self) -> EventInput {
        EventInput {
            id: self.event.id.clone(),
            position: self.position,
            entity_ids: self.event.entity_ids.clone(),
        }
    }
}

impl Positioned for PositionedEvent {
    fn id(&self) -> &SharedStr {
        &self.event.id
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn entity_ids(&self) -> &[SharedStr] {
        &self.event.entity_ids
    }
}

impl Positioned for EventInput {
    fn id(&self) -> &SharedStr {
        &self.id
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn entity_ids(&self) -> &[SharedStr] {
        &self.entity_ids
    }
}
