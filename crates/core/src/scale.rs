use serde::{Deserialize, Serialize};

use crate::model::{PositionedEvent, TimestampedEvent};

/// Linear mapping between timestamps in `[min_timestamp, max_timestamp]`
/// and pixels in `[0, width]`.
///
/// A scale whose time span or width is zero is degenerate: `to_pixel`
/// returns 0 and `to_timestamp` returns `min_timestamp` instead of
/// producing NaN or infinity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    pub min_timestamp: f64,
    pub max_timestamp: f64,
    pub width: f64,
}

impl TimeScale {
    pub fn new(min_timestamp: f64, max_timestamp: f64, width: f64) -> Self {
        Self {
            min_timestamp,
            max_timestamp,
            width,
        }
    }

    /// Domain spanning the earliest and latest finite timestamp. An empty
    /// input yields a degenerate scale at 0.
    pub fn from_timestamps(timestamps: impl IntoIterator<Item = f64>, width: f64) -> Self {
        let (min, max) = timestamps
            .into_iter()
            .filter(|t| t.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| {
                (lo.min(t), hi.max(t))
            });
        if min.is_finite() {
            Self::new(min, max, width)
        } else {
            Self::new(0.0, 0.0, width)
        }
    }

    pub fn span(&self) -> f64 {
        self.max_timestamp - self.min_timestamp
    }

    pub fn is_degenerate(&self) -> bool {
        let ratio = self.width / self.span();
        !ratio.is_finite() || ratio == 0.0
    }

    pub fn to_pixel(&self, timestamp: f64) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        // Normalize first so the domain end maps to exactly `width`.
        (timestamp - self.min_timestamp) / self.span() * self.width
    }

    pub fn to_timestamp(&self, x: f64) -> f64 {
        if self.is_degenerate() {
            return self.min_timestamp;
        }
        self.min_timestamp + x * self.span() / self.width
    }
}

/// Place events on `scale`, dropping any whose position is not finite.
pub fn position_events(events: &[TimestampedEvent], scale: &TimeScale) -> Vec<PositionedEvent> {
    let positioned: Vec<PositionedEvent> = events
        .iter()
        .filter_map(|event| {
            let position = scale.to_pixel(event.timestamp);
            position.is_finite().then(|| PositionedEvent {
                event: event.clone(),
                position,
            })
        })
        .collect();

    let dropped = events.len() - positioned.len();
    if dropped > 0 {
        tracing::debug!(dropped, "skipped events with non-finite positions");
    }
    positioned
}
