use timeline_layout_protocol::{CombinedLayoutResult, LayoutResponse, SwimlaneLayoutResult};

/// Which of the two computed layouts the timeline is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayMode {
    #[default]
    Combined,
    Swimlane,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActiveLayout<'a> {
    Combined(&'a CombinedLayoutResult),
    Swimlane(&'a SwimlaneLayoutResult),
}

/// Consumer-side holder for the latest layout of each mode.
///
/// Responses can arrive out of request order, so each mode keeps the
/// result with the highest request id seen and ignores older ones.
/// Responses without an id always replace the current result.
#[derive(Debug, Clone, Default)]
pub struct LayoutView {
    mode: DisplayMode,
    combined: Option<CombinedLayoutResult>,
    swimlane: Option<SwimlaneLayoutResult>,
}

impl LayoutView {
    pub fn new(mode: DisplayMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Returns `false` if the response was stale and discarded.
    pub fn apply(&mut self, response: LayoutResponse) -> bool {
        match response {
            LayoutResponse::CombinedLayoutResult(result) => {
                let current = self.combined.as_ref().and_then(|r| r.request_id);
                if is_stale(result.request_id, current) {
                    tracing::warn!(
                        request_id = result.request_id,
                        current,
                        "discarding stale combined layout"
                    );
                    return false;
                }
                self.combined = Some(result);
            }
            LayoutResponse::SwimlaneLayoutResult(result) => {
                let current = self.swimlane.as_ref().and_then(|r| r.request_id);
                if is_stale(result.request_id, current) {
                    tracing::warn!(
                        request_id = result.request_id,
                        current,
                        "discarding stale swimlane layout"
                    );
                    return false;
                }
                self.swimlane = Some(result);
            }
        }
        true
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Switch modes. Both layouts are already computed, so nothing is
    /// requested.
    pub fn set_mode(&mut self, mode: DisplayMode) {
        self.mode = mode;
    }

    pub fn active(&self) -> Option<ActiveLayout<'_>> {
        match self.mode {
            DisplayMode::Combined => self.combined.as_ref().map(ActiveLayout::Combined),
            DisplayMode::Swimlane => self.swimlane.as_ref().map(ActiveLayout::Swimlane),
        }
    }

    pub fn combined(&self) -> Option<&CombinedLayoutResult> {
        self.combined.as_ref()
    }

    pub fn swimlane(&self) -> Option<&SwimlaneLayoutResult> {
        self.swimlane.as_ref()
    }
}

fn is_stale(incoming: Option<u64>, current: Option<u64>) -> bool {
    matches!((incoming, current), (Some(incoming), Some(current)) if incoming < current)
}
