use std::io::Write;

use anyhow::Result;
use timeline_layout_protocol::{LayoutResponse, encode_response};

pub fn write_json_line(out: &mut impl Write, response: &LayoutResponse) -> Result<()> {
    writeln!(out, "{}", encode_response(response)?)?;
    Ok(())
}

/// One line per placement, grouped under a header per result.
pub fn write_summary(out: &mut impl Write, response: &LayoutResponse) -> Result<()> {
    match response {
        LayoutResponse::CombinedLayoutResult(result) => {
            writeln!(
                out,
                "combined: {} events, max level {}",
                result.events.len(),
                result.max_level
            )?;
            for event in &result.events {
                let side = if event.is_above { "above" } else { "below" };
                writeln!(
                    out,
                    "  {:<24} {side} level {} (offset {:.0}px)",
                    event.id, event.vertical_level, event.vertical_offset
                )?;
            }
        }
        LayoutResponse::SwimlaneLayoutResult(result) => {
            writeln!(
                out,
                "swimlane: {} placements across {} lanes",
                result.events.len(),
                result.lanes.len()
            )?;
            for lane in &result.lanes {
                writeln!(out, "  lane {:<19} y={:.0}", lane.entity_id, lane.y_offset)?;
            }
            for placement in &result.events {
                writeln!(
                    out,
                    "  {:<24} y={:.0}",
                    placement.placement_id, placement.y_offset
                )?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use timeline_layout_protocol::{CombinedLayoutResult, CombinedPlacement};

    #[test]
    fn summary_names_side_and_level() {
        let response = LayoutResponse::CombinedLayoutResult(CombinedLayoutResult {
            request_id: Some(1),
            events: vec![CombinedPlacement {
                id: "deploy".into(),
                is_above: false,
                vertical_offset: 60.0,
                vertical_level: 1,
            }],
            max_level: 1,
        });
        let mut buf = Vec::new();
        assert!(write_summary(&mut buf, &response).is_ok());
        let text = String::from_utf8_lossy(&buf);
        assert!(text.starts_with("combined: 1 events, max level 1"), "{text}");
        assert!(text.contains("below level 1 (offset 60px)"), "{text}");
    }

    #[test]
    fn json_line_is_newline_terminated() {
        let response = LayoutResponse::CombinedLayoutResult(CombinedLayoutResult::default());
        let mut buf = Vec::new();
        assert!(write_json_line(&mut buf, &response).is_ok());
        assert_eq!(buf.last(), Some(&b'\n'));
        assert_eq!(buf.iter().filter(|b| **b == b'\n').count(), 1);
    }
}
