mod output;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use timeline_layout_core::model::TimestampedEvent;
use timeline_layout_core::{TimeScale, build_request, position_events};
use timeline_layout_protocol::{
    CalculateLayout, LayoutConfig, LayoutRequest, SharedStr, decode_request_with_defaults,
};
use timeline_layout_service::LayoutService;
use tracing_subscriber::EnvFilter;

/// Lay out timeline event popups and print the combined and swimlane results.
#[derive(Debug, Parser)]
#[command(name = "timeline-layout", version)]
struct Args {
    /// Input JSON file. Reads stdin when omitted or `-`.
    input: Option<PathBuf>,

    /// Layout config JSON supplying sizing constants missing from the input.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Treat the input as an array of `{ id, timestamp, entityIds }` events
    /// and place them on a time scale of `--width` pixels.
    #[arg(long, requires = "width")]
    events: bool,

    /// Timeline width in pixels (with `--events`).
    #[arg(long)]
    width: Option<f64>,

    /// Comma-separated swimlane order (with `--events`). Defaults to the
    /// order entities first appear in.
    #[arg(long, value_delimiter = ',')]
    entity_order: Vec<String>,

    /// Print a readable lane summary instead of JSON lines.
    #[arg(long)]
    summary: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => {
            let data = std::fs::read(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            LayoutConfig::from_json(&data)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => LayoutConfig::default(),
    };

    let data = read_input(args.input.as_deref())?;
    let request = if args.events {
        let Some(width) = args.width else {
            bail!("--events needs --width");
        };
        request_from_events(&data, width, &args.entity_order, &config)?
    } else {
        match decode_request_with_defaults(&data, &config).context("decoding request")? {
            LayoutRequest::CalculateLayout(payload) => payload,
        }
    };
    tracing::info!(
        events = request.events.len(),
        width = request.timeline_width_px,
        "calculating layout"
    );

    let (handle, mut events) = LayoutService::spawn(&config);
    handle.calculate(request)?;

    let mut out = std::io::stdout().lock();
    for _ in 0..2 {
        let response = events
            .recv()
            .await
            .context("layout service stopped before responding")?;
        if args.summary {
            output::write_summary(&mut out, &response)?;
        } else {
            output::write_json_line(&mut out, &response)?;
        }
    }
    handle.shutdown()?;
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) if path != Path::new("-") => {
            std::fs::read(path).with_context(|| format!("reading {}", path.display()))
        }
        _ => {
            let mut data = Vec::new();
            std::io::stdin()
                .read_to_end(&mut data)
                .context("reading stdin")?;
            Ok(data)
        }
    }
}

fn request_from_events(
    data: &[u8],
    width: f64,
    entity_order: &[String],
    config: &LayoutConfig,
) -> Result<CalculateLayout> {
    let events: Vec<TimestampedEvent> =
        serde_json::from_slice(data).context("decoding event list")?;
    let scale = TimeScale::from_timestamps(events.iter().map(|e| e.timestamp), width);
    let positioned = position_events(&events, &scale);

    let order: Vec<SharedStr> = if entity_order.is_empty() {
        let mut seen: Vec<SharedStr> = Vec::new();
        for entity in events.iter().flat_map(|e| e.entity_ids.iter()) {
            if !seen.contains(entity) {
                seen.push(entity.clone());
            }
        }
        seen
    } else {
        entity_order.iter().map(|e| SharedStr::from(e.as_str())).collect()
    };

    Ok(build_request(&positioned, width, order, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVENTS: &[u8] = br#"[
        { "id": "a", "timestamp": 100, "entityIds": ["web", "api"] },
        { "id": "b", "timestamp": 200, "entityIds": ["api", "db"] },
        { "id": "c", "timestamp": 300 }
    ]"#;

    #[test]
    fn events_input_places_on_scale_and_derives_order() {
        let config = LayoutConfig::default();
        let request = request_from_events(EVENTS, 400.0, &[], &config).expect("valid events");

        let positions: Vec<(&str, f64)> = request
            .events
            .iter()
            .map(|e| (e.id.as_str(), e.position))
            .collect();
        assert_eq!(positions, vec![("a", 0.0), ("b", 200.0), ("c", 400.0)]);

        let order: Vec<&str> = request.entity_order.iter().map(SharedStr::as_str).collect();
        assert_eq!(order, vec!["web", "api", "db"]);
        assert!((request.timeline_width_px - 400.0).abs() < f64::EPSILON);
        assert!((request.popup_width_px - config.popup_width_px).abs() < f64::EPSILON);
        assert_eq!(request.request_id, None);
    }

    #[test]
    fn explicit_entity_order_wins() {
        let order = vec!["db".to_owned(), "web".to_owned()];
        let request = request_from_events(EVENTS, 400.0, &order, &LayoutConfig::default())
            .expect("valid events");
        let order: Vec<&str> = request.entity_order.iter().map(SharedStr::as_str).collect();
        assert_eq!(order, vec!["db", "web"]);
    }

    #[test]
    fn rejects_non_array_input() {
        let err = request_from_events(b"{}", 400.0, &[], &LayoutConfig::default());
        assert!(err.is_err());
    }
}
