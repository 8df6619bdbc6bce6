//! Integration tests for the layout service: request ids, the two-response
//! contract, resize debouncing and shutdown.

use std::time::Duration;

use timeline_layout_protocol::{CalculateLayout, EventInput, LayoutConfig, LayoutResponse};
use timeline_layout_service::{
    ActiveLayout, DisplayMode, LayoutEvents, LayoutService, LayoutView, ServiceState,
};

fn request(width: f64, positions: &[f64]) -> CalculateLayout {
    let config = LayoutConfig::default();
    CalculateLayout {
        request_id: None,
        events: positions
            .iter()
            .enumerate()
            .map(|(i, p)| EventInput {
                id: format!("e{i}").into(),
                position: *p,
                entity_ids: vec!["svc".into()],
            })
            .collect(),
        timeline_width_px: width,
        entity_order: vec!["svc".into()],
        popup_width_px: config.popup_width_px,
        popup_vertical_spacing_px: config.popup_vertical_spacing_px,
        swimlane_height_px: config.swimlane_height_px,
        buffer_px: config.buffer_px,
        min_separation_px: config.min_separation_px,
    }
}

async fn recv_pair(events: &mut LayoutEvents) -> (LayoutResponse, LayoutResponse) {
    let first = events.recv().await.expect("combined response");
    let second = events.recv().await.expect("swimlane response");
    (first, second)
}

#[tokio::test]
async fn each_request_yields_both_layouts() {
    let (handle, mut events) = LayoutService::spawn(&LayoutConfig::default());
    let id = handle
        .calculate(request(1_000.0, &[100.0, 102.0, 104.0]))
        .expect("service running");
    assert_eq!(id, 1);

    let (first, second) = recv_pair(&mut events).await;
    let LayoutResponse::CombinedLayoutResult(combined) = first else {
        panic!("expected combined result first, got {first:?}");
    };
    let LayoutResponse::SwimlaneLayoutResult(swimlane) = second else {
        panic!("expected swimlane result second, got {second:?}");
    };
    assert_eq!(combined.request_id, Some(1));
    assert_eq!(swimlane.request_id, Some(1));
    assert_eq!(combined.max_level, 1);
    assert_eq!(swimlane.events.len(), 3);
    assert_eq!(handle.state(), ServiceState::Idle);
}

#[tokio::test]
async fn request_ids_increase_across_clones() {
    let (handle, mut events) = LayoutService::spawn(&LayoutConfig::default());
    let other = handle.clone();
    let a = handle.calculate(request(800.0, &[10.0])).expect("running");
    let b = other.calculate(request(800.0, &[20.0])).expect("running");
    assert!(b > a);

    let mut view = LayoutView::default();
    for _ in 0..4 {
        let response = events.recv().await.expect("response");
        view.apply(response);
    }
    assert_eq!(view.combined().and_then(|r| r.request_id), Some(b));
    assert_eq!(view.swimlane().and_then(|r| r.request_id), Some(b));
}

#[tokio::test]
async fn zero_width_returns_empty_layouts() {
    let (handle, _events) = LayoutService::spawn(&LayoutConfig::default());
    let results = handle
        .calculate_and_wait(request(0.0, &[1.0, 2.0]))
        .await
        .expect("service running");
    assert!(results.combined.events.is_empty());
    assert!(results.swimlane.events.is_empty());
    assert!(results.swimlane.lanes.is_empty());
}

#[tokio::test(start_paused = true)]
async fn resizes_are_coalesced() {
    let (handle, mut events) = LayoutService::spawn(&LayoutConfig::default());
    handle.calculate_debounced(request(600.0, &[50.0])).expect("running");
    tokio::time::sleep(Duration::from_millis(50)).await;
    handle.calculate_debounced(request(700.0, &[50.0])).expect("running");
    let last = handle.calculate_debounced(request(800.0, &[50.0])).expect("running");

    let (first, second) = recv_pair(&mut events).await;
    assert_eq!(first.request_id(), Some(last));
    assert_eq!(second.request_id(), Some(last));

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(events.try_recv().is_none());
}

#[tokio::test(start_paused = true)]
async fn immediate_request_drops_pending_resize() {
    let (handle, mut events) = LayoutService::spawn(&LayoutConfig::default());
    handle.calculate_debounced(request(600.0, &[50.0])).expect("running");
    let now = handle.calculate(request(600.0, &[50.0, 300.0])).expect("running");

    let (first, _) = recv_pair(&mut events).await;
    assert_eq!(first.request_id(), Some(now));

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(events.try_recv().is_none());
}

#[tokio::test]
async fn state_returns_to_idle_after_computing() {
    let (handle, mut events) = LayoutService::spawn(&LayoutConfig::default());
    let mut state = handle.subscribe_state();
    assert_eq!(*state.borrow_and_update(), ServiceState::Idle);

    handle.calculate(request(500.0, &[10.0, 20.0])).expect("running");
    recv_pair(&mut events).await;

    assert!(state.has_changed().unwrap_or(false));
    assert_eq!(*state.borrow_and_update(), ServiceState::Idle);
}

#[tokio::test]
async fn state_reports_computing_while_layout_runs() {
    let (handle, mut events) = LayoutService::spawn(&LayoutConfig::default());
    let mut state = handle.subscribe_state();
    assert_eq!(*state.borrow_and_update(), ServiceState::Idle);

    // Stacked events each open a lane, so the first-fit scan is quadratic.
    let stacked = vec![500.0; 3_000];
    handle.calculate(request(1_000.0, &stacked)).expect("running");

    state.changed().await.expect("service running");
    assert_eq!(*state.borrow_and_update(), ServiceState::Computing);

    let (first, _) = recv_pair(&mut events).await;
    let LayoutResponse::CombinedLayoutResult(combined) = first else {
        panic!("expected combined result first, got {first:?}");
    };
    assert_eq!(combined.max_level, 1_499);
    assert_eq!(*state.borrow_and_update(), ServiceState::Idle);
    assert_eq!(handle.state(), ServiceState::Idle);
}

#[tokio::test]
async fn mode_switch_needs_no_new_request() {
    let (handle, mut events) = LayoutService::spawn(&LayoutConfig::default());
    handle.calculate(request(900.0, &[100.0, 500.0])).expect("running");

    let mut view = LayoutView::new(DisplayMode::Combined);
    let (first, second) = recv_pair(&mut events).await;
    view.apply(first);
    view.apply(second);

    assert!(matches!(view.active(), Some(ActiveLayout::Combined(_))));
    view.set_mode(DisplayMode::Swimlane);
    assert!(matches!(
        view.active(),
        Some(ActiveLayout::Swimlane(r)) if r.events.len() == 2
    ));
    assert!(events.try_recv().is_none());
}

#[tokio::test]
async fn shutdown_closes_the_stream() {
    let (handle, mut events) = LayoutService::spawn(&LayoutConfig::default());
    handle.shutdown().expect("running");
    assert!(events.recv().await.is_none());
    // The actor is gone, so later requests fail.
    tokio::task::yield_now().await;
    assert!(handle.calculate(request(100.0, &[1.0])).is_err());
}
