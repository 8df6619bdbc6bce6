//! The layout actor.
//!
//! ```text
//!   LayoutHandle (Clone, Send+Sync)   mpsc    LayoutActor (tokio task)
//!   ┌──────────────────────────┐  ───────▶  ┌────────────────────────────┐
//!   │ .calculate()             │            │ resize debounce            │
//!   │ .calculate_debounced()   │            │ spawn_blocking(compute)    │
//!   │ .calculate_and_wait()    │  ◀──────── │ Idle ⇄ Computing           │
//!   └──────────────────────────┘   oneshot  └────────────┬───────────────┘
//!                                                        │ mpsc
//!                                           LayoutEvents ◀┘ COMBINED_LAYOUT_RESULT
//!                                                          SWIMLANE_LAYOUT_RESULT
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use timeline_layout_core::{LayoutResults, compute_layouts};
use timeline_layout_protocol::{CalculateLayout, LayoutConfig, LayoutResponse, RequestId};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::Instant;

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("layout service shut down")]
    Shutdown,
    #[error("layout computation failed: {0}")]
    Computation(String),
}

/// Whether the service has a computation in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Idle,
    Computing,
}

// ============================================================================
// Commands (internal)
// ============================================================================

enum LayoutCommand {
    /// Event set or entity order changed: compute now.
    Calculate { request: CalculateLayout },
    /// Width changed: compute once the resize settles.
    CalculateDebounced { request: CalculateLayout },
    /// Compute now and reply directly instead of on the event stream.
    CalculateAndReply {
        request: CalculateLayout,
        reply: oneshot::Sender<Result<LayoutResults, ServiceError>>,
    },
    Shutdown,
}

// ============================================================================
// LayoutHandle (public API)
// ============================================================================

/// Cloneable handle to a running layout service.
///
/// Sending never blocks: requests are queued on an unbounded channel and
/// results arrive on the [`LayoutEvents`] stream returned by
/// [`LayoutService::spawn`].
#[derive(Clone)]
pub struct LayoutHandle {
    tx: mpsc::UnboundedSender<LayoutCommand>,
    next_id: Arc<AtomicU64>,
    state: watch::Receiver<ServiceState>,
}

impl LayoutHandle {
    /// Queue a recomputation. Any resize still waiting out its debounce is
    /// dropped, since this request carries the full current state.
    pub fn calculate(&self, request: CalculateLayout) -> Result<RequestId, ServiceError> {
        let (id, request) = self.stamp(request);
        self.send(LayoutCommand::Calculate { request })?;
        Ok(id)
    }

    /// Queue a resize-triggered recomputation. Only the last one sent within
    /// the debounce window is computed.
    pub fn calculate_debounced(&self, request: CalculateLayout) -> Result<RequestId, ServiceError> {
        let (id, request) = self.stamp(request);
        self.send(LayoutCommand::CalculateDebounced { request })?;
        Ok(id)
    }

    /// Compute and await both results directly.
    pub async fn calculate_and_wait(
        &self,
        request: CalculateLayout,
    ) -> Result<LayoutResults, ServiceError> {
        let (_, request) = self.stamp(request);
        let (reply, rx) = oneshot::channel();
        self.send(LayoutCommand::CalculateAndReply { request, reply })?;
        rx.await.map_err(|_| ServiceError::Shutdown)?
    }

    pub fn state(&self) -> ServiceState {
        *self.state.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<ServiceState> {
        self.state.clone()
    }

    /// Stop the actor after any in-flight computation. A pending debounced
    /// request is discarded.
    pub fn shutdown(&self) -> Result<(), ServiceError> {
        self.send(LayoutCommand::Shutdown)
    }

    fn stamp(&self, mut request: CalculateLayout) -> (RequestId, CalculateLayout) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        request.request_id = Some(id);
        (id, request)
    }

    fn send(&self, command: LayoutCommand) -> Result<(), ServiceError> {
        self.tx.send(command).map_err(|_| ServiceError::Shutdown)
    }
}

/// Stream of layout responses, two per computed request.
pub struct LayoutEvents {
    rx: mpsc::UnboundedReceiver<LayoutResponse>,
}

impl LayoutEvents {
    /// `None` once the service has shut down and every response is drained.
    pub async fn recv(&mut self) -> Option<LayoutResponse> {
        self.rx.recv().await
    }

    /// Non-blocking poll, for render loops.
    pub fn try_recv(&mut self) -> Option<LayoutResponse> {
        self.rx.try_recv().ok()
    }
}

// ============================================================================
// LayoutService / actor loop
// ============================================================================

pub struct LayoutService;

impl LayoutService {
    /// Start a layout actor on the current tokio runtime.
    ///
    /// Must be called from within a runtime context.
    pub fn spawn(config: &LayoutConfig) -> (LayoutHandle, LayoutEvents) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ServiceState::Idle);

        let actor = LayoutActor {
            rx,
            events_tx,
            state_tx,
            debounce: Duration::from_millis(config.resize_debounce_ms),
            pending: None,
        };
        tokio::spawn(actor.run());

        let handle = LayoutHandle {
            tx,
            next_id: Arc::new(AtomicU64::new(0)),
            state: state_rx,
        };
        (handle, LayoutEvents { rx: events_rx })
    }
}

struct PendingResize {
    request: CalculateLayout,
    deadline: Instant,
}

enum Wake {
    Command(Option<LayoutCommand>),
    DebounceElapsed,
}

struct LayoutActor {
    rx: mpsc::UnboundedReceiver<LayoutCommand>,
    events_tx: mpsc::UnboundedSender<LayoutResponse>,
    state_tx: watch::Sender<ServiceState>,
    debounce: Duration,
    pending: Option<PendingResize>,
}

impl LayoutActor {
    async fn run(mut self) {
        tracing::debug!("layout service started");
        loop {
            let wake = match self.pending.as_ref().map(|p| p.deadline) {
                Some(deadline) => tokio::select! {
                    command = self.rx.recv() => Wake::Command(command),
                    () = tokio::time::sleep_until(deadline) => Wake::DebounceElapsed,
                },
                None => Wake::Command(self.rx.recv().await),
            };

            match wake {
                Wake::DebounceElapsed => {
                    if let Some(pending) = self.pending.take() {
                        self.publish(pending.request).await;
                    }
                }
                Wake::Command(Some(LayoutCommand::Calculate { request })) => {
                    if let Some(superseded) = self.pending.take() {
                        tracing::debug!(
                            request_id = superseded.request.request_id,
                            "pending resize superseded"
                        );
                    }
                    self.publish(request).await;
                }
                Wake::Command(Some(LayoutCommand::CalculateDebounced { request })) => {
                    if let Some(superseded) = self.pending.take() {
                        tracing::trace!(
                            request_id = superseded.request.request_id,
                            "resize coalesced"
                        );
                    }
                    self.pending = Some(PendingResize {
                        request,
                        deadline: Instant::now() + self.debounce,
                    });
                }
                Wake::Command(Some(LayoutCommand::CalculateAndReply { request, reply })) => {
                    let result = self.compute(request).await;
                    // The caller may have stopped waiting.
                    let _ = reply.send(result);
                }
                Wake::Command(Some(LayoutCommand::Shutdown) | None) => break,
            }
        }
        tracing::debug!("layout service stopped");
    }

    /// Compute and emit both responses on the event stream.
    async fn publish(&mut self, request: CalculateLayout) {
        let request_id = request.request_id;
        match self.compute(request).await {
            Ok(results) => {
                let delivered = self
                    .events_tx
                    .send(LayoutResponse::CombinedLayoutResult(results.combined))
                    .and_then(|()| {
                        self.events_tx
                            .send(LayoutResponse::SwimlaneLayoutResult(results.swimlane))
                    });
                if delivered.is_err() {
                    tracing::warn!(request_id, "layout consumer gone, response dropped");
                }
            }
            Err(e) => tracing::warn!(request_id, error = %e, "layout computation failed"),
        }
    }

    async fn compute(&mut self, request: CalculateLayout) -> Result<LayoutResults, ServiceError> {
        self.state_tx.send_replace(ServiceState::Computing);
        let started = Instant::now();
        let request_id = request.request_id;

        let result = tokio::task::spawn_blocking(move || compute_layouts(&request))
            .await
            .map_err(|e| ServiceError::Computation(e.to_string()));

        self.state_tx.send_replace(ServiceState::Idle);
        tracing::debug!(
            request_id,
            elapsed_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX),
            "layout request finished"
        );
        result
    }
}
