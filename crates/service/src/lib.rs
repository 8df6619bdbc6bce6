//! Asynchronous boundary around the layout engines.
//!
//! A timeline view owns one [`LayoutService`]. It sends full recomputation
//! requests through a [`LayoutHandle`] without blocking, the engines run on
//! tokio's blocking pool, and both layouts come back on [`LayoutEvents`]
//! tagged with the request id. A [`LayoutView`] on the consumer side keeps
//! the newest result per mode.
//!
//! In-flight work is never cancelled and there are no timeouts: a stalled
//! computation delays later responses until it finishes.

mod actor;
mod view;

pub use actor::{LayoutEvents, LayoutHandle, LayoutService, ServiceError, ServiceState};
pub use view::{ActiveLayout, DisplayMode, LayoutView};
