//! Runtime events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`], [`ResupplyCause`] event classification and payload
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Pantry` (resupply requests), `Supplier`, `Consumer`,
//!   `Coordinator`, `SubscriberSet` workers (overflow/panic).
//! - **Consumer**: the coordinator's listener, which fans out to `SubscriberSet`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind, ResupplyCause};
