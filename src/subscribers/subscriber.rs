//! # Event subscriber trait.
//!
//! [`Subscribe`] is the extension point for observing a pantry run: logging,
//! metrics, assertions in tests.
//!
//! Each subscriber gets:
//! - a **dedicated worker task**,
//! - a **bounded queue** (capacity via [`Subscribe::queue_capacity`]),
//! - **panic isolation** (a panic is reported as `EventKind::SubscriberPanicked`).
//!
//! ```text
//! SubscriberSet ──► [bounded queue] ──► worker task ──► subscriber.on_event()
//!                                    └─► panic caught → EventKind::SubscriberPanicked
//! ```
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use pantry::{Event, EventKind, Subscribe};
//!
//! struct Restocks;
//!
//! #[async_trait]
//! impl Subscribe for Restocks {
//!     async fn on_event(&self, ev: &Event) {
//!         if matches!(ev.kind, EventKind::Replenished) {
//!             // count it, export it, ...
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "restocks" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Event subscriber for runtime observability.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; do not panic.
/// - Slow processing only fills this subscriber's own queue.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event, in FIFO order for this subscriber.
    async fn on_event(&self, event: &Event);

    /// Name used in overflow/panic events. Defaults to the type name.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred queue capacity (clamped to at least 1). Default: 1024.
    ///
    /// On overflow the event is dropped for this subscriber only and a
    /// `SubscriberOverflow` event is published.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
