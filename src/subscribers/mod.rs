//! # Event subscribers.
//!
//! ```text
//!   Supplier/Consumer ── publish(Event) ──► Bus ──► coordinator listener
//!                                                        │
//!                                                 SubscriberSet::emit
//!                                          ┌─────────────┼─────────────┐
//!                                          ▼             ▼             ▼
//!                                      LogWriter      Journal       custom
//! ```
//!
//! - [`Subscribe`] the extension trait
//! - [`SubscriberSet`] per-subscriber queues, overflow and panic isolation
//! - [`Journal`] in-memory recorder
//! - `LogWriter` tracing output (feature `logging`)

mod journal;
#[cfg(feature = "logging")]
mod log;
mod set;
mod subscriber;

pub use journal::Journal;
#[cfg(feature = "logging")]
pub use log::LogWriter;
pub(crate) use set::panic_message;
pub use set::SubscriberSet;
pub use subscriber::Subscribe;
