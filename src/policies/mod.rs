//! Retry, acquisition and restock policies.
//!
//! ## Contents
//! - [`BackoffPolicy`] how long a starved consumer waits before looking again
//! - [`JitterPolicy`] randomization of those waits
//! - [`AcquisitionStrategy`] one ingredient at a time, or the whole recipe at once
//! - [`ResupplyPolicy`] which shortages wake a supplier
//!
//! ## Quick wiring
//! ```text
//! Config { backoff, acquisition, resupply, .. }
//!      └─► core::consumer uses backoff.next(retry) between looks
//!      └─► core::pantry uses resupply to decide notify/restock
//! ```

mod acquisition;
mod backoff;
mod jitter;
mod resupply;

pub use acquisition::AcquisitionStrategy;
pub use backoff::BackoffPolicy;
pub use jitter::JitterPolicy;
pub use resupply::ResupplyPolicy;
