//! Runtime core: shared state, workers and orchestration.
//!
//! The public entry point is [`Coordinator`], built through
//! [`CoordinatorBuilder`], which runs suppliers and consumers over one shared
//! [`Pantry`] until the consumers' work is exhausted.
//!
//! Internal modules:
//! - [`pantry`]: stockpile, signals, running token and bus behind one handle;
//! - [`supplier`]: restocks one ingredient when signaled;
//! - [`consumer`]: acquires recipe ingredients with retry and backoff;
//! - [`coordinator`]: spawns workers, drives shutdown, builds the report;
//! - [`builder`]: validates config and assembles a coordinator.

mod builder;
mod consumer;
mod coordinator;
mod pantry;
mod supplier;

pub use builder::CoordinatorBuilder;
pub use consumer::{Consumer, ConsumerExit, ConsumerParams};
pub use coordinator::{Coordinator, RunReport};
pub use pantry::{Pantry, Restock};
pub use supplier::Supplier;
