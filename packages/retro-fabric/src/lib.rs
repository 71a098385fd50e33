//! Named-queue task routing between callers and queue-bound workers.
//!
//! Callers [`Fabric::submit`] opaque JSON payloads to a logical queue and await a
//! [`TaskHandle`]. Workers bind one or more queues and execute one task at a time. Long-lived
//! per-worker state lives in a [`ResourceSlot`], never in the fabric.

pub mod fabric;
pub mod queue;
pub mod slot;
pub mod task;
pub mod worker;

mod error;

pub use error::{Error, Result};
pub use fabric::{Fabric, QueueConsumer};
pub use queue::{QueueName, QueueSet};
pub use slot::{ResourceSlot, SlotStatus};
pub use task::{Task, TaskFailure, TaskHandle};
pub use worker::{TaskHandler, Worker, WorkerHandle};
