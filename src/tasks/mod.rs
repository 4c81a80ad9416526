//! Background Tasks Module
//!
//! Contains background tasks that run periodically while a cache is alive.
//!
//! # Tasks
//! - Sweep: removes expired entries and enforces the capacity bound

mod cleanup;

pub use cleanup::{spawn_sweep_task, Sweepable};
