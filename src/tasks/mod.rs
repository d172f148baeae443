//! Background Tasks Module
//!
//! # Tasks
//! - Cleanup: sweeps expired cache entries and ended rate windows

mod cleanup;

pub use cleanup::spawn_cleanup_task;
