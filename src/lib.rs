//! Explorer Gateway - read-only API over a blockchain index
//!
//! Serves tokens, NFTs, validators and network statistics, joining indexed
//! records with live JSON-RPC data behind a response cache and per-client
//! rate limiting.

pub mod api;
pub mod cache;
pub mod chain;
pub mod clock;
pub mod config;
pub mod error;
pub mod limiter;
pub mod models;
pub mod pipeline;
pub mod reconcile;
pub mod storage;
pub mod tasks;

pub use api::{create_router, AppState};
pub use config::Config;
pub use error::{AppError, Result};
pub use pipeline::{Pipeline, RequestContext, RoutePolicy};
pub use tasks::spawn_cleanup_task;
