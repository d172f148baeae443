//! API Module
//!
//! HTTP surface of the gateway.
//!
//! # Endpoints
//! - `GET /health` - Liveness plus cache and limiter counters
//! - `GET /api/validators[/:pubkey]` - Validators reconciled with the live node
//! - `GET /api/tokens[/:address[/holders|/transfers]]` - Indexed tokens
//! - `GET /api/nfts/collections[...]` - NFT collections, items and history
//! - `GET /api/search/:query` - First match by hash, pubkey or token name
//! - `GET /api/stats/current|performance` - Live network statistics

pub mod extract;
pub mod handlers;
pub mod routes;

pub use extract::{client_key, ClientSource};
pub use handlers::AppState;
pub use routes::create_router;
