//! HTTP API for tabmerge.
//!
//! Every route sits behind a static `X-API-Key` check. Pipeline runs,
//! exports and SQLite writes happen on the blocking thread pool.
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | GET  | `/` | service status |
//! | GET  | `/datasets` | catalog listing |
//! | GET  | `/datasets/{name}/schema` | column kinds and row count |
//! | GET  | `/datasets/{name}` | one dataset as json, csv or xlsx |
//! | GET  | `/etl/preview` | JSON window of the merged table |
//! | GET  | `/etl/download` | merged table as a download |
//! | POST | `/etl/persist` | merged table into SQLite |

mod auth;
mod config;
mod error;
mod handlers;
mod server;
mod state;

pub use auth::{API_KEY_HEADER, require_api_key};
pub use config::AppConfig;
pub use error::ApiError;
pub use server::{router, serve};
pub use state::AppState;
