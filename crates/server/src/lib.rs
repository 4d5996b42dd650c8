//! HTTP surface for the intake agent
//!
//! - [`routes`]: axum router and handlers
//! - [`sessions`]: in-memory registry with idle expiry
//! - [`telemetry`]: tracing subscriber and Prometheus counters

pub mod error;
pub mod routes;
pub mod sessions;
pub mod state;
pub mod telemetry;

pub use error::ServerError;
pub use routes::{create_router, STAFF_TOKEN_HEADER};
pub use sessions::SessionRegistry;
pub use state::AppState;
