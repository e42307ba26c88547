//! platform-core: Shared infrastructure for the learning platform clients.
pub mod error;
pub mod middleware;
pub mod observability;
pub mod timer;

pub use axum;
pub use serde;
pub use tokio;
pub use tracing;
