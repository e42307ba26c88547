use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Failure taxonomy for identity flows.
///
/// Every flow catches at its own top level and maps what happened into one of
/// these variants; nothing lower-level crosses a flow boundary.
#[derive(Debug, Error)]
pub enum FlowError {
    /// A local precondition failed; no request was issued.
    #[error("{0}")]
    Validation(String),

    /// The identity service rejected the request with a readable message,
    /// surfaced verbatim.
    #[error("{message}")]
    Server { message: String },

    /// The transport failed or the response body was unreadable; carries the
    /// generic user-facing fallback, never the transport internals.
    #[error("{0}")]
    Transport(String),

    /// A protected action was attempted with no session present.
    #[error("No active session")]
    StaleSession,

    /// The flow already has a request in flight; the duplicate submission was
    /// dropped without touching the network.
    #[error("Another request is already in progress")]
    InFlight,
}

impl FlowError {
    pub fn validation(message: impl Into<String>) -> Self {
        FlowError::Validation(message.into())
    }

    pub fn server(message: impl Into<String>) -> Self {
        FlowError::Server {
            message: message.into(),
        }
    }

    /// The user-facing message for this failure.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl IntoResponse for FlowError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
        }

        let status = match &self {
            FlowError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            FlowError::Server { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            FlowError::Transport(_) => StatusCode::BAD_GATEWAY,
            FlowError::StaleSession => StatusCode::UNAUTHORIZED,
            FlowError::InFlight => StatusCode::CONFLICT,
        };

        (
            status,
            Json(ErrorResponse {
                error: self.message(),
            }),
        )
            .into_response()
    }
}
