use axum::{extract::State, Json};
use platform_core::error::FlowError;

use crate::models::UserProfile;
use crate::AppState;

/// Protected placeholder: echoes the signed-in profile.
///
/// The profile can be absent on a fresh federated session, where only the
/// tokens come back from the exchange.
pub async fn dashboard_handler(
    State(state): State<AppState>,
) -> Result<Json<Option<UserProfile>>, FlowError> {
    let snapshot = state.sessions.current().ok_or(FlowError::StaleSession)?;
    Ok(Json(snapshot.profile))
}
