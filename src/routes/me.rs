//! Session and profile routes
//!
//! Sign-in itself happens in the hosted identity widget; these handlers load
//! the resulting user record into the user store and keep it current.

use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use crate::api::response::{DataResponse, MessageResponse};
use crate::app::AppState;
use crate::auth::RequireUser;
use crate::domain::profiles::LoginRequest;
use crate::domain::{ProfileUpdate, UserIdentity};
use crate::error::ApiError;

/// POST /session
///
/// Load the signed-in user's profile and mark the session authenticated.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.users.lock().set_loading(true);

    let user = state
        .records
        .fetch_user(req.user_id)
        .await
        .map_err(|e| state.user_failure(e))?;

    state.users.lock().set_user(Some(&user));
    tracing::info!(user_id = user.id, "Session started");

    Ok(DataResponse::new(user))
}

/// DELETE /session
///
/// Sign out and drop everything loaded for the previous user.
pub async fn logout(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.users.lock().clear_user();
    {
        let mut tasks = state.tasks.lock();
        tasks.replace_all(Vec::new());
        tasks.set_current(None);
    }
    tracing::info!("Session ended");

    MessageResponse::new("Signed out")
}

/// GET /me
///
/// Get current authenticated user info
pub async fn get_me(user: RequireUser) -> impl IntoResponse {
    DataResponse::new(user.0)
}

/// PUT /me
///
/// Update the editable profile fields.
pub async fn update_me(
    State(state): State<Arc<AppState>>,
    user: RequireUser,
    Json(req): Json<ProfileUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    if req.first_name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(ApiError::bad_request("First name cannot be empty"));
    }

    state.users.lock().set_loading(true);
    let updated = state
        .records
        .update_user(user.id, &req)
        .await
        .map_err(|e| state.user_failure(e))?;

    // Email and avatar are owned by the identity provider, keep ours.
    let next = UserIdentity {
        first_name: updated.first_name,
        last_name: updated.last_name,
        phone: updated.phone,
        ..user.0
    };

    state.users.lock().set_user(Some(&next));
    Ok(DataResponse::new(next))
}
