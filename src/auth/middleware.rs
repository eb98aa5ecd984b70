use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;

use crate::app::AppState;
use crate::domain::UserIdentity;
use crate::error::ApiError;

/// Extractor that requires a signed-in session.
///
/// Resolves to a snapshot of the identity held by the user store.
///
/// Example:
/// ```ignore
/// async fn protected_route(user: RequireUser) -> impl IntoResponse {
///     format!("Hello, {}", user.first_name)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireUser(pub UserIdentity);

impl std::ops::Deref for RequireUser {
    type Target = UserIdentity;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let users = state.users.lock();
        if !users.is_authenticated() {
            return Err(ApiError::Unauthorized("Sign in required".to_string()));
        }

        users
            .user()
            .cloned()
            .map(RequireUser)
            .ok_or_else(|| ApiError::Unauthorized("Sign in required".to_string()))
    }
}
