use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::Username;
use crate::inbound::http::extractors::CurrentUser;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// Profile of the account the bearer token was issued to.
pub async fn me(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
) -> Result<ApiSuccess<UserData>, ApiError> {
    // A signed token can outlive its account; treat that as unauthenticated.
    let username = Username::new(identity.username().to_string()).map_err(|e| {
        tracing::warn!(username = identity.username(), error = %e, "Token carries unusable username");
        ApiError::unauthorized()
    })?;

    state
        .user_service
        .get_user_by_username(&username)
        .await
        .map_err(|e| account_gone(identity.username(), e))
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

/// Maps a missing account behind a valid token to 401; other errors pass through.
pub(super) fn account_gone(username: &str, err: UserError) -> ApiError {
    match err {
        UserError::NotFoundByUsername(_) => {
            tracing::warn!(username = username, "Token refers to a missing account");
            ApiError::unauthorized()
        }
        other => ApiError::from(other),
    }
}
