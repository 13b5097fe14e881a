use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::me::account_gone;
use crate::domain::user::models::ChangePasswordCommand;
use crate::domain::user::models::Username;
use crate::inbound::http::extractors::CurrentUser;
use crate::inbound::http::router::AppState;

pub async fn change_password(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<ApiSuccess<ChangePasswordResponseData>, ApiError> {
    let username =
        Username::new(identity.username().to_string()).map_err(|_| ApiError::unauthorized())?;

    let user = state
        .user_service
        .get_user_by_username(&username)
        .await
        .map_err(|e| account_gone(identity.username(), e))?;

    state
        .user_service
        .change_password(
            &user.id,
            ChangePasswordCommand {
                current_password: body.current_password,
                new_password: body.new_password,
            },
        )
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        ChangePasswordResponseData {
            message: "Password updated".to_string(),
        },
    ))
}

#[derive(Clone, Deserialize)]
pub struct ChangePasswordRequest {
    current_password: String,
    new_password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangePasswordResponseData {
    pub message: String,
}
