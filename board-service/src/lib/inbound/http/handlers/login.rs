use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::AuthenticatedSession;
use crate::domain::user::models::Credentials;
use crate::domain::user::models::Username;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    // A username that could never have been registered is just another bad login.
    let username = Username::new(body.username).map_err(|_| ApiError::invalid_credentials())?;

    state
        .user_service
        .login(Credentials {
            username,
            password: body.password,
        })
        .await
        .map_err(ApiError::from)
        .map(|ref session| ApiSuccess::new(StatusCode::OK, session.into()))
}

#[derive(Clone, Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token: String,
    pub user: UserData,
}

impl From<&AuthenticatedSession> for LoginResponseData {
    fn from(session: &AuthenticatedSession) -> Self {
        Self {
            token: session.token.clone(),
            user: (&session.user).into(),
        }
    }
}
