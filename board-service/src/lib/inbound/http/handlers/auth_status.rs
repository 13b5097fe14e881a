use auth::Role;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiSuccess;
use crate::inbound::http::extractors::MaybeCurrentUser;

pub async fn auth_status(
    MaybeCurrentUser(identity): MaybeCurrentUser,
) -> ApiSuccess<AuthStatusResponseData> {
    let data = match identity {
        Some(identity) => AuthStatusResponseData {
            authenticated: true,
            username: Some(identity.username().to_string()),
            role: Some(identity.role()),
        },
        None => AuthStatusResponseData {
            authenticated: false,
            username: None,
            role: None,
        },
    };

    ApiSuccess::new(StatusCode::OK, data)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthStatusResponseData {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}
