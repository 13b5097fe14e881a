use std::convert::Infallible;

use async_trait::async_trait;
use auth::Identity;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::handlers::ApiError;

/// Identity of the caller on routes behind `require_authentication`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

/// Identity of the caller on routes behind `optional_authentication`;
/// `None` for anonymous requests.
#[derive(Debug, Clone)]
pub struct MaybeCurrentUser(pub Option<Identity>);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| {
                tracing::error!(
                    path = %parts.uri.path(),
                    "Identity missing; route is not behind require_authentication"
                );
                ApiError::unauthorized()
            })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeCurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeCurrentUser(parts.extensions.get::<Identity>().cloned()))
    }
}
