use std::sync::Arc;

use auth::AuthenticationError;
use auth::Authenticator;
use auth::BearerError;
use auth::Identity;
use auth::Role;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::ApiError;

/// Rejects the request with 401 unless it carries a valid bearer token, then
/// attaches the caller's [`Identity`] to the request extensions.
///
/// Every failure produces the same client response; the specific cause is
/// only logged.
pub async fn require_authentication(
    State(authenticator): State<Arc<Authenticator>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = authenticate(&authenticator, &req).map_err(|e| {
        if e.is_client_error() {
            tracing::warn!(path = %req.uri().path(), error = %e, "Authentication failed");
        } else {
            tracing::error!(path = %req.uri().path(), error = %e, "Authentication failed");
        }
        ApiError::unauthorized()
    })?;

    tracing::debug!(
        username = identity.username(),
        role = %identity.role(),
        path = %req.uri().path(),
        "User authenticated"
    );

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

/// Attaches an [`Identity`] when the request carries a valid bearer token and
/// lets it through anonymously otherwise.
///
/// A present but invalid token (expired, tampered, malformed) is treated as
/// anonymous, not rejected; it is logged so forged tokens stay visible.
pub async fn optional_authentication(
    State(authenticator): State<Arc<Authenticator>>,
    mut req: Request,
    next: Next,
) -> Response {
    match authenticate(&authenticator, &req) {
        Ok(identity) => {
            tracing::debug!(
                username = identity.username(),
                role = %identity.role(),
                path = %req.uri().path(),
                "User authenticated"
            );
            req.extensions_mut().insert(identity);
        }
        Err(AuthenticationError::MissingHeader) => {}
        Err(e) => {
            tracing::warn!(
                path = %req.uri().path(),
                error = %e,
                "Invalid credentials on optional route, continuing anonymously"
            );
        }
    }

    next.run(req).await
}

/// Rejects the request with 403 unless the identity attached by
/// [`require_authentication`] has exactly the role held in state.
///
/// Must be layered inside `require_authentication`.
pub async fn require_role(
    State(required): State<Role>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    auth::require_role(req.extensions().get::<Identity>(), required)
        .map(|_| ())
        .map_err(|e| {
            tracing::warn!(
                path = %req.uri().path(),
                required_role = %required,
                error = %e,
                "Authorization failed"
            );
            ApiError::forbidden()
        })?;

    Ok(next.run(req).await)
}

fn authenticate(authenticator: &Authenticator, req: &Request) -> Result<Identity, AuthenticationError> {
    let header_value = match req.headers().get(AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| {
            AuthenticationError::MalformedHeader(BearerError::InvalidEncoding)
        })?),
        None => None,
    };

    authenticator.authenticate_request(header_value)
}
