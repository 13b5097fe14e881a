use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use auth::Role;
use axum::body::Body;
use axum::http::HeaderValue;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::AllowOrigin;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::auth_status::auth_status;
use super::handlers::change_password::change_password;
use super::handlers::get_user::get_user;
use super::handlers::get_user::get_user_by_username;
use super::handlers::list_users::list_users;
use super::handlers::login::login;
use super::handlers::me::me;
use super::handlers::register::register;
use super::middleware::optional_authentication;
use super::middleware::require_authentication;
use super::middleware::require_role;
use crate::domain::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub authenticator: Arc<Authenticator>,
}

pub fn create_router(
    user_service: Arc<dyn UserServicePort>,
    authenticator: Arc<Authenticator>,
    allowed_origins: &[String],
) -> Router {
    let state = AppState {
        user_service,
        authenticator: Arc::clone(&authenticator),
    };

    let public_routes = Router::new()
        .route("/api/register", post(register))
        .route("/api/login", post(login));

    let optional_routes = Router::new()
        .route("/api/auth/status", get(auth_status))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&authenticator),
            optional_authentication,
        ));

    let protected_routes = Router::new()
        .route("/api/auth/me", get(me))
        .route("/api/auth/password", put(change_password))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&authenticator),
            require_authentication,
        ));

    // Layers run outermost-last: authentication first, then the role gate.
    let admin_routes = Router::new()
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/users/:user_id", get(get_user))
        .route(
            "/api/admin/users/username/:username",
            get(get_user_by_username),
        )
        .route_layer(middleware::from_fn_with_state(Role::Admin, require_role))
        .route_layer(middleware::from_fn_with_state(
            authenticator,
            require_authentication,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(optional_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        .layer(trace_layer)
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

/// Permissive when no origins are configured.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
