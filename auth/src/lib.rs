//! Authentication core library
//!
//! Provides the authentication infrastructure for the board service:
//! - Password hashing (bcrypt, cost 10) and strength policy
//! - HS512 access token creation, validation and parsing
//! - `Authorization: Bearer` header parsing into a typed [`Identity`]
//! - Role gating for administrative surfaces
//!
//! Nothing here performs I/O or holds mutable shared state. Framework glue
//! (middleware, extractors, status codes) lives in the service crate.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! hasher.validate_strength("password123").unwrap();
//! let hash = hasher.hash("password123").unwrap();
//! assert!(hasher.verify("password123", &hash));
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{Role, TokenCodec};
//! use chrono::{Duration, Utc};
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_64_bytes_long_for_hs512_token_signing_ok!!", Duration::hours(24));
//! let now = Utc::now();
//! let token = codec.create("alice", Role::User, now).unwrap();
//! let claims = codec.parse(&token, now).unwrap();
//! assert_eq!(claims.username, "alice");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{require_role, Authenticator, Role};
//! use chrono::Duration;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_64_bytes_long_for_hs512_token_signing_ok!!", Duration::hours(24));
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and generate token
//! let result = auth.authenticate("password123", &hash, "alice", Role::User).unwrap();
//!
//! // Later request: authenticate the header, then gate on role
//! let header = format!("Bearer {}", result.access_token);
//! let identity = auth.authenticate_request(Some(&header)).unwrap();
//! assert_eq!(identity.username(), "alice");
//! assert!(require_role(Some(&identity), Role::Admin).is_err());
//! ```

pub mod authenticator;
pub mod authorization;
pub mod bearer;
pub mod clock;
pub mod identity;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use authorization::require_role;
pub use authorization::AuthorizationError;
pub use bearer::extract_bearer_token;
pub use bearer::BearerError;
pub use clock::Clock;
pub use clock::SystemClock;
pub use identity::Identity;
pub use identity::Role;
pub use identity::RoleError;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::TokenCodec;
pub use password::PasswordError;
pub use password::PasswordHasher;
