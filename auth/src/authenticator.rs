use std::sync::Arc;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::bearer::extract_bearer_token;
use crate::bearer::BearerError;
use crate::clock::Clock;
use crate::clock::SystemClock;
use crate::identity::Identity;
use crate::identity::Role;
use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::TokenCodec;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and token handling.
///
/// Constructed once at startup from the signing secret and token lifetime and
/// then shared read-only (typically behind `Arc`) by every request.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_codec: TokenCodec,
    clock: Arc<dyn Clock>,
}

/// Result of successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationResult {
    /// Signed access token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing Authorization header")]
    MissingHeader,

    #[error("Malformed Authorization header: {0}")]
    MalformedHeader(#[from] BearerError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] JwtError),
}

impl AuthenticationError {
    /// Whether the failure was caused by what the caller sent rather than by
    /// an internal fault (hashing or signing).
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            AuthenticationError::Password(PasswordError::HashingFailed(_))
                | AuthenticationError::Token(JwtError::EncodingFailed(_))
        )
    }
}

impl Authenticator {
    /// Create a new authenticator on the system clock.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for token signing
    /// * `token_lifetime` - Validity window of issued tokens
    pub fn new(jwt_secret: &[u8], token_lifetime: Duration) -> Self {
        Self::with_clock(jwt_secret, token_lifetime, Arc::new(SystemClock))
    }

    /// Create a new authenticator reading time from `clock`.
    pub fn with_clock(jwt_secret: &[u8], token_lifetime: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            token_codec: TokenCodec::new(jwt_secret, token_lifetime),
            clock,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn token_lifetime(&self) -> Duration {
        self.token_codec.lifetime()
    }

    /// Hash a password for storage.
    ///
    /// Blocking and deliberately slow; async callers should move it off the
    /// reactor.
    ///
    /// # Errors
    /// * `PasswordError` - Empty, longer than 72 bytes, or hashing failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify a password against a stored hash. Blocking.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Check a candidate password against the length policy.
    pub fn validate_password_strength(&self, password: &str) -> Result<(), PasswordError> {
        self.password_hasher.validate_strength(password)
    }

    /// Verify credentials and mint a token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `username` - Username to encode in the token
    /// * `role` - Role to encode in the token
    ///
    /// # Returns
    /// AuthenticationResult with access token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `Token` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        username: &str,
        role: Role,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash) {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.issue_token(username, role)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Mint a token without password verification.
    ///
    /// For flows where the credentials were just established, such as
    /// registration.
    pub fn issue_token(&self, username: &str, role: Role) -> Result<String, JwtError> {
        self.token_codec.create(username, role, self.clock.now())
    }

    /// Verify a token and return its claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.token_codec.parse(token, self.clock.now())
    }

    /// Authenticate a request from its raw `Authorization` header value.
    ///
    /// # Arguments
    /// * `authorization` - Header value, `None` when the header is absent
    ///
    /// # Returns
    /// The caller's identity
    ///
    /// # Errors
    /// * `MissingHeader` - No header
    /// * `MalformedHeader` - Not `Bearer <token>`
    /// * `Token` - Token failed verification or carries no username
    pub fn authenticate_request(
        &self,
        authorization: Option<&str>,
    ) -> Result<Identity, AuthenticationError> {
        let header_value = authorization.ok_or(AuthenticationError::MissingHeader)?;
        let token = extract_bearer_token(header_value)?;
        let claims = self.validate_token(token)?;

        Ok(Identity::new(claims.username, claims.role))
    }
}
