use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;
use crate::identity::Role;

/// Identity claims carried by an access token.
///
/// Constructed fresh for every issued token and rebuilt on every decode;
/// never persisted. Time fields are Unix timestamps in seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Account username
    pub username: String,

    /// Account role
    pub role: Role,

    /// Subject (same value as `username`)
    pub sub: String,

    /// Issued at
    pub iat: i64,

    /// Not before
    pub nbf: i64,

    /// Expiration time
    pub exp: i64,
}

impl Claims {
    /// Create claims for a user, valid from `now` for `lifetime`.
    ///
    /// # Arguments
    /// * `username` - Account username
    /// * `role` - Account role
    /// * `now` - Issue instant
    /// * `lifetime` - Validity window length
    ///
    /// # Returns
    /// Claims with `iat == nbf == now` and `exp == now + lifetime`
    ///
    /// # Errors
    /// * `EncodingFailed` - `now + lifetime` is outside the representable range
    pub fn for_user(
        username: impl Into<String>,
        role: Role,
        now: DateTime<Utc>,
        lifetime: Duration,
    ) -> Result<Self, JwtError> {
        let expires_at = now.checked_add_signed(lifetime).ok_or_else(|| {
            JwtError::EncodingFailed(format!("Token lifetime {} overflows expiration time", lifetime))
        })?;

        let username = username.into();
        let issued_at = now.timestamp();

        Ok(Self {
            sub: username.clone(),
            username,
            role,
            iat: issued_at,
            nbf: issued_at,
            exp: expires_at.timestamp(),
        })
    }

    /// Check if token is expired (strictly past `exp`).
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp > self.exp
    }

    /// Check if token is not yet valid.
    pub fn is_premature(&self, current_timestamp: i64) -> bool {
        current_timestamp < self.nbf
    }
}
