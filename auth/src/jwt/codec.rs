use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;
use crate::identity::Role;

/// Signing algorithm for every issued token. Tokens declaring anything else are rejected.
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS512;

/// Access token codec.
///
/// Mints and verifies compact HS512 tokens with a single shared secret. Holds no
/// mutable state, so one instance can be shared freely between request tasks.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl TokenCodec {
    /// Create a new codec with a secret key and token lifetime.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    /// * `lifetime` - Validity window of every issued token
    ///
    /// # Security Notes
    /// - The secret should be at least 512 bits (64 bytes) for HS512
    /// - Compromise of the secret compromises every outstanding token
    pub fn new(secret: &[u8], lifetime: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            lifetime,
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Mint a signed token for a user.
    ///
    /// # Arguments
    /// * `username` - Account username
    /// * `role` - Account role
    /// * `now` - Issue instant
    ///
    /// # Returns
    /// Compact token string (`header.claims.signature`)
    ///
    /// # Errors
    /// * `EncodingFailed` - Expiration overflows, or claims serialization or signing failed
    pub fn create(&self, username: &str, role: Role, now: DateTime<Utc>) -> Result<String, JwtError> {
        let claims = Claims::for_user(username, role, now, self.lifetime)?;
        let header = Header::new(TOKEN_ALGORITHM);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify a token's algorithm, signature and validity window.
    ///
    /// # Arguments
    /// * `token` - Compact token string
    /// * `now` - Instant to check the validity window against
    ///
    /// # Errors
    /// * `Malformed` - Token structure cannot be parsed
    /// * `InvalidSignature` - Signature mismatch or unexpected algorithm
    /// * `Expired` - `now` is past the expiration time
    /// * `Invalid` - Any other rejection (e.g. not valid yet)
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<(), JwtError> {
        self.verified_claims(token, now).map(|_| ())
    }

    /// Verify a token like [`TokenCodec::validate`] and return its claims.
    ///
    /// # Errors
    /// Everything [`TokenCodec::validate`] returns, plus
    /// * `MissingClaims` - Token verifies but carries an empty username
    pub fn parse(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, JwtError> {
        let claims = self.verified_claims(token, now)?;

        if claims.username.is_empty() {
            return Err(JwtError::MissingClaims);
        }

        Ok(claims)
    }

    fn verified_claims(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, JwtError> {
        // Time checks run against the caller's clock below, not the system clock.
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| classify(token, e.into_kind()))?
            .claims;

        let timestamp = now.timestamp();
        if claims.is_expired(timestamp) {
            return Err(JwtError::Expired);
        }
        if claims.is_premature(timestamp) {
            return Err(JwtError::Invalid("Token is not valid yet".to_string()));
        }

        Ok(claims)
    }
}

fn classify(token: &str, kind: ErrorKind) -> JwtError {
    match kind {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => JwtError::InvalidSignature,
        ErrorKind::Json(_) if names_unsupported_algorithm(token) => JwtError::InvalidSignature,
        ErrorKind::ExpiredSignature => JwtError::Expired,
        ErrorKind::MissingRequiredClaim(_) => JwtError::MissingClaims,
        ErrorKind::InvalidToken => JwtError::Malformed("Expected three dot-separated segments".to_string()),
        ErrorKind::Base64(e) => JwtError::Malformed(e.to_string()),
        ErrorKind::Json(e) => JwtError::Malformed(e.to_string()),
        ErrorKind::Utf8(e) => JwtError::Malformed(e.to_string()),
        other => JwtError::Invalid(format!("{:?}", other)),
    }
}

/// True when the header is well-formed JSON that still fails to describe a known
/// algorithm, e.g. `"alg": "none"` or a missing `alg`.
fn names_unsupported_algorithm(token: &str) -> bool {
    match jsonwebtoken::decode_header(token).map_err(|e| e.into_kind()) {
        Err(ErrorKind::Json(e)) => e.is_data(),
        _ => false,
    }
}
