use thiserror::Error;

/// Authentication scheme expected in the `Authorization` header.
pub const BEARER_SCHEME: &str = "Bearer";

/// Error for `Authorization` header parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BearerError {
    #[error("Authorization header has no scheme separator")]
    MissingSeparator,

    #[error("Authorization header must use the Bearer scheme")]
    UnsupportedScheme,

    #[error("Authorization header carries an empty token")]
    EmptyToken,

    #[error("Authorization header is not valid ASCII")]
    InvalidEncoding,
}

/// Extract the token from a `Bearer <token>` header value.
///
/// Splits on the first space only. The scheme must be exactly `Bearer`
/// (case-sensitive); the remainder is trimmed and must be non-empty.
pub fn extract_bearer_token(header_value: &str) -> Result<&str, BearerError> {
    let (scheme, token) = header_value
        .split_once(' ')
        .ok_or(BearerError::MissingSeparator)?;

    if scheme != BEARER_SCHEME {
        return Err(BearerError::UnsupportedScheme);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(BearerError::EmptyToken);
    }

    Ok(token)
}
