use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password cannot be empty")]
    EmptySecret,

    #[error("Password too long: maximum {max} bytes, got {actual}")]
    SecretTooLong { max: usize, actual: usize },

    #[error("Password too short: minimum {min} bytes, got {actual}")]
    WeakSecret { min: usize, actual: usize },

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}
