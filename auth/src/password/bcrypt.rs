use super::errors::PasswordError;

/// Bcrypt work factor (2^10 key expansion rounds).
///
/// Fixed at compile time; raising it slows down every login.
pub const DEFAULT_COST: u32 = 10;

/// Minimum accepted password length in bytes.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum accepted password length in bytes.
///
/// Bcrypt only consumes the first 72 bytes of its input. Anything longer would
/// be silently truncated, so this is a hard ceiling rather than a policy knob.
pub const MAX_PASSWORD_LENGTH: usize = 72;

/// Password hashing implementation.
///
/// Provides one-way salted hashing (bcrypt) and verification against stored
/// hashes. Stateless; every operation is CPU bound and blocking.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Create a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password securely.
    ///
    /// Uses bcrypt with a random salt at [`DEFAULT_COST`].
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// Modular crypt string (`$2b$10$...`) embedding version, cost and salt
    ///
    /// # Errors
    /// * `EmptySecret` - Password is empty
    /// * `SecretTooLong` - Password exceeds 72 bytes
    /// * `HashingFailed` - Underlying bcrypt operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        if password.is_empty() {
            return Err(PasswordError::EmptySecret);
        }
        Self::within_ceiling(password)?;

        bcrypt::hash(password, DEFAULT_COST).map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// A malformed hash verifies as `false`; the comparison itself is constant
    /// time inside bcrypt.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored bcrypt hash
    ///
    /// # Returns
    /// True if password matches, false otherwise
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        match bcrypt::verify(password, hash) {
            Ok(is_valid) => is_valid,
            Err(e) => {
                tracing::debug!(error = %e, "Password verification against malformed hash");
                false
            }
        }
    }

    /// Check a candidate password against the length policy.
    ///
    /// # Errors
    /// * `WeakSecret` - Shorter than [`MIN_PASSWORD_LENGTH`] bytes
    /// * `SecretTooLong` - Longer than [`MAX_PASSWORD_LENGTH`] bytes
    pub fn validate_strength(&self, password: &str) -> Result<(), PasswordError> {
        let length = password.len();
        if length < MIN_PASSWORD_LENGTH {
            return Err(PasswordError::WeakSecret {
                min: MIN_PASSWORD_LENGTH,
                actual: length,
            });
        }
        Self::within_ceiling(password)
    }

    fn within_ceiling(password: &str) -> Result<(), PasswordError> {
        let length = password.len();
        if length > MAX_PASSWORD_LENGTH {
            Err(PasswordError::SecretTooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: length,
            })
        } else {
            Ok(())
        }
    }
}
