use thiserror::Error;

use crate::identity::Identity;
use crate::identity::Role;

/// Role gate failures. Both variants surface to clients as Forbidden.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthorizationError {
    /// No identity reached the gate; authentication was not wired in front of it.
    #[error("No authenticated identity")]
    MissingIdentity,

    #[error("Role {actual} does not satisfy required role {required}")]
    InsufficientRole { required: Role, actual: Role },
}

/// Require the caller's role to be exactly `required`.
///
/// # Arguments
/// * `identity` - Identity projected by the authentication step, if any
/// * `required` - The single role allowed through
///
/// # Returns
/// The same identity on success
///
/// # Errors
/// * `MissingIdentity` - `identity` is `None`
/// * `InsufficientRole` - Role differs from `required`
pub fn require_role(
    identity: Option<&Identity>,
    required: Role,
) -> Result<&Identity, AuthorizationError> {
    let identity = identity.ok_or(AuthorizationError::MissingIdentity)?;

    if identity.role() != required {
        return Err(AuthorizationError::InsufficientRole {
            required,
            actual: identity.role(),
        });
    }

    Ok(identity)
}
