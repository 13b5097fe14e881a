use async_trait::async_trait;

use crate::domain::user::models::AuthenticatedSession;
use crate::domain::user::models::ChangePasswordCommand;
use crate::domain::user::models::Credentials;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::models::Username;

/// Port for user domain service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new account with the `user` role.
    ///
    /// # Arguments
    /// * `command` - Validated username and plaintext password
    ///
    /// # Returns
    /// Created user and an access token for it
    ///
    /// # Errors
    /// * `Password` - Password fails the strength policy
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterCommand) -> Result<AuthenticatedSession, UserError>;

    /// Verify credentials and mint an access token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password (indistinguishable)
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, credentials: Credentials) -> Result<AuthenticatedSession, UserError>;

    /// Replace a user's password after verifying the current one.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `InvalidCredentials` - Current password does not match
    /// * `Password` - New password fails the strength policy
    /// * `DatabaseError` - Database operation failed
    async fn change_password(
        &self,
        id: &UserId,
        command: ChangePasswordCommand,
    ) -> Result<(), UserError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;

    /// Retrieve user by unique username.
    ///
    /// # Errors
    /// * `NotFoundByUsername` - No user with this username
    /// * `DatabaseError` - Database operation failed
    async fn get_user_by_username(&self, username: &Username) -> Result<User, UserError>;

    /// Retrieve every registered user.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_users(&self) -> Result<Vec<User>, UserError>;
}

/// Persistence operations for user aggregate.
///
/// Lookups return `Ok(None)` for a missing user so that absence stays distinct
/// from storage failures.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by username.
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;

    /// Check whether a username is taken.
    async fn exists_by_username(&self, username: &Username) -> Result<bool, UserError>;

    /// Retrieve all users from storage, newest first.
    async fn list_all(&self) -> Result<Vec<User>, UserError>;

    /// Update existing user in storage.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `UsernameAlreadyExists` - New username is already taken
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, user: User) -> Result<User, UserError>;
}
