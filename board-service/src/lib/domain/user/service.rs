use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::Role;

use crate::domain::user::models::AuthenticatedSession;
use crate::domain::user::models::ChangePasswordCommand;
use crate::domain::user::models::Credentials;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for account operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
/// Password hashing and verification run on the blocking pool so a slow bcrypt
/// round never stalls unrelated requests on the same worker.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Shared password and token coordinator
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    async fn blocking<F, T>(&self, task: F) -> Result<T, UserError>
    where
        F: FnOnce(&Authenticator) -> T + Send + 'static,
        T: Send + 'static,
    {
        let authenticator = Arc::clone(&self.authenticator);
        Ok(tokio::task::spawn_blocking(move || task(&authenticator)).await?)
    }

    fn session_for(&self, user: User) -> Result<AuthenticatedSession, UserError> {
        let token = self
            .authenticator
            .issue_token(user.username.as_str(), user.role)
            .map_err(|e| {
                tracing::error!(username = %user.username, error = %e, "Token generation failed");
                UserError::from(e)
            })?;

        Ok(AuthenticatedSession { user, token })
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<AuthenticatedSession, UserError> {
        self.authenticator
            .validate_password_strength(&command.password)?;

        if self
            .repository
            .exists_by_username(&command.username)
            .await?
        {
            return Err(UserError::UsernameAlreadyExists(
                command.username.to_string(),
            ));
        }

        let password = command.password;
        let password_hash = self
            .blocking(move |authenticator| authenticator.hash_password(&password))
            .await??;

        let user = User {
            id: UserId::new(),
            username: command.username,
            password_hash,
            role: Role::User,
            created_at: self.authenticator.now(),
        };

        let created_user = self.repository.create(user).await?;
        tracing::info!(
            user_id = %created_user.id,
            username = %created_user.username,
            "User registered"
        );

        self.session_for(created_user)
    }

    async fn login(&self, credentials: Credentials) -> Result<AuthenticatedSession, UserError> {
        let user = match self
            .repository
            .find_by_username(&credentials.username)
            .await?
        {
            Some(user) => user,
            None => {
                tracing::warn!(username = %credentials.username, "Login for unknown username");
                return Err(UserError::InvalidCredentials);
            }
        };

        let password = credentials.password;
        let stored_hash = user.password_hash.clone();
        let username = user.username.to_string();
        let role = user.role;
        let result = self
            .blocking(move |authenticator| {
                authenticator.authenticate(&password, &stored_hash, &username, role)
            })
            .await?;

        match result {
            Ok(authenticated) => {
                tracing::info!(user_id = %user.id, username = %user.username, "User logged in");
                Ok(AuthenticatedSession {
                    user,
                    token: authenticated.access_token,
                })
            }
            Err(AuthenticationError::InvalidCredentials) => {
                tracing::warn!(username = %user.username, "Login with wrong password");
                Err(UserError::InvalidCredentials)
            }
            Err(AuthenticationError::Token(e)) => {
                tracing::error!(username = %user.username, error = %e, "Token generation failed");
                Err(UserError::Token(e))
            }
            Err(e) => Err(UserError::Unknown(e.to_string())),
        }
    }

    async fn change_password(
        &self,
        id: &UserId,
        command: ChangePasswordCommand,
    ) -> Result<(), UserError> {
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))?;

        let current_password = command.current_password;
        let stored_hash = user.password_hash.clone();
        let is_valid = self
            .blocking(move |authenticator| {
                authenticator.verify_password(&current_password, &stored_hash)
            })
            .await?;
        if !is_valid {
            tracing::warn!(user_id = %user.id, "Password change with wrong current password");
            return Err(UserError::InvalidCredentials);
        }

        self.authenticator
            .validate_password_strength(&command.new_password)?;

        let new_password = command.new_password;
        user.password_hash = self
            .blocking(move |authenticator| authenticator.hash_password(&new_password))
            .await??;

        let updated_user = self.repository.update(user).await?;
        tracing::info!(user_id = %updated_user.id, "Password changed");

        Ok(())
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn get_user_by_username(&self, username: &Username) -> Result<User, UserError> {
        self.repository
            .find_by_username(username)
            .await?
            .ok_or(UserError::NotFoundByUsername(username.to_string()))
    }

    async fn list_users(&self) -> Result<Vec<User>, UserError> {
        self.repository.list_all().await
    }
}

#[cfg(test)]
mod tests {
    use auth::PasswordError;
    use auth::PasswordHasher;
    use chrono::Duration;
    use chrono::Utc;
    use mockall::mock;

    use super::*;

    const SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-64-bytes-long-for-hs512";

    // Define mocks in the test module using mockall
    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
            async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;
            async fn exists_by_username(&self, username: &Username) -> Result<bool, UserError>;
            async fn list_all(&self) -> Result<Vec<User>, UserError>;
            async fn update(&self, user: User) -> Result<User, UserError>;
        }
    }

    fn authenticator() -> Arc<Authenticator> {
        Arc::new(Authenticator::new(SECRET, Duration::hours(24)))
    }

    fn stored_user(username: &str, password: &str, role: Role) -> User {
        User {
            id: UserId::new(),
            username: Username::new(username.to_string()).unwrap(),
            password_hash: PasswordHasher::new().hash(password).unwrap(),
            role,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_exists_by_username()
            .times(1)
            .returning(|_| Ok(false));
        repository
            .expect_create()
            .withf(|user| {
                user.username.as_str() == "alice"
                    && user.role == Role::User
                    && user.password_hash.starts_with("$2")
                    && user.password_hash != "password123"
            })
            .times(1)
            .returning(|user| Ok(user));

        let authenticator = authenticator();
        let service = UserService::new(Arc::new(repository), Arc::clone(&authenticator));

        let command = RegisterCommand::new(
            Username::new("alice".to_string()).unwrap(),
            "password123".to_string(),
        );

        let session = service.register(command).await.expect("Registration failed");
        assert_eq!(session.user.username.as_str(), "alice");
        assert_eq!(session.user.role, Role::User);

        let claims = authenticator.validate_token(&session.token).unwrap();
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, Role::User);
    }

    #[tokio::test]
    async fn test_register_weak_password() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_exists_by_username().times(0);
        repository.expect_create().times(0);

        let service = UserService::new(Arc::new(repository), authenticator());

        let command = RegisterCommand::new(
            Username::new("alice".to_string()).unwrap(),
            "short".to_string(),
        );

        let result = service.register(command).await;
        assert!(matches!(
            result,
            Err(UserError::Password(PasswordError::WeakSecret { min: 8, actual: 5 }))
        ));
    }

    #[tokio::test]
    async fn test_register_password_too_long() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_create().times(0);

        let service = UserService::new(Arc::new(repository), authenticator());

        let command = RegisterCommand::new(
            Username::new("alice".to_string()).unwrap(),
            "p".repeat(73),
        );

        let result = service.register(command).await;
        assert!(matches!(
            result,
            Err(UserError::Password(PasswordError::SecretTooLong { .. }))
        ));
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_exists_by_username()
            .times(1)
            .returning(|_| Ok(true));
        repository.expect_create().times(0);

        let service = UserService::new(Arc::new(repository), authenticator());

        let command = RegisterCommand::new(
            Username::new("alice".to_string()).unwrap(),
            "password123".to_string(),
        );

        let result = service.register(command).await;
        assert!(matches!(result, Err(UserError::UsernameAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_register_race_on_unique_constraint() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_exists_by_username()
            .times(1)
            .returning(|_| Ok(false));
        repository.expect_create().times(1).returning(|user| {
            Err(UserError::UsernameAlreadyExists(
                user.username.as_str().to_string(),
            ))
        });

        let service = UserService::new(Arc::new(repository), authenticator());

        let command = RegisterCommand::new(
            Username::new("alice".to_string()).unwrap(),
            "password123".to_string(),
        );

        let result = service.register(command).await;
        assert!(matches!(result, Err(UserError::UsernameAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_login_success() {
        let mut repository = MockTestUserRepository::new();

        let user = stored_user("alice", "password123", Role::Admin);
        repository
            .expect_find_by_username()
            .withf(|username| username.as_str() == "alice")
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let authenticator = authenticator();
        let service = UserService::new(Arc::new(repository), Arc::clone(&authenticator));

        let session = service
            .login(Credentials {
                username: Username::new("alice".to_string()).unwrap(),
                password: "password123".to_string(),
            })
            .await
            .expect("Login failed");

        let claims = authenticator.validate_token(&session.token).unwrap();
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let mut repository = MockTestUserRepository::new();

        let user = stored_user("alice", "password123", Role::User);
        repository
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = UserService::new(Arc::new(repository), authenticator());

        let result = service
            .login(Credentials {
                username: Username::new("alice".to_string()).unwrap(),
                password: "wrong_password".to_string(),
            })
            .await;

        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repository), authenticator());

        let result = service
            .login(Credentials {
                username: Username::new("nobody".to_string()).unwrap(),
                password: "password123".to_string(),
            })
            .await;

        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_database_failure_is_not_masked() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Err(UserError::DatabaseError("connection reset".to_string())));

        let service = UserService::new(Arc::new(repository), authenticator());

        let result = service
            .login(Credentials {
                username: Username::new("alice".to_string()).unwrap(),
                password: "password123".to_string(),
            })
            .await;

        assert!(matches!(result, Err(UserError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn test_change_password_success() {
        let mut repository = MockTestUserRepository::new();

        let user = stored_user("alice", "password123", Role::User);
        let user_id = user.id;
        repository
            .expect_find_by_id()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));
        repository
            .expect_update()
            .withf(|user| PasswordHasher::new().verify("new_password_456", &user.password_hash))
            .times(1)
            .returning(|user| Ok(user));

        let service = UserService::new(Arc::new(repository), authenticator());

        let result = service
            .change_password(
                &user_id,
                ChangePasswordCommand {
                    current_password: "password123".to_string(),
                    new_password: "new_password_456".to_string(),
                },
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_change_password_wrong_current() {
        let mut repository = MockTestUserRepository::new();

        let user = stored_user("alice", "password123", Role::User);
        let user_id = user.id;
        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));
        repository.expect_update().times(0);

        let service = UserService::new(Arc::new(repository), authenticator());

        let result = service
            .change_password(
                &user_id,
                ChangePasswordCommand {
                    current_password: "not_my_password".to_string(),
                    new_password: "new_password_456".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_change_password_weak_new_password() {
        let mut repository = MockTestUserRepository::new();

        let user = stored_user("alice", "password123", Role::User);
        let user_id = user.id;
        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));
        repository.expect_update().times(0);

        let service = UserService::new(Arc::new(repository), authenticator());

        let result = service
            .change_password(
                &user_id,
                ChangePasswordCommand {
                    current_password: "password123".to_string(),
                    new_password: "tiny".to_string(),
                },
            )
            .await;

        assert!(matches!(
            result,
            Err(UserError::Password(PasswordError::WeakSecret { .. }))
        ));
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repository), authenticator());

        let result = service.get_user(&UserId::new()).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_user_by_username_not_found() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repository), authenticator());

        let username = Username::new("nonexistent".to_string()).unwrap();
        let result = service.get_user_by_username(&username).await;
        assert!(matches!(result, Err(UserError::NotFoundByUsername(_))));
    }

    #[tokio::test]
    async fn test_list_users() {
        let mut repository = MockTestUserRepository::new();

        let users = vec![
            stored_user("alice", "password123", Role::User),
            stored_user("root", "password123", Role::Admin),
        ];
        repository
            .expect_list_all()
            .times(1)
            .returning(move || Ok(users.clone()));

        let service = UserService::new(Arc::new(repository), authenticator());

        let users = service.list_users().await.expect("Listing failed");
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].role, Role::Admin);
    }
}
