use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use auth::Clock;
use auth::Role;
use board_service::domain::user::models::User;
use board_service::domain::user::models::UserId;
use board_service::domain::user::models::Username;
use board_service::domain::user::ports::UserRepository;
use board_service::domain::user::service::UserService;
use board_service::inbound::http::router::create_router;
use board_service::user::errors::UserError;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

pub const TEST_SECRET: &[u8] = b"integration-test-secret-key-that-is-at-least-64-bytes-long-hs512";

pub const TOKEN_LIFETIME_HOURS: i64 = 24;

/// Clock the tests move by hand.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// User store kept in process memory, keyed by id.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    fn username_taken(users: &HashMap<UserId, User>, user: &User) -> bool {
        users
            .values()
            .any(|existing| existing.username == user.username && existing.id != user.id)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();
        if Self::username_taken(&users, &user) {
            return Err(UserError::UsernameAlreadyExists(user.username.to_string()));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.lock().unwrap().get(id).cloned())
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|user| &user.username == username)
            .cloned())
    }

    async fn exists_by_username(&self, username: &Username) -> Result<bool, UserError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .any(|user| &user.username == username))
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let mut users: Vec<User> = self.users.lock().unwrap().values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();
        if !users.contains_key(&user.id) {
            return Err(UserError::NotFound(user.id.to_string()));
        }
        if Self::username_taken(&users, &user) {
            return Err(UserError::UsernameAlreadyExists(user.username.to_string()));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub authenticator: Arc<Authenticator>,
    pub clock: Arc<ManualClock>,
    pub repository: Arc<InMemoryUserRepository>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let clock = Arc::new(ManualClock::new(Utc::now()));
        let authenticator = Arc::new(Authenticator::with_clock(
            TEST_SECRET,
            Duration::hours(TOKEN_LIFETIME_HOURS),
            Arc::clone(&clock) as Arc<dyn Clock>,
        ));

        let repository = Arc::new(InMemoryUserRepository::default());
        let user_service = Arc::new(UserService::new(
            Arc::clone(&repository),
            Arc::clone(&authenticator),
        ));

        let router = create_router(user_service, Arc::clone(&authenticator), &[]);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            authenticator,
            clock,
            repository,
        }
    }

    /// Insert an account directly; admins are never created through the API.
    pub async fn seed_user(&self, username: &str, password: &str, role: Role) -> User {
        let user = User {
            id: UserId::new(),
            username: Username::new(username.to_string()).expect("Invalid test username"),
            password_hash: self
                .authenticator
                .hash_password(password)
                .expect("Failed to hash test password"),
            role,
            created_at: self.clock.now(),
        };

        self.repository
            .create(user)
            .await
            .expect("Failed to seed test user")
    }

    /// Mint a token directly, bypassing login.
    pub fn token_for(&self, username: &str, role: Role) -> String {
        self.authenticator
            .issue_token(username, role)
            .expect("Failed to issue test token")
    }

    /// Register through the API.
    pub async fn register(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/api/register")
            .json(&serde_json::json!({
                "username": username,
                "password": password,
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in through the API.
    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/api/login")
            .json(&serde_json::json!({
                "username": username,
                "password": password,
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }
}
