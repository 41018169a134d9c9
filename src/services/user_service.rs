//! User service - registration and login.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::TokenIssuer;
use crate::domain::{password, NewUser, SaltedHash, User};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UserRepository;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create an account. The plain password is never stored.
    ///
    /// A taken username or email surfaces as `Conflict`.
    async fn register(&self, username: String, email: String, password: String) -> AppResult<User>;

    /// Check credentials and return a signed bearer token.
    ///
    /// Unknown username and wrong password fail identically.
    async fn login(&self, username: String, password: String) -> AppResult<String>;

    /// Account of an authenticated user
    async fn profile(&self, user_id: Uuid) -> AppResult<User>;
}

/// Concrete implementation of UserService
pub struct UserManager {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn TokenIssuer>,
}

impl UserManager {
    /// Create new user service instance
    pub fn new(users: Arc<dyn UserRepository>, tokens: Arc<dyn TokenIssuer>) -> Self {
        Self { users, tokens }
    }
}

fn require(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

#[async_trait]
impl UserService for UserManager {
    async fn register(&self, username: String, email: String, password: String) -> AppResult<User> {
        require("username", &username)?;
        require("email", &email)?;
        require("password", &password)?;

        let credentials = SaltedHash::generate(&password)?;
        let user = self
            .users
            .add(NewUser {
                username,
                email,
                credentials,
            })
            .await?;
        self.users.commit().await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }

    async fn login(&self, username: String, password: String) -> AppResult<String> {
        let user = match self.users.find_by_username(&username).await? {
            Some(user) => user,
            None => {
                // Spend the same digest work as a real check
                let salt = password::new_salt();
                std::hint::black_box(password::verify(
                    &password,
                    &salt,
                    &[0u8; password::DIGEST_BYTES],
                ));
                tracing::debug!("Login rejected");
                return Err(AppError::InvalidCredentials);
            }
        };

        if !user.verify_password(&password) {
            tracing::debug!("Login rejected");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.tokens.issue(user.id, &user.username, None)?;
        tracing::info!(user_id = %user.id, "User logged in");
        Ok(token)
    }

    async fn profile(&self, user_id: Uuid) -> AppResult<User> {
        self.users.find_by_id(user_id).await?.ok_or_not_found()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockUserRepository;
    use crate::services::MockTokenIssuer;
    use chrono::Utc;

    fn stored_user(username: &str, password: &str) -> User {
        let credentials = SaltedHash::generate(password).unwrap();
        User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password_hash: credentials.hash,
            password_salt: credentials.salt,
            created_at: Utc::now(),
        }
    }

    fn service(repo: MockUserRepository, tokens: MockTokenIssuer) -> UserManager {
        UserManager::new(Arc::new(repo), Arc::new(tokens))
    }

    #[tokio::test]
    async fn test_register_hashes_password_and_commits() {
        let mut repo = MockUserRepository::new();
        repo.expect_add()
            .withf(|new_user| {
                new_user.username == "alice"
                    && new_user.email == "a@x.io"
                    && new_user.credentials.verify("Secret1")
                    && new_user.credentials.hash != b"Secret1".to_vec()
            })
            .times(1)
            .returning(|new_user| {
                Ok(User {
                    id: Uuid::new_v4(),
                    username: new_user.username,
                    email: new_user.email,
                    password_hash: new_user.credentials.hash,
                    password_salt: new_user.credentials.salt,
                    created_at: Utc::now(),
                })
            });
        repo.expect_commit().times(1).returning(|| Ok(()));

        let user = service(repo, MockTokenIssuer::new())
            .register("alice".into(), "a@x.io".into(), "Secret1".into())
            .await
            .unwrap();

        assert_eq!(user.username, "alice");
        assert!(user.verify_password("Secret1"));
    }

    #[tokio::test]
    async fn test_register_conflict_skips_commit() {
        let mut repo = MockUserRepository::new();
        repo.expect_add()
            .times(1)
            .returning(|_| Err(AppError::conflict("Username")));
        repo.expect_commit().never();

        let result = service(repo, MockTokenIssuer::new())
            .register("alice".into(), "a@x.io".into(), "Secret1".into())
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_rejects_blank_fields() {
        let mut repo = MockUserRepository::new();
        repo.expect_add().never();

        let svc = service(repo, MockTokenIssuer::new());

        let blank_name = svc.register("  ".into(), "a@x.io".into(), "pw".into()).await;
        let blank_email = svc.register("alice".into(), "".into(), "pw".into()).await;
        let blank_password = svc.register("alice".into(), "a@x.io".into(), "".into()).await;

        assert!(matches!(blank_name, Err(AppError::Validation(_))));
        assert!(matches!(blank_email, Err(AppError::Validation(_))));
        assert!(matches!(blank_password, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_login_success_issues_token() {
        let user = stored_user("alice", "Secret1");
        let user_id = user.id;

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username()
            .withf(|name| name == "alice")
            .returning(move |_| Ok(Some(user.clone())));

        let mut tokens = MockTokenIssuer::new();
        tokens
            .expect_issue()
            .withf(move |id, name, expiry| *id == user_id && name == "alice" && expiry.is_none())
            .times(1)
            .returning(|_, _, _| Ok("signed-token".to_string()));

        let token = service(repo, tokens)
            .login("alice".into(), "Secret1".into())
            .await
            .unwrap();

        assert_eq!(token, "signed-token");
    }

    #[tokio::test]
    async fn test_login_wrong_password_and_unknown_user_look_the_same() {
        let user = stored_user("alice", "Secret1");

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username()
            .withf(|name| name == "alice")
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_find_by_username()
            .withf(|name| name == "ghost")
            .returning(|_| Ok(None));

        let mut tokens = MockTokenIssuer::new();
        tokens.expect_issue().never();

        let svc = service(repo, tokens);
        let wrong = svc.login("alice".into(), "nope".into()).await.unwrap_err();
        let unknown = svc.login("ghost".into(), "Secret1".into()).await.unwrap_err();

        assert!(matches!(wrong, AppError::InvalidCredentials));
        assert!(matches!(unknown, AppError::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn test_login_username_is_case_sensitive() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username()
            .withf(|name| name == "Alice")
            .returning(|_| Ok(None));

        let result = service(repo, MockTokenIssuer::new())
            .login("Alice".into(), "Secret1".into())
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_propagates_configuration_error() {
        let user = stored_user("alice", "Secret1");

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username()
            .returning(move |_| Ok(Some(user.clone())));

        let mut tokens = MockTokenIssuer::new();
        tokens
            .expect_issue()
            .returning(|_, _, _| Err(AppError::configuration("JWT signing key is not configured")));

        let result = service(repo, tokens)
            .login("alice".into(), "Secret1".into())
            .await;

        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_profile_of_deleted_account_is_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let result = service(repo, MockTokenIssuer::new())
            .profile(Uuid::new_v4())
            .await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }
}
