//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::password::SaltedHash;

/// User domain entity
///
/// Created on registration and never mutated afterwards.
#[derive(Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: Vec<u8>,
    #[serde(skip_serializing)]
    pub password_salt: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

// Don't expose credentials in debug output
impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("password_salt", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl User {
    /// Check a plain text password against the stored digest.
    pub fn verify_password(&self, plain_text: &str) -> bool {
        super::password::verify(plain_text, &self.password_salt, &self.password_hash)
    }
}

/// User record before the repository has assigned an identifier.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub credentials: SaltedHash,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// Unique user identifier
    pub id: Uuid,
    /// Login name
    pub username: String,
    /// User email address
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> User {
        let credentials = SaltedHash::generate("Secret1").unwrap();
        User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "a@x.io".to_string(),
            password_hash: credentials.hash,
            password_salt: credentials.salt,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_verify_password() {
        let user = sample();
        assert!(user.verify_password("Secret1"));
        assert!(!user.verify_password("secret1"));
    }

    #[test]
    fn test_credentials_never_serialized() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("password_salt").is_none());
        assert_eq!(json["username"], "alice");
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let output = format!("{:?}", sample());
        assert!(output.contains("[REDACTED]"));
        assert!(output.contains("alice"));
    }
}
