use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored account. The password is always a bcrypt hash.
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub last_signin: Option<DateTime<Utc>>,
    pub failed_signins: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub auth_token: String,
}

#[derive(Debug, Serialize)]
pub struct UserSession {
    pub id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserAccount> for UserSession {
    fn from(user: UserAccount) -> Self {
        Self {
            id: user.id,
            email: user.email,
            created_at: user.created_at,
        }
    }
}
