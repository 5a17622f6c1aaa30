use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo::User;

/// Registration payload. `status` defaults to enabled when omitted.
#[derive(Debug, Deserialize)]
pub struct ProposedUser {
    #[serde(rename = "userName")]
    pub user_name: String,
    pub password: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PasswordChange {
    #[serde(rename = "oldPassword")]
    pub old_password: String,
    #[serde(rename = "newPassword")]
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct UserStatusBody {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct UserStatusMsg {
    pub message: String,
    #[serde(rename = "userStatus")]
    pub user_status: String,
}

/// Projection of a user with the credential material stripped. Every path
/// that returns user data goes through this type.
#[derive(Debug, Serialize)]
pub struct SafeUser {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "userName")]
    pub user_name: String,
    #[serde(rename = "creationDate", with = "time::serde::rfc3339")]
    pub creation_date: OffsetDateTime,
}

impl From<User> for SafeUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            user_name: user.username,
            creation_date: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UsersList {
    pub data: Vec<SafeUser>,
}
