use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use crate::error::ApiError;

/// Name every freshly created todo starts in.
pub const NEW: &str = "new";

pub const INVALID_USER_STATUS: &str = "Invalid value! Must be either 'enabled' or 'locked'";

/// One row of the seeded status vocabulary. Read-only reference data; the
/// request-handling code never inserts or deletes statuses.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Status {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "statusString")]
    pub name: String,
}

/// Resolve a status name to its seeded row. `None` means the name is not
/// part of the vocabulary; handlers map that to a validation error.
pub async fn find_by_name(db: &SqlitePool, name: &str) -> sqlx::Result<Option<Status>> {
    sqlx::query_as::<_, Status>(
        r#"
        SELECT id, name
        FROM statuses
        WHERE name = ?1
        "#,
    )
    .bind(name)
    .fetch_optional(db)
    .await
}

/// The closed vocabulary for user lock transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Enabled,
    Locked,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Enabled => "enabled",
            UserStatus::Locked => "locked",
        }
    }
}

impl FromStr for UserStatus {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enabled" => Ok(UserStatus::Enabled),
            "locked" => Ok(UserStatus::Locked),
            _ => Err(ApiError::validation(INVALID_USER_STATUS)),
        }
    }
}
