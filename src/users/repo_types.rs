use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,                   // identity token handed out as a cookie
    pub name: String,
    pub email: String,              // normalized, unique
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
