use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Meal row as stored and as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Meal {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub datetime: OffsetDateTime,
    #[serde(rename = "isInDiet")]
    pub is_in_diet: bool,
    pub user_id: Uuid, // owner, fixed at creation
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Validated input for a new meal.
#[derive(Debug, Clone)]
pub struct NewMeal {
    pub name: String,
    pub description: String,
    pub datetime: OffsetDateTime,
    pub is_in_diet: bool,
}

/// Validated update; `None` keeps the stored value.
#[derive(Debug, Clone)]
pub struct MealChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub datetime: OffsetDateTime,
    pub is_in_diet: Option<bool>,
}
