use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};

use crate::error::{AppError, AppResult};
use crate::extract::require_non_blank;
use crate::meals::repo_types::{Meal, MealChanges, NewMeal};

/// Body of `POST /meals`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMealRequest {
    pub name: String,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub datetime: OffsetDateTime,
    pub is_in_diet: bool,
}

impl CreateMealRequest {
    pub fn validate(self) -> AppResult<NewMeal> {
        require_non_blank("name", &self.name)?;
        Ok(NewMeal {
            name: self.name,
            description: self.description,
            datetime: to_utc_millis(self.datetime)?,
            is_in_diet: self.is_in_diet,
        })
    }
}

/// Body of `PUT /meals/:id`. Only `datetime` is mandatory.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMealRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub datetime: OffsetDateTime,
    pub is_in_diet: Option<bool>,
}

impl UpdateMealRequest {
    pub fn validate(self) -> AppResult<MealChanges> {
        if let Some(name) = &self.name {
            require_non_blank("name", name)?;
        }
        Ok(MealChanges {
            name: self.name,
            description: self.description,
            datetime: to_utc_millis(self.datetime)?,
            is_in_diet: self.is_in_diet,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct MealResponse {
    pub meal: Meal,
}

#[derive(Debug, Serialize)]
pub struct MealListResponse {
    pub meals: Vec<Meal>,
}

/// Meal times are kept in UTC at millisecond precision, within years
/// 0000..=9999 so they always format back as RFC 3339.
fn to_utc_millis(datetime: OffsetDateTime) -> AppResult<OffsetDateTime> {
    let utc = datetime
        .checked_to_offset(UtcOffset::UTC)
        .filter(|utc| (0..=9999).contains(&utc.year()))
        .ok_or_else(|| AppError::Validation("datetime is out of range".into()))?;
    let nanos = utc.nanosecond();
    Ok(utc.replace_nanosecond(nanos - nanos % 1_000_000).unwrap_or(utc))
}
