use axum::{
    extract::State,
    http::{header, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::CurrentUser,
    error::{AppError, AppResult},
    extract::{ValidJson, ValidPath},
    state::AppState,
};

use super::dto::{CreateMealRequest, MealListResponse, MealResponse, UpdateMealRequest};
use super::services::{compute_metrics, DietMetrics};

const MEAL_NOT_FOUND: &str = "Meal doesn't exist";

pub fn meals_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals).post(create_meal))
        .route("/meals/metrics", get(get_metrics))
        .route(
            "/meals/:id",
            get(get_meal).put(update_meal).delete(delete_meal),
        )
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_meals(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<MealListResponse>> {
    let meals = state.meals.list_by_owner(user.id).await?;
    Ok(Json(MealListResponse { meals }))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_meal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidPath(id): ValidPath<Uuid>,
) -> AppResult<Json<MealResponse>> {
    let meal = state
        .meals
        .get(user.id, id)
        .await?
        .ok_or(AppError::NotFound(MEAL_NOT_FOUND))?;
    Ok(Json(MealResponse { meal }))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn create_meal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidJson(payload): ValidJson<CreateMealRequest>,
) -> AppResult<(StatusCode, [(header::HeaderName, String); 1], Json<MealResponse>)> {
    let new_meal = payload.validate()?;
    let meal = state.meals.create(user.id, new_meal).await?;

    info!(meal_id = %meal.id, "meal created");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/meals/{}", meal.id))],
        Json(MealResponse { meal }),
    ))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn update_meal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidPath(id): ValidPath<Uuid>,
    payload: Result<ValidJson<UpdateMealRequest>, AppError>,
) -> AppResult<(StatusCode, Json<MealResponse>)> {
    // A missing meal answers 404 before the body is looked at.
    if state.meals.get(user.id, id).await?.is_none() {
        warn!(meal_id = %id, "update on missing meal");
        return Err(AppError::NotFound(MEAL_NOT_FOUND));
    }

    let ValidJson(payload) = payload?;
    let changes = payload.validate()?;

    let Some(meal) = state.meals.update(user.id, id, changes).await? else {
        warn!(meal_id = %id, "update on missing meal");
        return Err(AppError::NotFound(MEAL_NOT_FOUND));
    };

    info!(meal_id = %meal.id, "meal updated");
    Ok((StatusCode::CREATED, Json(MealResponse { meal })))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_meal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidPath(id): ValidPath<Uuid>,
) -> AppResult<StatusCode> {
    if !state.meals.delete(user.id, id).await? {
        warn!(meal_id = %id, "delete on missing meal");
        return Err(AppError::NotFound(MEAL_NOT_FOUND));
    }

    info!(meal_id = %id, "meal deleted");
    Ok(StatusCode::OK)
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_metrics(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<DietMetrics>> {
    let meals = state.meals.list_by_owner(user.id).await?;
    Ok(Json(compute_metrics(&meals, state.config.metrics_offset)))
}
