use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::meals::repo_types::{Meal, MealChanges, NewMeal};

/// Per-owner meal storage. Every call is scoped to `owner`; a meal that
/// exists under another owner is indistinguishable from a missing one.
#[async_trait]
pub trait MealRepo: Send + Sync {
    async fn list_by_owner(&self, owner: Uuid) -> anyhow::Result<Vec<Meal>>;
    async fn get(&self, owner: Uuid, id: Uuid) -> anyhow::Result<Option<Meal>>;
    async fn create(&self, owner: Uuid, meal: NewMeal) -> anyhow::Result<Meal>;
    /// Writes only the row matching both `id` and `owner`.
    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: MealChanges,
    ) -> anyhow::Result<Option<Meal>>;
    /// Returns `false` when nothing was deleted.
    async fn delete(&self, owner: Uuid, id: Uuid) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgMealRepo {
    db: PgPool,
}

impl PgMealRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MealRepo for PgMealRepo {
    async fn list_by_owner(&self, owner: Uuid) -> anyhow::Result<Vec<Meal>> {
        let rows = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, name, description, datetime, is_in_diet, user_id, created_at, updated_at
            FROM meals
            WHERE user_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(owner)
        .fetch_all(&self.db)
        .await
        .context("list meals by owner")?;
        Ok(rows)
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> anyhow::Result<Option<Meal>> {
        let meal = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, name, description, datetime, is_in_diet, user_id, created_at, updated_at
            FROM meals
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await
        .context("get meal")?;
        Ok(meal)
    }

    async fn create(&self, owner: Uuid, meal: NewMeal) -> anyhow::Result<Meal> {
        let row = sqlx::query_as::<_, Meal>(
            r#"
            INSERT INTO meals (id, name, description, datetime, is_in_diet, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, description, datetime, is_in_diet, user_id, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&meal.name)
        .bind(&meal.description)
        .bind(meal.datetime)
        .bind(meal.is_in_diet)
        .bind(owner)
        .fetch_one(&self.db)
        .await
        .context("insert meal")?;
        Ok(row)
    }

    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: MealChanges,
    ) -> anyhow::Result<Option<Meal>> {
        let row = sqlx::query_as::<_, Meal>(
            r#"
            UPDATE meals
               SET name        = COALESCE($3, name),
                   description = COALESCE($4, description),
                   datetime    = $5,
                   is_in_diet  = COALESCE($6, is_in_diet),
                   updated_at  = now()
             WHERE id = $1 AND user_id = $2
            RETURNING id, name, description, datetime, is_in_diet, user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(changes.name)
        .bind(changes.description)
        .bind(changes.datetime)
        .bind(changes.is_in_diet)
        .fetch_optional(&self.db)
        .await
        .context("update meal")?;
        Ok(row)
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM meals
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .execute(&self.db)
        .await
        .context("delete meal")?;
        Ok(result.rows_affected() > 0)
    }
}
