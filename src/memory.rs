//! In-process store used when no database is configured, and by tests.

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::meals::{
    repo::MealRepo,
    repo_types::{Meal, MealChanges, NewMeal},
};
use crate::users::{repo::UserRepo, User};

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    meals: RwLock<Vec<Meal>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_or_create(&self, name: &str, email: &str) -> anyhow::Result<(User, bool)> {
        let mut users = self.users.write().await;
        if let Some(existing) = users.iter().find(|u| u.email == email) {
            return Ok((existing.clone(), false));
        }

        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        Ok((user, true))
    }
}

#[async_trait]
impl MealRepo for MemoryStore {
    async fn list_by_owner(&self, owner: Uuid) -> anyhow::Result<Vec<Meal>> {
        let meals = self.meals.read().await;
        Ok(meals.iter().filter(|m| m.user_id == owner).cloned().collect())
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> anyhow::Result<Option<Meal>> {
        let meals = self.meals.read().await;
        Ok(meals
            .iter()
            .find(|m| m.id == id && m.user_id == owner)
            .cloned())
    }

    async fn create(&self, owner: Uuid, meal: NewMeal) -> anyhow::Result<Meal> {
        if !self.users.read().await.iter().any(|u| u.id == owner) {
            anyhow::bail!("meal owner {owner} does not exist");
        }

        let now = OffsetDateTime::now_utc();
        let row = Meal {
            id: Uuid::new_v4(),
            name: meal.name,
            description: meal.description,
            datetime: meal.datetime,
            is_in_diet: meal.is_in_diet,
            user_id: owner,
            created_at: now,
            updated_at: now,
        };
        self.meals.write().await.push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: MealChanges,
    ) -> anyhow::Result<Option<Meal>> {
        let mut meals = self.meals.write().await;
        let Some(meal) = meals.iter_mut().find(|m| m.id == id && m.user_id == owner) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            meal.name = name;
        }
        if let Some(description) = changes.description {
            meal.description = description;
        }
        if let Some(is_in_diet) = changes.is_in_diet {
            meal.is_in_diet = is_in_diet;
        }
        meal.datetime = changes.datetime;
        meal.updated_at = OffsetDateTime::now_utc();
        Ok(Some(meal.clone()))
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let mut meals = self.meals.write().await;
        let before = meals.len();
        meals.retain(|m| !(m.id == id && m.user_id == owner));
        Ok(meals.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn lunch() -> NewMeal {
        NewMeal {
            name: "Lunch".into(),
            description: "Rice and beans".into(),
            datetime: datetime!(2023-04-25 12:00 UTC),
            is_in_diet: true,
        }
    }

    #[tokio::test]
    async fn find_or_create_dedups_by_email() {
        let store = MemoryStore::new();
        let (first, created) = store.find_or_create("John", "john@example.com").await.unwrap();
        assert!(created);
        let (again, created) = store.find_or_create("Johnny", "john@example.com").await.unwrap();
        assert!(!created);
        assert_eq!(first.id, again.id);
        assert_eq!(again.name, "John");
    }

    #[tokio::test]
    async fn create_requires_existing_owner() {
        let store = MemoryStore::new();
        assert!(MealRepo::create(&store, Uuid::new_v4(), lunch()).await.is_err());
    }

    #[tokio::test]
    async fn writes_are_scoped_to_owner_and_id() {
        let store = MemoryStore::new();
        let (john, _) = store.find_or_create("John", "john@example.com").await.unwrap();
        let (jane, _) = store.find_or_create("Jane", "jane@example.com").await.unwrap();
        let a = MealRepo::create(&store, john.id, lunch()).await.unwrap();
        let b = MealRepo::create(&store, john.id, lunch()).await.unwrap();

        let changes = MealChanges {
            name: Some("Dinner".into()),
            description: None,
            datetime: datetime!(2023-04-25 20:00 UTC),
            is_in_diet: None,
        };
        assert!(store.update(jane.id, a.id, changes.clone()).await.unwrap().is_none());
        let updated = store.update(john.id, a.id, changes).await.unwrap().unwrap();
        assert_eq!(updated.name, "Dinner");
        assert_eq!(updated.description, "Rice and beans");

        let untouched = store.get(john.id, b.id).await.unwrap().unwrap();
        assert_eq!(untouched.name, "Lunch");

        assert!(!store.delete(jane.id, b.id).await.unwrap());
        assert!(store.delete(john.id, b.id).await.unwrap());
        assert_eq!(store.list_by_owner(john.id).await.unwrap(), vec![updated]);
    }
}
