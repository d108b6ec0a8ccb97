use crate::config::AppConfig;
use crate::db;
use crate::meals::repo::{MealRepo, PgMealRepo};
use crate::memory::MemoryStore;
use crate::users::repo::{PgUserRepo, UserRepo};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepo>,
    pub meals: Arc<dyn MealRepo>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        match config.database_url.clone() {
            Some(url) => {
                let pool = db::connect(&url).await?;
                db::migrate(&pool).await;
                Ok(Self {
                    users: Arc::new(PgUserRepo::new(pool.clone())),
                    meals: Arc::new(PgMealRepo::new(pool)),
                    config,
                })
            }
            None => {
                tracing::warn!("DATABASE_URL not set; using in-memory store, data is lost on exit");
                Ok(Self::in_memory(config))
            }
        }
    }

    pub fn in_memory(config: Arc<AppConfig>) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            config,
            users: store.clone() as Arc<dyn UserRepo>,
            meals: store as Arc<dyn MealRepo>,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        Self::in_memory(Arc::new(AppConfig::default()))
    }
}
