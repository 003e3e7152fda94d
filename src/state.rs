use std::sync::Arc;

use crate::{
    config::AppConfig,
    db,
    users::{
        password::PasswordHasher,
        repo::{UserRepo, UserStore},
    },
};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub hasher: PasswordHasher,
}

impl AppState {
    pub fn new(users: Arc<dyn UserStore>, hasher: PasswordHasher) -> Self {
        Self { users, hasher }
    }

    /// Opens the database, applies migrations and builds the hasher.
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let hasher = PasswordHasher::new(config.hash)?;
        let pool = db::connect(&config.database_path).await?;
        db::migrate(&pool).await?;
        tracing::info!(path = %config.database_path, "database ready");

        let users = Arc::new(UserRepo::new(pool)) as Arc<dyn UserStore>;
        Ok(Self::new(users, hasher))
    }
}
