use async_trait::async_trait;
use sqlx::SqlitePool;
use time::OffsetDateTime;
use tracing::debug;

use super::repo_types::{FieldUpdate, NewUser, User};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("user not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence operations on users.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, new: NewUser) -> Result<User, StoreError>;
    async fn get_by_id(&self, id: i64) -> Result<User, StoreError>;
    async fn get_by_email(&self, email: &str) -> Result<User, StoreError>;
    /// All users, ordered by id ascending.
    async fn list(&self) -> Result<Vec<User>, StoreError>;
    /// Sets one column and refreshes `updated`, returning the new row.
    async fn update_field(&self, id: i64, update: FieldUpdate) -> Result<User, StoreError>;
    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct UserRepo {
    db: SqlitePool,
}

impl UserRepo {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for UserRepo {
    async fn create(&self, new: NewUser) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password, active, staff, admin, created, updated)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id, email, password, active, staff, admin, created, updated
            "#,
        )
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(new.active)
        .bind(new.staff)
        .bind(new.admin)
        .bind(new.created)
        .bind(new.created)
        .fetch_one(&self.db)
        .await?;
        debug!(user_id = user.id, "user row inserted");
        Ok(user)
    }

    async fn get_by_id(&self, id: i64) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password, active, staff, admin, created, updated
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn get_by_email(&self, email: &str) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password, active, staff, admin, created, updated
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password, active, staff, admin, created, updated
            FROM users
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn update_field(&self, id: i64, update: FieldUpdate) -> Result<User, StoreError> {
        let column = update.column();
        let query = sqlx::query_as::<_, User>(update.statement());
        let query = match update {
            FieldUpdate::Email(v) | FieldUpdate::Password(v) => query.bind(v),
            FieldUpdate::Active(v) | FieldUpdate::Staff(v) | FieldUpdate::Admin(v) => query.bind(v),
        };
        let user = query
            .bind(OffsetDateTime::now_utc())
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or(StoreError::NotFound)?;
        debug!(user_id = id, column, "user field updated");
        Ok(user)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let res = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        debug!(user_id = id, "user row deleted");
        Ok(())
    }
}
