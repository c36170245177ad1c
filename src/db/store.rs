use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::db::queries;
use crate::domain::{Job, NewJob, NewUser, User, UserUpdate};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("User with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("Corrupt record: {0}")]
    Corrupt(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Point lookups and mutations over the single logical user table.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;
    /// Returns `None` when no user has the given email.
    async fn update_user(
        &self,
        email: &str,
        update: UserUpdate,
    ) -> Result<Option<User>, StoreError>;
    /// Returns whether a user was removed.
    async fn delete_user(&self, email: &str) -> Result<bool, StoreError>;
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;
    async fn ping(&self) -> Result<(), StoreError>;
}

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn insert_job(&self, job: NewJob) -> Result<Job, StoreError>;
    /// All jobs, newest first.
    async fn list_jobs(&self) -> Result<Vec<Job>, StoreError>;
    async fn list_jobs_page(&self, offset: i64, limit: i64) -> Result<Vec<Job>, StoreError>;
    async fn count_jobs(&self) -> Result<i64, StoreError>;
}

/// Postgres-backed store used by the server binary.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        queries::get_user_by_id(&self.pool, id)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        queries::get_user_by_email(&self.pool, email)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let id = Uuid::new_v4().to_string();
        let row = queries::insert_user(&self.pool, &id, &user)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    StoreError::DuplicateEmail(user.email.clone())
                }
                other => StoreError::Database(other),
            })?;
        User::try_from(row)
    }

    async fn update_user(
        &self,
        email: &str,
        update: UserUpdate,
    ) -> Result<Option<User>, StoreError> {
        queries::update_user_by_email(
            &self.pool,
            email,
            update.full_name.as_deref(),
            update.password_hash.as_deref(),
        )
        .await?
        .map(User::try_from)
        .transpose()
    }

    async fn delete_user(&self, email: &str) -> Result<bool, StoreError> {
        Ok(queries::delete_user_by_email(&self.pool, email).await? > 0)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        queries::list_users(&self.pool)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(queries::ping(&self.pool).await?)
    }
}

#[async_trait]
impl JobStore for PgStore {
    async fn insert_job(&self, job: NewJob) -> Result<Job, StoreError> {
        let id = Uuid::new_v4().to_string();
        Ok(queries::insert_job(&self.pool, &id, &job).await?)
    }

    async fn list_jobs(&self) -> Result<Vec<Job>, StoreError> {
        Ok(queries::list_jobs(&self.pool).await?)
    }

    async fn list_jobs_page(&self, offset: i64, limit: i64) -> Result<Vec<Job>, StoreError> {
        Ok(queries::list_jobs_page(&self.pool, limit, offset).await?)
    }

    async fn count_jobs(&self) -> Result<i64, StoreError> {
        Ok(queries::count_jobs(&self.pool).await?)
    }
}
