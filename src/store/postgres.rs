use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::{StoreError, TaskStore, UserStore};
use crate::config::Config;
use crate::models::{Task, TaskChange, User, UserRecord};

const TASK_COLUMNS: &str = "id, title, completed, user_email AS owner";

/// PostgreSQL-backed store. Cloning shares the underlying pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    timeout: Duration,
}

impl PgStore {
    /// Builds the connection pool once; it is the only shared mutable resource of the process.
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(config.store_timeout)
            .connect(&config.database_url)
            .await?;
        Ok(Self::new(pool, config.store_timeout))
    }

    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    /// Runs the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!()
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Internal(format!("migration failed: {}", e)))
    }

    async fn bounded<T, F>(&self, query: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.timeout, query).await {
            Ok(result) => result.map_err(StoreError::from),
            Err(_) => Err(StoreError::Unavailable(format!(
                "query exceeded {}ms",
                self.timeout.as_millis()
            ))),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> StoreError {
        match error {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(error.to_string())
            }
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                StoreError::Conflict("User already exists".into())
            }
            _ => StoreError::Internal(error.to_string()),
        }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        self.bounded(
            sqlx::query_as::<_, UserRecord>(
                "SELECT id, name, email, password AS password_hash FROM users WHERE email = $1",
            )
            .bind(email)
            .fetch_optional(&self.pool),
        )
        .await
    }

    async fn insert(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        self.bounded(
            sqlx::query_as::<_, User>(
                "INSERT INTO users (name, email, password) VALUES ($1, $2, $3) \
                 RETURNING id, name, email",
            )
            .bind(name)
            .bind(email)
            .bind(password_hash)
            .fetch_one(&self.pool),
        )
        .await
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn list_by_owner(&self, owner: &str) -> Result<Vec<Task>, StoreError> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE user_email = $1 ORDER BY id DESC",
            TASK_COLUMNS
        );
        self.bounded(
            sqlx::query_as::<_, Task>(&sql)
                .bind(owner)
                .fetch_all(&self.pool),
        )
        .await
    }

    async fn insert(&self, owner: &str, title: &str) -> Result<Task, StoreError> {
        let sql = format!(
            "INSERT INTO tasks (title, completed, user_email) VALUES ($1, FALSE, $2) RETURNING {}",
            TASK_COLUMNS
        );
        self.bounded(
            sqlx::query_as::<_, Task>(&sql)
                .bind(title)
                .bind(owner)
                .fetch_one(&self.pool),
        )
        .await
    }

    async fn update(
        &self,
        id: i32,
        owner: &str,
        change: TaskChange,
    ) -> Result<Option<Task>, StoreError> {
        match change {
            TaskChange::Completed(completed) => {
                let sql = format!(
                    "UPDATE tasks SET completed = $1 WHERE id = $2 AND user_email = $3 RETURNING {}",
                    TASK_COLUMNS
                );
                self.bounded(
                    sqlx::query_as::<_, Task>(&sql)
                        .bind(completed)
                        .bind(id)
                        .bind(owner)
                        .fetch_optional(&self.pool),
                )
                .await
            }
            TaskChange::Title(title) => {
                let sql = format!(
                    "UPDATE tasks SET title = $1 WHERE id = $2 AND user_email = $3 RETURNING {}",
                    TASK_COLUMNS
                );
                self.bounded(
                    sqlx::query_as::<_, Task>(&sql)
                        .bind(title)
                        .bind(id)
                        .bind(owner)
                        .fetch_optional(&self.pool),
                )
                .await
            }
        }
    }

    async fn delete(&self, id: i32, owner: &str) -> Result<Option<Task>, StoreError> {
        let sql = format!(
            "DELETE FROM tasks WHERE id = $1 AND user_email = $2 RETURNING {}",
            TASK_COLUMNS
        );
        self.bounded(
            sqlx::query_as::<_, Task>(&sql)
                .bind(id)
                .bind(owner)
                .fetch_optional(&self.pool),
        )
        .await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.bounded(sqlx::query("SELECT 1").execute(&self.pool))
            .await
            .map(|_| ())
    }
}
