use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewTodo, NewUser, Todo, TodoChanges, User};
use crate::database::repository::{Store, TodoStore, UserStore};

const TODO_COLUMNS: &str = "id, text, completed, completed_at, creator";
const USER_COLUMNS: &str = "id, email, password_hash, created_at";

/// Idempotent schema. Each entry runs as its own statement.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_tokens (
        user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        access TEXT NOT NULL,
        token_digest TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (user_id, token_digest)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS todos (
        id UUID PRIMARY KEY,
        text TEXT NOT NULL,
        completed BOOLEAN NOT NULL DEFAULT false,
        completed_at BIGINT,
        creator UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS todos_creator_idx ON todos (creator, created_at)",
];

const UNIQUE_VIOLATION: &str = "23505";

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        for statement in SCHEMA {
            sqlx::query(*statement).execute(&self.pool).await?;
        }
        info!("Database schema is up to date");
        Ok(())
    }
}

fn map_unique_violation(err: sqlx::Error, what: String) -> DatabaseError {
    match &err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            DatabaseError::Duplicate(what)
        }
        _ => DatabaseError::Sqlx(err),
    }
}

#[async_trait]
impl TodoStore for PgStore {
    async fn insert_todo(&self, todo: NewTodo) -> Result<Todo, DatabaseError> {
        let sql = format!(
            "INSERT INTO todos (id, text, creator) VALUES ($1, $2, $3) RETURNING {}",
            TODO_COLUMNS
        );
        let todo = sqlx::query_as::<_, Todo>(&sql)
            .bind(Uuid::new_v4())
            .bind(&todo.text)
            .bind(todo.creator)
            .fetch_one(&self.pool)
            .await?;
        Ok(todo)
    }

    async fn list_owned(&self, owner: Uuid) -> Result<Vec<Todo>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM todos WHERE creator = $1 ORDER BY created_at, id",
            TODO_COLUMNS
        );
        let todos = sqlx::query_as::<_, Todo>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;
        Ok(todos)
    }

    async fn find_owned(&self, id: Uuid, owner: Uuid) -> Result<Option<Todo>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM todos WHERE id = $1 AND creator = $2",
            TODO_COLUMNS
        );
        let todo = sqlx::query_as::<_, Todo>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
        Ok(todo)
    }

    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> Result<Option<Todo>, DatabaseError> {
        let sql = format!(
            "DELETE FROM todos WHERE id = $1 AND creator = $2 RETURNING {}",
            TODO_COLUMNS
        );
        let todo = sqlx::query_as::<_, Todo>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
        Ok(todo)
    }

    async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: TodoChanges,
    ) -> Result<Option<Todo>, DatabaseError> {
        let sql = format!(
            r#"
            UPDATE todos
            SET text = COALESCE($3, text), completed = $4, completed_at = $5
            WHERE id = $1 AND creator = $2
            RETURNING {}
            "#,
            TODO_COLUMNS
        );
        let todo = sqlx::query_as::<_, Todo>(&sql)
            .bind(id)
            .bind(owner)
            .bind(changes.text)
            .bind(changes.completed)
            .bind(changes.completed_at)
            .fetch_optional(&self.pool)
            .await?;
        Ok(todo)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let sql = format!(
            "INSERT INTO users (id, email, password_hash) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.email)
            .bind(&user.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, format!("email {}", user.email)))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_token(
        &self,
        user_id: Uuid,
        access: &str,
        token_digest: &str,
    ) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.email, u.password_hash, u.created_at
            FROM users u
            JOIN user_tokens t ON t.user_id = u.id
            WHERE u.id = $1 AND t.access = $2 AND t.token_digest = $3
            "#,
        )
        .bind(user_id)
        .bind(access)
        .bind(token_digest)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn push_token(
        &self,
        user_id: Uuid,
        access: &str,
        token_digest: &str,
    ) -> Result<(), DatabaseError> {
        sqlx::query("INSERT INTO user_tokens (user_id, access, token_digest) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(access)
            .bind(token_digest)
            .execute(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, "session token".to_string()))?;
        Ok(())
    }

    async fn pull_token(&self, user_id: Uuid, token_digest: &str) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM user_tokens WHERE user_id = $1 AND token_digest = $2")
            .bind(user_id)
            .bind(token_digest)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
