use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewTodo, NewUser, Todo, TodoChanges, User};

/// Todo collection. Every per-item call is scoped by `(id, owner)`.
#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn insert_todo(&self, todo: NewTodo) -> Result<Todo, DatabaseError>;

    async fn list_owned(&self, owner: Uuid) -> Result<Vec<Todo>, DatabaseError>;

    async fn find_owned(&self, id: Uuid, owner: Uuid) -> Result<Option<Todo>, DatabaseError>;

    /// Removes the item and returns it as it was.
    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> Result<Option<Todo>, DatabaseError>;

    /// Applies `changes` and returns the item as it is afterwards.
    async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: TodoChanges,
    ) -> Result<Option<Todo>, DatabaseError>;
}

/// User collection and the session tokens attached to each user.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with [`DatabaseError::Duplicate`] when the email is taken.
    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    /// Finds the user only while it still holds a token with this digest and access.
    async fn find_by_token(
        &self,
        user_id: Uuid,
        access: &str,
        token_digest: &str,
    ) -> Result<Option<User>, DatabaseError>;

    async fn push_token(
        &self,
        user_id: Uuid,
        access: &str,
        token_digest: &str,
    ) -> Result<(), DatabaseError>;

    async fn pull_token(&self, user_id: Uuid, token_digest: &str) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait Store: TodoStore + UserStore {
    fn backend_name(&self) -> &'static str;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}
