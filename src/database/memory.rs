use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewTodo, NewUser, SessionToken, Todo, TodoChanges, User};
use crate::database::repository::{Store, TodoStore, UserStore};

struct UserDocument {
    user: User,
    tokens: Vec<SessionToken>,
}

/// Process-local store. Todos keep insertion order so listings are stable.
#[derive(Default)]
pub struct MemoryStore {
    todos: RwLock<Vec<Todo>>,
    users: RwLock<HashMap<Uuid, UserDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn insert_todo(&self, todo: NewTodo) -> Result<Todo, DatabaseError> {
        let todo = Todo {
            id: Uuid::new_v4(),
            text: todo.text,
            completed: false,
            completed_at: None,
            creator: todo.creator,
        };
        self.todos.write().await.push(todo.clone());
        Ok(todo)
    }

    async fn list_owned(&self, owner: Uuid) -> Result<Vec<Todo>, DatabaseError> {
        let todos = self.todos.read().await;
        Ok(todos.iter().filter(|t| t.creator == owner).cloned().collect())
    }

    async fn find_owned(&self, id: Uuid, owner: Uuid) -> Result<Option<Todo>, DatabaseError> {
        let todos = self.todos.read().await;
        Ok(todos
            .iter()
            .find(|t| t.id == id && t.creator == owner)
            .cloned())
    }

    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> Result<Option<Todo>, DatabaseError> {
        let mut todos = self.todos.write().await;
        let position = todos.iter().position(|t| t.id == id && t.creator == owner);
        Ok(position.map(|index| todos.remove(index)))
    }

    async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: TodoChanges,
    ) -> Result<Option<Todo>, DatabaseError> {
        let mut todos = self.todos.write().await;
        let Some(todo) = todos.iter_mut().find(|t| t.id == id && t.creator == owner) else {
            return Ok(None);
        };
        if let Some(text) = changes.text {
            todo.text = text;
        }
        todo.completed = changes.completed;
        todo.completed_at = changes.completed_at;
        Ok(Some(todo.clone()))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut users = self.users.write().await;
        if users.values().any(|doc| doc.user.email == user.email) {
            return Err(DatabaseError::Duplicate(format!("email {}", user.email)));
        }

        let user = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        users.insert(
            user.id,
            UserDocument {
                user: user.clone(),
                tokens: Vec::new(),
            },
        );
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|doc| doc.user.email == email)
            .map(|doc| doc.user.clone()))
    }

    async fn find_by_token(
        &self,
        user_id: Uuid,
        access: &str,
        token_digest: &str,
    ) -> Result<Option<User>, DatabaseError> {
        let users = self.users.read().await;
        Ok(users
            .get(&user_id)
            .filter(|doc| {
                doc.tokens
                    .iter()
                    .any(|t| t.access == access && t.token_digest == token_digest)
            })
            .map(|doc| doc.user.clone()))
    }

    async fn push_token(
        &self,
        user_id: Uuid,
        access: &str,
        token_digest: &str,
    ) -> Result<(), DatabaseError> {
        let mut users = self.users.write().await;
        let doc = users
            .get_mut(&user_id)
            .ok_or_else(|| DatabaseError::NotFound(format!("user {}", user_id)))?;
        doc.tokens.push(SessionToken {
            access: access.to_string(),
            token_digest: token_digest.to_string(),
        });
        Ok(())
    }

    async fn pull_token(&self, user_id: Uuid, token_digest: &str) -> Result<(), DatabaseError> {
        let mut users = self.users.write().await;
        if let Some(doc) = users.get_mut(&user_id) {
            doc.tokens.retain(|t| t.token_digest != token_digest);
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
