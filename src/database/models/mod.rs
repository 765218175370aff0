pub mod todo;
pub mod user;

pub use todo::{NewTodo, Todo, TodoChanges, TodoPatch};
pub use user::{NewUser, SessionToken, User};

/// A single rejected body field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}
