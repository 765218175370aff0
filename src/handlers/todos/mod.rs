// handlers/todos - to-do routes, all behind the session middleware
//
// Every per-item handler filters on (id, owner). A well-formed id that belongs
// to someone else is reported exactly like a missing one.

use uuid::Uuid;

pub mod collection;
pub mod record;

pub use collection::{create as todos_create, list as todos_list};
pub use record::{
    complete as todo_complete, delete as todo_delete, get as todo_get, patch as todo_patch,
};

/// Parse a path id, `None` when it is not a UUID
pub(crate) fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}

/// Completion timestamps are milliseconds since the Unix epoch
pub(crate) fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
