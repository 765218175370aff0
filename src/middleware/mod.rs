pub mod auth;

pub use auth::{authenticate, AuthUser, AUTH_HEADER};
