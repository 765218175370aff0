use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::{AppConfig, SecurityConfig};
use crate::database::Store;
use crate::handlers::{service, todos, users};
use crate::middleware::{authenticate, AUTH_HEADER};

/// Shared handles passed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: AppConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let mut router = Router::new()
        // Public
        .route("/", get(service::root))
        .route("/health", get(service::health))
        .merge(user_public_routes())
        // Session required
        .merge(session_routes(state.clone()))
        // Global middleware
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(cors_layer(&config.security));

    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn user_public_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(users::users_signup))
        .route("/users/login", post(users::users_login))
}

fn session_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/todos", get(todos::todos_list).post(todos::todos_create))
        .route(
            "/todos/:id",
            get(todos::todo_get)
                .patch(todos::todo_patch)
                .delete(todos::todo_delete),
        )
        .route("/todos/remove/:id", get(todos::todo_delete))
        .route("/todos/complete/:id", get(todos::todo_complete))
        .route("/users/me", get(users::users_me))
        .route("/users/me/token", delete(users::users_logout))
        .route_layer(middleware::from_fn_with_state(state, authenticate))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();
    let auth_header = HeaderName::from_static(AUTH_HEADER);

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, auth_header.clone()])
        .expose_headers([auth_header])
}
