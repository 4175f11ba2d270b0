use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::Config;
use crate::state::SharedState;

pub mod auth;
mod error;
mod movies;
mod observability;
mod types;
mod validation;
mod votes;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub async fn router(state: Arc<AppState>) -> Router {
    router_with_sessions(state, MemoryStore::default()).await
}

/// Builds the router on a caller-provided session store.
pub async fn router_with_sessions(state: Arc<AppState>, sessions: MemoryStore) -> Router {
    let (cors_origins, secure_cookies, session_ttl_hours) = {
        let config = state.config().read().await;
        (
            config.server.cors_allowed_origins.clone(),
            config.server.secure_cookies,
            config.security.session_ttl_hours,
        )
    };

    // Login replaces this with an absolute expiry matching the session record.
    let session_layer = SessionManagerLayer::new(sessions)
        .with_secure(secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::hours(i64::from(
            session_ttl_hours,
        ))));

    let cors_layer = if cors_origins.iter().any(|origin| origin == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .merge(gallery_routes())
        .route("/health", get(observability::health))
        .route("/metrics", get(observability::get_metrics))
        .layer(session_layer)
        .with_state(state)
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(middleware::from_fn(observability::security_headers_middleware))
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

fn gallery_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/create", post(auth::create_account))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/checkLogin", get(auth::check_login))
        .route("/userRole", get(auth::user_role))
        .route("/updateRole", post(auth::update_role))
        .route("/movies", get(movies::list_movies))
        .route("/movie", get(movies::get_movie))
        .route("/addMovie", post(movies::add_movie))
        .route("/editMovie/{id}", post(movies::edit_movie))
        .route("/removeMovies", post(movies::remove_movie))
        .route("/comment", post(movies::set_comment))
        .route("/movie/updateLikeDislike", post(votes::update_like_dislike))
        .route("/user/likedMovies", get(votes::liked_movies))
        .route("/user/dislikedMovies", get(votes::disliked_movies))
}
