//! HTTP API server

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{require_user_id, AuthService, CookieOptions, SessionStore};
use crate::config::Config;
use crate::error::Result;
use crate::store::PostgresUserRepository;

use super::routes;

/// Application state shared across handlers
pub struct AppState {
    pub auth: AuthService,
}

pub type SharedState = Arc<AppState>;

/// Run the HTTP API server
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    let users = PostgresUserRepository::connect(&config.database).await?;
    users.ensure_schema().await?;

    let sessions = SessionStore::new(
        config.session.secret.clone(),
        CookieOptions::from_config(&config),
    );
    let auth = AuthService::new(Arc::new(users), sessions.clone());

    let state = Arc::new(AppState { auth });
    let app = create_router(state, sessions);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the router with all routes
fn create_router(state: SharedState, sessions: SessionStore) -> Router {
    let protected = Router::new()
        .route("/api/me", get(routes::current_user))
        .route_layer(from_fn_with_state(sessions, require_user_id));

    Router::new()
        // Auth routes
        .route("/auth/register", post(routes::register))
        .route("/auth/login", post(routes::login))
        .route("/auth/logout", post(routes::logout))
        // API routes
        .route("/api/health", get(routes::health))
        .merge(protected)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
