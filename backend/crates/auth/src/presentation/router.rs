//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::CredentialRepository;
use crate::infra::postgres::PgCredentialRepository;
use crate::presentation::handlers::{self, AuthAppState};

/// Public auth endpoints, to be nested under `/api/auth`
pub fn auth_router(repo: PgCredentialRepository, config: Arc<AuthConfig>) -> Router {
    auth_router_generic(repo, config)
}

/// Account endpoints under `/api/me`; these rely on the request gate
pub fn me_router(repo: PgCredentialRepository, config: Arc<AuthConfig>) -> Router {
    me_router_generic(repo, config)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, config: Arc<AuthConfig>) -> Router
where
    R: CredentialRepository + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        config,
    };

    Router::new()
        .route("/signup", post(handlers::sign_up::<R>))
        .route("/signin", post(handlers::sign_in::<R>))
        .route("/signout", post(handlers::sign_out::<R>))
        .route("/status", get(handlers::session_status::<R>))
        .with_state(state)
}

/// Create a generic account router for any repository implementation
pub fn me_router_generic<R>(repo: R, config: Arc<AuthConfig>) -> Router
where
    R: CredentialRepository + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        config,
    };

    Router::new()
        .route("/api/me", get(handlers::me))
        .route("/api/me/profile", get(handlers::profile::<R>))
        .route("/api/me/password", post(handlers::change_password::<R>))
        .with_state(state)
}
