//! Cagnotte Router

use axum::{
    Router,
    routing::{get, patch, post},
};
use std::sync::Arc;

use crate::application::config::CagnotteConfig;
use crate::infra::postgres::PgCagnotteRepository;
use crate::presentation::handlers::{self, CagnotteAppState, CagnotteStore};

/// Public `/api/cagnottes` routes and owner routes under `/api/me/cagnottes`
///
/// Paths are absolute so the router can be merged next to the account
/// routes; the owner routes rely on the request gate.
pub fn cagnotte_router(repo: PgCagnotteRepository, config: Arc<CagnotteConfig>) -> Router {
    cagnotte_router_generic(repo, config)
}

/// Create a generic Cagnotte router for any repository implementation
pub fn cagnotte_router_generic<R>(repo: R, config: Arc<CagnotteConfig>) -> Router
where
    R: CagnotteStore,
{
    let state = CagnotteAppState {
        repo: Arc::new(repo),
        config,
    };

    Router::new()
        .route("/api/cagnottes", get(handlers::list_cagnottes::<R>))
        .route("/api/cagnottes/{id}", get(handlers::get_cagnotte::<R>))
        .route(
            "/api/cagnottes/{id}/donations",
            get(handlers::list_donations::<R>).post(handlers::donate::<R>),
        )
        .route("/api/cagnottes/{id}/updates", get(handlers::list_updates::<R>))
        .route("/api/cagnottes/{id}/stats", get(handlers::stats::<R>))
        .route(
            "/api/me/cagnottes",
            get(handlers::list_my_cagnottes::<R>).post(handlers::create_cagnotte::<R>),
        )
        .route(
            "/api/me/cagnottes/{id}",
            patch(handlers::update_cagnotte::<R>).delete(handlers::delete_cagnotte::<R>),
        )
        .route("/api/me/cagnottes/{id}/updates", post(handlers::post_update::<R>))
        .with_state(state)
}
