//! HTTP Handlers

use auth::CurrentUser;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use kernel::id::CagnotteId;
use std::sync::Arc;

use crate::application::config::CagnotteConfig;
use crate::application::{
    BrowseCagnottesUseCase, DonateUseCase, ManageCagnotteUseCase, PostUpdateUseCase, StatsUseCase,
};
use crate::domain::repository::{CagnotteRepository, DonationRepository, UpdateRepository};
use crate::error::{CagnotteError, CagnotteResult};
use crate::presentation::dto::{
    CagnotteResponse, CagnotteSummaryResponse, CreateCagnotteRequest, DonateRequest,
    DonationResponse, PageQuery, PageResponse, PostUpdateRequest, StatsResponse,
    UpdateCagnotteRequest, UpdateResponse,
};

/// Everything the cagnotte handlers need from storage
pub trait CagnotteStore:
    CagnotteRepository + DonationRepository + UpdateRepository + Clone + Send + Sync + 'static
{
}

impl<T> CagnotteStore for T where
    T: CagnotteRepository + DonationRepository + UpdateRepository + Clone + Send + Sync + 'static
{
}

/// Shared state for cagnotte handlers
#[derive(Clone)]
pub struct CagnotteAppState<R>
where
    R: CagnotteStore,
{
    pub repo: Arc<R>,
    pub config: Arc<CagnotteConfig>,
}

/// A malformed id cannot name an existing cagnotte
fn parse_id(raw: &str) -> CagnotteResult<CagnotteId> {
    raw.parse().map_err(|_| CagnotteError::NotFound)
}

// ============================================================================
// Public Browsing
// ============================================================================

/// GET /api/cagnottes
pub async fn list_cagnottes<R>(
    State(state): State<CagnotteAppState<R>>,
    Query(query): Query<PageQuery>,
) -> CagnotteResult<impl IntoResponse>
where
    R: CagnotteStore,
{
    let pagination = state.config.pagination(query.page, query.per_page);
    let page = BrowseCagnottesUseCase::new(state.repo.clone())
        .list(pagination)
        .await?;

    Ok(Json(PageResponse::from_page(page, CagnotteSummaryResponse::from)))
}

/// GET /api/cagnottes/{id}
pub async fn get_cagnotte<R>(
    State(state): State<CagnotteAppState<R>>,
    Path(id): Path<String>,
) -> CagnotteResult<impl IntoResponse>
where
    R: CagnotteStore,
{
    let id = parse_id(&id)?;
    let summary = BrowseCagnottesUseCase::new(state.repo.clone()).get(&id).await?;

    Ok(Json(CagnotteSummaryResponse::from(summary)))
}

// ============================================================================
// Donations
// ============================================================================

/// GET /api/cagnottes/{id}/donations
pub async fn list_donations<R>(
    State(state): State<CagnotteAppState<R>>,
    Path(id): Path<String>,
    Query(query): Query<PageQuery>,
) -> CagnotteResult<impl IntoResponse>
where
    R: CagnotteStore,
{
    let id = parse_id(&id)?;
    let pagination = state.config.pagination(query.page, query.per_page);
    let page = DonateUseCase::new(state.repo.clone(), state.repo.clone())
        .list(&id, pagination)
        .await?;

    Ok(Json(PageResponse::from_page(page, DonationResponse::from)))
}

/// POST /api/cagnottes/{id}/donations
///
/// Public: donors need no account. The payment is simulated and always succeeds.
pub async fn donate<R>(
    State(state): State<CagnotteAppState<R>>,
    Path(id): Path<String>,
    Json(req): Json<DonateRequest>,
) -> CagnotteResult<impl IntoResponse>
where
    R: CagnotteStore,
{
    let id = parse_id(&id)?;
    let donation = DonateUseCase::new(state.repo.clone(), state.repo.clone())
        .donate(&id, req.into())
        .await?;

    Ok((StatusCode::CREATED, Json(DonationResponse::from(donation))))
}

// ============================================================================
// Updates
// ============================================================================

/// GET /api/cagnottes/{id}/updates
pub async fn list_updates<R>(
    State(state): State<CagnotteAppState<R>>,
    Path(id): Path<String>,
) -> CagnotteResult<impl IntoResponse>
where
    R: CagnotteStore,
{
    let id = parse_id(&id)?;
    let updates = PostUpdateUseCase::new(state.repo.clone(), state.repo.clone())
        .list(&id)
        .await?;

    Ok(Json(
        updates
            .into_iter()
            .map(UpdateResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// POST /api/me/cagnottes/{id}/updates
pub async fn post_update<R>(
    State(state): State<CagnotteAppState<R>>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<PostUpdateRequest>,
) -> CagnotteResult<impl IntoResponse>
where
    R: CagnotteStore,
{
    let id = parse_id(&id)?;
    let update = PostUpdateUseCase::new(state.repo.clone(), state.repo.clone())
        .post(&identity.subject_id(), &id, req.into())
        .await?;

    Ok((StatusCode::CREATED, Json(UpdateResponse::from(update))))
}

// ============================================================================
// Statistics
// ============================================================================

/// GET /api/cagnottes/{id}/stats
pub async fn stats<R>(
    State(state): State<CagnotteAppState<R>>,
    Path(id): Path<String>,
) -> CagnotteResult<impl IntoResponse>
where
    R: CagnotteStore,
{
    let id = parse_id(&id)?;
    let stats = StatsUseCase::new(state.repo.clone(), state.repo.clone())
        .execute(&id)
        .await?;

    Ok(Json(StatsResponse::from(stats)))
}

// ============================================================================
// Owner Management
// ============================================================================

/// GET /api/me/cagnottes
pub async fn list_my_cagnottes<R>(
    State(state): State<CagnotteAppState<R>>,
    CurrentUser(identity): CurrentUser,
) -> CagnotteResult<impl IntoResponse>
where
    R: CagnotteStore,
{
    let owned = BrowseCagnottesUseCase::new(state.repo.clone())
        .list_owned(&identity.subject_id())
        .await?;

    Ok(Json(
        owned
            .into_iter()
            .map(CagnotteSummaryResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// POST /api/me/cagnottes
pub async fn create_cagnotte<R>(
    State(state): State<CagnotteAppState<R>>,
    CurrentUser(identity): CurrentUser,
    Json(req): Json<CreateCagnotteRequest>,
) -> CagnotteResult<impl IntoResponse>
where
    R: CagnotteStore,
{
    let cagnotte = ManageCagnotteUseCase::new(state.repo.clone(), state.config.clone())
        .create(identity.subject_id(), req.into())
        .await?;

    Ok((StatusCode::CREATED, Json(CagnotteResponse::from(cagnotte))))
}

/// PATCH /api/me/cagnottes/{id}
pub async fn update_cagnotte<R>(
    State(state): State<CagnotteAppState<R>>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateCagnotteRequest>,
) -> CagnotteResult<impl IntoResponse>
where
    R: CagnotteStore,
{
    let id = parse_id(&id)?;
    let cagnotte = ManageCagnotteUseCase::new(state.repo.clone(), state.config.clone())
        .update(&identity.subject_id(), &id, req.into())
        .await?;

    Ok(Json(CagnotteResponse::from(cagnotte)))
}

/// DELETE /api/me/cagnottes/{id}
pub async fn delete_cagnotte<R>(
    State(state): State<CagnotteAppState<R>>,
    CurrentUser(identity): CurrentUser,
    Path(id): Path<String>,
) -> CagnotteResult<impl IntoResponse>
where
    R: CagnotteStore,
{
    let id = parse_id(&id)?;
    ManageCagnotteUseCase::new(state.repo.clone(), state.config.clone())
        .delete(&identity.subject_id(), &id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
