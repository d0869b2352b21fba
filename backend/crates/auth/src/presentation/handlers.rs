//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use platform::cookie::to_header_value;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    CheckSessionUseCase, CredentialStore, SessionRejection, SignInInput, SignInUseCase,
    TokenRejection,
};
use crate::domain::repository::CredentialRepository;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    ChangePasswordRequest, ProfileResponse, SessionStatusResponse, SignInRequest, SignUpRequest,
    SubjectResponse,
};
use crate::presentation::extract::CurrentUser;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: CredentialRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

impl<R> AuthAppState<R>
where
    R: CredentialRepository + Clone + Send + Sync + 'static,
{
    fn store(&self) -> CredentialStore<R> {
        CredentialStore::new(self.repo.clone(), self.config.clone())
    }
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /api/auth/signup
pub async fn sign_up<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<SignUpRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: CredentialRepository + Clone + Send + Sync + 'static,
{
    let subject = state.store().create(&req.email, req.password).await?;

    Ok((StatusCode::CREATED, Json(SubjectResponse::from(subject))))
}

// ============================================================================
// Sign In
// ============================================================================

/// POST /api/auth/signin
pub async fn sign_in<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<SignInRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: CredentialRepository + Clone + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(SignInInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    let cookie = state
        .config
        .cookie
        .build_set_cookie(&output.token.token, output.token.max_age.as_secs());

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, to_header_value(&cookie))],
        Json(SubjectResponse::from(output.subject)),
    ))
}

// ============================================================================
// Sign Out
// ============================================================================

/// POST /api/auth/signout
///
/// Tokens are stateless; signing out only overwrites the cookie.
pub async fn sign_out<R>(State(state): State<AuthAppState<R>>) -> impl IntoResponse
where
    R: CredentialRepository + Clone + Send + Sync + 'static,
{
    let cookie = state.config.cookie.build_expired_cookie();

    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, to_header_value(&cookie))],
    )
}

// ============================================================================
// Session Status
// ============================================================================

/// GET /api/auth/status
///
/// Never 401: an absent or invalid token is reported as unauthenticated.
pub async fn session_status<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<Json<SessionStatusResponse>>
where
    R: CredentialRepository + Clone + Send + Sync + 'static,
{
    match CheckSessionUseCase::new(&state.config).execute(&headers) {
        Ok(identity) => Ok(Json(identity.into())),
        Err(rejection @ SessionRejection::Rejected(_, TokenRejection::MissingSecret)) => {
            Err(rejection.into())
        }
        Err(_) => Ok(Json(SessionStatusResponse::anonymous())),
    }
}

// ============================================================================
// Account (behind the request gate)
// ============================================================================

/// GET /api/me
pub async fn me(CurrentUser(identity): CurrentUser) -> Json<SubjectResponse> {
    Json(SubjectResponse::from(&identity))
}

/// GET /api/me/profile
pub async fn profile<R>(
    State(state): State<AuthAppState<R>>,
    CurrentUser(identity): CurrentUser,
) -> AuthResult<Json<ProfileResponse>>
where
    R: CredentialRepository + Clone + Send + Sync + 'static,
{
    let profile = state
        .store()
        .find_profile(&identity.subject_id)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    Ok(Json(ProfileResponse {
        id: profile.subject.id.to_string(),
        email: profile.subject.email.into_db(),
        created_at: profile.created_at,
        updated_at: profile.updated_at,
    }))
}

/// POST /api/me/password
pub async fn change_password<R>(
    State(state): State<AuthAppState<R>>,
    CurrentUser(identity): CurrentUser,
    Json(req): Json<ChangePasswordRequest>,
) -> AuthResult<StatusCode>
where
    R: CredentialRepository + Clone + Send + Sync + 'static,
{
    state
        .store()
        .change_password(&identity.subject_id, req.current_password, req.new_password)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
