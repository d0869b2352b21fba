//! Request Gate
//!
//! Sits in front of every route. Requests to protected paths reach their
//! handler only with a verified identity attached; everything else passes
//! through untouched except for the identity headers, which a client may
//! never set itself.

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::application::check_session::{CheckSessionUseCase, SessionRejection};
use crate::application::config::AuthConfig;
use crate::application::token::TokenRejection;
use crate::domain::entity::identity::VerifiedIdentity;
use crate::error::AuthError;

/// Verified subject id, added by the gate
pub const USER_ID_HEADER: HeaderName = HeaderName::from_static("x-user-id");

/// Verified subject email, added by the gate
pub const USER_EMAIL_HEADER: HeaderName = HeaderName::from_static("x-user-email");

/// Gate state
#[derive(Clone)]
pub struct GateState {
    pub config: Arc<AuthConfig>,
}

impl GateState {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self { config }
    }
}

/// Gate middleware, installed with `axum::middleware::from_fn_with_state`
pub async fn request_gate(
    State(state): State<GateState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let (mut parts, body) = req.into_parts();
    strip_identity_headers(&mut parts.headers);

    if !state.config.protected_paths.matches(parts.uri.path()) {
        return next.run(Request::from_parts(parts, body)).await;
    }

    let identity = match CheckSessionUseCase::new(&state.config).execute(&parts.headers) {
        Ok(identity) => identity,
        Err(rejection) => {
            log_rejection(parts.uri.path(), rejection);
            return AuthError::from(rejection).into_response();
        }
    };

    let (Ok(id_value), Ok(email_value)) = (
        HeaderValue::from_str(&identity.subject_id.to_string()),
        HeaderValue::from_str(identity.subject_email()),
    ) else {
        tracing::warn!(path = %parts.uri.path(), "Verified email is not a valid header value");
        return AuthError::AuthenticationFailed.into_response();
    };

    parts.headers.insert(USER_ID_HEADER, id_value);
    parts.headers.insert(USER_EMAIL_HEADER, email_value);
    parts.extensions.insert::<VerifiedIdentity>(identity);

    next.run(Request::from_parts(parts, body)).await
}

fn strip_identity_headers(headers: &mut HeaderMap) {
    headers.remove(USER_ID_HEADER);
    headers.remove(USER_EMAIL_HEADER);
}

/// Sub-reasons are for the server log only; the client sees a uniform 401
fn log_rejection(path: &str, rejection: SessionRejection) {
    match rejection {
        SessionRejection::NoToken => {}
        SessionRejection::Rejected(_, TokenRejection::MissingSecret) => {}
        SessionRejection::Rejected(source, TokenRejection::InvalidSignature) => {
            tracing::warn!(path, source = source.as_str(), "Token signature mismatch");
        }
        SessionRejection::Rejected(source, reason) => {
            tracing::debug!(path, source = source.as_str(), reason = %reason, "Token rejected");
        }
    }
}
