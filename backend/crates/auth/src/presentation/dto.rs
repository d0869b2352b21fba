//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::identity::{Subject, VerifiedIdentity};

// ============================================================================
// Sign Up / Sign In
// ============================================================================

/// Credentials posted to sign-up and sign-in
///
/// No `Debug`: the password must never reach a log line.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

pub type SignUpRequest = CredentialsRequest;
pub type SignInRequest = CredentialsRequest;

/// Subject identity as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectResponse {
    pub id: String,
    pub email: String,
}

impl From<Subject> for SubjectResponse {
    fn from(subject: Subject) -> Self {
        Self {
            id: subject.id.to_string(),
            email: subject.email.into_db(),
        }
    }
}

impl From<&VerifiedIdentity> for SubjectResponse {
    fn from(identity: &VerifiedIdentity) -> Self {
        Self {
            id: identity.subject_id.to_string(),
            email: identity.subject_email.clone(),
        }
    }
}

// ============================================================================
// Session Status
// ============================================================================

/// Session status response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl SessionStatusResponse {
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            id: None,
            email: None,
            expires_at: None,
        }
    }
}

impl From<VerifiedIdentity> for SessionStatusResponse {
    fn from(identity: VerifiedIdentity) -> Self {
        Self {
            authenticated: true,
            id: Some(identity.subject_id.to_string()),
            email: Some(identity.subject_email),
            expires_at: Some(identity.expires_at),
        }
    }
}

// ============================================================================
// Account
// ============================================================================

/// Profile response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Change password request
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}
