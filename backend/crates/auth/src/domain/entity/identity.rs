//! Identity
//!
//! [`Subject`] is who a credential belongs to. [`VerifiedIdentity`] is what
//! the request gate attaches to a request after the token checked out; it
//! lives for exactly one request.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::value_object::{email::Email, user_id::UserId};

/// Authenticated user's identity fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subject {
    pub id: UserId,
    pub email: Email,
}

/// Identity taken from a verified token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub subject_id: UserId,
    pub subject_email: String,
    pub expires_at: DateTime<Utc>,
}

impl VerifiedIdentity {
    pub fn subject_id(&self) -> UserId {
        self.subject_id
    }

    pub fn subject_email(&self) -> &str {
        &self.subject_email
    }
}
