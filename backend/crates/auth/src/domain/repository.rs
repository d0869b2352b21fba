//! Repository Traits
//!
//! Persistence interface for credential records. Implementations live in
//! the infrastructure layer.

use crate::domain::entity::credential::Credential;
use crate::domain::value_object::{email::Email, user_id::UserId, user_password::UserPassword};
use crate::error::AuthResult;

/// Credential repository trait
#[trait_variant::make(CredentialRepository: Send)]
pub trait LocalCredentialRepository {
    /// Persist a new credential; a duplicate email is `AuthError::EmailTaken`
    async fn create(&self, credential: &Credential) -> AuthResult<()>;

    /// Find credential by email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Credential>>;

    /// Find credential by user ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<Credential>>;

    /// Check if email exists
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Replace the password hash of an existing credential
    async fn update_password(&self, user_id: &UserId, password_hash: &UserPassword)
    -> AuthResult<()>;
}
