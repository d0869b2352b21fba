//! Credential Store
//!
//! The only component that reads or writes password hashes. Sign-in
//! failures look the same whether the email is unknown or the password is
//! wrong: same result, same Argon2 cost.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::config::AuthConfig;
use crate::domain::entity::credential::Credential;
use crate::domain::entity::identity::Subject;
use crate::domain::repository::CredentialRepository;
use crate::domain::value_object::{
    email::Email,
    user_id::UserId,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Account details shown to the signed-in user
#[derive(Debug, Clone)]
pub struct Profile {
    pub subject: Subject,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Credential store accessor
pub struct CredentialStore<R>
where
    R: CredentialRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> CredentialStore<R>
where
    R: CredentialRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    /// Register a new credential
    pub async fn create(&self, email: &str, password: String) -> AuthResult<Subject> {
        let email = Email::new(email)?;
        let raw_password = RawPassword::new(password)?;

        if self.repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = UserPassword::from_raw(&raw_password, self.config.pepper())?;
        let credential = Credential::new(email, password_hash);

        // A concurrent sign-up can still win the race; the repository maps
        // the unique violation to `EmailTaken`.
        self.repo.create(&credential).await?;

        tracing::info!(user_id = %credential.user_id, "User registered");

        Ok(credential.subject())
    }

    /// Check an email/password pair
    ///
    /// `None` is the single negative outcome for every kind of mismatch.
    pub async fn verify(&self, email: &str, password: String) -> AuthResult<Option<Subject>> {
        let raw_password = RawPassword::presented(password);

        let credential = match Email::new(email) {
            Ok(email) => self.repo.find_by_email(&email).await?,
            Err(_) => None,
        };

        let Some(credential) = credential else {
            raw_password.burn_verification(self.config.pepper());
            return Ok(None);
        };

        if credential
            .password_hash
            .verify(&raw_password, self.config.pepper())
        {
            Ok(Some(credential.subject()))
        } else {
            Ok(None)
        }
    }

    /// Replace the password after re-checking the current one
    pub async fn change_password(
        &self,
        user_id: &UserId,
        current_password: String,
        new_password: String,
    ) -> AuthResult<()> {
        let mut credential = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let current = RawPassword::presented(current_password);
        if !credential
            .password_hash
            .verify(&current, self.config.pepper())
        {
            return Err(AuthError::InvalidCredentials);
        }

        let new_password = RawPassword::new(new_password)?;
        credential.update_password(UserPassword::from_raw(&new_password, self.config.pepper())?);

        self.repo
            .update_password(&credential.user_id, &credential.password_hash)
            .await?;

        tracing::info!(user_id = %credential.user_id, "Password changed");

        Ok(())
    }

    /// Identity fields of a stored credential
    pub async fn find_subject(&self, user_id: &UserId) -> AuthResult<Option<Subject>> {
        Ok(self
            .repo
            .find_by_id(user_id)
            .await?
            .map(|credential| credential.subject()))
    }

    /// Profile of a stored credential, for the account page
    pub async fn find_profile(&self, user_id: &UserId) -> AuthResult<Option<Profile>> {
        Ok(self.repo.find_by_id(user_id).await?.map(|credential| Profile {
            subject: credential.subject(),
            created_at: credential.created_at,
            updated_at: credential.updated_at,
        }))
    }
}
