//! In-Memory Repository Implementation
//!
//! Backs tests and local experiments without a database. Enforces the same
//! email uniqueness as the `users` table.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entity::credential::Credential;
use crate::domain::repository::CredentialRepository;
use crate::domain::value_object::{email::Email, user_id::UserId, user_password::UserPassword};
use crate::error::{AuthError, AuthResult};

/// Credential repository kept in process memory
#[derive(Clone, Default)]
pub struct InMemoryCredentialRepository {
    credentials: Arc<RwLock<HashMap<UserId, Credential>>>,
}

impl InMemoryCredentialRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.credentials.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.credentials.read().await.is_empty()
    }
}

impl CredentialRepository for InMemoryCredentialRepository {
    async fn create(&self, credential: &Credential) -> AuthResult<()> {
        let mut credentials = self.credentials.write().await;

        if credentials.values().any(|c| c.email == credential.email) {
            return Err(AuthError::EmailTaken);
        }

        credentials.insert(credential.user_id, credential.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Credential>> {
        let credentials = self.credentials.read().await;
        Ok(credentials.values().find(|c| &c.email == email).cloned())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<Credential>> {
        Ok(self.credentials.read().await.get(user_id).cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let credentials = self.credentials.read().await;
        Ok(credentials.values().any(|c| &c.email == email))
    }

    async fn update_password(
        &self,
        user_id: &UserId,
        password_hash: &UserPassword,
    ) -> AuthResult<()> {
        let mut credentials = self.credentials.write().await;
        let credential = credentials.get_mut(user_id).ok_or(AuthError::UserNotFound)?;
        credential.update_password(password_hash.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::user_password::RawPassword;

    fn credential(email: &str) -> Credential {
        let raw = RawPassword::new("secret123".to_string()).unwrap();
        Credential::new(
            Email::new(email).unwrap(),
            UserPassword::from_raw(&raw, None).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_unique_email() {
        let repo = InMemoryCredentialRepository::new();
        repo.create(&credential("a@test.com")).await.unwrap();

        let err = repo.create(&credential("a@test.com")).await.unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_lookups() {
        let repo = InMemoryCredentialRepository::new();
        let stored = credential("a@test.com");
        repo.create(&stored).await.unwrap();

        let email = Email::new("a@test.com").unwrap();
        assert!(repo.exists_by_email(&email).await.unwrap());
        assert_eq!(
            repo.find_by_email(&email).await.unwrap().map(|c| c.user_id),
            Some(stored.user_id)
        );
        assert!(repo.find_by_id(&stored.user_id).await.unwrap().is_some());
        assert!(repo.find_by_id(&UserId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_password_unknown_user() {
        let repo = InMemoryCredentialRepository::new();
        let hash = credential("a@test.com").password_hash;

        let err = repo.update_password(&UserId::new(), &hash).await.unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
    }
}
