//! Sign In Use Case
//!
//! Checks the credential pair, then mints an identity token.

use std::sync::Arc;
use std::time::SystemTime;

use crate::application::config::AuthConfig;
use crate::application::credential_store::CredentialStore;
use crate::application::token::{IssuedToken, TokenIssuer};
use crate::domain::entity::identity::Subject;
use crate::domain::repository::CredentialRepository;
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in output
pub struct SignInOutput {
    pub subject: Subject,
    pub token: IssuedToken,
}

/// Sign in use case
pub struct SignInUseCase<R>
where
    R: CredentialRepository,
{
    store: CredentialStore<R>,
    issuer: TokenIssuer,
}

impl<R> SignInUseCase<R>
where
    R: CredentialRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        let issuer = TokenIssuer::from_config(&config);
        Self {
            store: CredentialStore::new(repo, config),
            issuer,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        let subject = self
            .store
            .verify(&input.email, input.password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let token = self.issuer.issue(&subject, SystemTime::now())?;

        tracing::info!(user_id = %subject.id, "User signed in");

        Ok(SignInOutput { subject, token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::token::TokenVerifier;
    use crate::infra::memory::InMemoryCredentialRepository;

    async fn registered(config: AuthConfig) -> (Arc<InMemoryCredentialRepository>, Arc<AuthConfig>) {
        let repo = Arc::new(InMemoryCredentialRepository::new());
        let config = Arc::new(config);
        CredentialStore::new(repo.clone(), config.clone())
            .create("a@test.com", "secret123".to_string())
            .await
            .unwrap();
        (repo, config)
    }

    #[tokio::test]
    async fn test_sign_in_issues_verifiable_token() {
        let (repo, config) = registered(AuthConfig::development("test-secret")).await;

        let output = SignInUseCase::new(repo, config.clone())
            .execute(SignInInput {
                email: "a@test.com".to_string(),
                password: "secret123".to_string(),
            })
            .await
            .unwrap();

        let identity = TokenVerifier::from_config(&config)
            .verify(&output.token.token)
            .unwrap();
        assert_eq!(identity.subject_id, output.subject.id);
        assert_eq!(identity.subject_email, "a@test.com");
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let (repo, config) = registered(AuthConfig::development("test-secret")).await;

        let result = SignInUseCase::new(repo, config)
            .execute(SignInInput {
                email: "a@test.com".to_string(),
                password: "wrong-pass".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_missing_secret_after_valid_credentials() {
        let (repo, config) = registered(AuthConfig::default()).await;

        let result = SignInUseCase::new(repo, config)
            .execute(SignInInput {
                email: "a@test.com".to_string(),
                password: "secret123".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AuthError::MissingSigningSecret)));
    }
}
