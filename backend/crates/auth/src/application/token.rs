//! Identity Tokens
//!
//! HS256 JWTs carrying `{sub, email, iat, exp}`. The issuer performs no
//! password check; callers hand it a subject that already authenticated.
//! Verification is pure computation over the token and the secret.

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

use crate::application::config::AuthConfig;
use crate::domain::entity::identity::{Subject, VerifiedIdentity};
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Token payload
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    /// Stable user identifier
    sub: String,
    email: String,
    /// Issued-at (seconds since epoch)
    iat: i64,
    /// Expiry (seconds since epoch)
    exp: i64,
}

/// Freshly minted token and the cookie lifetime that goes with it
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub max_age: Duration,
    pub expires_at: DateTime<Utc>,
}

/// Why a token was not accepted
///
/// Only `MissingSecret` changes the client-facing outcome; the rest are
/// diagnostics behind a uniform 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenRejection {
    #[error("signing secret is not configured")]
    MissingSecret,

    #[error("token expired")]
    Expired,

    #[error("token signature mismatch")]
    InvalidSignature,

    #[error("token claims malformed")]
    MalformedClaims,
}

impl From<TokenRejection> for AuthError {
    fn from(rejection: TokenRejection) -> Self {
        match rejection {
            TokenRejection::MissingSecret => AuthError::MissingSigningSecret,
            _ => AuthError::AuthenticationFailed,
        }
    }
}

/// Mints identity tokens
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    secret: Option<SecretString>,
    lifetime: Duration,
}

impl TokenIssuer {
    pub fn new(secret: Option<SecretString>, lifetime: Duration) -> Self {
        Self { secret, lifetime }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.jwt_secret.clone(), config.token_lifetime)
    }

    /// Sign a token for `subject`, valid from `now` for the configured lifetime
    pub fn issue(&self, subject: &Subject, now: SystemTime) -> AuthResult<IssuedToken> {
        let secret = self.secret.as_ref().ok_or(AuthError::MissingSigningSecret)?;

        let out_of_range = || AuthError::Internal("Token expiry out of range".to_string());

        let iat = now
            .duration_since(UNIX_EPOCH)
            .map_err(|_| AuthError::Internal("System clock is before the epoch".to_string()))?
            .as_secs();
        let iat = i64::try_from(iat).map_err(|_| out_of_range())?;
        let exp = i64::try_from(self.lifetime.as_secs())
            .ok()
            .and_then(|lifetime| iat.checked_add(lifetime))
            .ok_or_else(out_of_range)?;

        let claims = Claims {
            sub: subject.id.to_string(),
            email: subject.email.as_str().to_string(),
            iat,
            exp,
        };

        let token = encode(
            &Header::new(ALGORITHM),
            &claims,
            &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
        )
        .map_err(|e| AuthError::Internal(format!("Failed to encode JWT: {e}")))?;

        let expires_at = DateTime::from_timestamp(exp, 0).ok_or_else(out_of_range)?;

        Ok(IssuedToken {
            token,
            max_age: self.lifetime,
            expires_at,
        })
    }
}

/// Checks identity tokens
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    secret: Option<SecretString>,
}

impl TokenVerifier {
    pub fn new(secret: Option<SecretString>) -> Self {
        Self { secret }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.jwt_secret.clone())
    }

    /// Verify signature, expiry (no leeway) and claim shape
    pub fn verify(&self, token: &str) -> Result<VerifiedIdentity, TokenRejection> {
        let secret = self.secret.as_ref().ok_or(TokenRejection::MissingSecret)?;

        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.expose_secret().as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            JwtErrorKind::ExpiredSignature => TokenRejection::Expired,
            JwtErrorKind::InvalidSignature => TokenRejection::InvalidSignature,
            _ => TokenRejection::MalformedClaims,
        })?;

        let subject_id: UserId = claims
            .sub
            .parse()
            .map_err(|_| TokenRejection::MalformedClaims)?;

        if claims.email.trim().is_empty() {
            return Err(TokenRejection::MalformedClaims);
        }

        let expires_at =
            DateTime::from_timestamp(claims.exp, 0).ok_or(TokenRejection::MalformedClaims)?;

        Ok(VerifiedIdentity {
            subject_id,
            subject_email: claims.email,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::email::Email;

    const SECRET: &str = "test_secret_key_for_testing_purposes_only";

    fn secret(value: &str) -> Option<SecretString> {
        Some(SecretString::from(value.to_string()))
    }

    fn subject() -> Subject {
        Subject {
            id: UserId::new(),
            email: Email::new("a@test.com").unwrap(),
        }
    }

    /// Replace the first character of the signature segment
    fn tamper_signature(token: &str) -> String {
        let (head, signature) = token.rsplit_once('.').unwrap();
        let first = signature.chars().next().unwrap();
        let replacement = if first == 'A' { 'B' } else { 'A' };
        format!("{head}.{replacement}{}", &signature[1..])
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let subject = subject();
        let issuer = TokenIssuer::new(secret(SECRET), Duration::from_secs(7 * 24 * 3600));
        let verifier = TokenVerifier::new(secret(SECRET));

        let issued = issuer.issue(&subject, SystemTime::now()).unwrap();
        assert_eq!(issued.max_age, Duration::from_secs(604_800));

        let identity = verifier.verify(&issued.token).unwrap();
        assert_eq!(identity.subject_id, subject.id);
        assert_eq!(identity.subject_email, "a@test.com");
        assert_eq!(identity.expires_at, issued.expires_at);
    }

    #[test]
    fn test_one_second_token_expires() {
        let issuer = TokenIssuer::new(secret(SECRET), Duration::from_secs(1));
        let verifier = TokenVerifier::new(secret(SECRET));

        let fresh = issuer.issue(&subject(), SystemTime::now()).unwrap();
        assert!(verifier.verify(&fresh.token).is_ok());

        let old = issuer
            .issue(&subject(), SystemTime::now() - Duration::from_secs(2))
            .unwrap();
        assert_eq!(verifier.verify(&old.token), Err(TokenRejection::Expired));
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let issuer = TokenIssuer::new(secret(SECRET), Duration::from_secs(60));
        let verifier = TokenVerifier::new(secret(SECRET));
        let issued = issuer.issue(&subject(), SystemTime::now()).unwrap();

        assert_eq!(
            verifier.verify(&tamper_signature(&issued.token)),
            Err(TokenRejection::InvalidSignature)
        );
    }

    #[test]
    fn test_other_secret_rejected() {
        let issuer = TokenIssuer::new(secret("secret-A"), Duration::from_secs(60));
        let verifier = TokenVerifier::new(secret("secret-B"));
        let issued = issuer.issue(&subject(), SystemTime::now()).unwrap();

        assert_eq!(
            verifier.verify(&issued.token),
            Err(TokenRejection::InvalidSignature)
        );
    }

    #[test]
    fn test_garbage_is_malformed() {
        let verifier = TokenVerifier::new(secret(SECRET));
        assert_eq!(verifier.verify("not-a-jwt"), Err(TokenRejection::MalformedClaims));
        assert_eq!(verifier.verify(""), Err(TokenRejection::MalformedClaims));
    }

    #[test]
    fn test_non_uuid_subject_is_malformed() {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs() as i64;
        let claims = Claims {
            sub: "not-a-uuid".to_string(),
            email: "a@test.com".to_string(),
            iat: now,
            exp: now + 60,
        };
        let token = encode(
            &Header::new(ALGORITHM),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let verifier = TokenVerifier::new(secret(SECRET));
        assert_eq!(verifier.verify(&token), Err(TokenRejection::MalformedClaims));
    }

    #[test]
    fn test_missing_email_claim_is_malformed() {
        #[derive(Serialize)]
        struct Partial {
            sub: String,
            exp: i64,
        }

        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs() as i64;
        let token = encode(
            &Header::new(ALGORITHM),
            &Partial {
                sub: UserId::new().to_string(),
                exp: now + 60,
            },
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let verifier = TokenVerifier::new(secret(SECRET));
        assert_eq!(verifier.verify(&token), Err(TokenRejection::MalformedClaims));
    }

    #[test]
    fn test_oversized_lifetime_is_an_error() {
        for lifetime in [Duration::from_secs(u64::MAX), Duration::from_secs(i64::MAX as u64)] {
            let issuer = TokenIssuer::new(secret(SECRET), lifetime);
            assert!(matches!(
                issuer.issue(&subject(), SystemTime::now()),
                Err(AuthError::Internal(_))
            ));
        }
    }

    #[test]
    fn test_missing_secret() {
        let issuer = TokenIssuer::new(None, Duration::from_secs(60));
        assert!(matches!(
            issuer.issue(&subject(), SystemTime::now()),
            Err(AuthError::MissingSigningSecret)
        ));

        let verifier = TokenVerifier::new(None);
        assert_eq!(verifier.verify("a.b.c"), Err(TokenRejection::MissingSecret));
        assert!(matches!(
            AuthError::from(TokenRejection::MissingSecret),
            AuthError::MissingSigningSecret
        ));
        assert!(matches!(
            AuthError::from(TokenRejection::Expired),
            AuthError::AuthenticationFailed
        ));
    }
}
