//! Check Session Use Case
//!
//! Finds the identity token on a request and verifies it. Shared by the
//! request gate and the status endpoint.

use axum::http::HeaderMap;
use platform::bearer::{BearerHeader, parse_bearer};
use platform::cookie::extract_cookie;

use crate::application::config::AuthConfig;
use crate::application::token::{TokenRejection, TokenVerifier};
use crate::domain::entity::identity::VerifiedIdentity;
use crate::error::AuthError;

/// Where the token came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Bearer,
    Cookie,
}

impl TokenSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenSource::Bearer => "bearer",
            TokenSource::Cookie => "cookie",
        }
    }
}

/// Why no identity could be established
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRejection {
    /// Neither a bearer header nor a cookie
    NoToken,
    /// A token was found but did not verify
    Rejected(TokenSource, TokenRejection),
}

impl From<SessionRejection> for AuthError {
    fn from(rejection: SessionRejection) -> Self {
        match rejection {
            SessionRejection::NoToken => AuthError::AuthenticationRequired,
            SessionRejection::Rejected(_, reason) => reason.into(),
        }
    }
}

/// Token from `Authorization: Bearer` or, failing that, the cookie
///
/// A malformed `Authorization` header falls through to the cookie.
pub fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Option<(String, TokenSource)> {
    match parse_bearer(headers) {
        BearerHeader::Token(token) => Some((token, TokenSource::Bearer)),
        BearerHeader::Absent | BearerHeader::Malformed => {
            extract_cookie(headers, cookie_name).map(|token| (token, TokenSource::Cookie))
        }
    }
}

/// Check session use case
pub struct CheckSessionUseCase {
    verifier: TokenVerifier,
    cookie_name: String,
}

impl CheckSessionUseCase {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            verifier: TokenVerifier::from_config(config),
            cookie_name: config.cookie.name.clone(),
        }
    }

    pub fn execute(&self, headers: &HeaderMap) -> Result<VerifiedIdentity, SessionRejection> {
        let (token, source) =
            extract_token(headers, &self.cookie_name).ok_or(SessionRejection::NoToken)?;

        self.verifier
            .verify(&token)
            .map_err(|reason| SessionRejection::Rejected(source, reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::token::TokenIssuer;
    use crate::domain::entity::identity::Subject;
    use crate::domain::value_object::{email::Email, user_id::UserId};
    use axum::http::{HeaderValue, header};
    use std::time::SystemTime;

    fn token_for(config: &AuthConfig, email: &str) -> String {
        let subject = Subject {
            id: UserId::new(),
            email: Email::new(email).unwrap(),
        };
        TokenIssuer::from_config(config)
            .issue(&subject, SystemTime::now())
            .unwrap()
            .token
    }

    fn headers(pairs: &[(header::HeaderName, String)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.append(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        headers
    }

    #[test]
    fn test_no_token() {
        let config = AuthConfig::development("test-secret");
        let result = CheckSessionUseCase::new(&config).execute(&HeaderMap::new());
        assert_eq!(result, Err(SessionRejection::NoToken));
    }

    #[test]
    fn test_bearer_preferred_over_cookie() {
        let config = AuthConfig::development("test-secret");
        let bearer = token_for(&config, "bearer@test.com");
        let cookie = token_for(&config, "cookie@test.com");

        let identity = CheckSessionUseCase::new(&config)
            .execute(&headers(&[
                (header::AUTHORIZATION, format!("Bearer {bearer}")),
                (header::COOKIE, format!("token={cookie}")),
            ]))
            .unwrap();
        assert_eq!(identity.subject_email, "bearer@test.com");
    }

    #[test]
    fn test_malformed_bearer_falls_through_to_cookie() {
        let config = AuthConfig::development("test-secret");
        let cookie = token_for(&config, "cookie@test.com");

        let identity = CheckSessionUseCase::new(&config)
            .execute(&headers(&[
                (header::AUTHORIZATION, "Basic dXNlcjpwdw==".to_string()),
                (header::COOKIE, format!("token={cookie}")),
            ]))
            .unwrap();
        assert_eq!(identity.subject_email, "cookie@test.com");
    }

    #[test]
    fn test_malformed_bearer_without_cookie_is_no_token() {
        let config = AuthConfig::development("test-secret");
        let result = CheckSessionUseCase::new(&config)
            .execute(&headers(&[(header::AUTHORIZATION, "Bearer".to_string())]));
        assert_eq!(result, Err(SessionRejection::NoToken));
    }

    #[test]
    fn test_bad_bearer_does_not_fall_back() {
        let config = AuthConfig::development("test-secret");
        let cookie = token_for(&config, "cookie@test.com");

        let result = CheckSessionUseCase::new(&config).execute(&headers(&[
            (header::AUTHORIZATION, "Bearer not.a.jwt".to_string()),
            (header::COOKIE, format!("token={cookie}")),
        ]));
        assert_eq!(
            result,
            Err(SessionRejection::Rejected(
                TokenSource::Bearer,
                TokenRejection::MalformedClaims
            ))
        );
    }

    #[test]
    fn test_rejection_mapping() {
        assert!(matches!(
            AuthError::from(SessionRejection::NoToken),
            AuthError::AuthenticationRequired
        ));
        assert!(matches!(
            AuthError::from(SessionRejection::Rejected(
                TokenSource::Cookie,
                TokenRejection::Expired
            )),
            AuthError::AuthenticationFailed
        ));
        assert!(matches!(
            AuthError::from(SessionRejection::Rejected(
                TokenSource::Cookie,
                TokenRejection::MissingSecret
            )),
            AuthError::MissingSigningSecret
        ));
    }
}
