//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Credential entity, identity types, repository trait
//! - `application/` - Credential store, token issuer/verifier, use cases
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, router, request gate
//!
//! ## Flow
//! 1. Sign-up stores `{user_id, email, argon2id hash}`
//! 2. Sign-in checks the pair and sets a `token` cookie holding an HS256 JWT
//! 3. The request gate verifies the cookie (or a bearer header) on protected
//!    paths and attaches the identity as `x-user-id` / `x-user-email` plus a
//!    [`VerifiedIdentity`] extension
//! 4. Handlers read it through [`CurrentUser`] and never re-verify
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optional pepper
//! - Unknown email and wrong password are indistinguishable, timing included
//! - Client-supplied identity headers are always stripped

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::{AuthConfig, AuthConfigError};
pub use domain::entity::identity::VerifiedIdentity;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgCredentialRepository;
pub use presentation::extract::CurrentUser;
pub use presentation::middleware::{GateState, request_gate};
pub use presentation::router::{auth_router, me_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
