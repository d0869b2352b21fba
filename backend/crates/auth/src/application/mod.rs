//! Application Layer
//!
//! Use cases and application services.

pub mod check_session;
pub mod config;
pub mod credential_store;
pub mod protected_paths;
pub mod sign_in;
pub mod token;

// Re-exports
pub use check_session::{CheckSessionUseCase, SessionRejection, TokenSource};
pub use config::{AuthConfig, AuthConfigError, parse_token_lifetime};
pub use credential_store::{CredentialStore, Profile};
pub use protected_paths::ProtectedPaths;
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use token::{IssuedToken, TokenIssuer, TokenRejection, TokenVerifier};
