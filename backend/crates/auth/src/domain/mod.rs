//! Domain Layer
//!
//! Entities, value objects, and the repository trait.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{credential::Credential, identity::Subject, identity::VerifiedIdentity};
pub use repository::CredentialRepository;
