//! Shared Kernel
//!
//! Vocabulary shared by every AfricaGnotte crate:
//! - the unified [`error::app_error::AppError`] and its [`error::kind::ErrorKind`]
//! - typed UUID identifiers ([`id::Id`])
//!
//! Nothing in here knows about campaigns or credentials; domain crates
//! build their own error enums on top and convert into `AppError` at the
//! HTTP boundary.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
