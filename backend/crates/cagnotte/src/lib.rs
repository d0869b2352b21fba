//! Cagnotte (Fundraising Campaign) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Cagnotte, donation and update entities, value objects,
//!   progress and statistics computations, repository traits
//! - `application/` - Use cases and paging configuration
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Access
//! - `/api/cagnottes/...` is public: browsing, donating, statistics
//! - `/api/me/cagnottes/...` sits behind the auth request gate; handlers read
//!   the owner from [`auth::CurrentUser`]
//!
//! ## Payments
//! Donations go through a simulated provider that always succeeds and hands
//! back a `SIM-` reference. No money moves.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::CagnotteConfig;
pub use error::{CagnotteError, CagnotteResult};
pub use infra::postgres::PgCagnotteRepository;
pub use presentation::router::cagnotte_router;

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::value_objects::*;
    pub use crate::presentation::dto::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}
