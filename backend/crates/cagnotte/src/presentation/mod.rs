//! Presentation Layer - HTTP handlers and DTOs

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::{CagnotteAppState, CagnotteStore};
pub use router::{cagnotte_router, cagnotte_router_generic};
