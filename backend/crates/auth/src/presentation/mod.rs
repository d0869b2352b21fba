//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, extractors, and the request gate.

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use extract::CurrentUser;
pub use handlers::AuthAppState;
pub use middleware::{GateState, USER_EMAIL_HEADER, USER_ID_HEADER, request_gate};
pub use router::{auth_router, auth_router_generic, me_router, me_router_generic};
