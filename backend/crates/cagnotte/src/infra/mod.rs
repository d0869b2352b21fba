//! Infrastructure Layer
//!
//! Database implementations.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryCagnotteRepository;
pub use postgres::PgCagnotteRepository;
